use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two streams of an entity an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The entity was created.
    Create,
    /// An existing entity changed.
    Update,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Create => f.write_str("create"),
            EventKind::Update => f.write_str("update"),
        }
    }
}

/// An undecoded event as delivered by the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Topic the event was published on.
    pub topic: String,
    /// Event body, decoded with the topic's stream definition.
    pub payload: serde_json::Value,
}

impl RawEvent {
    pub fn new(topic: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }
}
