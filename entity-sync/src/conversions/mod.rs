//! Conversions from wire payloads into [`crate::types::Dataset`]s.

pub mod json;
