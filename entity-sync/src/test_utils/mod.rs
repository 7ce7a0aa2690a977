//! Fixtures and assertions for testing entity synchronization.
//!
//! [`event`] builds raw events in the wire shape of each topic, [`pipeline`] wires the default
//! catalog to a [`crate::destination::memory::MemoryDestination`] and [`table`] holds assertions
//! on the rows a destination ends up with.

pub mod event;
pub mod pipeline;
pub mod table;
