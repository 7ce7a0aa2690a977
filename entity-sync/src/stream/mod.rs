//! Event stream descriptions.
//!
//! A [`StreamDefinition`] tells the decoding step which topic a stream is read from, the shape
//! of its payload and how payload fields map to dataset columns.

mod definition;

pub use definition::{ColumnProjection, StreamDefinition};
