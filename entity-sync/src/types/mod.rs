//! Common types used throughout the sync core.
//!
//! Re-exports the tabular dataset model, the structural schema of event payloads and the event
//! types exchanged with the source.

mod cell;
mod dataset;
mod event;
mod schema;
mod table_row;

pub use cell::*;
pub use dataset::*;
pub use event::*;
pub use schema::*;
pub use table_row::*;
