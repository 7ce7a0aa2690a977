//! Entity level sync specifications and the catalog of known entities.

pub mod catalog;
mod spec;

pub use catalog::EntityType;
pub use spec::{EntitySyncSpec, SinkTable};
