//! Synchronization of business entities from event streams into relational tables.
//!
//! Each entity type is described by an [`entity::EntitySyncSpec`] binding its create and update
//! streams to a sink table and to two aggregation strategies. The [`entity::catalog`] builds the
//! specs of every known entity and the [`pipeline::SyncPipeline`] routes events through them into
//! a [`destination::Destination`].

pub mod aggregation;
pub mod conversions;
pub mod definition;
pub mod destination;
pub mod entity;
pub mod error;
mod macros;
pub mod pipeline;
pub mod stream;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;
