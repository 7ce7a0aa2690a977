//! Shared configuration types for the entity sync services.

mod base;
mod batch;
mod catalog;
mod replicator;
mod sink;
mod source;

pub use base::ValidationError;
pub use batch::BatchConfig;
pub use catalog::{CatalogConfig, EntityConfig};
pub use replicator::ReplicatorConfig;
pub use sink::{SinkConnectionConfig, SinkConnectionConfigWithoutSecrets};
pub use source::SourceConfig;
