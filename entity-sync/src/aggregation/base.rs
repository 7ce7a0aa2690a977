use std::fmt;

use crate::error::SyncResult;
use crate::types::Dataset;

/// Normalization of raw decoded events, applied before the schema stage.
///
/// Implementations must be pure and idempotent: applying a transform to its own output returns
/// the output unchanged. A dataset lacking a column the transform needs fails with
/// [`crate::error::ErrorKind::SchemaMismatch`].
pub trait TopicAggregation: fmt::Debug + Send + Sync {
    /// Stable name of the strategy, used for equality and logging.
    fn name(&self) -> &'static str;

    /// Normalizes a dataset decoded from the create stream.
    fn apply_aggregation_create(&self, dataset: Dataset) -> SyncResult<Dataset>;

    /// Normalizes a dataset decoded from the update stream.
    fn apply_aggregation_update(&self, dataset: Dataset) -> SyncResult<Dataset>;
}

/// Business rules applied right before persistence.
///
/// The create output has exactly the insert columns of the owning spec and the update output
/// exactly its update columns. Same purity, idempotence and error rules as
/// [`TopicAggregation`].
pub trait SchemaAggregation: fmt::Debug + Send + Sync {
    /// Stable name of the strategy, used for equality and logging.
    fn name(&self) -> &'static str;

    /// Shapes newly created entities into the insert columns.
    fn apply_aggregation_create(&self, dataset: Dataset) -> SyncResult<Dataset>;

    /// Shapes entity changes into the update columns.
    fn apply_aggregation_update(&self, dataset: Dataset) -> SyncResult<Dataset>;
}
