use std::future::Future;

use crate::entity::SinkTable;
use crate::error::SyncResult;
use crate::types::{Dataset, EventKind};

/// Trait for systems that persist entity rows produced by the sync pipeline.
///
/// Writes are upserts keyed by [`SinkTable::row_key_column`]. A row whose key is absent from
/// the table is inserted. When the key is present, rows of [`EventKind::Create`] overwrite the
/// insert columns while rows of [`EventKind::Update`] only replace the non-null update cells,
/// leaving every other column as it was.
///
/// The pipeline delivers datasets of one table in source order, and implementations must apply
/// rows in the order they are received.
pub trait Destination {
    /// Returns the name of the destination.
    fn name() -> &'static str;

    /// Propagates the shutdown signal to the destination.
    ///
    /// The default implementation is a no-op.
    fn shutdown(&self) -> impl Future<Output = SyncResult<()>> + Send {
        async { Ok(()) }
    }

    /// Upserts the rows of `dataset` into `table`.
    ///
    /// The dataset columns are the insert columns of the table for [`EventKind::Create`] and its
    /// update columns for [`EventKind::Update`].
    fn write_rows(
        &self,
        table: &SinkTable,
        kind: EventKind,
        dataset: Dataset,
    ) -> impl Future<Output = SyncResult<()>> + Send;
}
