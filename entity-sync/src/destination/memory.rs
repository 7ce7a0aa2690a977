use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::bail;
use crate::destination::Destination;
use crate::entity::SinkTable;
use crate::error::{ErrorKind, SyncResult};
use crate::types::{Cell, Dataset, EventKind, TableRow};

/// Rows of one table, keyed by the display form of their row key.
#[derive(Debug, Clone, Default)]
struct StoredTable {
    columns: Vec<String>,
    rows: Vec<TableRow>,
    index: HashMap<String, usize>,
}

impl StoredTable {
    fn column_index(&mut self, column: &str) -> usize {
        if let Some(index) = self.columns.iter().position(|name| name == column) {
            return index;
        }

        self.columns.push(column.to_string());
        for row in &mut self.rows {
            row.values_mut().push(Cell::Null);
        }

        self.columns.len() - 1
    }

    fn upsert(&mut self, key: String, kind: EventKind, values: Vec<(usize, Cell)>) {
        let width = self.columns.len();

        match self.index.get(&key).copied() {
            Some(position) => {
                let row = self.rows[position].values_mut();
                for (index, value) in values {
                    if kind == EventKind::Update && value.is_null() {
                        continue;
                    }
                    row[index] = value;
                }
            }
            None => {
                let mut row = vec![Cell::Null; width];
                for (index, value) in values {
                    row[index] = value;
                }
                self.index.insert(key, self.rows.len());
                self.rows.push(TableRow::new(row));
            }
        }
    }

    fn to_dataset(&self) -> SyncResult<Dataset> {
        Dataset::new(self.columns.clone(), self.rows.clone())
    }
}

#[derive(Debug, Default)]
struct Inner {
    tables: HashMap<String, StoredTable>,
    writes: Vec<(String, EventKind, usize)>,
}

/// In-memory destination for testing and development purposes.
///
/// [`MemoryDestination`] applies the upsert semantics of [`Destination`] to tables held in
/// memory, so pipelines can be exercised end to end and their resulting tables inspected. Data
/// is lost when the process terminates.
///
/// Cloning is cheap and clones share the same storage.
#[derive(Debug, Clone)]
pub struct MemoryDestination {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryDestination {
    /// Creates a new empty memory destination.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Returns a copy of the rows stored in `table`, with its columns in first-written order.
    ///
    /// Returns [`None`] if nothing was ever written to the table.
    pub async fn table(&self, table: &str) -> SyncResult<Option<Dataset>> {
        let inner = self.inner.lock().await;

        inner
            .tables
            .get(table)
            .map(StoredTable::to_dataset)
            .transpose()
    }

    /// Returns the row of `table` whose row key displays as `key`, as `(column, value)` pairs.
    pub async fn row(&self, table: &str, key: &str) -> Option<Vec<(String, Cell)>> {
        let inner = self.inner.lock().await;

        let stored = inner.tables.get(table)?;
        let position = *stored.index.get(key)?;

        Some(
            stored
                .columns
                .iter()
                .cloned()
                .zip(stored.rows[position].values().iter().cloned())
                .collect(),
        )
    }

    /// Returns the number of rows stored per table.
    pub async fn table_row_counts(&self) -> HashMap<String, usize> {
        let inner = self.inner.lock().await;

        inner
            .tables
            .iter()
            .map(|(name, table)| (name.clone(), table.rows.len()))
            .collect()
    }

    /// Returns every write received, as `(table, kind, row count)`, in arrival order.
    pub async fn writes(&self) -> Vec<(String, EventKind, usize)> {
        let inner = self.inner.lock().await;
        inner.writes.clone()
    }

    /// Clears all stored tables and writes.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.tables.clear();
        inner.writes.clear();
    }
}

impl Default for MemoryDestination {
    fn default() -> Self {
        Self::new()
    }
}

impl Destination for MemoryDestination {
    fn name() -> &'static str {
        "memory"
    }

    async fn write_rows(
        &self,
        table: &SinkTable,
        kind: EventKind,
        dataset: Dataset,
    ) -> SyncResult<()> {
        let Some(key_index) = dataset.column_index(&table.row_key_column) else {
            bail!(
                ErrorKind::DestinationError,
                "Rows are missing the row key",
                format!(
                    "writing to `{}` requires column `{}`",
                    table.name, table.row_key_column
                )
            );
        };

        if dataset
            .rows()
            .iter()
            .any(|row| row.values()[key_index].is_null())
        {
            bail!(
                ErrorKind::DestinationError,
                "Row key is null",
                format!(
                    "`{}` of table `{}` must be set on every row",
                    table.row_key_column, table.name
                )
            );
        }

        let mut inner = self.inner.lock().await;

        info!(
            table = %table.name,
            %kind,
            rows = dataset.len(),
            "writing rows to memory destination"
        );

        inner.writes.push((table.name.clone(), kind, dataset.len()));

        let stored = inner.tables.entry(table.name.clone()).or_default();
        let column_indexes = dataset
            .columns()
            .iter()
            .map(|column| stored.column_index(column))
            .collect::<Vec<_>>();

        for row in dataset.into_rows() {
            let values = row.into_values();
            let key = values[key_index].to_string();
            stored.upsert(
                key,
                kind,
                column_indexes.iter().copied().zip(values).collect(),
            );
        }

        Ok(())
    }
}
