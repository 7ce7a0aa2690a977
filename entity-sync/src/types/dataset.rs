use std::collections::HashSet;

use crate::error::{ErrorKind, SyncResult};
use crate::types::{Cell, TableRow};
use crate::{bail, sync_error};

/// An ordered set of named columns and the rows holding their values.
///
/// [`Dataset`] is what flows between the decoding step, the aggregation stages and the
/// destination. Every row has exactly one [`Cell`] per column, in column order. Transformations
/// consume the dataset and return a new one so that stages compose without shared state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<TableRow>,
}

impl Dataset {
    /// Creates a dataset, checking that column names are unique and every row has one value per
    /// column.
    pub fn new(columns: Vec<String>, rows: Vec<TableRow>) -> SyncResult<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.as_str()) {
                bail!(
                    ErrorKind::InvalidData,
                    "Dataset has duplicate column names",
                    format!("column `{column}` appears more than once")
                );
            }
        }

        for (index, row) in rows.iter().enumerate() {
            if row.values().len() != columns.len() {
                bail!(
                    ErrorKind::InvalidData,
                    "Dataset row width does not match its columns",
                    format!(
                        "row {index} has {} values but the dataset has {} columns",
                        row.values().len(),
                        columns.len()
                    )
                );
            }
        }

        Ok(Self { columns, rows })
    }

    /// Creates a dataset from column names and rows of cells.
    pub fn from_rows<I>(columns: &[&str], rows: I) -> SyncResult<Self>
    where
        I: IntoIterator<Item = Vec<Cell>>,
    {
        Dataset::new(
            columns.iter().map(|column| column.to_string()).collect(),
            rows.into_iter().map(TableRow::new).collect(),
        )
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<TableRow> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// Fails with [`ErrorKind::SchemaMismatch`] listing every required column that is absent.
    pub fn require_columns(&self, required: &[&str]) -> SyncResult<()> {
        let missing = required
            .iter()
            .filter(|column| !self.has_column(column))
            .copied()
            .collect::<Vec<_>>();

        if !missing.is_empty() {
            bail!(
                ErrorKind::SchemaMismatch,
                "Dataset is missing required columns",
                format!(
                    "missing [{}], available [{}]",
                    missing.join(", "),
                    self.columns.join(", ")
                )
            );
        }

        Ok(())
    }

    /// Returns the value of `column` in the row at `row`.
    pub fn value(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|row| &row.values()[index])
    }

    /// Returns the values of `column` for every row, in row order.
    pub fn column_values(&self, column: &str) -> SyncResult<Vec<&Cell>> {
        let index = self.index_of(column)?;

        Ok(self.rows.iter().map(|row| &row.values()[index]).collect())
    }

    /// Projects the dataset onto `columns`, in that order.
    pub fn select(self, columns: &[&str]) -> SyncResult<Dataset> {
        self.require_columns(columns)?;

        let indexes = columns
            .iter()
            .filter_map(|column| self.column_index(column))
            .collect::<Vec<_>>();

        let rows = self
            .rows
            .into_iter()
            .map(|row| {
                let mut values = row.into_values();
                let projected = indexes
                    .iter()
                    .map(|&index| std::mem::replace(&mut values[index], Cell::Null))
                    .collect();
                TableRow::new(projected)
            })
            .collect();

        Dataset::new(columns.iter().map(|column| column.to_string()).collect(), rows)
    }

    /// Appends `column` filled with `default` when it is not already present.
    pub fn ensure_column(mut self, column: &str, default: Cell) -> Dataset {
        if self.has_column(column) {
            return self;
        }

        self.columns.push(column.to_string());
        for row in &mut self.rows {
            row.values_mut().push(default.clone());
        }

        self
    }

    /// Replaces every value of `column` with the result of `f`.
    pub fn map_column<F>(mut self, column: &str, mut f: F) -> SyncResult<Dataset>
    where
        F: FnMut(Cell) -> SyncResult<Cell>,
    {
        let index = self.index_of(column)?;

        for row in &mut self.rows {
            let slot = &mut row.values_mut()[index];
            let value = std::mem::replace(slot, Cell::Null);
            *slot = f(value)?;
        }

        Ok(self)
    }

    /// Replaces null values of `column` with `value`.
    pub fn fill_null(self, column: &str, value: Cell) -> SyncResult<Dataset> {
        self.map_column(column, |cell| {
            Ok(if cell.is_null() { value.clone() } else { cell })
        })
    }

    fn index_of(&self, column: &str) -> SyncResult<usize> {
        self.column_index(column).ok_or_else(|| {
            sync_error!(
                ErrorKind::SchemaMismatch,
                "Dataset is missing required columns",
                format!(
                    "missing [{column}], available [{}]",
                    self.columns.join(", ")
                )
            )
        })
    }
}
