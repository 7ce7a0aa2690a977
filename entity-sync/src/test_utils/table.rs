use crate::destination::memory::MemoryDestination;
use crate::types::{Cell, Dataset};

/// Asserts that the row of `table` keyed by `key` holds `expected` for each listed column.
///
/// Columns not listed are not checked.
///
/// # Panics
///
/// Panics if the row does not exist or any listed column differs.
pub async fn assert_row(
    destination: &MemoryDestination,
    table: &str,
    key: &str,
    expected: &[(&str, Cell)],
) {
    let row = destination
        .row(table, key)
        .await
        .unwrap_or_else(|| panic!("row `{key}` of table `{table}` does not exist"));

    for (column, value) in expected {
        let actual = row
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
            .unwrap_or_else(|| panic!("table `{table}` has no column `{column}`"));

        assert_eq!(
            actual, value,
            "column `{column}` of row `{key}` in table `{table}` mismatch"
        );
    }
}

/// Asserts that `dataset` has exactly `expected` as columns, in order.
///
/// # Panics
///
/// Panics if the columns differ.
pub fn assert_columns(dataset: &Dataset, expected: &[&str]) {
    let columns = dataset
        .columns()
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>();

    assert_eq!(columns, expected, "dataset columns mismatch");
}
