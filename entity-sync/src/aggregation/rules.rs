//! Column level building blocks shared by the aggregation strategies.
//!
//! Every rule leaves null values untouched and is idempotent, so strategies composed from them
//! are idempotent as well.

use crate::{bail, sync_error};
use crate::error::{ErrorKind, SyncResult};
use crate::types::{Cell, Dataset};

/// Appends each of `columns` that is absent, filled with nulls.
pub fn ensure_columns(dataset: Dataset, columns: &[&str]) -> Dataset {
    columns
        .iter()
        .fold(dataset, |dataset, column| dataset.ensure_column(column, Cell::Null))
}

/// Trims surrounding whitespace.
pub fn trim(dataset: Dataset, column: &str) -> SyncResult<Dataset> {
    map_strings(dataset, column, |value| value.trim().to_string())
}

/// Trims and lowercases, e.g. for email addresses.
pub fn trim_lowercase(dataset: Dataset, column: &str) -> SyncResult<Dataset> {
    map_strings(dataset, column, |value| value.trim().to_lowercase())
}

/// Trims and uppercases, e.g. for codes and enumerations.
pub fn trim_uppercase(dataset: Dataset, column: &str) -> SyncResult<Dataset> {
    map_strings(dataset, column, |value| value.trim().to_uppercase())
}

/// Removes all whitespace, e.g. for phone numbers.
pub fn strip_whitespace(dataset: Dataset, column: &str) -> SyncResult<Dataset> {
    map_strings(dataset, column, |value| {
        value.chars().filter(|c| !c.is_whitespace()).collect()
    })
}

/// Largest magnitude below which every integer is exactly representable as an `f64`.
const MAX_EXACT_F64: f64 = 9_007_199_254_740_992.0;

/// Rounds numeric values to `decimals` decimal places. Integers become floats.
///
/// Values too large to carry `decimals` fractional digits are kept as they are.
pub fn round(dataset: Dataset, column: &str, decimals: i32) -> SyncResult<Dataset> {
    let factor = 10f64.powi(decimals);

    dataset.map_column(column, |cell| match cell {
        Cell::Null => Ok(Cell::Null),
        Cell::F64(value) => {
            let scaled = value * factor;
            if scaled.is_finite() && scaled.abs() < MAX_EXACT_F64 {
                Ok(Cell::F64(scaled.round() / factor))
            } else {
                Ok(Cell::F64(value))
            }
        }
        Cell::I64(value) => Ok(Cell::F64(value as f64)),
        other => unexpected_type(column, "numeric", &other),
    })
}

/// Fails with [`ErrorKind::InvalidData`] when a non-null value is not one of `allowed`.
pub fn require_one_of(dataset: Dataset, column: &str, allowed: &[&str]) -> SyncResult<Dataset> {
    dataset.map_column(column, |cell| match cell {
        Cell::Null => Ok(Cell::Null),
        Cell::String(value) if allowed.contains(&value.as_str()) => Ok(Cell::String(value)),
        Cell::String(value) => bail!(
            ErrorKind::InvalidData,
            "Value is not allowed for column",
            format!(
                "`{column}` is `{value}`, expected one of [{}]",
                allowed.join(", ")
            )
        ),
        other => unexpected_type(column, "string", &other),
    })
}

/// Fails with [`ErrorKind::InvalidData`] when a non-null value is empty or only whitespace.
pub fn require_non_blank(dataset: Dataset, column: &str) -> SyncResult<Dataset> {
    dataset.map_column(column, |cell| match cell {
        Cell::String(value) if value.trim().is_empty() => bail!(
            ErrorKind::InvalidData,
            "Value must not be blank",
            format!("`{column}` is empty")
        ),
        other => Ok(other),
    })
}

fn map_strings<F>(dataset: Dataset, column: &str, mut f: F) -> SyncResult<Dataset>
where
    F: FnMut(&str) -> String,
{
    dataset.map_column(column, |cell| match cell {
        Cell::Null => Ok(Cell::Null),
        Cell::String(value) => Ok(Cell::String(f(&value))),
        other => unexpected_type(column, "string", &other),
    })
}

fn unexpected_type(column: &str, expected: &str, actual: &Cell) -> SyncResult<Cell> {
    Err(sync_error!(
        ErrorKind::SchemaMismatch,
        "Column has an unexpected type",
        format!(
            "`{column}` must hold {expected} values, found {}",
            actual.type_name()
        )
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(values: Vec<Cell>) -> Dataset {
        Dataset::from_rows(&["value"], values.into_iter().map(|value| vec![value])).unwrap()
    }

    fn values(dataset: &Dataset) -> Vec<Cell> {
        dataset
            .column_values("value")
            .unwrap()
            .into_iter()
            .cloned()
            .collect()
    }

    #[test]
    fn string_rules_skip_nulls() {
        let result =
            trim_lowercase(dataset(vec![Cell::from("  Alice@Example.COM "), Cell::Null]), "value")
                .unwrap();

        assert_eq!(values(&result), vec![Cell::from("alice@example.com"), Cell::Null]);
    }

    #[test]
    fn strip_whitespace_removes_inner_spaces() {
        let result = strip_whitespace(dataset(vec![Cell::from(" +32 470 12 34 56")]), "value")
            .unwrap();

        assert_eq!(values(&result), vec![Cell::from("+32470123456")]);
    }

    #[test]
    fn round_is_idempotent() {
        let once = round(dataset(vec![Cell::F64(10.456), Cell::I64(3)]), "value", 2).unwrap();
        let twice = round(once.clone(), "value", 2).unwrap();

        assert_eq!(values(&once), vec![Cell::F64(10.46), Cell::F64(3.0)]);
        assert_eq!(once, twice);
    }

    #[test]
    fn round_keeps_values_beyond_float_precision() {
        let input = vec![Cell::F64(1e307), Cell::F64(-1e20), Cell::F64(f64::MAX)];

        let once = round(dataset(input.clone()), "value", 2).unwrap();
        let twice = round(once.clone(), "value", 2).unwrap();

        assert_eq!(values(&once), input);
        assert_eq!(once, twice);
    }

    #[test]
    fn string_rule_on_number_is_a_schema_mismatch() {
        let err = trim(dataset(vec![Cell::I64(1)]), "value").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::SchemaMismatch);
    }

    #[test]
    fn require_one_of_rejects_unknown_values() {
        let err =
            require_one_of(dataset(vec![Cell::from("PENDING")]), "value", &["OPEN"]).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert_eq!(err.detail(), Some("`value` is `PENDING`, expected one of [OPEN]"));
    }

    #[test]
    fn require_non_blank_rejects_whitespace_only_values() {
        let err = require_non_blank(dataset(vec![Cell::from("Alice"), Cell::from("   ")]), "value")
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(require_non_blank(dataset(vec![Cell::Null]), "value").is_ok());
    }

    #[test]
    fn ensure_columns_appends_missing_only() {
        let result = ensure_columns(dataset(vec![Cell::from("x")]), &["value", "other"]);

        assert_eq!(result.columns(), &["value".to_string(), "other".to_string()]);
        assert_eq!(result.value(0, "other"), Some(&Cell::Null));
    }
}
