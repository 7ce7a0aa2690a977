use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt;

use crate::error::{ErrorKind, SyncError, SyncResult};
use crate::stream::{ColumnProjection, StreamDefinition};
use crate::types::{Cell, Dataset, FieldType, PATH_SEPARATOR, TableRow};
use crate::{bail, sync_error};

/// Decodes JSON event payloads into a dataset shaped by the stream's column projection.
///
/// Each payload must be a JSON object and yields one row. Fields absent from the payload, or
/// explicitly `null`, become [`Cell::Null`] when the field (or any struct containing it) is
/// nullable and are rejected otherwise. Fields not referenced by the projection are ignored.
///
/// Every payload is decoded before failing, and all failures are returned together.
pub fn decode_payloads(stream: &StreamDefinition, payloads: &[Value]) -> SyncResult<Dataset> {
    let columns = stream
        .output_columns()
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let mut rows = Vec::with_capacity(payloads.len());
    let mut errors = Vec::new();
    for (index, payload) in payloads.iter().enumerate() {
        match decode_payload(stream, payload) {
            Ok(row) => rows.push(row),
            Err(err) => errors.push(sync_error!(
                err.kind(),
                "Event payload could not be decoded",
                format!(
                    "payload {index} of topic `{}`: {}",
                    stream.topic_name(),
                    err.detail().unwrap_or(err.description())
                ),
                source: err
            )),
        }
    }

    if !errors.is_empty() {
        return Err(SyncError::from(errors));
    }

    Dataset::new(columns, rows)
}

/// Decodes a single JSON payload into a row.
pub fn decode_payload(stream: &StreamDefinition, payload: &Value) -> SyncResult<TableRow> {
    let Value::Object(_) = payload else {
        bail!(
            ErrorKind::InvalidData,
            "Event payload is not a JSON object",
            format!("expected an object, got `{payload}`")
        );
    };

    let values = stream
        .columns()
        .iter()
        .map(|column| decode_column(stream, column, payload))
        .collect::<SyncResult<Vec<_>>>()?;

    Ok(TableRow::new(values))
}

fn decode_column(
    stream: &StreamDefinition,
    column: &ColumnProjection,
    payload: &Value,
) -> SyncResult<Cell> {
    let Some(resolved) = stream.schema().resolve(column.path()) else {
        bail!(
            ErrorKind::SchemaMismatch,
            "Projected field is not part of the stream schema",
            format!("`{}` is not in the schema of `{}`", column.path(), stream.topic_name())
        );
    };

    match lookup(payload, column.path()) {
        None | Some(Value::Null) if resolved.nullable => Ok(Cell::Null),
        None | Some(Value::Null) => bail!(
            ErrorKind::InvalidData,
            "Required field is missing",
            format!("`{}` must be present and not null", column.path())
        ),
        Some(value) => convert_value(column.path(), &resolved.field.typ, value),
    }
}

/// Walks `path` through nested objects. Stops at the first absent or null segment.
fn lookup<'a>(payload: &'a Value, path: &str) -> Option<&'a Value> {
    path.split(PATH_SEPARATOR)
        .try_fold(payload, |value, segment| match value {
            Value::Object(map) => map.get(segment),
            _ => None,
        })
}

/// Converts a JSON value to the cell of a field of type `typ`.
///
/// Scalars are coerced leniently: strings accept numbers and booleans, numbers and booleans
/// accept their string forms. Doubles must be finite.
pub fn convert_value(path: &str, typ: &FieldType, value: &Value) -> SyncResult<Cell> {
    let cell = match (typ, value) {
        (FieldType::String, Value::String(value)) => Cell::String(value.clone()),
        (FieldType::String, Value::Number(value)) => Cell::String(value.to_string()),
        (FieldType::String, Value::Bool(value)) => Cell::String(value.to_string()),

        (FieldType::Integer, Value::Number(number)) => match number.as_i64() {
            Some(value) => Cell::I64(value),
            None => return type_error(path, typ, value),
        },
        (FieldType::Integer, Value::String(value)) => Cell::I64(value.trim().parse()?),

        (FieldType::Double, Value::Number(number)) => match number.as_f64() {
            Some(value) => Cell::F64(value),
            None => return type_error(path, typ, value),
        },
        (FieldType::Double, Value::String(value)) => match value.trim().parse::<f64>()? {
            parsed if parsed.is_finite() => Cell::F64(parsed),
            _ => return type_error(path, typ, value),
        },

        (FieldType::Boolean, Value::Bool(value)) => Cell::Bool(*value),
        (FieldType::Boolean, Value::String(value)) => match value.trim() {
            "true" => Cell::Bool(true),
            "false" => Cell::Bool(false),
            _ => return type_error(path, typ, value),
        },

        (FieldType::Timestamp, Value::String(value)) => {
            let timestamp = DateTime::parse_from_rfc3339(value.trim())?;
            Cell::TimestampTz(timestamp.with_timezone(&Utc))
        }

        _ => return type_error(path, typ, value),
    };

    Ok(cell)
}

fn type_error<V>(path: &str, typ: &FieldType, value: &V) -> SyncResult<Cell>
where
    V: fmt::Display + ?Sized,
{
    Err(sync_error!(
        ErrorKind::ConversionError,
        "Field value does not match its type",
        format!("`{path}` must be a {typ}, got `{value}`")
    ))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::definition::{account, customer};

    fn customer_create() -> StreamDefinition {
        StreamDefinition::new(
            "createcustomer3",
            customer::create_event_columns(),
            customer::create_event_schema(),
        )
    }

    fn account_create() -> StreamDefinition {
        StreamDefinition::new(
            "createaccount3",
            account::create_event_columns(),
            account::create_event_schema(),
        )
    }

    #[test]
    fn decodes_nested_fields_through_projection() {
        let dataset = decode_payloads(
            &customer_create(),
            &[json!({
                "id": "C1",
                "name": "Alice",
                "contact": {"email": "alice@example.com"},
                "created_at": "2024-05-01T10:00:00+02:00",
                "ignored": true
            })],
        )
        .unwrap();

        assert_eq!(
            dataset.columns(),
            &["id", "name", "email", "phone", "created_at"]
        );
        assert_eq!(dataset.value(0, "email"), Some(&Cell::from("alice@example.com")));
        assert_eq!(dataset.value(0, "phone"), Some(&Cell::Null));
        assert_eq!(
            dataset.value(0, "created_at"),
            Some(&Cell::TimestampTz(
                DateTime::parse_from_rfc3339("2024-05-01T08:00:00Z")
                    .unwrap()
                    .with_timezone(&Utc)
            ))
        );
    }

    #[test]
    fn missing_nullable_parent_yields_nulls() {
        let dataset =
            decode_payloads(&customer_create(), &[json!({"id": "C1", "name": "Alice"})]).unwrap();

        assert_eq!(dataset.value(0, "email"), Some(&Cell::Null));
        assert_eq!(dataset.value(0, "created_at"), Some(&Cell::Null));
    }

    #[test]
    fn missing_required_field_is_invalid_data() {
        let err = decode_payloads(&customer_create(), &[json!({"id": "C1", "name": null})])
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn non_object_payload_is_invalid_data() {
        let err = decode_payloads(&customer_create(), &[json!(["C1"])]).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn scalars_are_coerced() {
        let dataset = decode_payloads(
            &account_create(),
            &[
                json!({"account_id": 42, "customer_id": "C1", "balance": "10.5"}),
                json!({"account_id": "A2", "customer_id": "C1", "balance": 3}),
            ],
        )
        .unwrap();

        assert_eq!(dataset.value(0, "account_id"), Some(&Cell::from("42")));
        assert_eq!(dataset.value(0, "balance"), Some(&Cell::F64(10.5)));
        assert_eq!(dataset.value(1, "balance"), Some(&Cell::F64(3.0)));
    }

    #[test]
    fn wrong_types_are_conversion_errors() {
        let err = decode_payloads(
            &account_create(),
            &[json!({"account_id": "A1", "customer_id": "C1", "balance": {"amount": 1}})],
        )
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConversionError);
    }

    #[test]
    fn every_failing_payload_is_reported() {
        let err = decode_payloads(
            &customer_create(),
            &[
                json!({"id": "C1"}),
                json!({"id": "C2", "name": "Bob"}),
                json!({"name": "Carol"}),
            ],
        )
        .unwrap_err();

        assert_eq!(err.kinds(), vec![ErrorKind::InvalidData, ErrorKind::InvalidData]);
    }

    #[test]
    fn convert_value_parses_booleans_from_strings() {
        assert_eq!(
            convert_value("flag", &FieldType::Boolean, &json!("true")).unwrap(),
            Cell::Bool(true)
        );
        assert!(convert_value("flag", &FieldType::Boolean, &json!("yes")).is_err());
    }

    #[test]
    fn non_finite_doubles_are_conversion_errors() {
        for raw in ["NaN", "inf", "-infinity"] {
            let err = convert_value("balance", &FieldType::Double, &json!(raw)).unwrap_err();

            assert_eq!(err.kind(), ErrorKind::ConversionError);
        }

        assert_eq!(
            convert_value("balance", &FieldType::Double, &json!(1e307)).unwrap(),
            Cell::F64(1e307)
        );
    }
}
