use crate::stream::ColumnProjection;
use crate::types::{EventSchema, FieldSchema, FieldType};

pub const ACCOUNT_ID: &str = "account_id";
pub const CUSTOMER_ID: &str = "customer_id";
pub const ACCOUNT_TYPE: &str = "account_type";
pub const CURRENCY: &str = "currency";
pub const BALANCE: &str = "balance";
pub const STATUS: &str = "status";
pub const OPENED_AT: &str = "opened_at";

/// Field of the create payload holding the product details.
const DETAILS: &str = "details";

pub const ROW_KEY: &str = ACCOUNT_ID;

/// Columns written when an account is opened, in sink order.
pub const INSERT_COLUMN_NAMES: &[&str] = &[
    ACCOUNT_ID,
    CUSTOMER_ID,
    ACCOUNT_TYPE,
    CURRENCY,
    BALANCE,
    STATUS,
    OPENED_AT,
];

/// Columns merged when an account changes.
pub const UPDATE_COLUMN_NAMES: &[&str] = &[ACCOUNT_ID, BALANCE, STATUS];

pub const DEFAULT_ACCOUNT_TYPE: &str = "CURRENT";
pub const DEFAULT_CURRENCY: &str = "EUR";
pub const DEFAULT_BALANCE: f64 = 0.0;
pub const DEFAULT_STATUS: &str = "OPEN";

/// Statuses an account can be in.
pub const STATUSES: &[&str] = &["OPEN", "FROZEN", "CLOSED"];

/// Number of decimals balances are kept with.
pub const BALANCE_SCALE: i32 = 2;

/// Schema of an account opening event.
///
/// `{"account_id": "A1", "customer_id": "C1", "details": {"type": "savings", "currency": "eur"},
/// "balance": 10.5, "opened_at": "..."}`.
pub fn create_event_schema() -> EventSchema {
    EventSchema::new(vec![
        FieldSchema::new(ACCOUNT_ID, FieldType::String, false),
        FieldSchema::new(CUSTOMER_ID, FieldType::String, false),
        FieldSchema::new(
            DETAILS,
            FieldType::Struct(EventSchema::new(vec![
                FieldSchema::new("type", FieldType::String, true),
                FieldSchema::new(CURRENCY, FieldType::String, true),
            ])),
            true,
        ),
        FieldSchema::new(BALANCE, FieldType::Double, true),
        FieldSchema::new(OPENED_AT, FieldType::Timestamp, true),
    ])
}

pub fn create_event_columns() -> Vec<ColumnProjection> {
    vec![
        ColumnProjection::field(ACCOUNT_ID),
        ColumnProjection::field(CUSTOMER_ID),
        ColumnProjection::new(format!("{DETAILS}.type"), ACCOUNT_TYPE),
        ColumnProjection::new(format!("{DETAILS}.{CURRENCY}"), CURRENCY),
        ColumnProjection::field(BALANCE),
        ColumnProjection::field(OPENED_AT),
    ]
}

/// Schema of an account update event.
pub fn update_event_schema() -> EventSchema {
    EventSchema::new(vec![
        FieldSchema::new(ACCOUNT_ID, FieldType::String, false),
        FieldSchema::new(BALANCE, FieldType::Double, true),
        FieldSchema::new(STATUS, FieldType::String, true),
    ])
}

pub fn update_event_columns() -> Vec<ColumnProjection> {
    vec![
        ColumnProjection::field(ACCOUNT_ID),
        ColumnProjection::field(BALANCE),
        ColumnProjection::field(STATUS),
    ]
}
