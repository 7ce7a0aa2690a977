use crate::stream::ColumnProjection;
use crate::types::{EventSchema, FieldSchema, FieldType};

pub const ID: &str = "id";
pub const NAME: &str = "name";
pub const EMAIL: &str = "email";
pub const PHONE: &str = "phone";
pub const STATUS: &str = "status";
pub const CREATED_AT: &str = "created_at";

/// Field of the create payload grouping the contact details.
const CONTACT: &str = "contact";

pub const ROW_KEY: &str = ID;

/// Columns written when a customer is created, in sink order.
pub const INSERT_COLUMN_NAMES: &[&str] = &[ID, NAME, EMAIL, PHONE, STATUS, CREATED_AT];

/// Columns merged when a customer is updated.
pub const UPDATE_COLUMN_NAMES: &[&str] = &[ID, NAME, EMAIL, PHONE];

/// Status given to customers created without one.
pub const DEFAULT_STATUS: &str = "ACTIVE";

/// Schema of a customer creation event.
///
/// Contact details are nested and optional:
/// `{"id": "C1", "name": "Alice", "contact": {"email": "...", "phone": "..."}, "created_at": "..."}`.
pub fn create_event_schema() -> EventSchema {
    EventSchema::new(vec![
        FieldSchema::new(ID, FieldType::String, false),
        FieldSchema::new(NAME, FieldType::String, false),
        FieldSchema::new(
            CONTACT,
            FieldType::Struct(EventSchema::new(vec![
                FieldSchema::new(EMAIL, FieldType::String, true),
                FieldSchema::new(PHONE, FieldType::String, true),
            ])),
            true,
        ),
        FieldSchema::new(CREATED_AT, FieldType::Timestamp, true),
    ])
}

pub fn create_event_columns() -> Vec<ColumnProjection> {
    vec![
        ColumnProjection::field(ID),
        ColumnProjection::field(NAME),
        ColumnProjection::new(format!("{CONTACT}.{EMAIL}"), EMAIL),
        ColumnProjection::new(format!("{CONTACT}.{PHONE}"), PHONE),
        ColumnProjection::field(CREATED_AT),
    ]
}

/// Schema of a customer update event. Only the key is mandatory.
pub fn update_event_schema() -> EventSchema {
    EventSchema::new(vec![
        FieldSchema::new(ID, FieldType::String, false),
        FieldSchema::new(NAME, FieldType::String, true),
        FieldSchema::new(EMAIL, FieldType::String, true),
        FieldSchema::new(PHONE, FieldType::String, true),
    ])
}

pub fn update_event_columns() -> Vec<ColumnProjection> {
    vec![
        ColumnProjection::field(ID),
        ColumnProjection::field(NAME),
        ColumnProjection::field(EMAIL),
        ColumnProjection::field(PHONE),
    ]
}
