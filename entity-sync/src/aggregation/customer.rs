use tracing::debug;

use crate::aggregation::base::{SchemaAggregation, TopicAggregation};
use crate::aggregation::rules;
use crate::definition::customer::{
    CREATED_AT, DEFAULT_STATUS, EMAIL, ID, INSERT_COLUMN_NAMES, NAME, PHONE, STATUS,
    UPDATE_COLUMN_NAMES,
};
use crate::error::SyncResult;
use crate::types::{Cell, Dataset};

/// Normalizes decoded customer events.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomerTopicAggregation;

impl TopicAggregation for CustomerTopicAggregation {
    fn name(&self) -> &'static str {
        "customer_topic"
    }

    fn apply_aggregation_create(&self, dataset: Dataset) -> SyncResult<Dataset> {
        dataset.require_columns(&[ID, NAME])?;
        let dataset = rules::ensure_columns(dataset, &[EMAIL, PHONE, CREATED_AT]);

        normalize_contact(dataset)
    }

    fn apply_aggregation_update(&self, dataset: Dataset) -> SyncResult<Dataset> {
        dataset.require_columns(&[ID])?;
        let dataset = rules::ensure_columns(dataset, &[NAME, EMAIL, PHONE]);

        normalize_contact(dataset)
    }
}

/// Applies customer business rules and shapes rows for the customer table.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomerSchemaAggregation;

impl SchemaAggregation for CustomerSchemaAggregation {
    fn name(&self) -> &'static str {
        "customer_schema"
    }

    fn apply_aggregation_create(&self, dataset: Dataset) -> SyncResult<Dataset> {
        debug!(rows = dataset.len(), "applying customer create rules");

        dataset
            .ensure_column(STATUS, Cell::Null)
            .fill_null(STATUS, Cell::from(DEFAULT_STATUS))?
            .select(INSERT_COLUMN_NAMES)
    }

    fn apply_aggregation_update(&self, dataset: Dataset) -> SyncResult<Dataset> {
        debug!(rows = dataset.len(), "applying customer update rules");

        dataset.select(UPDATE_COLUMN_NAMES)
    }
}

fn normalize_contact(dataset: Dataset) -> SyncResult<Dataset> {
    let dataset = rules::require_non_blank(dataset, NAME)?;
    let dataset = rules::trim(dataset, NAME)?;
    let dataset = rules::trim_lowercase(dataset, EMAIL)?;

    rules::strip_whitespace(dataset, PHONE)
}
