use tracing::debug;

use crate::aggregation::base::{SchemaAggregation, TopicAggregation};
use crate::aggregation::rules;
use crate::definition::account::{
    ACCOUNT_ID, ACCOUNT_TYPE, BALANCE, BALANCE_SCALE, CURRENCY, CUSTOMER_ID, DEFAULT_ACCOUNT_TYPE,
    DEFAULT_BALANCE, DEFAULT_CURRENCY, DEFAULT_STATUS, INSERT_COLUMN_NAMES, OPENED_AT, STATUS,
    STATUSES, UPDATE_COLUMN_NAMES,
};
use crate::error::SyncResult;
use crate::types::{Cell, Dataset};

/// Normalizes decoded account events.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountTopicAggregation;

impl TopicAggregation for AccountTopicAggregation {
    fn name(&self) -> &'static str {
        "account_topic"
    }

    fn apply_aggregation_create(&self, dataset: Dataset) -> SyncResult<Dataset> {
        dataset.require_columns(&[ACCOUNT_ID, CUSTOMER_ID])?;
        let dataset =
            rules::ensure_columns(dataset, &[ACCOUNT_TYPE, CURRENCY, BALANCE, OPENED_AT]);

        let dataset = rules::trim_uppercase(dataset, ACCOUNT_TYPE)?;
        let dataset = rules::trim_uppercase(dataset, CURRENCY)?;
        rules::round(dataset, BALANCE, BALANCE_SCALE)
    }

    fn apply_aggregation_update(&self, dataset: Dataset) -> SyncResult<Dataset> {
        dataset.require_columns(&[ACCOUNT_ID])?;
        let dataset = rules::ensure_columns(dataset, &[BALANCE, STATUS]);

        let dataset = rules::round(dataset, BALANCE, BALANCE_SCALE)?;
        rules::trim_uppercase(dataset, STATUS)
    }
}

/// Applies account business rules and shapes rows for the account table.
///
/// Accounts are opened with defaults for every optional product attribute, and statuses are
/// restricted to the known lifecycle states.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountSchemaAggregation;

impl SchemaAggregation for AccountSchemaAggregation {
    fn name(&self) -> &'static str {
        "account_schema"
    }

    fn apply_aggregation_create(&self, dataset: Dataset) -> SyncResult<Dataset> {
        debug!(rows = dataset.len(), "applying account create rules");

        let dataset = dataset
            .fill_null(ACCOUNT_TYPE, Cell::from(DEFAULT_ACCOUNT_TYPE))?
            .fill_null(CURRENCY, Cell::from(DEFAULT_CURRENCY))?
            .fill_null(BALANCE, Cell::F64(DEFAULT_BALANCE))?
            .ensure_column(STATUS, Cell::Null)
            .fill_null(STATUS, Cell::from(DEFAULT_STATUS))?;
        let dataset = rules::require_one_of(dataset, STATUS, STATUSES)?;

        dataset.select(INSERT_COLUMN_NAMES)
    }

    fn apply_aggregation_update(&self, dataset: Dataset) -> SyncResult<Dataset> {
        debug!(rows = dataset.len(), "applying account update rules");

        let dataset = rules::require_one_of(dataset, STATUS, STATUSES)?;

        dataset.select(UPDATE_COLUMN_NAMES)
    }
}
