//! Factory of the [`EntitySyncSpec`]s of every entity type kept in sync.
//!
//! Specs are built from a [`CatalogConfig`] carrying the topic and table names, so the same
//! binary can run against differently named environments. Building is pure: calling a factory
//! twice with the same configuration yields equal specs.

use std::fmt;
use std::sync::Arc;

use config::shared::{CatalogConfig, EntityConfig};

use crate::aggregation::{
    AccountSchemaAggregation, AccountTopicAggregation, CustomerSchemaAggregation,
    CustomerTopicAggregation,
};
use crate::definition;
use crate::entity::{EntitySyncSpec, SinkTable};
use crate::error::SyncResult;
use crate::stream::StreamDefinition;

/// Entity types known to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Customer,
    Account,
}

impl EntityType {
    /// Every entity type, in build order.
    pub const ALL: [EntityType; 2] = [EntityType::Customer, EntityType::Account];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Customer => "customer",
            EntityType::Account => "account",
        }
    }

    /// Builds the spec of this entity type from its entry in `config`.
    pub fn build(&self, config: &CatalogConfig) -> SyncResult<EntitySyncSpec> {
        match self {
            EntityType::Customer => customer(&config.customer),
            EntityType::Account => account(&config.account),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the customer spec.
///
/// Customers are created with their name and optional contact details and updated with any
/// subset of name, email and phone.
pub fn customer(config: &EntityConfig) -> SyncResult<EntitySyncSpec> {
    EntitySyncSpec::new(
        SinkTable::new(
            &config.table_name,
            definition::customer::ROW_KEY,
            definition::customer::INSERT_COLUMN_NAMES,
            definition::customer::UPDATE_COLUMN_NAMES,
        ),
        StreamDefinition::new(
            &config.insert_topic,
            definition::customer::create_event_columns(),
            definition::customer::create_event_schema(),
        ),
        StreamDefinition::new(
            &config.update_topic,
            definition::customer::update_event_columns(),
            definition::customer::update_event_schema(),
        ),
        Arc::new(CustomerSchemaAggregation),
        Arc::new(CustomerTopicAggregation),
    )
}

/// Builds the account spec.
pub fn account(config: &EntityConfig) -> SyncResult<EntitySyncSpec> {
    EntitySyncSpec::new(
        SinkTable::new(
            &config.table_name,
            definition::account::ROW_KEY,
            definition::account::INSERT_COLUMN_NAMES,
            definition::account::UPDATE_COLUMN_NAMES,
        ),
        StreamDefinition::new(
            &config.insert_topic,
            definition::account::create_event_columns(),
            definition::account::create_event_schema(),
        ),
        StreamDefinition::new(
            &config.update_topic,
            definition::account::update_event_columns(),
            definition::account::update_event_schema(),
        ),
        Arc::new(AccountSchemaAggregation),
        Arc::new(AccountTopicAggregation),
    )
}

/// Builds the specs of every entity type, in [`EntityType::ALL`] order.
///
/// The configuration is validated first so that names shared between entities are reported
/// before any spec is built.
pub fn build_all(config: &CatalogConfig) -> SyncResult<Vec<EntitySyncSpec>> {
    config.validate()?;

    EntityType::ALL
        .iter()
        .map(|entity_type| entity_type.build(config))
        .collect()
}
