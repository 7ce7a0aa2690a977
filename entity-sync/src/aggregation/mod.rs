//! Entity specific transformation logic.
//!
//! Aggregation runs in two stages. The topic stage normalizes the decoded event shape, closest
//! to the wire format. The schema stage applies business rules and produces the sink shape.
//! Both stages are traits with one implementation per entity type, selected when the
//! [`crate::entity::EntitySyncSpec`] is built.

mod account;
mod base;
mod customer;
pub mod rules;

pub use account::{AccountSchemaAggregation, AccountTopicAggregation};
pub use base::{SchemaAggregation, TopicAggregation};
pub use customer::{CustomerSchemaAggregation, CustomerTopicAggregation};
