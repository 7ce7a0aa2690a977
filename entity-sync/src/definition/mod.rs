//! Fixed definitions of the entity types the catalog knows about.
//!
//! Each submodule declares the row key, the sink column lists and the shape of the create and
//! update event payloads of one entity. Topic and table names are deployment configuration and
//! live in [`config::shared::CatalogConfig`] instead.

pub mod account;
pub mod customer;
