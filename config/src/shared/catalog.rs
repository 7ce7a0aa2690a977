use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;
use crate::shared::base::require_non_empty;

/// Sink table and source topics of a single entity type.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct EntityConfig {
    /// Name of the sink table the entity is written to.
    pub table_name: String,
    /// Topic carrying creation events.
    pub insert_topic: String,
    /// Topic carrying update events.
    pub update_topic: String,
}

impl EntityConfig {
    /// Creates an entity configuration from its table and topic names.
    pub fn new(
        table_name: impl Into<String>,
        insert_topic: impl Into<String>,
        update_topic: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            insert_topic: insert_topic.into(),
            update_topic: update_topic.into(),
        }
    }

    /// Validates that all names are set and the two topics differ.
    ///
    /// `prefix` is the configuration path of this entry, used in error messages.
    pub fn validate(&self, prefix: &str) -> Result<(), ValidationError> {
        require_non_empty(&format!("{prefix}.table_name"), &self.table_name)?;
        require_non_empty(&format!("{prefix}.insert_topic"), &self.insert_topic)?;
        require_non_empty(&format!("{prefix}.update_topic"), &self.update_topic)?;

        if self.insert_topic == self.update_topic {
            return Err(ValidationError::DuplicateTopic {
                topic: self.insert_topic.clone(),
                first: format!("{prefix}.insert_topic"),
                second: format!("{prefix}.update_topic"),
            });
        }

        Ok(())
    }
}

/// Table and topic names for every entity type the catalog knows about.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct CatalogConfig {
    #[serde(default = "default_customer")]
    pub customer: EntityConfig,
    #[serde(default = "default_account")]
    pub account: EntityConfig,
}

impl CatalogConfig {
    pub const DEFAULT_CUSTOMER_TABLE: &'static str = "TM_CUSTOMERS3";
    pub const DEFAULT_CUSTOMER_INSERT_TOPIC: &'static str = "createcustomer3";
    pub const DEFAULT_CUSTOMER_UPDATE_TOPIC: &'static str = "updatecustomer3";
    pub const DEFAULT_ACCOUNT_TABLE: &'static str = "ACCOUNT3";
    pub const DEFAULT_ACCOUNT_INSERT_TOPIC: &'static str = "createaccount3";
    pub const DEFAULT_ACCOUNT_UPDATE_TOPIC: &'static str = "updateaccount3";

    /// Validates every entity entry and rejects topics shared between entities.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.customer.validate("catalog.customer")?;
        self.account.validate("catalog.account")?;

        let customer_topics = [
            ("catalog.customer.insert_topic", &self.customer.insert_topic),
            ("catalog.customer.update_topic", &self.customer.update_topic),
        ];
        let account_topics = [
            ("catalog.account.insert_topic", &self.account.insert_topic),
            ("catalog.account.update_topic", &self.account.update_topic),
        ];
        for (first, customer_topic) in customer_topics {
            for (second, account_topic) in account_topics {
                if customer_topic == account_topic {
                    return Err(ValidationError::DuplicateTopic {
                        topic: customer_topic.clone(),
                        first: first.to_string(),
                        second: second.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            customer: default_customer(),
            account: default_account(),
        }
    }
}

fn default_customer() -> EntityConfig {
    EntityConfig::new(
        CatalogConfig::DEFAULT_CUSTOMER_TABLE,
        CatalogConfig::DEFAULT_CUSTOMER_INSERT_TOPIC,
        CatalogConfig::DEFAULT_CUSTOMER_UPDATE_TOPIC,
    )
}

fn default_account() -> EntityConfig {
    EntityConfig::new(
        CatalogConfig::DEFAULT_ACCOUNT_TABLE,
        CatalogConfig::DEFAULT_ACCOUNT_INSERT_TOPIC,
        CatalogConfig::DEFAULT_ACCOUNT_UPDATE_TOPIC,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_valid() {
        let config = CatalogConfig::default();

        assert_eq!(config.customer.insert_topic, "createcustomer3");
        assert_eq!(config.account.table_name, "ACCOUNT3");
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_equal_topics_within_entity() {
        let entity = EntityConfig::new("T", "events", "events");

        assert_eq!(
            entity.validate("catalog.customer"),
            Err(ValidationError::DuplicateTopic {
                topic: "events".to_string(),
                first: "catalog.customer.insert_topic".to_string(),
                second: "catalog.customer.update_topic".to_string(),
            })
        );
    }

    #[test]
    fn rejects_topics_shared_between_entities() {
        let mut config = CatalogConfig::default();
        config.account.update_topic = config.customer.insert_topic.clone();

        let err = config.validate().unwrap_err();

        assert!(matches!(err, ValidationError::DuplicateTopic { ref topic, .. } if topic == "createcustomer3"));
    }

    #[test]
    fn rejects_blank_table_name() {
        let entity = EntityConfig::new("  ", "a", "b");

        assert_eq!(
            entity.validate("catalog.account"),
            Err(ValidationError::EmptyField(
                "catalog.account.table_name".to_string()
            ))
        );
    }
}
