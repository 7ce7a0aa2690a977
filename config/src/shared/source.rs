use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;
use crate::shared::base::require_non_empty;

/// Settings of the change-event source.
///
/// These values are handed to the transport layer untouched.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SourceConfig {
    /// Broker addresses, `host:port`.
    pub bootstrap_servers: Vec<String>,
    /// Where the transport stores its consumed offsets.
    pub checkpoint_location: String,
    /// Name under which the consumer registers.
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

impl SourceConfig {
    pub const DEFAULT_APP_NAME: &'static str = "entity-sync";

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bootstrap_servers.is_empty() {
            return Err(ValidationError::EmptyField(
                "source.bootstrap_servers".to_string(),
            ));
        }
        for server in &self.bootstrap_servers {
            require_non_empty("source.bootstrap_servers", server)?;
        }
        require_non_empty("source.checkpoint_location", &self.checkpoint_location)?;
        require_non_empty("source.app_name", &self.app_name)?;

        Ok(())
    }

    /// Returns the broker addresses joined the way clients expect them.
    pub fn bootstrap_servers_list(&self) -> String {
        self.bootstrap_servers.join(",")
    }
}

fn default_app_name() -> String {
    SourceConfig::DEFAULT_APP_NAME.to_string()
}
