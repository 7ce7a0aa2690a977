use serde::Deserialize;

use crate::Config;
use crate::shared::{BatchConfig, CatalogConfig, SinkConnectionConfig, SourceConfig, ValidationError};

/// Configuration of the replicator service.
///
/// Not [`serde::Serialize`] because [`SinkConnectionConfig`] carries secrets.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplicatorConfig {
    pub source: SourceConfig,
    pub sink: SinkConnectionConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

impl ReplicatorConfig {
    /// Validates every section of the configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.source.validate()?;
        self.sink.validate()?;
        self.catalog.validate()?;
        self.batch.validate()?;

        Ok(())
    }
}

impl Config for ReplicatorConfig {
    const LIST_PARSE_KEYS: &'static [&'static str] = &["source.bootstrap_servers"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_defaults() {
        let config: ReplicatorConfig = parse_config(
            r#"{
                "source": { "bootstrap_servers": ["10.0.0.1:9092"], "checkpoint_location": "/tmp/ckpt" },
                "sink": { "url": "jdbc:mysql://db/core", "username": "sync" }
            }"#,
        );

        assert_eq!(config.catalog, CatalogConfig::default());
        assert_eq!(config.batch, BatchConfig::default());
        assert_eq!(config.source.app_name, SourceConfig::DEFAULT_APP_NAME);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn zero_batch_size_is_invalid() {
        let mut config: ReplicatorConfig = parse_config(
            r#"{
                "source": { "bootstrap_servers": ["b:9092"], "checkpoint_location": "/tmp/ckpt" },
                "sink": { "url": "jdbc:mysql://db/core", "username": "sync" }
            }"#,
        );
        config.batch.max_size = 0;

        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidFieldValue { ref field, .. }) if field == "batch.max_size"
        ));
    }

    /// Deserializes through the same layered builder used by the loader.
    fn parse_config(raw: &str) -> ReplicatorConfig {
        rust_cli_config::Config::builder()
            .add_source(rust_cli_config::File::from_str(
                raw,
                rust_cli_config::FileFormat::Json,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }
}
