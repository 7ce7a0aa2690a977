use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;
use crate::shared::base::require_non_empty;

/// Connection settings of the sink store.
///
/// Does not implement [`Serialize`] so the password cannot leak into serialized forms; use
/// [`SinkConnectionConfigWithoutSecrets`] for logging.
#[derive(Debug, Clone, Deserialize)]
pub struct SinkConnectionConfig {
    /// Connection URL of the sink store.
    pub url: String,
    pub username: String,
    #[serde(default)]
    pub password: Option<SecretString>,
    /// Whether the driver should negotiate TLS.
    #[serde(default)]
    pub use_ssl: bool,
}

impl SinkConnectionConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("sink.url", &self.url)?;
        require_non_empty("sink.username", &self.username)?;

        Ok(())
    }

    /// Returns the driver connection properties as key/value pairs.
    ///
    /// The password is only included when configured.
    pub fn properties(&self) -> Vec<(String, String)> {
        let mut properties = vec![("user".to_string(), self.username.clone())];
        if let Some(password) = &self.password {
            properties.push(("password".to_string(), password.expose_secret().clone()));
        }
        properties.push(("useSSL".to_string(), self.use_ssl.to_string()));

        properties
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SinkConnectionConfigWithoutSecrets {
    pub url: String,
    pub username: String,
    pub use_ssl: bool,
}

impl From<SinkConnectionConfig> for SinkConnectionConfigWithoutSecrets {
    fn from(value: SinkConnectionConfig) -> Self {
        SinkConnectionConfigWithoutSecrets {
            url: value.url,
            username: value.username,
            use_ssl: value.use_ssl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink_config(password: Option<&str>) -> SinkConnectionConfig {
        SinkConnectionConfig {
            url: "jdbc:mysql://localhost:3306/core".to_string(),
            username: "sync".to_string(),
            password: password.map(|p| SecretString::new(p.to_string())),
            use_ssl: false,
        }
    }

    #[test]
    fn properties_include_credentials_and_ssl_flag() {
        let properties = sink_config(Some("hunter2")).properties();

        assert_eq!(
            properties,
            vec![
                ("user".to_string(), "sync".to_string()),
                ("password".to_string(), "hunter2".to_string()),
                ("useSSL".to_string(), "false".to_string()),
            ]
        );
    }

    #[test]
    fn properties_skip_missing_password() {
        let properties = sink_config(None).properties();

        assert!(properties.iter().all(|(key, _)| key != "password"));
    }

    #[test]
    fn debug_output_redacts_password() {
        let rendered = format!("{:?}", sink_config(Some("hunter2")));

        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn rejects_empty_url() {
        let mut config = sink_config(None);
        config.url = String::new();

        assert_eq!(
            config.validate(),
            Err(ValidationError::EmptyField("sink.url".to_string()))
        );
    }
}
