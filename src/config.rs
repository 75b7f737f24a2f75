//! Gateway configuration.
//!
//! Values come from an optional TOML file, then `GATEWAY_*` environment
//! variables (nested keys separated by `__`, e.g.
//! `GATEWAY_IDENTITY__ORGANIZATION_KEY`). Every field has a default, so an
//! empty configuration is valid.

use std::path::Path;
use std::time::Duration;

use ::config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

/// Top-level gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Deadline applied to requests whose transport supplies none.
    /// Zero disables the default deadline.
    pub request_timeout_ms: u64,
    /// Where the caller identity is read from.
    pub identity: IdentityConfig,
    /// Downstream service addresses, used by whoever builds the backend clients.
    pub backends: BackendAddresses,
    /// Log output settings.
    pub logging: LoggingConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 30_000,
            identity: IdentityConfig::default(),
            backends: BackendAddresses::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Loads the configuration from `path` (if given) and the environment.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file is missing or unreadable, or if a
    /// value has the wrong type.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder
            .add_source(
                Environment::with_prefix("GATEWAY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Parses a configuration from TOML text, without environment overrides.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the text is not valid TOML or a value has
    /// the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// The default request deadline, if enabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }
}

/// Metadata keys carrying the authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Key holding the caller's organization id.
    pub organization_key: String,
    /// Key holding the caller's user id.
    pub user_key: String,
    /// Key holding the comma-separated role list.
    pub roles_key: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            organization_key: "organization_id".to_string(),
            user_key: "user_id".to_string(),
            roles_key: "roles".to_string(),
        }
    }
}

/// `host:port` addresses of the downstream services.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackendAddresses {
    /// System model
    pub system_model: String,
    /// Infrastructure manager (clusters and nodes)
    pub infrastructure_manager: String,
    /// Application manager
    pub applications_manager: String,
    /// User manager
    pub user_manager: String,
    /// Device manager
    pub device_manager: String,
    /// Inventory manager
    pub inventory_manager: String,
}

impl Default for BackendAddresses {
    fn default() -> Self {
        Self {
            system_model: "localhost:8800".to_string(),
            infrastructure_manager: "localhost:8860".to_string(),
            applications_manager: "localhost:8910".to_string(),
            user_manager: "localhost:8920".to_string(),
            device_manager: "localhost:6010".to_string(),
            inventory_manager: "localhost:5510".to_string(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info,gateway_core=debug`.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = GatewayConfig::from_toml_str("").expect("empty config parses");
        assert_eq!(config, GatewayConfig::default());
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn partial_document_overrides_only_given_keys() {
        let config = GatewayConfig::from_toml_str(
            r#"
            request_timeout_ms = 1500

            [identity]
            organization_key = "x-organization"

            [backends]
            inventory_manager = "inventory:5510"

            [logging]
            json = true
            "#,
        )
        .expect("valid config");

        assert_eq!(config.request_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(config.identity.organization_key, "x-organization");
        assert_eq!(config.identity.user_key, "user_id");
        assert_eq!(config.backends.inventory_manager, "inventory:5510");
        assert_eq!(config.backends.user_manager, "localhost:8920");
        assert!(config.logging.json);
    }

    #[test]
    fn zero_timeout_disables_default_deadline() {
        let config = GatewayConfig::from_toml_str("request_timeout_ms = 0").expect("valid config");
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(GatewayConfig::from_toml_str("request_timeout_ms = \"soon\"").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = GatewayConfig::load(Some(Path::new("/nonexistent/gateway.toml")));
        assert!(result.is_err());
    }
}
