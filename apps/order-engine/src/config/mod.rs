//! Configuration module for the order engine.
//!
//! Loads a YAML file, interpolates environment variables and validates the
//! result before anything is wired.
//!
//! # Usage
//!
//! ```rust,ignore
//! use order_engine::config::load_config;
//!
//! // Path from ORDER_ENGINE_CONFIG, falling back to config.yaml
//! let config = load_config(None)?;
//!
//! // Explicit path
//! let config = load_config(Some("deploy/config.yaml"))?;
//! ```

mod catalog;
mod lifecycle;
mod observability;
mod persistence;
mod placement;
mod server;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::{CatalogConfig, SeedProduct};
pub use lifecycle::{LifecycleConfig, QueryConfig};
pub use observability::{LogFormat, LoggingConfig, ObservabilityConfig, TracingConfig};
pub use persistence::PersistenceConfig;
pub use placement::{PlacementConfig, RetryConfig};
pub use server::ServerConfig;

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "ORDER_ENGINE_CONFIG";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Persistence configuration.
    #[serde(default)]
    pub persistence: PersistenceConfig,
    /// Placement configuration.
    #[serde(default)]
    pub placement: PlacementConfig,
    /// Lifecycle configuration.
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
    /// Query configuration.
    #[serde(default)]
    pub query: QueryConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
    /// Catalog seed.
    #[serde(default)]
    pub catalog: CatalogConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to `$ORDER_ENGINE_CONFIG`,
///   then "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(
        || std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.yaml".to_string()),
        str::to_string,
    );

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map(|m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let invalid = |msg: &str| Err(ConfigError::ValidationError(msg.to_string()));

    if config.server.metrics_enabled && config.server.http_port == config.server.metrics_port {
        return invalid("http_port and metrics_port must be different");
    }

    if config.persistence.database_url.trim().is_empty() {
        return invalid("persistence.database_url must not be empty");
    }
    if config.persistence.max_connections == 0 {
        return invalid("persistence.max_connections must be at least 1");
    }

    let placement = &config.placement;
    if placement.transaction_timeout_ms == 0 {
        return invalid("placement.transaction_timeout_ms must be positive");
    }
    if placement.max_line_items == 0 {
        return invalid("placement.max_line_items must be at least 1");
    }
    if placement.retry.max_attempts == 0 {
        return invalid("placement.retry.max_attempts must be at least 1");
    }
    if placement.retry.backoff_multiplier < 1.0 {
        return invalid("placement.retry.backoff_multiplier must be at least 1.0");
    }
    if !(0.0..=1.0).contains(&placement.retry.jitter_factor) {
        return invalid("placement.retry.jitter_factor must be between 0.0 and 1.0");
    }
    if placement.retry.initial_backoff_ms > placement.retry.max_backoff_ms {
        return invalid("placement.retry.initial_backoff_ms must not exceed max_backoff_ms");
    }

    if config.query.max_page_size == 0 {
        return invalid("query.max_page_size must be at least 1");
    }

    for product in &config.catalog.seed {
        product.to_product().map_err(|e| {
            ConfigError::ValidationError(format!("catalog.seed '{}': {e}", product.id))
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.http_port, 8080);
        assert_eq!(config.placement.transaction_timeout_ms, 5000);
        assert_eq!(config.placement.max_line_items, 100);
        assert_eq!(config.placement.retry.max_attempts, 3);
        assert!(!config.lifecycle.allow_status_skip);
        assert!(!config.lifecycle.restock_on_cancel);
        assert_eq!(config.query.max_page_size, 100);
        assert_eq!(config.observability.logging.format, LogFormat::Json);
        assert!(config.catalog.seed.is_empty());
    }

    #[test]
    fn test_load_empty_config_uses_defaults() {
        let config = match load_config_from_string("{}") {
            Ok(c) => c,
            Err(e) => panic!("should load empty config: {e}"),
        };
        assert_eq!(config.persistence.busy_timeout_ms, 5000);
        validate_config(&Config::default()).unwrap();
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "url: ${ORDER_ENGINE_TEST_NONEXISTENT_VAR:-sqlite::memory:}";
        assert_eq!(interpolate_env_vars(input), "url: sqlite::memory:");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax, not format args
    fn test_env_var_with_default_uses_existing() {
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);

        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "key: ${ORDER_ENGINE_TEST_UNLIKELY_TO_EXIST}";
        assert_eq!(interpolate_env_vars(input), "key: ");
    }

    #[test]
    fn test_validation_same_ports() {
        let yaml = r"
server:
  http_port: 9000
  metrics_port: 9000
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for duplicate ports");
        };
        assert!(err.to_string().contains("must be different"));
    }

    #[test]
    fn test_validation_zero_attempts() {
        let yaml = r"
placement:
  retry:
    max_attempts: 0
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for zero attempts");
        };
        assert!(err.to_string().contains("max_attempts"));
    }

    #[test]
    fn test_validation_negative_seed_stock() {
        let yaml = r#"
catalog:
  seed:
    - id: p-1
      name: Lamp
      price: "10.00"
      available_quantity: -1
"#;
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for negative stock");
        };
        assert!(err.to_string().contains("p-1"));
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
server:
  http_port: 8081
  metrics_port: 9091
  bind_address: "127.0.0.1"

persistence:
  database_url: "sqlite://./orders.db"
  max_connections: 4
  busy_timeout_ms: 2000

placement:
  transaction_timeout_ms: 3000
  max_line_items: 20
  retry:
    max_attempts: 5
    initial_backoff_ms: 10

lifecycle:
  allow_status_skip: true
  restock_on_cancel: true

query:
  max_page_size: 50

observability:
  logging:
    level: "debug"
    format: "pretty"

catalog:
  seed:
    - id: p-1
      name: Desk Lamp
      price: "19.99"
      available_quantity: 10
      category_id: lighting
"#;

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load full config: {e}"),
        };

        assert_eq!(config.server.bind_address, "127.0.0.1");
        assert_eq!(config.persistence.max_connections, 4);
        let sqlite = config.persistence.sqlite_settings();
        assert_eq!(sqlite.busy_timeout.as_millis(), 2000);
        let placement = config.placement.settings();
        assert_eq!(placement.max_line_items, 20);
        assert_eq!(placement.retry.max_attempts, 5);
        assert_eq!(placement.transaction_timeout.as_millis(), 3000);
        let lifecycle = config.lifecycle.settings(placement.retry.clone());
        assert!(lifecycle.policy.allow_status_skip);
        assert!(lifecycle.restock_on_cancel);
        assert_eq!(config.query.max_page_size, 50);
        assert_eq!(config.observability.logging.format, LogFormat::Pretty);
        let product = config.catalog.seed[0].to_product().unwrap();
        assert_eq!(product.price.to_string(), "19.99");
        assert_eq!(product.category_id.as_deref(), Some("lighting"));
    }
}
