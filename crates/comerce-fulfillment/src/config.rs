//! Service configuration.

use std::path::Path;

use comerce_domain::Currency;
use comerce_observability::LogConfig;
use comerce_store::{RetryPolicy, RetrySettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading or saving a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write config file {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialize(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration file (`comerce.toml`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComerceConfig {
    #[serde(default)]
    pub fulfillment: FulfillmentSettings,

    /// Retry policy for units that lose a write conflict.
    #[serde(default)]
    pub retry: RetrySettings,

    #[serde(default)]
    pub log: LogConfig,
}

impl ComerceConfig {
    /// Load config from a file; `.json` files are JSON, anything else TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;

        let config: Self = if is_json(path) {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                path: display,
                reason: e.to_string(),
            })?
        } else {
            Self::from_toml_str(&content).map_err(|e| match e {
                ConfigError::Parse { reason, .. } => ConfigError::Parse {
                    path: display,
                    reason,
                },
                other => other,
            })?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a file, choosing the format by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        };
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.fulfillment;
        if f.failed_attempt_cap == 0 {
            return Err(ConfigError::Invalid(
                "fulfillment.failed_attempt_cap must be at least 1".to_string(),
            ));
        }
        if f.eta_days < 0 {
            return Err(ConfigError::Invalid(
                "fulfillment.eta_days must not be negative".to_string(),
            ));
        }
        if Currency::from_code(&f.currency).is_none() {
            return Err(ConfigError::Invalid(format!(
                "fulfillment.currency {} is not supported",
                f.currency
            )));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from_settings(&self.retry)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// The `[fulfillment]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FulfillmentSettings {
    /// Days added to the placement time to get the ETA.
    pub eta_days: i64,
    /// Failed attempts after which a logistics record is cancel-eligible.
    pub failed_attempt_cap: usize,
    /// Cascade cancellation as soon as the cap is reached.
    pub auto_cancel_on_cap: bool,
    /// Highest accepted rating.
    pub max_rating: u8,
    /// Currency code for prices and shipping fees.
    pub currency: String,
}

impl Default for FulfillmentSettings {
    fn default() -> Self {
        Self {
            eta_days: 5,
            failed_attempt_cap: comerce_domain::logistics::DEFAULT_FAILED_ATTEMPT_CAP,
            auto_cancel_on_cap: false,
            max_rating: 5,
            currency: "PHP".to_string(),
        }
    }
}

impl FulfillmentSettings {
    pub fn currency(&self) -> Currency {
        Currency::from_code(&self.currency).unwrap_or_default()
    }
}

/// Commented default config written by `comerce init`.
pub fn generate_default_config() -> String {
    r#"# Comerce fulfillment configuration

[fulfillment]
eta_days = 5
failed_attempt_cap = 2
# cancel pick-up/delivery rounds as soon as the cap is reached
auto_cancel_on_cap = false
max_rating = 5
currency = "PHP"

[retry]
max_attempts = 3
backoff_ms = 20
max_backoff_ms = 200

[log]
# overridden by COMERCE_LOG
filter = "info"
format = "human"
"#
    .to_string()
}
