//! Tracing subscriber bootstrap.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable that overrides the configured filter.
pub const LOG_ENV: &str = "COMERCE_LOG";

/// Output format for logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format (for development).
    #[default]
    Human,
    /// JSON format (for log aggregation).
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "pretty" | "text" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(ObservabilityError::UnknownFormat(other.to_string())),
        }
    }
}

/// The `[log]` configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directives, e.g. `"info,comerce_fulfillment=debug"`.
    pub filter: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Human,
        }
    }
}

impl LogConfig {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// The filter to install: `COMERCE_LOG` if set, else the configured one.
    pub fn env_filter(&self) -> Result<EnvFilter, ObservabilityError> {
        if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
            return Ok(filter);
        }
        EnvFilter::try_new(&self.filter)
            .map_err(|e| ObservabilityError::InvalidFilter(format!("{}: {}", self.filter, e)))
    }
}

#[derive(Debug, Error)]
pub enum ObservabilityError {
    /// The filter directives could not be parsed.
    #[error("invalid log filter {0}")]
    InvalidFilter(String),

    /// Unknown log output format.
    #[error("unknown log format: {0}")]
    UnknownFormat(String),

    /// A global subscriber was already installed.
    #[error("tracing subscriber already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Install the global tracing subscriber.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init_tracing(config: &LogConfig) -> Result<(), ObservabilityError> {
    let filter = config.env_filter()?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Human => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| ObservabilityError::AlreadyInitialized(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Human);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_config_defaults_from_partial_toml() {
        let config: LogConfig = toml::from_str("format = \"json\"").unwrap();
        assert_eq!(config.filter, "info");
        assert_eq!(config.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_filter_is_reported() {
        let config = LogConfig::default().with_filter("comerce=notalevel[");
        if std::env::var(LOG_ENV).is_err() {
            assert!(matches!(
                config.env_filter(),
                Err(ObservabilityError::InvalidFilter(_))
            ));
        }
    }
}
