//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::defaults::{default_log_filter, default_sweep_limit, default_true, default_ttl_ms};
use super::validation::{ValidationError, validate};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{} configuration error(s)", .0.len())]
    Validation(Vec<ValidationError>),
}

impl ConfigError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) => "config_io",
            Self::Parse(_) => "config_parse",
            Self::Validation(_) => "config_validation",
        }
    }

    /// Individual validation failures; empty for I/O and parse errors.
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::Validation(errors) => errors,
            _ => &[],
        }
    }
}

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Idempotency cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Role authority settings.
    #[serde(default)]
    pub roles: RolesConfig,
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    ///
    /// A file that exists but cannot be read or parsed is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check this configuration, collecting every problem found.
    pub fn validated(self) -> Result<Self, ConfigError> {
        validate(&self).map_err(ConfigError::Validation)?;
        Ok(self)
    }

    /// [`Config::load_or_default`] followed by [`Config::validated`].
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load_or_default(path)?.validated()
    }
}

/// Idempotency cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Default entry lifetime in milliseconds (default: 300000).
    #[serde(default = "default_ttl_ms")]
    pub default_ttl_ms: i64,
    /// Max entries examined per insert; 0 sweeps the whole map (default: 64).
    #[serde(default = "default_sweep_limit")]
    pub sweep_limit: usize,
}

impl CacheConfig {
    /// The sweep bound, `None` when unbounded.
    pub fn sweep_limit(&self) -> Option<usize> {
        (self.sweep_limit > 0).then_some(self.sweep_limit)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_ms: default_ttl_ms(),
            sweep_limit: default_sweep_limit(),
        }
    }
}

/// Role authority configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RolesConfig {
    /// Log unrecognized roles at WARN instead of DEBUG (default: true).
    #[serde(default = "default_true")]
    pub warn_on_unknown: bool,
}

impl Default for RolesConfig {
    fn default() -> Self {
        Self {
            warn_on_unknown: true,
        }
    }
}

/// Logging configuration. `RUST_LOG` takes precedence over `filter`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string (default: "info").
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}
