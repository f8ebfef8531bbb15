//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use crate::error::CacheError;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("cache.default_ttl_ms: {0}")]
    Cache(#[from] CacheError),
    #[error("logging.filter is empty")]
    EmptyLogFilter,
    #[error("logging.filter is not a valid directive: {0}")]
    InvalidLogFilter(String),
}

impl ValidationError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Cache(e) => e.error_code(),
            Self::EmptyLogFilter => "empty_log_filter",
            Self::InvalidLogFilter(_) => "invalid_log_filter",
        }
    }
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.cache.default_ttl_ms < 0 {
        errors.push(CacheError::InvalidTtl(config.cache.default_ttl_ms).into());
    }

    let filter = config.logging.filter.trim();
    if filter.is_empty() {
        errors.push(ValidationError::EmptyLogFilter);
    } else if let Err(e) = EnvFilter::try_new(filter) {
        errors.push(ValidationError::InvalidLogFilter(e.to_string()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
