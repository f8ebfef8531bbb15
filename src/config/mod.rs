//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions (Config, CacheConfig, RolesConfig, LoggingConfig)
//! - [`defaults`]: serde default value functions
//! - [`validation`]: startup validation that reports every problem at once

mod defaults;
mod types;
pub mod validation;

pub use types::{CacheConfig, Config, ConfigError, LoggingConfig, RolesConfig};
pub use validation::{ValidationError, validate};
