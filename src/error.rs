//! Unified error handling for assetdesk.
//!
//! Role and cache errors live here so permission gates and mutation hooks
//! share one vocabulary. Configuration errors stay next to the loader in
//! [`crate::config`].

use thiserror::Error;

// ============================================================================
// Role Errors (hierarchy lookups)
// ============================================================================

/// Errors produced while resolving a role string against the hierarchy.
///
/// Permission checks never propagate these; they log and fail closed.
/// Only the explicit lookups (`rank_of`, `FromStr`) return them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleError {
    #[error("unknown role: {0:?}")]
    UnknownRole(String),

    /// Role name from the second role set that was never reconciled with
    /// the canonical one (`tech`, `analyst`).
    #[error("role {0:?} belongs to the legacy admin/tech/analyst set")]
    LegacyRole(String),
}

impl RoleError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownRole(_) => "unknown_role",
            Self::LegacyRole(_) => "legacy_role",
        }
    }

    /// The raw role string that failed to resolve.
    pub fn role(&self) -> &str {
        match self {
            Self::UnknownRole(role) | Self::LegacyRole(role) => role,
        }
    }
}

// ============================================================================
// Cache Errors (configuration only)
// ============================================================================

/// Cache misuse detected while building a cache from configuration.
///
/// Runtime cache operations clamp bad input instead of failing, so this
/// only surfaces from config validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("ttl must not be negative, got {0}ms")]
    InvalidTtl(i64),
}

impl CacheError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTtl(_) => "invalid_ttl",
        }
    }
}
