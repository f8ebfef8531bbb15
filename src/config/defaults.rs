//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

// =============================================================================
// Cache Defaults
// =============================================================================

/// Five minutes, matching [`crate::cache::DEFAULT_TTL`].
pub fn default_ttl_ms() -> i64 {
    300_000
}

/// Entries examined per insert, matching [`crate::cache::DEFAULT_SWEEP_LIMIT`].
pub fn default_sweep_limit() -> usize {
    64
}

// =============================================================================
// Logging Defaults
// =============================================================================

pub fn default_log_filter() -> String {
    "info".to_string()
}
