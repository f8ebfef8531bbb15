//! Prometheus metrics collection for assetdesk.
//!
//! Counts permission decisions and idempotency cache outcomes so a
//! dashboard operator can see how often gates deny and how often
//! double-submissions are absorbed.
//!
//! - `assetdesk_permission_checks_total{result}` - allow/deny decisions
//! - `assetdesk_unknown_roles_total{code}` - role strings outside the hierarchy
//! - `assetdesk_cache_lookups_total{outcome}` - hit/miss/expired lookups
//! - `assetdesk_cache_evictions_total` - expired entries removed
//!
//! Recording before [`init`] is a no-op.

use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Counters (monotonic increasing)
// ========================================================================

/// Permission checks by result (allow, deny).
pub static PERMISSION_CHECKS: OnceLock<IntCounterVec> = OnceLock::new();

/// Role strings that did not resolve, by error code.
pub static UNKNOWN_ROLES: OnceLock<IntCounterVec> = OnceLock::new();

/// Cache lookups by outcome (hit, miss, expired).
pub static CACHE_LOOKUPS: OnceLock<IntCounterVec> = OnceLock::new();

/// Expired cache entries removed on read or by sweep.
pub static CACHE_EVICTIONS: OnceLock<IntCounter> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let r = registry();

    // Helper macro to register metric
    macro_rules! register {
        ($metric:ident, $init:expr) => {
            if $metric.get().is_none() {
                match $init {
                    Ok(m) => {
                        if let Err(e) = r.register(Box::new(m.clone())) {
                            tracing::warn!(
                                error = %e,
                                concat!("Failed to register metric ", stringify!($metric))
                            );
                        }
                        let _ = $metric.set(m);
                    }
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            concat!("Failed to create metric ", stringify!($metric))
                        );
                    }
                }
            }
        };
    }

    register!(
        PERMISSION_CHECKS,
        IntCounterVec::new(
            Opts::new("assetdesk_permission_checks_total", "Permission checks by result"),
            &["result"]
        )
    );
    register!(
        UNKNOWN_ROLES,
        IntCounterVec::new(
            Opts::new(
                "assetdesk_unknown_roles_total",
                "Unrecognized role strings by error code"
            ),
            &["code"]
        )
    );
    register!(
        CACHE_LOOKUPS,
        IntCounterVec::new(
            Opts::new(
                "assetdesk_cache_lookups_total",
                "Idempotency cache lookups by outcome"
            ),
            &["outcome"]
        )
    );
    register!(
        CACHE_EVICTIONS,
        IntCounter::new(
            "assetdesk_cache_evictions_total",
            "Expired idempotency entries removed"
        )
    );
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Helper functions for metric updates
// ============================================================================

/// Record a permission decision.
#[inline]
pub fn record_permission_check(allowed: bool) {
    if let Some(c) = PERMISSION_CHECKS.get() {
        c.with_label_values(&[if allowed { "allow" } else { "deny" }]).inc();
    }
}

/// Record a role string that failed to resolve.
#[inline]
pub fn record_unknown_role(code: &str) {
    if let Some(c) = UNKNOWN_ROLES.get() {
        c.with_label_values(&[code]).inc();
    }
}

/// Record a cache lookup outcome.
#[inline]
pub fn record_cache_lookup(outcome: &str) {
    if let Some(c) = CACHE_LOOKUPS.get() {
        c.with_label_values(&[outcome]).inc();
    }
}

/// Record expired entries removed from a cache.
#[inline]
pub fn record_cache_evictions(count: usize) {
    if let Some(c) = CACHE_EVICTIONS.get() {
        c.inc_by(count as u64);
    }
}
