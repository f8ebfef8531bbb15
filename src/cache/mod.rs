//! Idempotency cache and its supporting types.
//!
//! - [`idempotency`]: the [`IdempotencyCache`] itself
//! - [`entry`]: [`CacheEntry`] and the validity rule
//! - [`clock`]: injectable time sources
//! - [`key`]: [`IdempotencyKey`] derivation for mutation hooks

pub mod clock;
pub mod entry;
pub mod idempotency;
pub mod key;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use idempotency::{
    CacheStats, DEFAULT_SWEEP_LIMIT, DEFAULT_TTL, IdempotencyCache, ttl_from_millis,
};
pub use key::IdempotencyKey;
