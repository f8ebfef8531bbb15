//! Cached value with expiry tracking.

use std::time::Duration;

/// A cached result stamped with its creation time and time-to-live.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The cached payload.
    pub result: T,
    /// Clock time (Unix ms) when the entry was stored.
    pub created_at: i64,
    /// How long the entry stays valid.
    pub ttl: Duration,
    /// Insert sequence number; tells a queued sweep item whether the key
    /// was overwritten since it was queued.
    pub generation: u64,
}

impl<T> CacheEntry<T> {
    pub fn new(result: T, created_at: i64, ttl: Duration) -> Self {
        Self {
            result,
            created_at,
            ttl,
            generation: 0,
        }
    }

    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Valid iff `now - created_at <= ttl`. A zero TTL is never valid.
    pub fn is_valid_at(&self, now: i64) -> bool {
        if self.ttl.is_zero() {
            return false;
        }
        let ttl_ms = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        now.saturating_sub(self.created_at) <= ttl_ms
    }

    #[inline]
    pub fn is_expired_at(&self, now: i64) -> bool {
        !self.is_valid_at(now)
    }
}
