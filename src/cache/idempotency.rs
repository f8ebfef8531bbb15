//! In-memory idempotency cache.
//!
//! Memoizes the result of a logically single operation under an idempotency
//! key so a double-submitted mutation replays the first result instead of
//! running twice.
//!
//! # Expiry
//!
//! - Expired entries are treated as absent and removed when `get` sees them
//! - Every `put` examines at most `sweep_limit` entries from a rotating
//!   queue and removes the expired ones; `None` sweeps the whole map
//! - Nothing runs on a timer; memory is reclaimed opportunistically

use super::clock::{Clock, SystemClock};
use super::entry::CacheEntry;
use crate::config::CacheConfig;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Default time-to-live: 5 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_millis(300_000);

/// Default number of entries a `put` examines for expiry.
pub const DEFAULT_SWEEP_LIMIT: usize = 64;

/// Point-in-time view of the cache for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CacheStats {
    /// Stored entries, including expired ones not yet swept.
    pub size: usize,
    /// Stored keys, sorted.
    pub keys: Vec<String>,
}

/// Thread-safe TTL cache keyed by idempotency key.
///
/// Owned by the composition root (typically behind an `Arc`); there is no
/// process-wide instance.
#[derive(Debug)]
pub struct IdempotencyCache<T> {
    entries: DashMap<String, CacheEntry<T>>,
    default_ttl: Duration,
    /// Max entries examined per `put`; `None` sweeps everything.
    sweep_limit: Option<usize>,
    /// Keys in sweep order as `(key, generation)`. Only fed when bounded.
    sweep_queue: Mutex<VecDeque<(String, u64)>>,
    next_generation: AtomicU64,
    clock: Arc<dyn Clock>,
}

/// Work done by one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SweepReport {
    examined: usize,
    removed: usize,
}

impl<T: Clone> Default for IdempotencyCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> IdempotencyCache<T> {
    /// Create an empty cache on the system clock with the default TTL.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty cache on a custom clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl: DEFAULT_TTL,
            sweep_limit: Some(DEFAULT_SWEEP_LIMIT),
            sweep_queue: Mutex::new(VecDeque::new()),
            next_generation: AtomicU64::new(0),
            clock,
        }
    }

    /// Create a cache from configuration on the system clock.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::from_config_with_clock(config, Arc::new(SystemClock))
    }

    pub fn from_config_with_clock(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self::with_clock(clock)
            .with_default_ttl(ttl_from_millis(config.default_ttl_ms))
            .with_sweep_limit(config.sweep_limit())
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Bound the entries examined per `put`. `None` sweeps the whole map,
    /// `Some(0)` is treated as `Some(1)`.
    pub fn with_sweep_limit(mut self, limit: Option<usize>) -> Self {
        self.sweep_limit = limit.map(|n| n.max(1));
        self
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Store `value` under `key` with the default TTL.
    pub fn put(&self, key: impl Into<String>, value: T) {
        self.put_with_ttl(key, value, self.default_ttl);
    }

    /// Store `value` under `key`, replacing any previous entry.
    ///
    /// Sweeps expired entries as a side effect.
    pub fn put_with_ttl(&self, key: impl Into<String>, value: T, ttl: Duration) {
        let now = self.clock.now_millis();
        let key = key.into();
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let entry = CacheEntry::new(value, now, ttl).with_generation(generation);

        if self.sweep_limit.is_some() {
            self.entries.insert(key.clone(), entry);
            self.sweep_queue.lock().push_back((key, generation));
        } else {
            self.entries.insert(key, entry);
        }
        self.sweep_at(now);
    }

    /// Store with a TTL in signed milliseconds. Negative TTLs clamp to zero,
    /// which expires the entry immediately.
    pub fn put_with_ttl_millis(&self, key: impl Into<String>, value: T, ttl_ms: i64) {
        if ttl_ms < 0 {
            debug!(ttl_ms, "negative ttl clamped to zero");
        }
        self.put_with_ttl(key, value, ttl_from_millis(ttl_ms));
    }

    /// Look up a live entry. Expired entries are removed and reported absent.
    pub fn get(&self, key: &str) -> Option<T> {
        let now = self.clock.now_millis();

        match self.entries.get(key) {
            None => {
                crate::metrics::record_cache_lookup("miss");
                return None;
            }
            Some(entry) if entry.is_valid_at(now) => {
                crate::metrics::record_cache_lookup("hit");
                return Some(entry.result.clone());
            }
            Some(_) => {}
        }

        // Re-check under the shard lock: a concurrent put may have refreshed it.
        if self
            .entries
            .remove_if(key, |_, entry| entry.is_expired_at(now))
            .is_some()
        {
            crate::metrics::record_cache_evictions(1);
            debug!(key = %key, "expired idempotency entry removed on read");
        }
        crate::metrics::record_cache_lookup("expired");
        None
    }

    /// Remove one entry. Missing keys are ignored.
    pub fn invalidate(&self, key: &str) {
        if self.entries.remove(key).is_some() {
            debug!(key = %key, "idempotency entry invalidated");
        }
    }

    /// Remove every entry.
    pub fn clear(&self) {
        let size = self.entries.len();
        self.entries.clear();
        self.sweep_queue.lock().clear();
        debug!(count = size, "idempotency cache cleared");
    }

    pub fn stats(&self) -> CacheStats {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        CacheStats {
            size: keys.len(),
            keys,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every expired entry, ignoring `sweep_limit`.
    pub fn sweep_expired(&self) -> usize {
        self.sweep_all(self.clock.now_millis()).removed
    }

    /// Run `op` unless a result for `key` is already cached.
    ///
    /// Only successful results are cached; an error leaves the key free so
    /// the caller can retry.
    pub fn execute<E, F>(&self, key: &str, ttl: Duration, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(previous) = self.get(key) {
            debug!(key = %key, "replaying cached result");
            return Ok(previous);
        }
        let result = op()?;
        self.put_with_ttl(key, result.clone(), ttl);
        Ok(result)
    }

    /// Async form of [`execute`](Self::execute). No map guard is held while
    /// the operation runs, so two concurrent first calls may both execute.
    pub async fn execute_async<E, F, Fut>(&self, key: &str, ttl: Duration, op: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(previous) = self.get(key) {
            debug!(key = %key, "replaying cached result");
            return Ok(previous);
        }
        let result = op().await?;
        self.put_with_ttl(key, result.clone(), ttl);
        Ok(result)
    }

    fn sweep_at(&self, now: i64) -> SweepReport {
        match self.sweep_limit {
            None => self.sweep_all(now),
            Some(limit) => self.sweep_bounded(now, limit),
        }
    }

    fn sweep_all(&self, now: i64) -> SweepReport {
        let mut report = SweepReport::default();
        self.entries.retain(|_, entry| {
            report.examined += 1;
            if entry.is_expired_at(now) {
                report.removed += 1;
                false
            } else {
                true
            }
        });
        self.note_swept(report);
        report
    }

    /// Examine at most `limit` queued keys. Live ones go to the back of the
    /// queue so repeated puts rotate through the whole map; queue items whose
    /// key was removed or overwritten are dropped.
    fn sweep_bounded(&self, now: i64, limit: usize) -> SweepReport {
        let batch: Vec<(String, u64)> = {
            let mut queue = self.sweep_queue.lock();
            let n = limit.min(queue.len());
            queue.drain(..n).collect()
        };

        let mut report = SweepReport {
            examined: batch.len(),
            removed: 0,
        };
        let mut survivors = Vec::with_capacity(batch.len());
        for (key, generation) in batch {
            let expired = match self.entries.get(&key) {
                Some(entry) if entry.generation == generation => entry.is_expired_at(now),
                _ => continue,
            };
            if !expired {
                survivors.push((key, generation));
            } else if self
                .entries
                .remove_if(&key, |_, entry| {
                    entry.generation == generation && entry.is_expired_at(now)
                })
                .is_some()
            {
                report.removed += 1;
            }
        }

        if !survivors.is_empty() {
            self.sweep_queue.lock().extend(survivors);
        }
        self.note_swept(report);
        report
    }

    fn note_swept(&self, report: SweepReport) {
        if report.removed > 0 {
            crate::metrics::record_cache_evictions(report.removed);
            debug!(
                count = report.removed,
                examined = report.examined,
                "swept expired idempotency entries"
            );
        }
    }
}

/// Convert signed milliseconds to a TTL, clamping negatives to zero.
pub fn ttl_from_millis(ttl_ms: i64) -> Duration {
    Duration::from_millis(u64::try_from(ttl_ms).unwrap_or(0))
}
