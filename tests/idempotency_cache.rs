//! Integration tests for the idempotency cache.

use assetdesk::cache::{DEFAULT_TTL, IdempotencyCache, IdempotencyKey, ManualClock};
use assetdesk::config::CacheConfig;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
struct Outcome {
    ok: bool,
}

fn manual_cache<T: Clone>() -> (IdempotencyCache<T>, ManualClock) {
    let clock = ManualClock::new(1_700_000_000_000);
    (IdempotencyCache::with_clock(Arc::new(clock.clone())), clock)
}

#[test]
fn test_round_trip_and_overwrite() {
    let (cache, _) = manual_cache();
    cache.put_with_ttl("k", Outcome { ok: false }, Duration::from_millis(1));
    assert_eq!(cache.get("k"), Some(Outcome { ok: false }));

    cache.put("k", Outcome { ok: true });
    assert_eq!(cache.get("k"), Some(Outcome { ok: true }));
    assert_eq!(cache.stats().size, 1);
}

#[test]
fn test_expiry_with_real_clock() {
    let cache = IdempotencyCache::new();
    cache.put_with_ttl("k", 7u32, Duration::from_millis(10));
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(cache.get("k"), None);
}

#[test]
fn test_default_ttl_scenario() {
    let (cache, clock) = manual_cache();
    assert_eq!(cache.default_ttl(), DEFAULT_TTL);

    cache.put("op-123", Outcome { ok: true });
    assert_eq!(cache.get("op-123"), Some(Outcome { ok: true }));

    clock.advance(Duration::from_millis(301_000));
    assert_eq!(cache.get("op-123"), None);
    assert!(!cache.stats().keys.contains(&"op-123".to_string()));
    assert_eq!(cache.stats().size, 0);
}

#[test]
fn test_clear_empties_stats() {
    let (cache, _) = manual_cache();
    for i in 0..5 {
        cache.put(format!("k{i}"), i);
    }
    assert_eq!(cache.stats().size, 5);
    cache.clear();
    assert_eq!(cache.stats().size, 0);
}

#[test]
fn test_from_config() {
    let config = CacheConfig {
        default_ttl_ms: 1_000,
        sweep_limit: 1,
    };
    let clock = ManualClock::new(0);
    let cache = IdempotencyCache::from_config_with_clock(&config, Arc::new(clock.clone()));
    assert_eq!(cache.default_ttl(), Duration::from_millis(1_000));

    cache.put("a", ());
    cache.put("b", ());
    clock.advance(Duration::from_millis(1_001));
    cache.put("c", ());
    // bounded sweep removed only one of the two expired entries
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_operation_keys_deduplicate_mutations() {
    let (cache, _) = manual_cache();
    let calls = AtomicUsize::new(0);
    let link_chip = |iccid: &str| {
        let key = IdempotencyKey::for_operation("link_chip", iccid);
        cache.execute(key.as_str(), DEFAULT_TTL, || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>(Outcome { ok: true })
        })
    };

    assert_eq!(link_chip("8955010000000000001"), Ok(Outcome { ok: true }));
    assert_eq!(link_chip("8955010000000000001"), Ok(Outcome { ok: true }));
    assert_eq!(link_chip("8955010000000000002"), Ok(Outcome { ok: true }));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_concurrent_puts_last_write_wins_per_key() {
    let cache = Arc::new(IdempotencyCache::new());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || {
                for i in 0..100 {
                    cache.put(format!("k{}", i % 10), t);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(cache.stats().size, 10);
    assert!(cache.get("k3").is_some_and(|v| v < 8));
}

#[tokio::test]
async fn test_execute_async_replays_result() {
    let (cache, _) = manual_cache();
    let counter = AtomicUsize::new(0);
    let calls = &counter;

    for _ in 0..3 {
        let out = cache
            .execute_async("submit-usage", DEFAULT_TTL, move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(1)).await;
                Ok::<_, String>(Outcome { ok: true })
            })
            .await;
        assert_eq!(out, Ok(Outcome { ok: true }));
    }
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_execute_async_error_is_not_cached() {
    let (cache, _) = manual_cache::<Outcome>();
    let failed = cache
        .execute_async("k", DEFAULT_TTL, || async { Err::<Outcome, _>("timeout") })
        .await;
    assert_eq!(failed, Err("timeout"));
    assert_eq!(cache.get("k"), None);
}
