//! Integration Tests for TtlCache
//!
//! Exercises expiry through the background sweeper, overwrite semantics,
//! compare-and-swap under contention, and sweeper shutdown.

use std::sync::Arc;
use std::sync::Barrier;
use std::thread;
use std::time::Duration;

use bounded_store::{CacheConfig, CasResult, StoreError, TtlCache};

// == Expiry ==

#[tokio::test(start_paused = true)]
async fn test_entry_expires_after_ttl_and_sweep() {
    let cache = TtlCache::new(Duration::from_secs(5));

    cache.put("k", "v");
    assert_eq!(cache.get("k"), Some("v"));

    // ttl plus one sweep interval, with margin
    tokio::time::sleep(Duration::from_millis(6500)).await;

    assert_eq!(cache.get("k"), None);
    assert!(!cache.exist("k"));
    assert_eq!(cache.len(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_overwrite_resets_expiry() {
    let cache = TtlCache::new(Duration::from_secs(5));

    cache.put("k", "v1");
    tokio::time::sleep(Duration::from_millis(4000)).await;
    cache.put("k", "v2");
    tokio::time::sleep(Duration::from_millis(4000)).await;

    // 8s elapsed, past the first expiry but before the refreshed one
    assert_eq!(cache.get("k"), Some("v2"));
}

#[tokio::test(start_paused = true)]
async fn test_sweep_follows_configured_interval() {
    let config = CacheConfig::new(Duration::from_millis(500))
        .with_sweep_interval(Duration::from_secs(10));
    let cache = TtlCache::try_with_config(config).unwrap();

    cache.put("k", 1u32);
    tokio::time::sleep(Duration::from_secs(2)).await;

    // Stale but not yet swept
    assert!(cache.exist("k"));
    assert!(cache.entry("k").unwrap().is_expired());

    tokio::time::sleep(Duration::from_secs(9)).await;
    assert!(!cache.exist("k"));
    assert_eq!(cache.stats().expired, 1);
}

#[tokio::test(start_paused = true)]
async fn test_sweep_removes_only_expired_entries() {
    let cache = TtlCache::new(Duration::from_secs(3));

    cache.put("early", 1);
    tokio::time::sleep(Duration::from_millis(2500)).await;
    cache.put("late", 2);
    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert!(!cache.exist("early"));
    assert_eq!(cache.get("late"), Some(2));
}

#[tokio::test(start_paused = true)]
async fn test_unbounded_ttl_keeps_entries() {
    let cache = TtlCache::new(Duration::MAX);

    cache.put("k", 1u8);
    tokio::time::sleep(Duration::from_secs(3600)).await;

    assert_eq!(cache.get("k"), Some(1));
    assert!(cache.compare_and_swap("k", &1, 2).is_swapped());
    assert_eq!(cache.get("k"), Some(2));
}

// == Delete ==

#[tokio::test]
async fn test_delete_absent_key_is_noop() {
    let cache: TtlCache<String> = TtlCache::new(Duration::from_secs(5));

    cache.delete("missing");
    cache.put("present", "value".to_string());
    cache.delete("missing");

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("present"), Some("value".to_string()));
}

// == Compare And Swap ==

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_compare_and_swap_exactly_one_winner() {
    let cache = TtlCache::new(Duration::from_secs(60));
    cache.put("slot", "initial".to_string());

    let threads = 16;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|id| {
            let cache = cache.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cache.compare_and_swap("slot", &"initial".to_string(), format!("writer-{id}"))
            })
        })
        .collect();

    let results: Vec<CasResult<String>> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let winners: Vec<&String> = results
        .iter()
        .filter_map(|result| match result {
            CasResult::Swapped(value) => Some(value),
            _ => None,
        })
        .collect();

    assert_eq!(winners.len(), 1);
    assert_eq!(cache.get("slot").as_ref(), Some(winners[0]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_compare_and_swap_counter_has_no_lost_updates() {
    let cache = TtlCache::new(Duration::from_secs(60));
    cache.put("counter", 0u64);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = cache.clone();
            thread::spawn(move || {
                let mut done = 0;
                while done < 250 {
                    let current = cache.get("counter").unwrap_or_default();
                    if cache.compare_and_swap("counter", &current, current + 1).is_swapped() {
                        done += 1;
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.get("counter"), Some(2000));
}

#[tokio::test]
async fn test_compare_and_swap_sequence_of_distinct_values() {
    let cache = TtlCache::new(Duration::from_secs(60));
    cache.put("k", 1);

    assert_eq!(cache.compare_and_swap("k", &1, 2), CasResult::Swapped(2));
    assert_eq!(cache.compare_and_swap("k", &1, 3), CasResult::Mismatch(2));
    assert_eq!(cache.compare_and_swap("k", &2, 3), CasResult::Swapped(3));
    assert_eq!(cache.get("k"), Some(3));
}

// == Sweeper Lifecycle ==

#[tokio::test(start_paused = true)]
async fn test_close_stops_expiry() {
    let cache = TtlCache::new(Duration::from_secs(1));
    cache.close().await.unwrap();
    assert!(!cache.is_sweeping());

    cache.put("k", "v");
    tokio::time::sleep(Duration::from_secs(5)).await;

    // No sweeper left to remove it
    assert!(cache.exist("k"));
    assert_eq!(cache.sweep(), 1);
    assert!(!cache.exist("k"));
}

#[tokio::test]
async fn test_close_from_clone() {
    let cache: TtlCache<u8> = TtlCache::new(Duration::from_secs(1));
    let clone = cache.clone();

    clone.close().await.unwrap();

    assert!(!cache.is_sweeping());
}

#[test]
fn test_construction_outside_runtime_fails() {
    let result = TtlCache::<u8>::try_new(Duration::from_secs(1));
    assert_eq!(result.err(), Some(StoreError::NoRuntime));
}
