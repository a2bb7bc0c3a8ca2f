//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check store bounds, freshness and load counting.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStore, CachedAccessor, ManualClock};
use crate::config::CacheConfig;

// == Test Configuration ==
const TTL_SECS: u64 = 3600;

// == Strategies ==
/// Generates catalog-style keys
fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("products".to_string()),
        (1u32..20).prop_map(|id| format!("product:{}", id)),
    ]
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,32}"
}

#[derive(Debug, Clone)]
enum StoreOp {
    Put { key: String, value: String },
    Get { key: String },
    Invalidate { key: String },
}

fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| StoreOp::Put { key, value }),
        key_strategy().prop_map(|key| StoreOp::Get { key }),
        key_strategy().prop_map(|key| StoreOp::Invalidate { key }),
    ]
}

#[derive(Debug, Clone)]
enum AccessOp {
    Load { key: String },
    Advance { secs: u64 },
    Invalidate { key: String },
}

fn access_op_strategy() -> impl Strategy<Value = AccessOp> {
    prop_oneof![
        4 => key_strategy().prop_map(|key| AccessOp::Load { key }),
        2 => (0u64..2 * TTL_SECS).prop_map(|secs| AccessOp::Advance { secs }),
        1 => key_strategy().prop_map(|key| AccessOp::Invalidate { key }),
    ]
}

fn store(capacity: usize) -> CacheStore<String> {
    CacheStore::new(NonZeroUsize::new(capacity).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of operations, the store never holds more than its
    // capacity.
    #[test]
    fn prop_capacity_never_exceeded(
        capacity in 1usize..8,
        ops in prop::collection::vec(store_op_strategy(), 1..200)
    ) {
        let store = store(capacity);

        for op in ops {
            match op {
                StoreOp::Put { key, value } => {
                    store.put(key, CacheEntry::new(value, 0));
                }
                StoreOp::Get { key } => {
                    store.get(&key);
                }
                StoreOp::Invalidate { key } => {
                    store.invalidate(&key);
                }
            }
            prop_assert!(
                store.len() <= capacity,
                "Store size {} exceeds capacity {}",
                store.len(),
                capacity
            );
        }
    }

    // Inserting N + k distinct keys with no reads in between keeps exactly
    // the N most recently inserted keys.
    #[test]
    fn prop_retains_most_recent_inserts(capacity in 1usize..10, extra in 1usize..10) {
        let store = store(capacity);
        let keys: Vec<String> = (0..capacity + extra).map(|i| format!("product:{}", i)).collect();

        for key in &keys {
            store.put(key.clone(), CacheEntry::new(String::new(), 0));
        }

        let resident: HashSet<String> = store.keys().into_iter().collect();
        let expected: HashSet<String> = keys[extra..].iter().cloned().collect();
        prop_assert_eq!(resident, expected);
        prop_assert_eq!(store.evictions(), extra as u64);
    }

    // A put followed by a get returns the value that was put, and an
    // overwrite leaves a single entry holding the newer value.
    #[test]
    fn prop_put_then_get_returns_latest(
        key in key_strategy(),
        first in value_strategy(),
        second in value_strategy()
    ) {
        let store = store(4);

        store.put(key.clone(), CacheEntry::new(first, 1));
        store.put(key.clone(), CacheEntry::new(second.clone(), 2));

        let entry = store.get(&key).unwrap();
        prop_assert_eq!(entry.value(), &second);
        prop_assert_eq!(entry.created_at(), 2);
        prop_assert_eq!(store.len(), 1);
    }

    // Freshness depends only on the age relative to the TTL.
    #[test]
    fn prop_freshness_matches_age(created_at in 0u64..1_000_000, age_ms in 0u64..10_000_000) {
        let ttl = Duration::from_secs(TTL_SECS);
        let entry = CacheEntry::new((), created_at);

        prop_assert_eq!(
            entry.is_fresh(created_at + age_ms, ttl),
            u128::from(age_ms) < ttl.as_millis()
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    // The accessor invokes a loader exactly when the model says the key is
    // absent or stale, and never otherwise.
    #[test]
    fn prop_loader_called_only_when_missing_or_stale(
        ops in prop::collection::vec(access_op_strategy(), 1..60)
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let clock = Arc::new(ManualClock::new(0));
        let config = CacheConfig {
            capacity: NonZeroUsize::new(64).unwrap(),
            ttl: Duration::from_secs(TTL_SECS),
            load_timeout: None,
        };
        let cache: CachedAccessor<u64> = CachedAccessor::with_clock(&config, clock.clone());
        let calls = Arc::new(AtomicUsize::new(0));

        // key -> creation time in ms
        let mut model: HashMap<String, u64> = HashMap::new();
        let mut now_ms = 0u64;
        let mut expected_calls = 0usize;

        for op in ops {
            match op {
                AccessOp::Load { key } => {
                    let fresh = model
                        .get(&key)
                        .map(|created| now_ms - created < TTL_SECS * 1000)
                        .unwrap_or(false);
                    if !fresh {
                        expected_calls += 1;
                        model.insert(key.clone(), now_ms);
                    }

                    let calls_in_loader = Arc::clone(&calls);
                    let value = runtime
                        .block_on(cache.get_or_load(&key, move || async move {
                            calls_in_loader.fetch_add(1, Ordering::SeqCst);
                            Ok(now_ms)
                        }))
                        .unwrap();
                    prop_assert_eq!(value, model[&key]);
                }
                AccessOp::Advance { secs } => {
                    clock.advance(Duration::from_secs(secs));
                    now_ms += secs * 1000;
                }
                AccessOp::Invalidate { key } => {
                    prop_assert_eq!(cache.invalidate(&key), model.remove(&key).is_some());
                }
            }
            prop_assert_eq!(calls.load(Ordering::SeqCst), expected_calls);
        }
    }
}
