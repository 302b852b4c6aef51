//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the store's TTL and key contracts against a
//! manually driven clock.

use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

use crate::cache::{keys, CacheStore, Clock, ManualClock};

// == Strategies ==
/// Generates cache keys shaped like the namespaced keys the services build
fn key_strategy() -> impl Strategy<Value = String> {
    "(dashboard|monitor):[a-z]{1,12}(:[a-z0-9]{1,4})?".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,64}".prop_map(|s| s)
}

/// Positive TTLs between 1 ms and one hour
fn ttl_strategy() -> impl Strategy<Value = i64> {
    1i64..3_600_000
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String, ttl: i64 },
    Get { key: String },
    Delete { key: String },
    Advance { ms: i64 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy(), -100i64..5_000)
            .prop_map(|(key, value, ttl)| CacheOp::Set { key, value, ttl }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
        (0i64..2_000).prop_map(|ms| CacheOp::Advance { ms }),
    ]
}

fn new_store() -> (CacheStore<String>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::default());
    (CacheStore::new(clock.clone()), clock)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Immediately after set(k, v, t) with t > 0, has(k) holds and get(k) = v;
    // once t has elapsed the key reads as absent.
    #[test]
    fn prop_ttl_visibility_window(
        key in key_strategy(),
        value in value_strategy(),
        ttl in ttl_strategy()
    ) {
        let (mut store, clock) = new_store();

        store.set(key.clone(), value.clone(), ttl);
        prop_assert!(store.has(&key));
        prop_assert_eq!(store.get(&key), Some(value));

        clock.advance_ms(ttl);
        prop_assert!(!store.has(&key));
        prop_assert_eq!(store.get(&key), None);
    }

    // A non-positive TTL never produces a hit.
    #[test]
    fn prop_non_positive_ttl_never_hits(
        key in key_strategy(),
        value in value_strategy(),
        ttl in -10_000i64..=0
    ) {
        let (mut store, _) = new_store();

        store.set(key.clone(), value, ttl);
        prop_assert!(!store.has(&key));
        prop_assert_eq!(store.get(&key), None);
    }

    // Deleting twice is harmless and leaves the key absent.
    #[test]
    fn prop_delete_twice(key in key_strategy(), value in value_strategy(), ttl in ttl_strategy()) {
        let (mut store, _) = new_store();

        store.set(key.clone(), value, ttl);
        store.delete(&key);
        store.delete(&key);
        prop_assert!(!store.has(&key));
        prop_assert_eq!(store.get(&key), None);
    }

    // The store agrees with a simple model under any operation sequence.
    #[test]
    fn prop_matches_reference_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let (mut store, clock) = new_store();
        let mut model: HashMap<String, (String, i64)> = HashMap::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { key, value, ttl } => {
                    model.insert(key.clone(), (value.clone(), clock.now_ms() + ttl));
                    store.set(key, value, ttl);
                }
                CacheOp::Get { key } => {
                    let now = clock.now_ms();
                    let expected = model
                        .get(&key)
                        .filter(|(_, expires)| now < *expires)
                        .map(|(value, _)| value.clone());
                    if expected.is_some() {
                        expected_hits += 1;
                    } else {
                        expected_misses += 1;
                    }
                    prop_assert_eq!(store.get(&key), expected);
                }
                CacheOp::Delete { key } => {
                    model.remove(&key);
                    store.delete(&key);
                }
                CacheOp::Advance { ms } => clock.advance_ms(ms),
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_entries, store.len(), "Total entries mismatch");
    }

    // Prefix deletion through the stats listing only touches that namespace.
    #[test]
    fn prop_namespace_clear_is_scoped(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..40)
    ) {
        let (mut store, _) = new_store();
        for (key, value) in &entries {
            store.set(key.clone(), value.clone(), 60_000);
        }

        for key in store.stats().keys_with_prefix("dashboard:") {
            store.delete(&key);
        }

        for (key, _) in &entries {
            if key.starts_with("dashboard:") {
                prop_assert!(!store.has(key));
            } else {
                prop_assert!(store.has(key));
            }
        }
    }

    // Identical ranges build identical keys, distinct ranges distinct keys.
    #[test]
    fn prop_dashboard_key_determinism(a in "[a-z0-9]{1,6}", b in "[a-z0-9]{1,6}") {
        prop_assert_eq!(keys::dashboard_stats(Some(&a)), keys::dashboard_stats(Some(&a)));
        if a != b {
            prop_assert_ne!(keys::dashboard_stats(Some(&a)), keys::dashboard_stats(Some(&b)));
        }
    }
}
