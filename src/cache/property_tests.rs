//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check lookup, overwrite, invalidation and expiry.

use proptest::prelude::*;
use std::collections::HashMap;
use std::thread::sleep;
use std::time::Duration;

use crate::cache::TtlCache;

// == Test Configuration ==
const TEST_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Generates cache keys from a small alphabet so operations collide
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,2}".prop_map(|s| s)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,64}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Invalidate { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Invalidate { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // With a TTL that never elapses during the test, the cache behaves like
    // a map: set overwrites, invalidate removes, get reads, and hit/miss
    // counters match what the reads returned.
    #[test]
    fn prop_behaves_like_map_before_expiry(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let cache = TtlCache::new();
        let mut model: HashMap<String, String> = HashMap::new();
        let mut expected_hits = 0u64;
        let mut expected_misses = 0u64;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    cache.set(key.clone(), value.clone(), TEST_TTL);
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    let got = cache.get(&key);
                    prop_assert_eq!(got.as_ref(), model.get(&key));
                    if got.is_some() {
                        expected_hits += 1;
                    } else {
                        expected_misses += 1;
                    }
                }
                CacheOp::Invalidate { key } => {
                    cache.invalidate(&key);
                    model.remove(&key);
                }
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.total_entries, model.len());
    }

    // After invalidate, get misses even though the TTL has not elapsed.
    #[test]
    fn prop_invalidate_hides_live_entry(key in key_strategy(), value in value_strategy()) {
        let cache = TtlCache::new();
        cache.set(key.clone(), value, TEST_TTL);

        cache.invalidate(&key);

        prop_assert!(cache.get(&key).is_none());
    }
}

// Separate proptest block with fewer cases for time-sensitive TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    // An entry is found before its TTL elapses and not found after, and an
    // expired key reads the same as a key that was never set.
    #[test]
    fn prop_ttl_expiration_behavior(
        key in key_strategy(),
        never_set in "[x-z]{1,3}",
        value in value_strategy()
    ) {
        let cache = TtlCache::new();
        cache.set(key.clone(), value.clone(), Duration::from_millis(30));

        prop_assert_eq!(cache.get(&key), Some(value));

        sleep(Duration::from_millis(40));

        prop_assert_eq!(cache.get(&key), cache.get(&never_set));
        prop_assert!(cache.get(&key).is_none());
    }
}
