//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check key derivation and the synchronous cache
//! operations against a plain map model.

use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::cache::{CacheKey, RequestCache, RequestParams};

// == Test Configuration ==
const TEST_DEFAULT_TTL: Duration = Duration::from_secs(300);

type TestCache = RequestCache<String, String>;

// == Strategies ==
/// Resource identifiers shaped like API paths
fn resource_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("/restaurants".to_string()),
        Just("/orders".to_string()),
        Just("/bookings".to_string()),
        Just("/bookings/notifications".to_string()),
    ]
}

fn field_value_strategy() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        any::<i64>().prop_map(serde_json::Value::from),
        any::<bool>().prop_map(serde_json::Value::from),
        "[a-zA-Z0-9 ]{0,16}".prop_map(serde_json::Value::from),
    ]
}

/// Unique field names with values
fn fields_strategy() -> impl Strategy<Value = Vec<(String, serde_json::Value)>> {
    prop::collection::btree_map("[a-z_]{1,12}", field_value_strategy(), 0..8)
        .prop_map(|map: BTreeMap<String, serde_json::Value>| map.into_iter().collect())
}

fn small_params_strategy() -> impl Strategy<Value = RequestParams> {
    prop::option::of(0u8..4).prop_map(|page| match page {
        Some(page) => RequestParams::new().with("page", page),
        None => RequestParams::new(),
    })
}

#[derive(Debug, Clone)]
enum CacheOp {
    Store { resource: String, params: RequestParams, value: String },
    Lookup { resource: String, params: RequestParams },
    Invalidate { resource: String, params: RequestParams },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (resource_strategy(), small_params_strategy(), "[a-z]{1,8}").prop_map(
            |(resource, params, value)| CacheOp::Store { resource, params, value }
        ),
        (resource_strategy(), small_params_strategy())
            .prop_map(|(resource, params)| CacheOp::Lookup { resource, params }),
        (resource_strategy(), small_params_strategy())
            .prop_map(|(resource, params)| CacheOp::Invalidate { resource, params }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Insertion order of parameter fields never changes the derived key.
    #[test]
    fn prop_key_ignores_field_order(
        resource in resource_strategy(),
        (fields, shuffled) in fields_strategy()
            .prop_flat_map(|fields| (Just(fields.clone()), Just(fields).prop_shuffle()))
    ) {
        let a: RequestParams = fields.into_iter().collect();
        let b: RequestParams = shuffled.into_iter().collect();

        prop_assert_eq!(CacheKey::new(&resource, &a), CacheKey::new(&resource, &b));
    }

    // Lookups agree with a plain map model; stats count every lookup.
    #[test]
    fn prop_matches_map_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let cache = TestCache::new(TEST_DEFAULT_TTL);
        let mut model: HashMap<CacheKey, String> = HashMap::new();
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Store { resource, params, value } => {
                    model.insert(CacheKey::new(&resource, &params), value.clone());
                    cache.store(&resource, &params, value, None);
                }
                CacheOp::Lookup { resource, params } => {
                    let expected = model.get(&CacheKey::new(&resource, &params)).cloned();
                    let actual = cache.lookup(&resource, &params);
                    if actual.is_some() {
                        expected_hits += 1;
                    } else {
                        expected_misses += 1;
                    }
                    prop_assert_eq!(actual, expected);
                }
                CacheOp::Invalidate { resource, params } => {
                    model.remove(&CacheKey::new(&resource, &params));
                    cache.invalidate(&resource, &params);
                }
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.total_entries, model.len(), "Total entries mismatch");
    }

    // Pattern invalidation removes exactly the keys containing the pattern.
    #[test]
    fn prop_pattern_invalidation_is_exact(
        entries in prop::collection::vec((resource_strategy(), small_params_strategy()), 1..20),
        pattern in prop_oneof![
            Just("orders".to_string()),
            Just("bookings".to_string()),
            Just("notifications".to_string()),
            Just("\"page\":1".to_string()),
        ]
    ) {
        let cache = TestCache::new(TEST_DEFAULT_TTL);
        for (resource, params) in &entries {
            cache.store(resource, params, resource.clone(), None);
        }

        let expected_removed = entries
            .iter()
            .map(|(resource, params)| CacheKey::new(resource, params))
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .filter(|key| key.contains(&pattern))
            .count();

        prop_assert_eq!(cache.invalidate_pattern(&pattern), expected_removed);

        for (resource, params) in &entries {
            let key = CacheKey::new(resource, params);
            let found = cache.lookup(resource, params);
            prop_assert_eq!(found.is_some(), !key.contains(&pattern), "key {}", key);
        }
    }

    // A second store for the same key leaves only the second payload.
    #[test]
    fn prop_overwrite_semantics(
        resource in resource_strategy(),
        params in small_params_strategy(),
        value1 in "[a-z]{1,16}",
        value2 in "[a-z]{1,16}"
    ) {
        let cache = TestCache::new(TEST_DEFAULT_TTL);

        cache.store(&resource, &params, value1, None);
        cache.store(&resource, &params, value2.clone(), None);

        prop_assert_eq!(cache.lookup(&resource, &params), Some(value2));
        prop_assert_eq!(cache.len(), 1, "Should have exactly one entry after overwrite");
    }
}
