// ==============================================
// LFU BEHAVIORAL INVARIANTS (integration)
// ==============================================
//
// Library-wide guarantees checked through the public API only: bounded
// size, frequency ordering of evictions, clean resets, and the facade
// forwarding to the engine unchanged.

use freqcache::policy::lfu::LfuCache;
use freqcache::traits::{CoreCache, LfuCacheTrait, MutableCache};

// ==============================================
// Round-trip and absence
// ==============================================

mod round_trip {
    use super::*;

    #[test]
    fn set_then_get_returns_value() {
        let mut cache = LfuCache::new(8);
        for i in 0..8u32 {
            cache.insert(i, format!("v{i}"));
        }
        for i in 0..8u32 {
            assert_eq!(cache.get(&i), Some(&format!("v{i}")));
        }
    }

    #[test]
    fn never_inserted_and_deleted_keys_are_absent() {
        let mut cache = LfuCache::new(4);
        assert_eq!(cache.get(&"ghost"), None);
        assert!(!cache.contains(&"ghost"));

        cache.insert("gone", 1);
        assert_eq!(cache.remove(&"gone"), Some(1));
        assert_eq!(cache.get(&"gone"), None);
        assert!(!cache.contains(&"gone"));
        assert_eq!(cache.remove(&"gone"), None);
    }

    #[test]
    fn repeated_set_keeps_one_entry_with_last_value() {
        let mut cache = LfuCache::new(4);
        cache.insert("k", "v1");
        cache.get(&"k");
        cache.insert("k", "v2");

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.frequency(&"k"), Some(2));
        assert_eq!(cache.get(&"k"), Some(&"v2"));
    }
}

// ==============================================
// Bounded size
// ==============================================

mod bounded_size {
    use super::*;

    #[test]
    fn len_never_exceeds_latest_limit_after_set() {
        let mut cache = LfuCache::new(10);
        let limits = [10usize, 3, 7, 1, 12, 5];
        let mut key = 0u32;

        for &limit in &limits {
            cache.resize(limit);
            for _ in 0..25 {
                cache.insert(key, key);
                assert!(
                    cache.len() <= limit,
                    "len {} exceeds limit {} after insert",
                    cache.len(),
                    limit
                );
                if key % 3 == 0 {
                    cache.get(&key);
                }
                key += 1;
            }
        }
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn update_over_shrunk_limit_keeps_membership() {
        let mut cache = LfuCache::new(4);
        for key in 0..4u32 {
            cache.insert(key, key);
        }
        cache.get(&3);
        cache.resize(2);

        for key in 0..4u32 {
            assert_eq!(cache.insert(key, key * 10), Some(key));
            assert_eq!(cache.len(), 4);
        }
        for key in 0..4u32 {
            assert_eq!(cache.peek(&key), Some(&(key * 10)));
        }
        assert_eq!(cache.frequency(&3), Some(2));
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let mut cache: LfuCache<&str, i32> = LfuCache::new(0);
        cache.insert("key", 42);
        assert_eq!(cache.len(), 0);
        assert!(!cache.contains(&"key"));
        assert!(cache.check_invariants().is_ok());
    }
}

// ==============================================
// Frequency ordering
// ==============================================

mod frequency_ordering {
    use super::*;

    #[test]
    fn capacity_three_walkthrough() {
        let mut cache = LfuCache::new(3);
        cache.insert("key", "v");
        cache.insert("key1", "v2");
        cache.insert("key3", "v3");
        for key in ["key", "key1", "key3"] {
            assert_eq!(cache.frequency(&key), Some(1));
        }

        cache.get(&"key");
        cache.get(&"key");
        cache.get(&"key1");
        assert_eq!(cache.frequency(&"key"), Some(3));
        assert_eq!(cache.frequency(&"key1"), Some(2));
        assert_eq!(cache.frequency(&"key3"), Some(1));

        cache.insert("key4", "v4");
        assert!(!cache.contains(&"key3"));
        assert_eq!(cache.frequency(&"key"), Some(3));
        assert_eq!(cache.frequency(&"key1"), Some(2));
        assert_eq!(cache.frequency(&"key4"), Some(1));

        cache.insert("key5", "v5");
        assert!(!cache.contains(&"key4"));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn less_accessed_entry_is_evicted_before_more_accessed_one() {
        let mut cache = LfuCache::new(5);
        for key in 0..5u32 {
            cache.insert(key, ());
            for _ in 0..key {
                cache.get(&key);
            }
        }

        for (round, newcomer) in (100..104u32).enumerate() {
            cache.insert(newcomer, ());
            // Newcomers sit at frequency 1 and are the next victims.
            assert_eq!(cache.frequency(&(round as u32 + 1)), Some(round as u64 + 2));
        }
        assert!(!cache.contains(&0));
        assert!(cache.contains(&4));
    }

    #[test]
    fn pop_lfu_drains_in_nondecreasing_frequency() {
        let mut cache = LfuCache::new(32);
        for key in 0..32u32 {
            cache.insert(key, ());
            for _ in 0..(key * 7 % 11) {
                cache.get(&key);
            }
        }

        let mut last = 0;
        while let Some(freq) = cache.peek_lfu().map(|(k, _)| *k).and_then(|k| cache.frequency(&k)) {
            assert!(freq >= last);
            last = freq;
            cache.pop_lfu();
        }
        assert!(cache.is_empty());
    }
}

// ==============================================
// Clean resets
// ==============================================

mod clean_resets {
    use super::*;

    #[test]
    fn clear_forgets_keys_and_keeps_limit() {
        let mut cache = LfuCache::new(4);
        for key in 0..4u8 {
            cache.insert(key, key);
            cache.get(&key);
        }
        cache.clear();

        for key in 0..4u8 {
            assert!(!cache.contains(&key));
        }
        assert_eq!(cache.capacity(), 4);

        for key in 10..14u8 {
            cache.insert(key, key);
        }
        assert_eq!(cache.len(), 4);
        for key in 10..14u8 {
            assert_eq!(cache.frequency(&key), Some(1));
        }
    }
}

// ==============================================
// Facade
// ==============================================

#[cfg(feature = "concurrency")]
mod facade {
    use freqcache::builder::{CacheBuilder, CacheConfig, CachePolicy};

    #[test]
    fn facade_matches_engine_on_walkthrough() {
        let cache = CacheBuilder::from_config(CacheConfig {
            capacity: 3,
            policy: CachePolicy::Lfu,
        })
        .build::<&'static str, &'static str>();

        cache.insert("key", "v");
        cache.insert("key1", "v2");
        cache.insert("key3", "v3");
        cache.get(&"key");
        cache.get(&"key");
        cache.get(&"key1");

        cache.insert("key4", "v4");
        assert!(!cache.contains(&"key3"));
        cache.insert("key5", "v5");
        assert!(!cache.contains(&"key4"));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn facade_update_over_shrunk_limit_keeps_membership() {
        let cache = CacheBuilder::new(3).build::<u32, String>();
        for key in 0..3u32 {
            cache.insert(key, format!("v{key}"));
        }
        cache.resize(1);

        cache.insert(0, "updated".to_string());
        assert_eq!(cache.len(), 3);
        for key in 0..3u32 {
            assert!(cache.contains(&key));
        }
        assert_eq!(cache.get(&0).as_deref().map(String::as_str), Some("updated"));

        cache.insert(7, "new".to_string());
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&7));
    }

    #[test]
    fn unsupported_policy_is_a_config_error() {
        let result = CacheBuilder::new(16)
            .policy("tinylfu".parse().expect("known policy name"))
            .try_build::<u32, u32>();
        assert!(result.is_err());
    }
}
