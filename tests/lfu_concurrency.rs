// ==============================================
// LFU CONCURRENCY TESTS (integration)
// ==============================================
#![cfg(feature = "concurrency")]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use freqcache::builder::CacheBuilder;
use freqcache::policy::lfu::ConcurrentLfuCache;

mod shared_lfu_cache {
    use super::*;

    #[test]
    fn test_mixed_operations_keep_cache_bounded() {
        let cache: ConcurrentLfuCache<String, String> = ConcurrentLfuCache::new(100);
        let num_threads = 8;
        let operations_per_thread = 500;
        let completed = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..num_threads)
            .map(|thread_id| {
                let cache = cache.clone();
                let completed = completed.clone();

                thread::spawn(move || {
                    for i in 0..operations_per_thread {
                        match i % 5 {
                            0 | 1 => {
                                let key = format!("thread_{}_{}", thread_id, i % 60);
                                cache.insert(key, format!("value_{}_{}", thread_id, i));
                            },
                            2 => {
                                let key = format!("thread_{}_0", thread_id);
                                let _ = cache.get(&key);
                            },
                            3 => {
                                let key = format!("thread_{}_{}", (thread_id + 1) % num_threads, i % 60);
                                let _ = cache.contains(&key);
                            },
                            _ => {
                                if i % 20 == 4 {
                                    let key = format!("thread_{}_{}", thread_id, i % 60);
                                    let _ = cache.remove(&key);
                                }
                            },
                        }
                        completed.fetch_add(1, Ordering::Relaxed);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("worker panicked");
        }

        assert_eq!(
            completed.load(Ordering::Relaxed),
            num_threads * operations_per_thread
        );
        assert!(cache.len() <= 100);
        cache
            .check_invariants()
            .expect("bucket chain consistent after concurrent use");
    }

    #[test]
    fn test_hot_key_survives_contention() {
        let cache: ConcurrentLfuCache<u64, u64> = ConcurrentLfuCache::new(16);
        cache.insert(0, 0);
        for _ in 0..1_000 {
            cache.get(&0);
        }

        let handles: Vec<_> = (1..=4u64)
            .map(|t| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..2_000u64 {
                        cache.insert(t * 10_000 + i, i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("writer panicked");
        }

        // Newcomers only ever reach frequency 1, so they evict each other.
        assert!(cache.contains(&0));
        assert_eq!(cache.len(), 16);
    }

    #[test]
    fn test_promotions_are_not_lost() {
        let cache: ConcurrentLfuCache<&'static str, ()> = ConcurrentLfuCache::new(4);
        cache.insert("counter", ());
        let threads = 8;
        let gets_per_thread = 250;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for _ in 0..gets_per_thread {
                        assert!(cache.get(&"counter").is_some());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("reader panicked");
        }

        // One exclusive lock per call: every promotion lands.
        assert_eq!(
            cache.frequency(&"counter"),
            Some(1 + (threads * gets_per_thread) as u64)
        );
    }

    #[test]
    fn test_resize_and_clear_during_traffic() {
        let cache: ConcurrentLfuCache<u32, u32> = ConcurrentLfuCache::new(64);
        let stop = Arc::new(AtomicBool::new(false));

        let workers: Vec<_> = (0..4u32)
            .map(|t| {
                let cache = cache.clone();
                let stop = stop.clone();
                thread::spawn(move || {
                    let mut i = 0u32;
                    while !stop.load(Ordering::Relaxed) {
                        cache.insert(t * 100_000 + i % 500, i);
                        cache.get(&(t * 100_000));
                        i = i.wrapping_add(1);
                    }
                })
            })
            .collect();

        let deadline = Instant::now() + Duration::from_millis(200);
        let mut limit = 64;
        while Instant::now() < deadline {
            limit = if limit == 64 { 8 } else { 64 };
            cache.resize(limit);
            thread::sleep(Duration::from_millis(5));
            if limit == 8 {
                cache.clear();
            }
        }
        stop.store(true, Ordering::Relaxed);
        for worker in workers {
            worker.join().expect("worker panicked");
        }

        cache.resize(8);
        cache.insert(u32::MAX, 0);
        assert!(cache.len() <= 8);
        assert!(cache.check_invariants().is_ok());
    }
}

mod facade {
    use super::*;

    #[test]
    fn test_facade_shared_between_threads() {
        let cache = Arc::new(CacheBuilder::new(32).build::<u64, Vec<u8>>());
        let hits = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let cache = Arc::clone(&cache);
                let hits = Arc::clone(&hits);
                thread::spawn(move || {
                    for i in 0..200u64 {
                        let key = t * 1_000 + i % 8;
                        if cache.get(&key).is_some() {
                            hits.fetch_add(1, Ordering::Relaxed);
                        } else {
                            cache.insert(key, vec![0u8; 16]);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("worker panicked");
        }

        println!("facade hits: {}", hits.load(Ordering::Relaxed));
        assert!(cache.len() <= 32);
        assert!(hits.load(Ordering::Relaxed) > 0);
    }
}
