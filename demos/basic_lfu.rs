//! Walks the LFU engine through a small capacity-3 session.
//!
//! Run with: cargo run --example basic_lfu
//! Set `RUST_LOG=debug` to see evictions as they happen.

use freqcache::policy::lfu::LfuCache;
use freqcache::traits::{CoreCache, LfuCacheTrait, MutableCache};

fn main() {
    env_logger::init();

    let mut cache: LfuCache<&str, String> = LfuCache::new(3);

    cache.insert("key", "v".to_string());
    cache.insert("key1", "v2".to_string());
    cache.insert("key3", "v3".to_string());

    // key -> 3, key1 -> 2, key3 stays at 1
    cache.get(&"key");
    cache.get(&"key");
    cache.get(&"key1");

    let mut by_freq: Vec<_> = cache.iter().map(|(k, _, f)| (f, *k)).collect();
    by_freq.sort_unstable();
    for (freq, key) in by_freq {
        println!("{key:>5} freq={freq}");
    }

    cache.insert("key4", "v4".to_string());
    println!("contains key3? {}", cache.contains(&"key3"));

    cache.insert("key5", "v5".to_string());
    println!("contains key4? {}", cache.contains(&"key4"));

    println!("next victim: {:?}", cache.peek_lfu().map(|(k, _)| *k));
    println!("removed key1: {:?}", cache.remove(&"key1"));

    cache.clear();
    println!("after clear: len={} capacity={}", cache.len(), cache.capacity());
}

// Expected output:
//  key3 freq=1
//  key1 freq=2
//   key freq=3
// contains key3? false
// contains key4? false
// next victim: Some("key5")
// removed key1: Some("v2")
// after clear: len=0 capacity=3
