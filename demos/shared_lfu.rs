//! Shares one cache between worker threads through the builder facade.
//!
//! Run with: cargo run --example shared_lfu

use std::sync::Arc;
use std::thread;

use freqcache::builder::{CacheBuilder, CacheConfig};

fn main() {
    env_logger::init();

    let config = CacheConfig {
        capacity: 64,
        policy: std::env::var("CACHE_POLICY")
            .ok()
            .and_then(|name| name.parse().ok())
            .unwrap_or_default(),
    };

    let cache = match CacheBuilder::from_config(config).try_build::<u64, String>() {
        Ok(cache) => Arc::new(cache),
        Err(err) => {
            eprintln!("cannot build cache: {err}");
            return;
        },
    };

    let workers: Vec<_> = (0..4u64)
        .map(|worker| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                let mut hits = 0;
                for i in 0..1_000u64 {
                    // Every worker hammers keys 0..8; the rest is one-off traffic.
                    let key = if i % 2 == 0 { i % 8 } else { worker * 10_000 + i };
                    if cache.get(&key).is_some() {
                        hits += 1;
                    } else {
                        cache.insert(key, format!("row-{key}"));
                    }
                }
                hits
            })
        })
        .collect();

    for (worker, handle) in workers.into_iter().enumerate() {
        match handle.join() {
            Ok(hits) => println!("worker {worker}: {hits} hits"),
            Err(_) => eprintln!("worker {worker} panicked"),
        }
    }

    let hot = (0..8u64).filter(|key| cache.contains(key)).count();
    println!("{} policy, len={}/{}, hot keys kept: {hot}/8", cache.policy(), cache.len(), cache.capacity());
}
