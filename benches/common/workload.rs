//! Key streams for hit-rate benchmarks.
//!
//! Seeded through `rand::rngs::StdRng` so every run replays the same keys.

use std::sync::Arc;

use freqcache::traits::CoreCache;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy)]
pub enum Workload {
    /// Uniform random keys in `[0, universe)`.
    Uniform,
    /// `hot_prob` of accesses land in the first `hot_fraction` of the universe.
    Hotset { hot_fraction: f64, hot_prob: f64 },
    /// Sequential scan in `[0, universe)`. Worst case for frequency-based eviction.
    Scan,
}

#[derive(Debug, Clone, Copy)]
pub struct WorkloadSpec {
    pub universe: u64,
    pub workload: Workload,
    pub seed: u64,
}

impl WorkloadSpec {
    pub fn generator(self) -> WorkloadGenerator {
        WorkloadGenerator {
            universe: self.universe.max(1),
            workload: self.workload,
            rng: StdRng::seed_from_u64(self.seed),
            scan_pos: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkloadGenerator {
    universe: u64,
    workload: Workload,
    rng: StdRng,
    scan_pos: u64,
}

impl WorkloadGenerator {
    pub fn next_key(&mut self) -> u64 {
        match self.workload {
            Workload::Uniform => self.rng.gen_range(0..self.universe),
            Workload::Hotset {
                hot_fraction,
                hot_prob,
            } => {
                let hot_size = ((self.universe as f64) * hot_fraction.clamp(0.0, 1.0)).round() as u64;
                let hot_size = hot_size.clamp(1, self.universe);
                if hot_size == self.universe || self.rng.gen_bool(hot_prob.clamp(0.0, 1.0)) {
                    self.rng.gen_range(0..hot_size)
                } else {
                    self.rng.gen_range(hot_size..self.universe)
                }
            },
            Workload::Scan => {
                let key = self.scan_pos;
                self.scan_pos = (self.scan_pos + 1) % self.universe;
                key
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HitRate {
    pub hits: u64,
    pub misses: u64,
}

impl HitRate {
    pub fn hit_rate(self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Drives `cache` as a read-through store: lookup, insert on miss.
pub fn run_hit_rate<C, V, F>(
    cache: &mut C,
    generator: &mut WorkloadGenerator,
    operations: usize,
    value_for_key: F,
) -> HitRate
where
    C: CoreCache<u64, Arc<V>>,
    F: Fn(u64) -> Arc<V>,
{
    let mut rate = HitRate::default();
    for _ in 0..operations {
        let key = generator.next_key();
        if cache.get(&key).is_some() {
            rate.hits += 1;
        } else {
            rate.misses += 1;
            cache.insert(key, value_for_key(key));
        }
    }
    rate
}
