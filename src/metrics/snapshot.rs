/// Point-in-time copy of [`LfuMetrics`](crate::metrics::LfuMetrics) plus
/// the cache's size at the moment it was taken.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LfuMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_updates: u64,
    pub insert_new: u64,

    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub clear_calls: u64,

    pub contains_calls: u64,
    pub contains_hits: u64,
    pub remove_calls: u64,
    pub remove_found: u64,
    pub resize_calls: u64,

    pub pop_lfu_calls: u64,
    pub pop_lfu_found: u64,
    pub peek_lfu_calls: u64,
    pub peek_lfu_found: u64,
    pub frequency_calls: u64,
    pub frequency_found: u64,
    pub reset_frequency_calls: u64,
    pub reset_frequency_found: u64,
    pub increment_frequency_calls: u64,
    pub increment_frequency_found: u64,

    pub cache_len: usize,
    pub capacity: usize,
}

impl LfuMetricsSnapshot {
    /// Fraction of `get` calls that found their key, `0.0` before any call.
    pub fn hit_rate(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_handles_no_traffic() {
        assert_eq!(LfuMetricsSnapshot::default().hit_rate(), 0.0);

        let snapshot = LfuMetricsSnapshot {
            get_calls: 4,
            get_hits: 3,
            get_misses: 1,
            ..Default::default()
        };
        assert!((snapshot.hit_rate() - 0.75).abs() < f64::EPSILON);
    }
}
