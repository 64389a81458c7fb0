use crate::metrics::cell::MetricsCell;
use crate::metrics::traits::{CoreMetricsRecorder, LfuMetricsReadRecorder, LfuMetricsRecorder};

#[derive(Debug, Default)]
pub struct LfuMetrics {
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
    pub peek_lfu_calls: MetricsCell,
    pub peek_lfu_found: MetricsCell,
    pub frequency_calls: MetricsCell,
    pub frequency_found: MetricsCell,
    pub reset_frequency_calls: u64,
    pub reset_frequency_found: u64,
    pub increment_frequency_calls: u64,
    pub increment_frequency_found: u64,
}

impl CoreMetricsRecorder for LfuMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    fn record_evict_call(&mut self) {
        self.evict_calls += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl LfuMetricsRecorder for LfuMetrics {
    fn record_contains_hit(&mut self) {
        self.contains_calls += 1;
        self.contains_hits += 1;
    }

    fn record_contains_miss(&mut self) {
        self.contains_calls += 1;
    }

    fn record_remove_call(&mut self) {
        self.remove_calls += 1;
    }

    fn record_remove_found(&mut self) {
        self.remove_found += 1;
    }

    fn record_resize(&mut self) {
        self.resize_calls += 1;
    }

    fn record_pop_lfu_call(&mut self) {
        self.pop_lfu_calls += 1;
    }

    fn record_pop_lfu_found(&mut self) {
        self.pop_lfu_found += 1;
    }

    fn record_reset_frequency_call(&mut self) {
        self.reset_frequency_calls += 1;
    }

    fn record_reset_frequency_found(&mut self) {
        self.reset_frequency_found += 1;
    }

    fn record_increment_frequency_call(&mut self) {
        self.increment_frequency_calls += 1;
    }

    fn record_increment_frequency_found(&mut self) {
        self.increment_frequency_found += 1;
    }
}

impl LfuMetricsReadRecorder for &LfuMetrics {
    fn record_peek_lfu_call(&self) {
        self.peek_lfu_calls.incr();
    }

    fn record_peek_lfu_found(&self) {
        self.peek_lfu_found.incr();
    }

    fn record_frequency_call(&self) {
        self.frequency_calls.incr();
    }

    fn record_frequency_found(&self) {
        self.frequency_found.incr();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_hit_and_miss_both_count_as_calls() {
        let mut metrics = LfuMetrics::default();
        metrics.record_get_hit();
        metrics.record_get_miss();
        metrics.record_get_miss();
        assert_eq!(metrics.get_calls, 3);
        assert_eq!(metrics.get_hits, 1);
        assert_eq!(metrics.get_misses, 2);
    }

    #[test]
    fn contains_tracks_hits_separately() {
        let mut metrics = LfuMetrics::default();
        metrics.record_contains_hit();
        metrics.record_contains_miss();
        assert_eq!(metrics.contains_calls, 2);
        assert_eq!(metrics.contains_hits, 1);
    }

    #[test]
    fn read_recorder_works_through_shared_reference() {
        let metrics = LfuMetrics::default();
        (&metrics).record_peek_lfu_call();
        (&metrics).record_frequency_call();
        (&metrics).record_frequency_found();
        assert_eq!(metrics.peek_lfu_calls.get(), 1);
        assert_eq!(metrics.peek_lfu_found.get(), 0);
        assert_eq!(metrics.frequency_found.get(), 1);
    }
}
