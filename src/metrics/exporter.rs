use std::io::Write;
use std::sync::Mutex;

use crate::metrics::snapshot::LfuMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for cache metrics snapshots.
///
/// Writes the Prometheus text exposition format so the output can be served
/// from a scrape endpoint or forwarded to an OpenTelemetry collector.
///
/// ```
/// use freqcache::metrics::{LfuMetricsSnapshot, MetricsExporter, PrometheusTextExporter};
///
/// let exporter = PrometheusTextExporter::new("sessions", Vec::new());
/// exporter.export(&LfuMetricsSnapshot { get_hits: 2, ..Default::default() });
///
/// let text = String::from_utf8(exporter.into_inner()).unwrap();
/// assert!(text.contains("sessions_get_hits_total 2"));
/// ```
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send + Sync> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send + Sync> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Hands back the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .expect("metrics exporter writer poisoned")
    }

    fn write_counter(&self, name: &str, value: u64) {
        let mut writer = self
            .writer
            .lock()
            .expect("metrics exporter writer poisoned");
        let _ = writeln!(writer, "# TYPE {} counter", name);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_gauge(&self, name: &str, value: u64) {
        let mut writer = self
            .writer
            .lock()
            .expect("metrics exporter writer poisoned");
        let _ = writeln!(writer, "# TYPE {} gauge", name);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send + Sync> MetricsExporter<LfuMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &LfuMetricsSnapshot) {
        let counters = [
            ("get_calls_total", snapshot.get_calls),
            ("get_hits_total", snapshot.get_hits),
            ("get_misses_total", snapshot.get_misses),
            ("insert_calls_total", snapshot.insert_calls),
            ("insert_updates_total", snapshot.insert_updates),
            ("insert_new_total", snapshot.insert_new),
            ("evict_calls_total", snapshot.evict_calls),
            ("evicted_entries_total", snapshot.evicted_entries),
            ("clear_calls_total", snapshot.clear_calls),
            ("contains_calls_total", snapshot.contains_calls),
            ("contains_hits_total", snapshot.contains_hits),
            ("remove_calls_total", snapshot.remove_calls),
            ("remove_found_total", snapshot.remove_found),
            ("resize_calls_total", snapshot.resize_calls),
            ("pop_lfu_calls_total", snapshot.pop_lfu_calls),
            ("pop_lfu_found_total", snapshot.pop_lfu_found),
            ("peek_lfu_calls_total", snapshot.peek_lfu_calls),
            ("peek_lfu_found_total", snapshot.peek_lfu_found),
            ("frequency_calls_total", snapshot.frequency_calls),
            ("frequency_found_total", snapshot.frequency_found),
            ("reset_frequency_calls_total", snapshot.reset_frequency_calls),
            ("reset_frequency_found_total", snapshot.reset_frequency_found),
            (
                "increment_frequency_calls_total",
                snapshot.increment_frequency_calls,
            ),
            (
                "increment_frequency_found_total",
                snapshot.increment_frequency_found,
            ),
        ];
        for (suffix, value) in counters {
            self.write_counter(&self.metric_name(suffix), value);
        }
        self.write_gauge(&self.metric_name("cache_len"), snapshot.cache_len as u64);
        self.write_gauge(&self.metric_name("capacity"), snapshot.capacity as u64);
    }
}
