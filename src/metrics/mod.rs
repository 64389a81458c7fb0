//! Operation counters for the LFU engine (feature `metrics`).
//!
//! Recording, snapshotting and export are split into separate traits so the
//! engine only ever writes counters. See [`traits`] for the hierarchy.

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use cell::MetricsCell;
pub use exporter::PrometheusTextExporter;
pub use metrics_impl::LfuMetrics;
pub use snapshot::LfuMetricsSnapshot;
pub use traits::{
    CoreMetricsRecorder, LfuMetricsReadRecorder, LfuMetricsRecorder, MetricsExporter,
    MetricsSnapshotProvider,
};
