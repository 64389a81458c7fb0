//! freqcache: a bounded in-memory cache with an O(1) LFU eviction engine.
//!
//! - [`ds`]: the frequency bucket chain and the arena it is built on.
//! - [`policy::lfu`]: [`LfuCache`](policy::lfu::LfuCache) and its locked
//!   sibling [`ConcurrentLfuCache`](policy::lfu::ConcurrentLfuCache).
//! - [`builder`]: policy-selecting facade (feature `concurrency`).
//! - [`metrics`]: operation counters and a Prometheus text exporter
//!   (feature `metrics`).
//!
//! The library logs through the [`log`] facade and never installs a logger.

#[cfg(feature = "concurrency")]
pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;
