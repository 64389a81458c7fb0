#[cfg(feature = "concurrency")]
pub use crate::builder::{Cache, CacheBuilder, CacheConfig, CachePolicy};
pub use crate::ds::{FrequencyChain, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::LfuMetricsSnapshot;
#[cfg(feature = "concurrency")]
pub use crate::policy::lfu::ConcurrentLfuCache;
pub use crate::policy::lfu::LfuCache;
#[cfg(feature = "concurrency")]
pub use crate::traits::SharedCache;
pub use crate::traits::{CoreCache, LfuCacheTrait, MutableCache};
