//! Policy-selecting cache facade.
//!
//! [`CacheBuilder`] maps a [`CachePolicy`] and a capacity onto a concrete
//! engine and hands back a [`Cache`] that forwards every call to it through
//! the [`SharedCache`] contract. The facade holds no eviction logic.
//!
//! ## Example
//!
//! ```rust
//! use freqcache::builder::{CacheBuilder, CachePolicy};
//!
//! let cache = CacheBuilder::new(100)
//!     .policy(CachePolicy::Lfu)
//!     .build::<u64, String>();
//! cache.insert(1, "hello".to_string());
//! assert_eq!(cache.get(&1).as_deref(), Some(&"hello".to_string()));
//! ```
//!
//! Policies can also come from configuration text:
//!
//! ```rust
//! use freqcache::builder::{CacheBuilder, CacheConfig, CachePolicy};
//!
//! let config = CacheConfig {
//!     capacity: 64,
//!     policy: "lfu".parse().unwrap(),
//! };
//! let cache = CacheBuilder::from_config(config).try_build::<String, Vec<u8>>().unwrap();
//! assert_eq!(cache.policy(), CachePolicy::Lfu);
//! ```

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use std::sync::Arc;

use log::debug;

use crate::error::ConfigError;
use crate::policy::lfu::{ConcurrentLfuCache, DEFAULT_CAPACITY};
use crate::traits::SharedCache;

/// Available cache eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CachePolicy {
    /// Least Frequently Used eviction (frequency buckets).
    #[default]
    Lfu,
    /// Frequency-sketch admission in front of LFU. Selectable in
    /// configuration, but no engine ships with this crate.
    TinyLfu,
}

impl CachePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            CachePolicy::Lfu => "lfu",
            CachePolicy::TinyLfu => "tiny-lfu",
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CachePolicy {
    type Err = ConfigError;

    /// Accepts `lfu` and `tiny-lfu` (also `tinylfu`, `tiny_lfu`), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lfu" => Ok(CachePolicy::Lfu),
            "tiny-lfu" | "tinylfu" | "tiny_lfu" => Ok(CachePolicy::TinyLfu),
            other => Err(ConfigError::new(format!("unknown cache policy '{other}'"))),
        }
    }
}

/// Facade configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries. Must be greater than zero.
    pub capacity: usize,
    pub policy: CachePolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            policy: CachePolicy::Lfu,
        }
    }
}

/// Cache handle returned by [`CacheBuilder`].
///
/// Thread-safe; every method takes `&self`. Values are returned as `Arc<V>`.
pub struct Cache<K, V> {
    inner: Box<dyn SharedCache<K, V>>,
    policy: CachePolicy,
}

impl<K, V> Cache<K, V> {
    /// Looks a key up, counting it as an access.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.inner.get(key)
    }

    /// Inserts or replaces a value.
    pub fn insert(&self, key: K, value: V) {
        self.inner.insert(key, value);
    }

    /// Removes a key. Returns whether it was cached.
    pub fn remove(&self, key: &K) -> bool {
        self.inner.remove(key)
    }

    /// Presence check. A hit counts as an access.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.contains(key)
    }

    pub fn resize(&self, capacity: usize) {
        self.inner.resize(capacity);
    }

    pub fn clear(&self) {
        self.inner.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Policy the cache was built with.
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }
}

impl<K, V> fmt::Debug for Cache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("policy", &self.policy)
            .field("len", &self.inner.len())
            .field("capacity", &self.inner.capacity())
            .finish()
    }
}

/// Builder for creating cache instances.
#[derive(Debug, Clone)]
pub struct CacheBuilder {
    config: CacheConfig,
}

impl CacheBuilder {
    /// Create a new cache builder with the specified capacity and the
    /// default policy.
    pub fn new(capacity: usize) -> Self {
        Self {
            config: CacheConfig {
                capacity,
                ..CacheConfig::default()
            },
        }
    }

    pub fn from_config(config: CacheConfig) -> Self {
        Self { config }
    }

    pub fn policy(mut self, policy: CachePolicy) -> Self {
        self.config.policy = policy;
        self
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Builds the cache, rejecting a zero capacity and policies without an
    /// engine.
    pub fn try_build<K, V>(self) -> Result<Cache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone + Send + 'static,
        V: Send + Sync + 'static,
    {
        let CacheConfig { capacity, policy } = self.config;
        if capacity == 0 {
            return Err(ConfigError::new("cache capacity must be greater than zero"));
        }

        let inner: Box<dyn SharedCache<K, V>> = match policy {
            CachePolicy::Lfu => Box::new(ConcurrentLfuCache::new(capacity)),
            CachePolicy::TinyLfu => {
                return Err(ConfigError::new(
                    "policy 'tiny-lfu' has no engine in this build",
                ));
            },
        };

        debug!("built {policy} cache with capacity {capacity}");
        Ok(Cache { inner, policy })
    }

    /// Builds the cache.
    ///
    /// # Panics
    ///
    /// Panics on a configuration [`try_build`](Self::try_build) rejects.
    ///
    /// # Example
    ///
    /// ```rust
    /// use freqcache::builder::CacheBuilder;
    ///
    /// let cache = CacheBuilder::new(2).build::<u64, &str>();
    /// cache.insert(1, "one");
    /// cache.insert(2, "two");
    /// cache.get(&1);
    /// cache.insert(3, "three"); // evicts key 2
    ///
    /// assert!(!cache.contains(&2));
    /// assert_eq!(cache.len(), 2);
    /// ```
    pub fn build<K, V>(self) -> Cache<K, V>
    where
        K: Eq + Hash + Clone + Send + 'static,
        V: Send + Sync + 'static,
    {
        match self.try_build() {
            Ok(cache) => cache,
            Err(err) => panic!("invalid cache configuration: {err}"),
        }
    }
}

impl Default for CacheBuilder {
    fn default() -> Self {
        Self::from_config(CacheConfig::default())
    }
}
