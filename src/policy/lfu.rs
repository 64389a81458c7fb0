//! # LFU (Least Frequently Used) Cache Implementation
//!
//! Bounded cache that evicts the least frequently accessed entry when a new
//! key needs room. Every operation is O(1): frequencies live in a
//! [`FrequencyChain`] of buckets instead of a heap or a per-entry counter scan.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                            LfuCache<K, V>                                │
//!   │                                                                          │
//!   │   ┌────────────────────────────────────────────────────────────────────┐ │
//!   │   │  FrequencyChain<K, V>                                              │ │
//!   │   │                                                                    │ │
//!   │   │  index: FxHashMap<K, SlotId> ──► entries (key, value, bucket)      │ │
//!   │   │                                                                    │ │
//!   │   │  head ──► [f=0] ──► [f=1: e7 e3] ──► [f=2: e1] ──► [f=9: e4]       │ │
//!   │   │         sentinel     newest..oldest                                │ │
//!   │   │                                                                    │ │
//!   │   │  Eviction: tail of the bucket right after the sentinel             │ │
//!   │   └────────────────────────────────────────────────────────────────────┘ │
//!   │                                                                          │
//!   │   capacity: usize  (maximum entries after an insert)                     │
//!   └──────────────────────────────────────────────────────────────────────────┘
//!
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                      ConcurrentLfuCache<K, V>                            │
//!   │                                                                          │
//!   │   Arc<Mutex<LfuCache<K, Arc<V>>>>                                        │
//!   │   every call, including get and contains, holds the mutex throughout     │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## LFU vs LRU Comparison
//!
//! ```text
//!   Access pattern: A, B, A, C, A, D, A, E, A, F  (A accessed 5 times, others 1 each)
//!   Cache capacity: 3
//!
//!   LRU (recency-based):
//!   ═══════════════════════════════════════════════════════════════════════════
//!     After A,B,A,C: [A, C, B]  (most recent → least recent)
//!     Insert D:      [D, A, C]  ← B evicted (least recent)
//!     Insert E:      [E, D, A]  ← C evicted
//!     Insert F:      [F, E, D]  ← A evicted! (even though accessed 5 times)
//!
//!   LFU (frequency-based):
//!   ═══════════════════════════════════════════════════════════════════════════
//!     After A,B,A,C: {A:2, B:1, C:1}
//!     Insert D:      {A:3, C:1, D:1}  ← B evicted (freq=1, oldest arrival)
//!     Insert E:      {A:4, D:1, E:1}  ← C evicted (freq=1)
//!     Insert F:      {A:5, E:1, F:1}  ← D evicted (freq=1)
//!
//!   Result: A (hot item) survives in LFU, evicted in LRU!
//! ```
//!
//! ## Eviction Flow
//!
//! ```text
//!   insert(key, value)
//!        │
//!        ▼
//!   ┌────────────────────────────────────────────────────────────────────────┐
//!   │ Key already cached?                                                    │
//!   │                                                                        │
//!   │   YES → Replace value, keep frequency, return old value                │
//!   │   NO  → Continue to capacity check                                     │
//!   └────────────────────────────────────────────────────────────────────────┘
//!        │
//!        ▼
//!   ┌────────────────────────────────────────────────────────────────────────┐
//!   │ len >= capacity?                                                       │
//!   │                                                                        │
//!   │   NO  → Insert at frequency 1                                          │
//!   │   YES → pop_min() until len < capacity (more than one pop only after   │
//!   │         a shrinking resize), then insert at frequency 1                │
//!   │   capacity == 0 → everything is evicted and the insert is dropped      │
//!   └────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Frequency Lifecycle
//!
//! ```text
//!   insert(key, value)          → frequency 1
//!   get / contains / increment  → frequency + 1
//!   insert(existing key, v)     → unchanged
//!   reset_frequency             → frequency 1
//!   remove / pop_lfu / clear    → gone
//! ```
//!
//! ## Operations
//!
//! | Method                    | Complexity | Description                          |
//! |---------------------------|------------|--------------------------------------|
//! | `new(capacity)`           | O(1)       | Create cache with given capacity     |
//! | `insert(k, v)`            | O(1)*      | Insert or replace, may evict         |
//! | `get(&k)`                 | O(1)       | Read value, promotes                 |
//! | `contains(&k)`            | O(1)       | Presence check, promotes on hit      |
//! | `remove(&k)`              | O(1)       | Remove entry by key                  |
//! | `resize(n)`               | O(1)       | Change capacity, evicts lazily       |
//! | `clear()`                 | O(n)       | Remove all entries, keep capacity    |
//! | `pop_lfu()`               | O(1)       | Remove and return LFU entry          |
//! | `peek_lfu()`              | O(1)       | Next victim, no promotion            |
//! | `frequency(&k)`           | O(1)       | Current frequency, no promotion      |
//! | `reset_frequency(&k)`     | O(1)       | Move back to frequency 1             |
//! | `increment_frequency(&k)` | O(1)       | Promote without reading              |
//!
//! \* After a shrinking `resize`, the first insert of a new key pops once per
//! surplus entry. Updates of existing keys never evict.
//!
//! ## Tie-breaking
//!
//! Within one frequency the victim is the entry that reached that frequency
//! first. Eviction order is fully deterministic for a given call sequence.
//!
//! ## Example Usage
//!
//! ```
//! use freqcache::policy::lfu::LfuCache;
//! use freqcache::traits::{CoreCache, LfuCacheTrait};
//!
//! let mut cache = LfuCache::new(3);
//! cache.insert("key", 1);
//! cache.insert("key1", 2);
//! cache.insert("key3", 3);
//!
//! cache.get(&"key");
//! cache.get(&"key");
//! cache.get(&"key1");
//!
//! // key3 is alone at frequency 1.
//! cache.insert("key4", 4);
//! assert!(!cache.contains(&"key3"));
//!
//! // key4 is now alone at frequency 1.
//! cache.insert("key5", 5);
//! assert!(!cache.contains(&"key4"));
//! assert_eq!(cache.frequency(&"key"), Some(3));
//! ```
//!
//! ## Thread Safety
//!
//! - `LfuCache` is not synchronized; it needs `&mut self` for every promoting
//!   call.
//! - `ConcurrentLfuCache` (feature `concurrency`) wraps it in one
//!   `parking_lot::Mutex`. A reader-writer lock would buy nothing: `get` and
//!   `contains` both rewrite the bucket chain.

use std::fmt;
use std::hash::Hash;
use std::mem;
#[cfg(feature = "concurrency")]
use std::sync::Arc;

use log::debug;
#[cfg(feature = "concurrency")]
use parking_lot::Mutex;

use crate::ds::FrequencyChain;
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LfuMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LfuMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsRecorder, LfuMetricsReadRecorder, LfuMetricsRecorder, MetricsSnapshotProvider,
};
#[cfg(feature = "concurrency")]
use crate::traits::SharedCache;
use crate::traits::{CoreCache, LfuCacheTrait, MutableCache};

/// Capacity used by [`Default`] and by the facade's default configuration.
pub const DEFAULT_CAPACITY: usize = 1024;

// Larger capacities grow the index on demand instead of reserving up front.
const MAX_PREALLOC: usize = 1 << 16;

/// LFU (Least Frequently Used) Cache.
///
/// Evicts the entry with the lowest access frequency when a new key needs
/// room. See the module-level documentation for details.
pub struct LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    chain: FrequencyChain<K, V>,
    capacity: usize,
    #[cfg(feature = "metrics")]
    metrics: LfuMetrics,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// A capacity of 0 is accepted: such a cache drops every new key.
    ///
    /// # Example
    ///
    /// ```
    /// use freqcache::policy::lfu::LfuCache;
    /// use freqcache::traits::CoreCache;
    ///
    /// let cache: LfuCache<u64, String> = LfuCache::new(100);
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: usize) -> Self {
        LfuCache {
            chain: FrequencyChain::with_capacity(capacity.min(MAX_PREALLOC)),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: LfuMetrics::default(),
        }
    }

    /// Value for `key` without counting an access.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.chain.peek(key)
    }

    /// Lowest frequency currently held, i.e. the frequency of the next victim.
    pub fn min_frequency(&self) -> Option<u64> {
        self.chain.min_freq()
    }

    /// Entries as `(key, value, frequency)`, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V, u64)> {
        self.chain.iter()
    }

    /// Cross-checks the bucket chain against the lookup index.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.chain.check_invariants()
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.chain.debug_validate_invariants();
    }

    // Evicts from the lowest bucket until `len <= limit`.
    fn evict_down_to(&mut self, limit: usize) {
        if self.chain.len() <= limit {
            return;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        while self.chain.len() > limit {
            let Some((_key, _value, freq)) = self.chain.pop_min() else {
                break;
            };

            #[cfg(feature = "metrics")]
            self.metrics.record_evicted_entry();

            debug!(
                "lfu evicted entry at frequency {freq} ({} left, capacity {})",
                self.chain.len(),
                self.capacity
            );
        }
    }
}

impl<K, V> CoreCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(slot) = self.chain.peek_mut(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            // Membership is untouched even when over a shrunk limit.
            return Some(mem::replace(slot, value));
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        self.evict_down_to(self.capacity.saturating_sub(1));
        if self.capacity == 0 {
            debug!("lfu insert dropped: capacity is 0");
            return None;
        }

        self.chain.insert(key, value);
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        match self.chain.touch_get(key) {
            Some((value, _freq)) => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_hit();
                Some(value)
            },
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_miss();
                None
            },
        }
    }

    fn contains(&mut self, key: &K) -> bool {
        let hit = self.chain.touch(key).is_some();

        #[cfg(feature = "metrics")]
        if hit {
            self.metrics.record_contains_hit();
        } else {
            self.metrics.record_contains_miss();
        }

        hit
    }

    fn len(&self) -> usize {
        self.chain.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn resize(&mut self, capacity: usize) {
        #[cfg(feature = "metrics")]
        self.metrics.record_resize();

        debug!(
            "lfu capacity {} -> {capacity} ({} cached)",
            self.capacity,
            self.chain.len()
        );
        self.capacity = capacity;
    }

    fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        debug!("lfu cleared {} entries", self.chain.len());
        self.chain.clear();
    }
}

impl<K, V> MutableCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_call();

        let (value, _freq) = self.chain.remove(key)?;

        #[cfg(feature = "metrics")]
        self.metrics.record_remove_found();

        Some(value)
    }
}

impl<K, V> LfuCacheTrait<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn pop_lfu(&mut self) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lfu_call();

        let (key, value, _freq) = self.chain.pop_min()?;

        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lfu_found();

        Some((key, value))
    }

    fn peek_lfu(&self) -> Option<(&K, &V)> {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_peek_lfu_call();

        let (key, value, _freq) = self.chain.peek_min()?;

        #[cfg(feature = "metrics")]
        (&self.metrics).record_peek_lfu_found();

        Some((key, value))
    }

    fn frequency(&self, key: &K) -> Option<u64> {
        #[cfg(feature = "metrics")]
        (&self.metrics).record_frequency_call();

        let freq = self.chain.frequency(key);

        #[cfg(feature = "metrics")]
        if freq.is_some() {
            (&self.metrics).record_frequency_found();
        }

        freq
    }

    fn reset_frequency(&mut self, key: &K) -> Option<u64> {
        #[cfg(feature = "metrics")]
        self.metrics.record_reset_frequency_call();

        let old = self.chain.reset(key)?;

        #[cfg(feature = "metrics")]
        self.metrics.record_reset_frequency_found();

        Some(old)
    }

    fn increment_frequency(&mut self, key: &K) -> Option<u64> {
        #[cfg(feature = "metrics")]
        self.metrics.record_increment_frequency_call();

        let freq = self.chain.touch(key)?;

        #[cfg(feature = "metrics")]
        self.metrics.record_increment_frequency_found();

        Some(freq)
    }
}

impl<K, V> fmt::Debug for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCache")
            .field("len", &self.chain.len())
            .field("capacity", &self.capacity)
            .field("min_frequency", &self.chain.min_freq())
            .finish_non_exhaustive()
    }
}

impl<K, V> Default for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LFU cache with [`DEFAULT_CAPACITY`].
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<K, V> Extend<(K, V)> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> LfuMetricsSnapshot {
        LfuMetricsSnapshot {
            get_calls: self.metrics.get_calls,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            insert_calls: self.metrics.insert_calls,
            insert_updates: self.metrics.insert_updates,
            insert_new: self.metrics.insert_new,
            evict_calls: self.metrics.evict_calls,
            evicted_entries: self.metrics.evicted_entries,
            clear_calls: self.metrics.clear_calls,
            contains_calls: self.metrics.contains_calls,
            contains_hits: self.metrics.contains_hits,
            remove_calls: self.metrics.remove_calls,
            remove_found: self.metrics.remove_found,
            resize_calls: self.metrics.resize_calls,
            pop_lfu_calls: self.metrics.pop_lfu_calls,
            pop_lfu_found: self.metrics.pop_lfu_found,
            peek_lfu_calls: self.metrics.peek_lfu_calls.get(),
            peek_lfu_found: self.metrics.peek_lfu_found.get(),
            frequency_calls: self.metrics.frequency_calls.get(),
            frequency_found: self.metrics.frequency_found.get(),
            reset_frequency_calls: self.metrics.reset_frequency_calls,
            reset_frequency_found: self.metrics.reset_frequency_found,
            increment_frequency_calls: self.metrics.increment_frequency_calls,
            increment_frequency_found: self.metrics.increment_frequency_found,
            cache_len: self.chain.len(),
            capacity: self.capacity,
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<LfuMetricsSnapshot> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> LfuMetricsSnapshot {
        self.metrics_snapshot()
    }
}

/// Thread-safe LFU cache: an [`LfuCache`] behind one exclusive lock.
///
/// Values are stored as `Arc<V>` and handed out as cheap clones. Cloning
/// the cache itself shares the same underlying storage.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
///
/// use freqcache::policy::lfu::ConcurrentLfuCache;
///
/// let cache: ConcurrentLfuCache<u32, String> = ConcurrentLfuCache::new(64);
/// let handles: Vec<_> = (0..4)
///     .map(|t| {
///         let cache = cache.clone();
///         thread::spawn(move || {
///             for i in 0..32 {
///                 cache.insert(t * 100 + i, format!("v{i}"));
///             }
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
/// assert!(cache.len() <= 64);
/// ```
#[cfg(feature = "concurrency")]
pub struct ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: Arc<Mutex<LfuCache<K, Arc<V>>>>,
}

#[cfg(feature = "concurrency")]
impl<K, V> Clone for ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> fmt::Debug for ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.lock();
        f.debug_struct("ConcurrentLfuCache")
            .field("len", &cache.len())
            .field("capacity", &cache.capacity())
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> Default for ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Send + Sync,
{
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Send + Sync,
{
    pub fn new(capacity: usize) -> Self {
        ConcurrentLfuCache {
            inner: Arc::new(Mutex::new(LfuCache::new(capacity))),
        }
    }

    /// Inserts a value, wrapping it in `Arc<V>` before taking the lock.
    ///
    /// Returns the previous value if the key was cached.
    pub fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        let value = Arc::new(value);
        self.inner.lock().insert(key, value)
    }

    /// Inserts an already shared value.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use freqcache::policy::lfu::ConcurrentLfuCache;
    ///
    /// let cache: ConcurrentLfuCache<u32, String> = ConcurrentLfuCache::new(8);
    /// let shared = Arc::new("page".to_string());
    /// cache.insert_arc(1, Arc::clone(&shared));
    ///
    /// assert!(Arc::ptr_eq(&shared, &cache.get(&1).unwrap()));
    /// ```
    pub fn insert_arc(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        self.inner.lock().insert(key, value)
    }

    /// Looks a key up, promoting it on a hit.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().get(key).map(Arc::clone)
    }

    /// Presence check, promoting the key on a hit exactly like [`get`](Self::get).
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().remove(key)
    }

    /// Changes the capacity. Surplus entries are evicted by the next insert
    /// of a new key.
    pub fn resize(&self, capacity: usize) {
        self.inner.lock().resize(capacity);
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.inner.lock().frequency(key)
    }

    pub fn reset_frequency(&self, key: &K) -> Option<u64> {
        self.inner.lock().reset_frequency(key)
    }

    pub fn pop_lfu(&self) -> Option<(K, Arc<V>)> {
        self.inner.lock().pop_lfu()
    }

    /// Next eviction victim. The key is cloned out of the lock.
    pub fn peek_lfu(&self) -> Option<(K, Arc<V>)> {
        let cache = self.inner.lock();
        cache
            .peek_lfu()
            .map(|(key, value)| (key.clone(), Arc::clone(value)))
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.inner.lock().check_invariants()
    }

    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> LfuMetricsSnapshot {
        self.inner.lock().metrics_snapshot()
    }
}

#[cfg(feature = "concurrency")]
impl<K, V> SharedCache<K, V> for ConcurrentLfuCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Send + Sync,
{
    fn get(&self, key: &K) -> Option<Arc<V>> {
        ConcurrentLfuCache::get(self, key)
    }

    fn insert(&self, key: K, value: V) {
        ConcurrentLfuCache::insert(self, key, value);
    }

    fn remove(&self, key: &K) -> bool {
        ConcurrentLfuCache::remove(self, key).is_some()
    }

    fn contains(&self, key: &K) -> bool {
        ConcurrentLfuCache::contains(self, key)
    }

    fn resize(&self, capacity: usize) {
        ConcurrentLfuCache::resize(self, capacity);
    }

    fn clear(&self) {
        ConcurrentLfuCache::clear(self);
    }

    fn len(&self) -> usize {
        ConcurrentLfuCache::len(self)
    }

    fn capacity(&self) -> usize {
        ConcurrentLfuCache::capacity(self)
    }
}
