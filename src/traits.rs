//! # Cache Trait Hierarchy
//!
//! Defines the operation sets a cache exposes, split by how the cache is
//! owned: `&mut self` traits for a cache owned by one thread, and
//! [`SharedCache`] for a cache shared behind a lock.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │            CoreCache<K, V>              │
//!   │                                         │
//!   │  insert(&mut, K, V) → Option<V>         │
//!   │  get(&mut, &K) → Option<&V>             │
//!   │  contains(&mut, &K) → bool              │
//!   │  len / is_empty / capacity              │
//!   │  resize(&mut, usize)                    │
//!   │  clear(&mut)                            │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │          MutableCache<K, V>             │
//!   │                                         │
//!   │  remove(&K) → Option<V>                 │
//!   │  remove_batch(&[K])                     │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │          LfuCacheTrait<K, V>            │
//!   │                                         │
//!   │  pop_lfu() → (K, V)                     │
//!   │  peek_lfu() → (&K, &V)                  │
//!   │  frequency(&K) → u64                    │
//!   │  reset_frequency(&K)                    │
//!   │  increment_frequency(&K)                │
//!   └─────────────────────────────────────────┘
//!
//!   ┌─────────────────────────────────────────┐
//!   │     SharedCache<K, V>: Send + Sync      │
//!   │                                         │
//!   │  every method takes &self               │
//!   │  get → Option<Arc<V>>, remove → bool    │
//!   │  object safe: Box<dyn SharedCache<..>>  │
//!   └─────────────────────────────────────────┘
//! ```
//!
//! ## Access semantics
//!
//! Both `get` and `contains` count as an access: a hit promotes the key one
//! frequency up. `insert` of an existing key replaces the value but leaves
//! the frequency alone. Use
//! [`LfuCacheTrait::frequency`] to inspect a key without touching it.
//!
//! ## Example Usage
//!
//! ```
//! use freqcache::policy::lfu::LfuCache;
//! use freqcache::traits::{CoreCache, LfuCacheTrait, MutableCache};
//!
//! fn warm<C: CoreCache<u64, String>>(cache: &mut C, rows: &[(u64, &str)]) {
//!     for (key, value) in rows {
//!         cache.insert(*key, value.to_string());
//!     }
//! }
//!
//! let mut cache = LfuCache::new(8);
//! warm(&mut cache, &[(1, "one"), (2, "two"), (3, "three")]);
//!
//! cache.get(&1);
//! assert_eq!(cache.frequency(&1), Some(2));
//! assert_eq!(cache.remove_batch(&[2, 99]), vec![Some("two".to_string()), None]);
//! assert_eq!(cache.pop_lfu(), Some((3, "three".to_string())));
//! ```

use std::sync::Arc;

/// Operations every cache supports.
///
/// # Example
///
/// ```
/// use freqcache::policy::lfu::LfuCache;
/// use freqcache::traits::CoreCache;
///
/// let mut cache = LfuCache::new(2);
/// assert_eq!(cache.insert("a", 1), None);
/// assert_eq!(cache.insert("a", 2), Some(1));
/// assert_eq!(cache.get(&"a"), Some(&2));
/// assert!(cache.contains(&"a"));
/// assert_eq!(cache.len(), 1);
/// assert_eq!(cache.capacity(), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts a key-value pair, returning the previous value if the key was
    /// already cached.
    ///
    /// A new key may first evict entries so the cache stays within
    /// [`capacity`](Self::capacity).
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Looks a key up, counting it as an access.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Checks whether a key is cached, counting a hit as an access.
    fn contains(&mut self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries kept after an insert.
    fn capacity(&self) -> usize;

    /// Changes the capacity. Shrinking does not evict on its own; the next
    /// insert of a new key brings the cache back under the limit.
    fn resize(&mut self, capacity: usize);

    /// Removes all entries. The capacity is kept.
    fn clear(&mut self);
}

/// Caches that support arbitrary key-based removal.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes a key, returning its value if it was cached.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes several keys. The result lines up with `keys`.
    ///
    /// # Example
    ///
    /// ```
    /// use freqcache::policy::lfu::LfuCache;
    /// use freqcache::traits::{CoreCache, MutableCache};
    ///
    /// let mut cache = LfuCache::new(10);
    /// cache.insert(1, "one");
    /// cache.insert(3, "three");
    ///
    /// assert_eq!(cache.remove_batch(&[1, 2, 3]), vec![Some("one"), None, Some("three")]);
    /// assert!(cache.is_empty());
    /// ```
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|k| self.remove(k)).collect()
    }
}

/// LFU-specific operations that respect frequency order.
///
/// Among entries of equal frequency the one that reached that frequency
/// first is the next victim.
pub trait LfuCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the least frequently used entry.
    ///
    /// # Example
    ///
    /// ```
    /// use freqcache::policy::lfu::LfuCache;
    /// use freqcache::traits::{CoreCache, LfuCacheTrait};
    ///
    /// let mut cache = LfuCache::new(10);
    /// cache.insert(1, "first");
    /// cache.insert(2, "second");
    /// cache.get(&1);
    ///
    /// assert_eq!(cache.pop_lfu(), Some((2, "second")));
    /// ```
    fn pop_lfu(&mut self) -> Option<(K, V)>;

    /// Next eviction victim, without removing or promoting it.
    fn peek_lfu(&self) -> Option<(&K, &V)>;

    /// Access frequency of a key, without promoting it.
    fn frequency(&self, key: &K) -> Option<u64>;

    /// Drops a key back to frequency 1 and returns its previous frequency.
    ///
    /// # Example
    ///
    /// ```
    /// use freqcache::policy::lfu::LfuCache;
    /// use freqcache::traits::{CoreCache, LfuCacheTrait};
    ///
    /// let mut cache = LfuCache::new(10);
    /// cache.insert("k", ());
    /// cache.get(&"k");
    /// cache.get(&"k");
    ///
    /// assert_eq!(cache.reset_frequency(&"k"), Some(3));
    /// assert_eq!(cache.frequency(&"k"), Some(1));
    /// ```
    fn reset_frequency(&mut self, key: &K) -> Option<u64>;

    /// Promotes a key without reading its value. Returns the new frequency.
    fn increment_frequency(&mut self, key: &K) -> Option<u64>;
}

/// Object-safe contract for a cache shared between threads.
///
/// Every call takes `&self` and completes under the implementation's own
/// synchronization. Values come back as `Arc<V>` so nothing is copied.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use freqcache::policy::lfu::ConcurrentLfuCache;
/// use freqcache::traits::SharedCache;
///
/// let cache: Box<dyn SharedCache<u64, String>> = Box::new(ConcurrentLfuCache::new(4));
/// cache.insert(1, "one".to_string());
///
/// assert_eq!(cache.get(&1).as_deref(), Some(&"one".to_string()));
/// assert!(cache.remove(&1));
/// assert!(!cache.contains(&1));
/// ```
pub trait SharedCache<K, V>: Send + Sync {
    /// Looks a key up, counting it as an access.
    fn get(&self, key: &K) -> Option<Arc<V>>;

    /// Inserts or replaces a value. Replacing keeps the key's frequency.
    fn insert(&self, key: K, value: V);

    /// Removes a key. Returns whether it was cached.
    fn remove(&self, key: &K) -> bool;

    /// Checks whether a key is cached, counting a hit as an access.
    fn contains(&self, key: &K) -> bool;

    fn resize(&self, capacity: usize);

    fn clear(&self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;
}
