//! Frequency-ordered bucket chain for O(1) LFU bookkeeping.
//!
//! Owns every cached `(key, value)` pair together with the structure used to
//! pick eviction victims: a doubly linked chain of frequency buckets anchored
//! at a permanent sentinel. Entries and buckets live in [`SlotArena`]s and
//! refer to each other through [`SlotId`] handles, so an entry's back
//! reference to its bucket never owns anything.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────────┐
//! │                        FrequencyChain<K, V> Layout                         │
//! │                                                                            │
//! │   index: FxHashMap<K, SlotId>         entries: SlotArena<Entry<K, V>>      │
//! │   ┌──────────┬────────┐               ┌──────┬──────────────────────────┐  │
//! │   │  "page"  │  e0    │──────────────►│  e0  │ key, value, bucket=b2    │  │
//! │   │  "row"   │  e1    │──────────────►│  e1  │ key, value, bucket=b1    │  │
//! │   │  "blob"  │  e2    │──────────────►│  e2  │ key, value, bucket=b1    │  │
//! │   └──────────┴────────┘               └──────┴──────────────────────────┘  │
//! │                                                                            │
//! │   buckets: SlotArena<Bucket>                                               │
//! │                                                                            │
//! │   head                                                                     │
//! │    │                                                                       │
//! │    ▼                                                                       │
//! │   ┌────────┐ next ┌─────────────────────┐ next ┌──────────────┐            │
//! │   │ b0 f=0 │─────►│ b1 f=1 [e2] ◄► [e1] │─────►│ b2 f=2 [e0]  │──► None    │
//! │   │sentinel│◄─────│      newest  oldest │◄─────│              │            │
//! │   └────────┘ prev └─────────────────────┘ prev └──────────────┘            │
//! └────────────────────────────────────────────────────────────────────────────┘
//!
//! Promotion (touch)
//! ─────────────────
//!   touch("row"):
//!     1. index → e1, e1.bucket → b1 (f=1)
//!     2. b1.next is b2 with f=2 == 1+1 → reuse it
//!        (otherwise splice a fresh f=2 bucket between b1 and b1.next)
//!     3. unlink e1 from b1's member list, push it to the front of b2
//!     4. e1.bucket = b2
//!     5. b1 still holds e2 → stays linked (an empty bucket is unlinked)
//!
//! Eviction (pop_min)
//! ──────────────────
//!   pop_min():
//!     1. head.next is the lowest occupied frequency
//!     2. take that bucket's tail (the oldest arrival)
//!     3. drop it from the bucket, the arena and the index
//!     4. unlink the bucket if it became empty
//! ```
//!
//! ## Invariants
//!
//! - Frequencies strictly increase along the chain starting from the
//!   sentinel (frequency 0, never holds entries, never unlinked).
//! - No linked bucket is empty, and no unlinked bucket is kept allocated.
//! - The index and the union of all bucket member lists hold exactly the
//!   same keys, each resolving to the same entry slot.
//! - An entry's frequency is the frequency of the bucket it points at.
//!
//! Buckets are only ever created one step above an existing bucket (or at
//! frequency 1 right after the sentinel), so adjacent frequencies usually
//! differ by one; removals can leave gaps.
//!
//! ## Example Usage
//!
//! ```
//! use freqcache::ds::FrequencyChain;
//!
//! let mut chain = FrequencyChain::new();
//! chain.insert("a", 1);
//! chain.insert("b", 2);
//! chain.insert("c", 3);
//!
//! chain.touch(&"a");
//! chain.touch(&"a");
//! chain.touch(&"b");
//! assert_eq!(chain.bucket_frequencies(), vec![1, 2, 3]);
//!
//! // "c" is alone at the lowest frequency.
//! assert_eq!(chain.pop_min(), Some(("c", 3, 1)));
//! assert_eq!(chain.min_freq(), Some(2));
//! ```
//!
//! ## Thread Safety
//!
//! Not synchronized. [`ConcurrentLfuCache`](crate::policy::lfu::ConcurrentLfuCache)
//! puts the whole chain behind one mutex.

use std::hash::Hash;

use log::trace;
use rustc_hash::FxHashMap;

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

/// Bucket slots reserved up front. Most entries sit at low frequencies.
pub const DEFAULT_BUCKET_PREALLOC: usize = 32;

/// Link fields first: they are touched on every promotion and eviction.
#[derive(Debug)]
#[repr(C)]
struct Entry<K, V> {
    prev: Option<SlotId>,
    next: Option<SlotId>,
    bucket: SlotId,
    key: K,
    value: V,
}

/// One frequency class. Members form an intrusive list threaded through
/// the entries: `head` is the newest arrival, `tail` the oldest.
#[derive(Debug)]
struct Bucket {
    freq: u64,
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

impl Bucket {
    fn new(freq: u64, prev: Option<SlotId>, next: Option<SlotId>) -> Self {
        Self {
            freq,
            head: None,
            tail: None,
            len: 0,
            prev,
            next,
        }
    }

    fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Key/value store ordered by access frequency.
///
/// New keys enter at frequency 1. [`touch`](Self::touch) promotes a key one
/// frequency up; [`pop_min`](Self::pop_min) removes the oldest arrival of
/// the lowest occupied frequency. Every operation is O(1).
///
/// # Example
///
/// ```
/// use freqcache::ds::FrequencyChain;
///
/// let mut chain = FrequencyChain::new();
/// assert!(chain.insert("k", "v1"));
/// assert!(!chain.insert("k", "ignored"));
///
/// assert_eq!(chain.touch_get(&"k"), Some((&"v1", 2)));
/// assert_eq!(chain.frequency(&"k"), Some(2));
///
/// // Overwriting a value leaves the frequency alone.
/// *chain.peek_mut(&"k").unwrap() = "v2";
/// assert_eq!(chain.frequency(&"k"), Some(2));
/// assert_eq!(chain.remove(&"k"), Some(("v2", 2)));
/// assert!(chain.is_empty());
/// ```
#[derive(Debug)]
pub struct FrequencyChain<K, V> {
    index: FxHashMap<K, SlotId>,
    entries: SlotArena<Entry<K, V>>,
    buckets: SlotArena<Bucket>,
    head: SlotId,
}

impl<K, V> FrequencyChain<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Reserves room for `capacity` entries in the index and entry arena.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buckets = SlotArena::with_capacity(DEFAULT_BUCKET_PREALLOC);
        let head = buckets.insert(Bucket::new(0, None, None));
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            entries: SlotArena::with_capacity(capacity),
            buckets,
            head,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Membership test without promotion.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Current frequency of `key`, without promotion.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        Some(self.bucket(self.entry(id).bucket).freq)
    }

    /// Value for `key`, without promotion.
    pub fn peek(&self, key: &K) -> Option<&V> {
        let id = *self.index.get(key)?;
        Some(&self.entry(id).value)
    }

    /// Mutable value for `key`, without promotion.
    pub fn peek_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = *self.index.get(key)?;
        Some(&mut self.entry_mut(id).value)
    }

    /// Lowest occupied frequency, or `None` when empty.
    pub fn min_freq(&self) -> Option<u64> {
        self.bucket(self.head)
            .next
            .map(|first| self.bucket(first).freq)
    }

    /// Next eviction victim as `(key, value, frequency)`.
    pub fn peek_min(&self) -> Option<(&K, &V, u64)> {
        let first = self.bucket(self.bucket(self.head).next?);
        let entry = self.entry(first.tail?);
        Some((&entry.key, &entry.value, first.freq))
    }

    /// Inserts a new key at frequency 1.
    ///
    /// Returns `false` and leaves the chain untouched (dropping `value`) if
    /// the key is already present.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }

        let bucket = self.successor_with(self.head, 1);
        let id = self.entries.insert(Entry {
            prev: None,
            next: None,
            bucket,
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);
        self.list_push_front(bucket, id);
        true
    }

    /// Promotes `key` one frequency up and returns the new frequency.
    ///
    /// # Example
    ///
    /// ```
    /// use freqcache::ds::FrequencyChain;
    ///
    /// let mut chain = FrequencyChain::new();
    /// chain.insert(7u32, ());
    /// assert_eq!(chain.touch(&7), Some(2));
    /// assert_eq!(chain.touch(&7), Some(3));
    /// assert_eq!(chain.touch(&8), None);
    /// // The vacated buckets were unlinked along the way.
    /// assert_eq!(chain.bucket_frequencies(), vec![3]);
    /// ```
    pub fn touch(&mut self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        Some(self.promote(id))
    }

    /// Promotes `key` and returns its value with the new frequency.
    pub fn touch_get(&mut self, key: &K) -> Option<(&V, u64)> {
        let id = *self.index.get(key)?;
        let freq = self.promote(id);
        Some((&self.entry(id).value, freq))
    }

    /// Moves `key` back to frequency 1 and returns the frequency it had.
    pub fn reset(&mut self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        let current = self.entry(id).bucket;
        let freq = self.bucket(current).freq;
        if freq > 1 {
            let target = self.successor_with(self.head, 1);
            self.move_entry(id, current, target);
        }
        Some(freq)
    }

    /// Removes `key`, returning its value and final frequency.
    pub fn remove(&mut self, key: &K) -> Option<(V, u64)> {
        let id = self.index.remove(key)?;
        let (entry, freq) = self.detach(id);
        Some((entry.value, freq))
    }

    /// Removes the oldest arrival of the lowest occupied frequency.
    ///
    /// # Example
    ///
    /// ```
    /// use freqcache::ds::FrequencyChain;
    ///
    /// let mut chain = FrequencyChain::new();
    /// chain.insert("a", ());
    /// chain.insert("b", ());
    /// chain.insert("c", ());
    /// chain.touch(&"a");
    ///
    /// assert_eq!(chain.pop_min(), Some(("b", (), 1)));
    /// assert_eq!(chain.pop_min(), Some(("c", (), 1)));
    /// assert_eq!(chain.pop_min(), Some(("a", (), 2)));
    /// assert_eq!(chain.pop_min(), None);
    /// ```
    pub fn pop_min(&mut self) -> Option<(K, V, u64)> {
        let first = self.bucket(self.head).next?;
        let id = self.bucket(first).tail?;
        let (entry, freq) = self.detach(id);
        self.index.remove(&entry.key);
        Some((entry.key, entry.value, freq))
    }

    /// Drops every entry and bucket except the sentinel.
    pub fn clear(&mut self) {
        self.index.clear();
        self.entries.clear();
        self.buckets.clear();
        self.head = self.buckets.insert(Bucket::new(0, None, None));
    }

    /// Frequencies of the linked buckets, lowest first. The sentinel is
    /// not included.
    pub fn bucket_frequencies(&self) -> Vec<u64> {
        self.bucket_sizes().into_iter().map(|(freq, _)| freq).collect()
    }

    /// `(frequency, member count)` for every linked bucket, lowest first.
    pub fn bucket_sizes(&self) -> Vec<(u64, usize)> {
        let mut sizes = Vec::new();
        let mut cursor = self.bucket(self.head).next;
        while let Some(id) = cursor {
            let bucket = self.bucket(id);
            sizes.push((bucket.freq, bucket.len));
            cursor = bucket.next;
        }
        sizes
    }

    /// Every entry as `(key, value, frequency)`, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V, u64)> {
        self.entries
            .iter()
            .map(move |(_, entry)| (&entry.key, &entry.value, self.bucket(entry.bucket).freq))
    }

    /// Walks the chain and cross-checks it against the index.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let sentinel = self
            .buckets
            .get(self.head)
            .ok_or_else(|| InvariantError::new("sentinel bucket missing"))?;
        if sentinel.freq != 0 || !sentinel.is_empty() || sentinel.head.is_some() {
            return Err(InvariantError::new("sentinel bucket holds entries"));
        }
        if sentinel.prev.is_some() {
            return Err(InvariantError::new("sentinel bucket has a predecessor"));
        }

        let mut linked = 1usize;
        let mut members = 0usize;
        let mut prev_id = self.head;
        let mut prev_freq = 0u64;
        let mut cursor = sentinel.next;

        while let Some(bucket_id) = cursor {
            let bucket = self.buckets.get(bucket_id).ok_or_else(|| {
                InvariantError::new(format!(
                    "chain links to freed bucket slot {}",
                    bucket_id.index()
                ))
            })?;
            let freq = bucket.freq;
            if bucket.prev != Some(prev_id) {
                return Err(InvariantError::new(format!(
                    "bucket {freq} has a stale prev link"
                )));
            }
            if freq <= prev_freq {
                return Err(InvariantError::new(format!(
                    "chain is not increasing: bucket {freq} follows bucket {prev_freq}"
                )));
            }
            if bucket.is_empty() {
                return Err(InvariantError::new(format!(
                    "empty bucket {freq} is still linked"
                )));
            }

            let mut count = 0usize;
            let mut last = None;
            let mut node = bucket.head;
            while let Some(id) = node {
                let entry = self.entries.get(id).ok_or_else(|| {
                    InvariantError::new(format!("bucket {freq} links to a freed entry"))
                })?;
                if entry.bucket != bucket_id {
                    return Err(InvariantError::new(format!(
                        "entry listed in bucket {freq} points at another bucket"
                    )));
                }
                if entry.prev != last {
                    return Err(InvariantError::new(format!(
                        "member list of bucket {freq} has a stale prev link"
                    )));
                }
                if self.index.get(&entry.key) != Some(&id) {
                    return Err(InvariantError::new(format!(
                        "entry in bucket {freq} is not indexed"
                    )));
                }
                count += 1;
                if count > self.entries.len() {
                    return Err(InvariantError::new(format!(
                        "member list of bucket {freq} is cyclic"
                    )));
                }
                last = Some(id);
                node = entry.next;
            }
            if bucket.tail != last {
                return Err(InvariantError::new(format!(
                    "bucket {freq} tail does not match its last member"
                )));
            }
            if bucket.len != count {
                return Err(InvariantError::new(format!(
                    "bucket {freq} records {} members but lists {count}",
                    bucket.len
                )));
            }

            members += count;
            linked += 1;
            if linked > self.buckets.len() {
                return Err(InvariantError::new("bucket chain is cyclic"));
            }
            prev_id = bucket_id;
            prev_freq = freq;
            cursor = bucket.next;
        }

        if linked != self.buckets.len() {
            return Err(InvariantError::new(format!(
                "{} buckets allocated but {linked} linked",
                self.buckets.len()
            )));
        }
        if members != self.entries.len() || self.index.len() != self.entries.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys, arena {} entries, buckets {members} members",
                self.index.len(),
                self.entries.len()
            )));
        }
        Ok(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if let Err(err) = self.check_invariants() {
            panic!("frequency chain invariant violated: {err}");
        }
    }

    fn bucket(&self, id: SlotId) -> &Bucket {
        self.buckets.get(id).expect("frequency bucket missing")
    }

    fn bucket_mut(&mut self, id: SlotId) -> &mut Bucket {
        self.buckets.get_mut(id).expect("frequency bucket missing")
    }

    fn entry(&self, id: SlotId) -> &Entry<K, V> {
        self.entries.get(id).expect("chain entry missing")
    }

    fn entry_mut(&mut self, id: SlotId) -> &mut Entry<K, V> {
        self.entries.get_mut(id).expect("chain entry missing")
    }

    fn promote(&mut self, id: SlotId) -> u64 {
        let current = self.entry(id).bucket;
        let freq = self.bucket(current).freq;
        let Some(next_freq) = freq.checked_add(1) else {
            // Saturated: stay in the top bucket as its newest arrival.
            self.list_remove(current, id);
            self.list_push_front(current, id);
            return freq;
        };
        let target = self.successor_with(current, next_freq);
        self.move_entry(id, current, target);
        next_freq
    }

    /// Returns the bucket right after `after` if it has frequency `freq`,
    /// otherwise splices a new one in between. Caller guarantees that
    /// `after.freq < freq <= after.next.freq`.
    fn successor_with(&mut self, after: SlotId, freq: u64) -> SlotId {
        let next = self.bucket(after).next;
        if let Some(next_id) = next
            && self.bucket(next_id).freq == freq
        {
            return next_id;
        }

        let id = self.buckets.insert(Bucket::new(freq, Some(after), next));
        self.bucket_mut(after).next = Some(id);
        if let Some(next_id) = next {
            self.bucket_mut(next_id).prev = Some(id);
        }
        trace!("spliced frequency bucket {freq}");
        id
    }

    fn move_entry(&mut self, id: SlotId, from: SlotId, to: SlotId) {
        self.list_remove(from, id);
        self.list_push_front(to, id);
        self.entry_mut(id).bucket = to;
        self.unlink_if_empty(from);
    }

    fn detach(&mut self, id: SlotId) -> (Entry<K, V>, u64) {
        let bucket = self.entry(id).bucket;
        let freq = self.bucket(bucket).freq;
        self.list_remove(bucket, id);
        self.unlink_if_empty(bucket);
        let entry = self.entries.remove(id).expect("chain entry missing");
        (entry, freq)
    }

    fn unlink_if_empty(&mut self, id: SlotId) {
        if id == self.head || !self.bucket(id).is_empty() {
            return;
        }
        let bucket = self.buckets.remove(id).expect("frequency bucket missing");
        if let Some(prev) = bucket.prev {
            self.bucket_mut(prev).next = bucket.next;
        }
        if let Some(next) = bucket.next {
            self.bucket_mut(next).prev = bucket.prev;
        }
        trace!("unlinked empty frequency bucket {}", bucket.freq);
    }

    fn list_push_front(&mut self, bucket_id: SlotId, id: SlotId) {
        let old_head = self.bucket(bucket_id).head;
        {
            let entry = self.entry_mut(id);
            entry.prev = None;
            entry.next = old_head;
        }
        match old_head {
            Some(old_head) => self.entry_mut(old_head).prev = Some(id),
            None => self.bucket_mut(bucket_id).tail = Some(id),
        }
        let bucket = self.bucket_mut(bucket_id);
        bucket.head = Some(id);
        bucket.len += 1;
    }

    fn list_remove(&mut self, bucket_id: SlotId, id: SlotId) {
        let (prev, next) = {
            let entry = self.entry(id);
            (entry.prev, entry.next)
        };
        match prev {
            Some(prev) => self.entry_mut(prev).next = next,
            None => self.bucket_mut(bucket_id).head = next,
        }
        match next {
            Some(next) => self.entry_mut(next).prev = prev,
            None => self.bucket_mut(bucket_id).tail = prev,
        }
        {
            let entry = self.entry_mut(id);
            entry.prev = None;
            entry.next = None;
        }
        self.bucket_mut(bucket_id).len -= 1;
    }
}

impl<K, V> Default for FrequencyChain<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
