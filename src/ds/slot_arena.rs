//! Handle-addressed storage for chain entries and buckets.
//!
//! Values live in a `Vec<Option<T>>`; removing a value leaves a hole that is
//! recorded on a free list and handed out again by the next insert. A
//! [`SlotId`] is only meaningful for the arena that produced it, and a stale
//! id may alias a newer value once its slot has been reused, so owners must
//! drop ids as soon as they remove the value behind them.

/// Opaque handle into a [`SlotArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) usize);

impl SlotId {
    /// Raw slot position, for diagnostics and stable ordering in snapshots.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
pub struct SlotArena<T> {
    slots: Vec<Option<T>>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> SlotArena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub fn insert(&mut self, value: T) -> SlotId {
        let idx = match self.free_list.pop() {
            Some(idx) => {
                debug_assert!(self.slots[idx].is_none(), "free slot {idx} still occupied");
                self.slots[idx] = Some(value);
                idx
            },
            None => {
                self.slots.push(Some(value));
                self.slots.len() - 1
            },
        };
        self.len += 1;
        SlotId(idx)
    }

    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        let value = self.slots.get_mut(id.0)?.take()?;
        self.free_list.push(id.0);
        self.len -= 1;
        Some(value)
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots allocated so far, occupied or free.
    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Drops every value. Previously issued ids become dangling.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.len = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|value| (SlotId(idx), value)))
    }
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freed_slots_are_reused() {
        let mut arena = SlotArena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(a), Some(&"a"));
        assert_eq!(arena.get(b), Some(&"b"));

        assert_eq!(arena.remove(a), Some("a"));
        assert_eq!(arena.len(), 1);
        assert!(!arena.contains(a));

        let c = arena.insert("c");
        assert_eq!(c.index(), a.index());
        assert_eq!(arena.get(c), Some(&"c"));
        assert_eq!(arena.slot_count(), 2);
    }

    #[test]
    fn double_remove_is_rejected() {
        let mut arena = SlotArena::new();
        let id = arena.insert(7u32);
        assert_eq!(arena.remove(id), Some(7));
        assert_eq!(arena.remove(id), None);
        assert!(arena.is_empty());
        // The free list must not hold the slot twice.
        let first = arena.insert(1);
        let second = arena.insert(2);
        assert_ne!(first, second);
    }

    #[test]
    fn get_mut_and_iter_skip_holes() {
        let mut arena = SlotArena::with_capacity(4);
        let ids: Vec<_> = (0..4).map(|i| arena.insert(i * 10)).collect();
        arena.remove(ids[1]);
        *arena.get_mut(ids[2]).unwrap() += 5;

        let seen: Vec<_> = arena.iter().map(|(_, v)| *v).collect();
        assert_eq!(seen, vec![0, 25, 30]);
    }

    #[test]
    fn clear_resets_everything() {
        let mut arena = SlotArena::new();
        arena.insert(1);
        arena.insert(2);
        arena.clear();
        assert!(arena.is_empty());
        assert_eq!(arena.slot_count(), 0);
        assert_eq!(arena.insert(3).index(), 0);
    }
}
