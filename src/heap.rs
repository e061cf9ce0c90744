//! Indexed binary min-heap
//!
//! Entries live in an arena and the heap array holds handles into it. Each
//! arena node records the heap position of its entry, so an entry whose
//! ordering key changed in place can be restored with [`IndexedMinHeap::fix`]
//! in O(log n) without searching for it.
//!
//! Callers never see raw heap positions. They hold an [`EntryId`], which
//! carries a generation: once the entry is popped the id goes stale and every
//! lookup through it returns `None`, even if the arena slot is reused.

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Stable handle to an entry in an [`IndexedMinHeap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId {
    slot: usize,
    generation: u32,
}

#[derive(Clone, Debug)]
struct Node<E> {
    entry: E,
    /// Current index into `order`
    position: usize,
}

#[derive(Clone, Debug)]
struct Slot<E> {
    generation: u32,
    node: Option<Node<E>>,
}

/// Array-backed min-heap whose elements track their own position
///
/// # Example
///
/// ```
/// use topflow::heap::IndexedMinHeap;
///
/// let mut heap = IndexedMinHeap::new();
/// let a = heap.push(5);
/// heap.push(3);
/// heap.push(8);
/// assert_eq!(heap.peek_min(), Some(&3));
///
/// // Lower `a` in place and restore heap order
/// heap.update(a, |value| *value = 1);
/// assert_eq!(heap.pop_min(), Some(1));
/// assert_eq!(heap.get(a), None);
/// ```
#[derive(Clone, Debug)]
pub struct IndexedMinHeap<E> {
    slots: Vec<Slot<E>>,
    /// Heap array of arena slot indices
    order: Vec<usize>,
    vacant: Vec<usize>,
}

impl<E: Ord> IndexedMinHeap<E> {
    /// Create an empty heap
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty heap with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
            vacant: Vec::new(),
        }
    }

    /// Number of entries in the heap
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the heap holds no entries
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Insert an entry and return its handle
    pub fn push(&mut self, entry: E) -> EntryId {
        let position = self.order.len();
        let node = Node { entry, position };

        let slot = match self.vacant.pop() {
            Some(slot) => {
                self.slots[slot].node = Some(node);
                slot
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                self.slots.len() - 1
            }
        };

        self.order.push(slot);
        self.sift_up(position);

        EntryId {
            slot,
            generation: self.slots[slot].generation,
        }
    }

    /// Remove and return the minimum entry
    pub fn pop_min(&mut self) -> Option<E> {
        let last = self.order.len().checked_sub(1)?;
        self.swap(0, last);
        let slot = self.order.pop()?;

        let entry = self.release(slot);
        if !self.order.is_empty() {
            self.sift_down(0);
        }
        entry
    }

    /// Smallest entry, if any
    pub fn peek_min(&self) -> Option<&E> {
        self.order.first().and_then(|&slot| self.entry_at(slot))
    }

    /// Handle of the smallest entry, if any
    pub fn peek_min_id(&self) -> Option<EntryId> {
        self.order.first().map(|&slot| EntryId {
            slot,
            generation: self.slots[slot].generation,
        })
    }

    /// Entry behind `id`, or `None` if it has been removed
    pub fn get(&self, id: EntryId) -> Option<&E> {
        self.node(id).map(|node| &node.entry)
    }

    /// Mutable access to the entry behind `id`
    ///
    /// Changing the entry's ordering leaves the heap inconsistent until
    /// [`fix`](Self::fix) is called with the same id. Prefer
    /// [`update`](Self::update) where possible.
    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut E> {
        self.node_mut(id).map(|node| &mut node.entry)
    }

    /// Apply `f` to the entry behind `id`, then restore heap order
    pub fn update<R>(&mut self, id: EntryId, f: impl FnOnce(&mut E) -> R) -> Option<R> {
        let result = f(self.get_mut(id)?);
        self.fix(id);
        Some(result)
    }

    /// Restore heap order after the entry behind `id` changed
    ///
    /// Returns `false` if `id` no longer refers to an entry.
    pub fn fix(&mut self, id: EntryId) -> bool {
        let Some(position) = self.node(id).map(|node| node.position) else {
            return false;
        };
        if !self.sift_up(position) {
            self.sift_down(position);
        }
        true
    }

    /// Iterate over entries in heap order (not sorted)
    pub fn iter(&self) -> impl Iterator<Item = &E> + '_ {
        self.order.iter().filter_map(|&slot| self.entry_at(slot))
    }

    /// Remove every entry, invalidating all handles
    pub fn clear(&mut self) {
        while let Some(slot) = self.order.pop() {
            self.release(slot);
        }
    }

    /// Consume the heap, returning entries in ascending order
    pub fn into_sorted_vec(mut self) -> Vec<E> {
        let mut sorted = Vec::with_capacity(self.len());
        while let Some(entry) = self.pop_min() {
            sorted.push(entry);
        }
        sorted
    }

    /// Verify heap order and position bookkeeping
    ///
    /// Returns a description of the first violation found.
    pub fn check_invariants(&self) -> Result<(), &'static str> {
        let live = self.slots.iter().filter(|slot| slot.node.is_some()).count();
        if live != self.order.len() {
            return Err("arena and heap disagree on entry count");
        }
        for (position, &slot) in self.order.iter().enumerate() {
            let node = self.slots[slot]
                .node
                .as_ref()
                .ok_or("heap references a vacant slot")?;
            if node.position != position {
                return Err("stored position does not match heap slot");
            }
            if position > 0 && self.less(position, (position - 1) / 2) {
                return Err("entry is smaller than its parent");
            }
        }
        Ok(())
    }

    fn node(&self, id: EntryId) -> Option<&Node<E>> {
        let slot = self.slots.get(id.slot)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: EntryId) -> Option<&mut Node<E>> {
        let slot = self.slots.get_mut(id.slot)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    fn entry_at(&self, slot: usize) -> Option<&E> {
        self.slots[slot].node.as_ref().map(|node| &node.entry)
    }

    /// Take the node out of its arena slot and retire the slot's generation
    fn release(&mut self, slot: usize) -> Option<E> {
        let slot_ref = &mut self.slots[slot];
        let node = slot_ref.node.take()?;
        slot_ref.generation = slot_ref.generation.wrapping_add(1);
        self.vacant.push(slot);
        Some(node.entry)
    }

    fn less(&self, a: usize, b: usize) -> bool {
        match (self.entry_at(self.order[a]), self.entry_at(self.order[b])) {
            (Some(x), Some(y)) => x < y,
            _ => false,
        }
    }

    /// Exchange two heap positions and record the new positions of both
    fn swap(&mut self, a: usize, b: usize) {
        self.order.swap(a, b);
        for position in [a, b] {
            if let Some(node) = self.slots[self.order[position]].node.as_mut() {
                node.position = position;
            }
        }
    }

    /// Returns whether the entry moved
    fn sift_up(&mut self, mut position: usize) -> bool {
        let start = position;
        while position > 0 {
            let parent = (position - 1) / 2;
            if !self.less(position, parent) {
                break;
            }
            self.swap(position, parent);
            position = parent;
        }
        position != start
    }

    fn sift_down(&mut self, mut position: usize) {
        let len = self.order.len();
        loop {
            let left = 2 * position + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.less(right, left) {
                right
            } else {
                left
            };
            if !self.less(child, position) {
                break;
            }
            self.swap(position, child);
            position = child;
        }
    }
}

impl<E: Ord> Default for IndexedMinHeap<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_order() {
        let mut heap = IndexedMinHeap::new();
        for value in [5, 1, 9, 3, 7, 2, 8] {
            heap.push(value);
            heap.check_invariants().unwrap();
        }

        let mut popped = Vec::new();
        while let Some(value) = heap.pop_min() {
            heap.check_invariants().unwrap();
            popped.push(value);
        }
        assert_eq!(popped, vec![1, 2, 3, 5, 7, 8, 9]);
    }

    #[test]
    fn test_empty() {
        let mut heap = IndexedMinHeap::<u32>::new();
        assert!(heap.is_empty());
        assert_eq!(heap.peek_min(), None);
        assert_eq!(heap.peek_min_id(), None);
        assert_eq!(heap.pop_min(), None);
    }

    #[test]
    fn test_fix_after_increase() {
        let mut heap = IndexedMinHeap::new();
        let a = heap.push(1);
        heap.push(4);
        heap.push(6);

        *heap.get_mut(a).unwrap() = 5;
        assert!(heap.fix(a));
        heap.check_invariants().unwrap();
        assert_eq!(heap.peek_min(), Some(&4));
    }

    #[test]
    fn test_fix_after_decrease() {
        let mut heap = IndexedMinHeap::new();
        heap.push(2);
        heap.push(4);
        let c = heap.push(6);

        heap.update(c, |value| *value = 0);
        heap.check_invariants().unwrap();
        assert_eq!(heap.peek_min_id(), Some(c));
    }

    #[test]
    fn test_stale_id_after_pop() {
        let mut heap = IndexedMinHeap::new();
        let a = heap.push(1);
        heap.push(2);

        assert_eq!(heap.pop_min(), Some(1));
        assert_eq!(heap.get(a), None);
        assert!(!heap.fix(a));

        // the vacated slot is reused without reviving the old id
        let b = heap.push(0);
        assert_ne!(a, b);
        assert_eq!(heap.get(a), None);
        assert_eq!(heap.get(b), Some(&0));
    }

    #[test]
    fn test_ids_follow_entries_through_swaps() {
        let mut heap = IndexedMinHeap::new();
        let ids: Vec<_> = (0..32u32).rev().map(|v| (v, heap.push(v))).collect();

        for &(value, id) in &ids {
            assert_eq!(heap.get(id), Some(&value));
        }

        for &(_, id) in ids.iter().step_by(3) {
            heap.update(id, |value| *value += 100);
            heap.check_invariants().unwrap();
        }
        for (i, &(value, id)) in ids.iter().enumerate() {
            let expected = if i % 3 == 0 { value + 100 } else { value };
            assert_eq!(heap.get(id), Some(&expected));
        }
    }

    #[test]
    fn test_into_sorted_vec_and_clear() {
        let mut heap = IndexedMinHeap::new();
        let id = heap.push(3);
        heap.push(1);
        heap.push(2);

        assert_eq!(heap.clone().into_sorted_vec(), vec![1, 2, 3]);

        heap.clear();
        assert!(heap.is_empty());
        assert_eq!(heap.get(id), None);
        heap.check_invariants().unwrap();
    }
}
