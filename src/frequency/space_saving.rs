//! Space-Saving algorithm for heavy hitters
//!
//! The Space-Saving algorithm tracks the most frequent items of a stream
//! using a fixed number of counters. The smallest counter is found through an
//! indexed min-heap, so each update is O(log m) for m monitored items.

use crate::config::EngineConfig;
use crate::frequency::counter::{rank, Counter, ItemCount};
use crate::heap::{EntryId, IndexedMinHeap};
use crate::traits::{EngineStats, FrequencyEngine};
use core::hash::Hash;

#[cfg(feature = "std")]
use std::{collections::HashMap, vec::Vec};

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::{collections::BTreeMap as HashMap, vec::Vec};

/// Space-Saving algorithm for finding frequent items
///
/// Monitors at most `capacity` items. When a new item arrives and every
/// counter is taken, the minimum counter is handed over to the newcomer and
/// keeps its count, so every estimate satisfies:
///
/// - `true_count <= estimate <= true_count + error`
/// - `error` is the count of the entry that was absorbed on admission
///
/// # Example
///
/// ```
/// use topflow::frequency::SpaceSaving;
/// use topflow::traits::FrequencyEngine;
///
/// let mut ss = SpaceSaving::new(2, 10);
///
/// for _ in 0..100 { ss.observe(&"apple"); }
/// for _ in 0..50 { ss.observe(&"banana"); }
/// for _ in 0..25 { ss.observe(&"cherry"); }
///
/// let top = ss.top_k();
/// assert_eq!(top[0].item, "apple");
/// assert_eq!(top[1].item, "banana");
/// ```
#[derive(Clone, Debug)]
pub struct SpaceSaving<T: Hash + Eq + Ord + Clone> {
    /// Number of items to report
    k: usize,
    /// Maximum number of counters to maintain
    capacity: usize,
    /// Map from item to its heap entry
    monitored: HashMap<T, EntryId>,
    /// Counters ordered by count
    heap: IndexedMinHeap<Counter<T>>,
    /// Total count of all items
    total_count: u64,
    /// Counters handed over to a new item
    evictions: u64,
}

impl<T: Hash + Eq + Ord + Clone> SpaceSaving<T> {
    /// Create a Space-Saving structure reporting `k` items out of `capacity`
    /// monitored ones
    ///
    /// `capacity` is raised to `k` if smaller.
    pub fn new(k: usize, capacity: usize) -> Self {
        Self {
            k,
            capacity: capacity.max(k),
            monitored: HashMap::new(),
            heap: IndexedMinHeap::new(),
            total_count: 0,
            evictions: 0,
        }
    }

    /// Create from a configuration, monitoring `config.heap_capacity()` items
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.k, config.heap_capacity())
    }

    /// Get the capacity (monitored-set size)
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the number of distinct items currently tracked
    pub fn num_tracked(&self) -> usize {
        self.heap.len()
    }

    /// Number of times a counter was reassigned to a new item
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Add one occurrence of an item
    pub fn add(&mut self, item: &T) {
        self.total_count += 1;

        if let Some(&id) = self.monitored.get(item) {
            self.heap.update(id, |counter| counter.count += 1);
            return;
        }

        if self.heap.len() < self.capacity {
            let id = self.heap.push(Counter::new(item.clone(), 1, 0));
            self.monitored.insert(item.clone(), id);
            return;
        }

        // Full: the minimum counter takes on the new item's identity
        let Some(id) = self.heap.peek_min_id() else {
            // capacity == 0, nothing is ever tracked
            return;
        };
        let evicted = self.heap.update(id, |counter| {
            let old_item = core::mem::replace(&mut counter.item, item.clone());
            counter.error = counter.count;
            counter.count += 1;
            old_item
        });
        if let Some(old_item) = evicted {
            self.monitored.remove(&old_item);
            self.monitored.insert(item.clone(), id);
            self.evictions += 1;
        }
    }

    /// Estimate the frequency of an item (0 if not tracked)
    pub fn estimate(&self, item: &T) -> u64 {
        self.counter(item).map(|c| c.count).unwrap_or(0)
    }

    /// Get the error bound for an item's estimate
    pub fn error(&self, item: &T) -> u64 {
        self.counter(item).map(|c| c.error).unwrap_or(0)
    }

    /// Get guaranteed minimum count for an item
    ///
    /// Returns (count - error), which is guaranteed to be at most the true count.
    pub fn guaranteed_count(&self, item: &T) -> u64 {
        self.counter(item)
            .map(|c| c.count.saturating_sub(c.error))
            .unwrap_or(0)
    }

    /// Check if an item is currently tracked
    pub fn contains(&self, item: &T) -> bool {
        self.monitored.contains_key(item)
    }

    /// Smallest monitored count (0 when nothing is tracked)
    pub fn min_count(&self) -> u64 {
        self.heap.peek_min().map(|c| c.count).unwrap_or(0)
    }

    /// Reset to empty state
    pub fn clear(&mut self) {
        self.monitored.clear();
        self.heap.clear();
        self.total_count = 0;
        self.evictions = 0;
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> Result<(), &'static str> {
        self.heap.check_invariants()?;
        if self.monitored.len() != self.heap.len() {
            return Err("monitored map and heap sizes differ");
        }
        for (item, &id) in &self.monitored {
            match self.heap.get(id) {
                Some(counter) if &counter.item == item => {}
                _ => return Err("map entry does not point at its counter"),
            }
        }
        Ok(())
    }

    fn counter(&self, item: &T) -> Option<&Counter<T>> {
        self.monitored.get(item).and_then(|&id| self.heap.get(id))
    }
}

impl<T: Hash + Eq + Ord + Clone> FrequencyEngine for SpaceSaving<T> {
    type Item = T;

    fn observe(&mut self, item: &T) {
        self.add(item);
    }

    fn total(&self) -> u64 {
        self.total_count
    }

    fn k(&self) -> usize {
        self.k
    }

    fn ranking(&self, k: usize) -> Vec<ItemCount<T>> {
        rank(self.heap.iter().collect(), k, Counter::to_item_count)
    }

    fn stats(&self) -> EngineStats {
        EngineStats {
            records: self.total_count,
            tracked: self.heap.len(),
            capacity: Some(self.capacity),
            admissions: self.heap.len() as u64 + self.evictions,
            evictions: self.evictions,
            rejections: 0,
        }
    }
}
