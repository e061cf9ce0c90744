//! Exact top-k
//!
//! Tallies every distinct item, then selects the k largest through a min-heap
//! that never grows past k entries.

use crate::frequency::counter::{Counter, ItemCount};
use crate::heap::IndexedMinHeap;
use crate::traits::{EngineStats, FrequencyEngine};
use core::hash::Hash;

#[cfg(feature = "std")]
use std::{collections::HashMap, vec::Vec};

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::{collections::BTreeMap as HashMap, vec::Vec};

/// Exact frequency counter with bounded top-k extraction
///
/// Memory grows with the number of distinct items. The result is exactly
/// the k most frequent items, ordered by count descending and then by item
/// ascending.
///
/// # Example
///
/// ```
/// use topflow::frequency::ExactTopK;
/// use topflow::traits::FrequencyEngine;
///
/// let mut exact = ExactTopK::new(2);
/// for item in ["a", "b", "a", "c", "a", "b"] {
///     exact.observe(&item);
/// }
///
/// let top = exact.top_k();
/// assert_eq!(top[0].item, "a");
/// assert_eq!(top[0].count, 3);
/// assert_eq!(top[1].item, "b");
/// assert_eq!(top[1].count, 2);
/// ```
#[derive(Clone, Debug)]
pub struct ExactTopK<T: Hash + Eq + Ord + Clone> {
    k: usize,
    counts: HashMap<T, u64>,
    total_count: u64,
}

impl<T: Hash + Eq + Ord + Clone> ExactTopK<T> {
    /// Create an exact counter reporting `k` items
    pub fn new(k: usize) -> Self {
        Self {
            k,
            counts: HashMap::new(),
            total_count: 0,
        }
    }

    /// Add `count` occurrences of an item
    pub fn add_count(&mut self, item: &T, count: u64) {
        self.total_count += count;
        match self.counts.get_mut(item) {
            Some(existing) => *existing += count,
            None => {
                self.counts.insert(item.clone(), count);
            }
        }
    }

    /// Exact count of an item (0 if never seen)
    pub fn estimate(&self, item: &T) -> u64 {
        self.counts.get(item).copied().unwrap_or(0)
    }

    /// Number of distinct items seen
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Forget everything observed so far
    pub fn clear(&mut self) {
        self.counts.clear();
        self.total_count = 0;
    }
}

impl<T: Hash + Eq + Ord + Clone> FrequencyEngine for ExactTopK<T> {
    type Item = T;

    fn observe(&mut self, item: &T) {
        self.add_count(item, 1);
    }

    fn total(&self) -> u64 {
        self.total_count
    }

    fn k(&self) -> usize {
        self.k
    }

    fn ranking(&self, k: usize) -> Vec<ItemCount<T>> {
        if k == 0 {
            return Vec::new();
        }

        let mut heap = IndexedMinHeap::with_capacity(k.min(self.counts.len()));
        for (item, &count) in &self.counts {
            if heap.len() < k {
                heap.push(Counter::new(item, count, 0));
                continue;
            }
            let candidate = Counter::new(item, count, 0);
            // At capacity: replace the minimum in place if the candidate outranks it
            if let Some(min_id) = heap.peek_min_id() {
                heap.update(min_id, |min| {
                    if candidate > *min {
                        *min = candidate;
                    }
                });
            }
        }

        heap.into_sorted_vec()
            .into_iter()
            .rev()
            .map(|counter| ItemCount::new(counter.item.clone(), counter.count, 0))
            .collect()
    }

    fn stats(&self) -> EngineStats {
        EngineStats {
            records: self.total_count,
            tracked: self.counts.len(),
            capacity: None,
            admissions: self.counts.len() as u64,
            evictions: 0,
            rejections: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observe_all<'a>(engine: &mut ExactTopK<&'a str>, items: &[&'a str]) {
        for item in items {
            engine.observe(item);
        }
    }

    #[test]
    fn test_basic() {
        let mut exact = ExactTopK::new(2);
        observe_all(&mut exact, &["a", "b", "a", "c", "a", "b"]);

        assert_eq!(
            exact.top_k(),
            vec![ItemCount::new("a", 3, 0), ItemCount::new("b", 2, 0)]
        );
        assert_eq!(exact.total(), 6);
        assert_eq!(exact.estimate(&"c"), 1);
        assert_eq!(exact.estimate(&"zzz"), 0);
    }

    #[test]
    fn test_k_zero() {
        let mut exact = ExactTopK::new(0);
        observe_all(&mut exact, &["a", "a", "b"]);
        assert!(exact.top_k().is_empty());
        assert_eq!(exact.total(), 3);
    }

    #[test]
    fn test_k_larger_than_distinct() {
        let mut exact = ExactTopK::new(10);
        observe_all(&mut exact, &["x", "y", "y"]);
        assert_eq!(
            exact.top_k(),
            vec![ItemCount::new("y", 2, 0), ItemCount::new("x", 1, 0)]
        );
    }

    #[test]
    fn test_ties_break_by_item_ascending() {
        let mut exact = ExactTopK::new(2);
        observe_all(&mut exact, &["d", "c", "b", "a", "e"]);
        let top: Vec<_> = exact.top_k().into_iter().map(|p| p.item).collect();
        assert_eq!(top, vec!["a", "b"]);
    }

    #[test]
    fn test_empty() {
        let exact = ExactTopK::<&str>::new(5);
        assert!(exact.is_empty());
        assert!(exact.top_k().is_empty());
    }

    #[test]
    fn test_add_count_and_clear() {
        let mut exact = ExactTopK::new(3);
        exact.add_count(&"bulk", 40);
        exact.observe(&"single");

        assert_eq!(exact.total(), 41);
        assert_eq!(exact.distinct(), 2);
        assert_eq!(exact.stats().tracked, 2);

        exact.clear();
        assert!(exact.is_empty());
        assert_eq!(exact.distinct(), 0);
    }
}
