//! Tracked entries and the ordering shared by all engines
//!
//! Heap order puts the worst-ranked entry at the minimum: lowest count first,
//! and among equal counts the entry that would be listed last in a report.
//! Reports list entries in exactly the reverse order, so for every engine the
//! ranking is count descending with ties broken by item ascending (the
//! filtered engine ranks the smaller over-estimate first before looking at
//! the item).

use core::cmp::Ordering;

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Reported `(item, count)` pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemCount<T> {
    /// The record
    pub item: T,
    /// Estimated number of occurrences
    pub count: u64,
    /// Maximum overcount included in `count` (0 for exact results)
    pub error: u64,
}

impl<T> ItemCount<T> {
    pub fn new(item: T, count: u64, error: u64) -> Self {
        Self { item, count, error }
    }

    /// Lower bound on the true count
    pub fn guaranteed_count(&self) -> u64 {
        self.count.saturating_sub(self.error)
    }
}

/// Entry for the exact and Space-Saving engines
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Counter<T> {
    pub(crate) item: T,
    pub(crate) count: u64,
    /// Count inherited from the entry this one replaced
    pub(crate) error: u64,
}

impl<T> Counter<T> {
    pub(crate) fn new(item: T, count: u64, error: u64) -> Self {
        Self { item, count, error }
    }
}

impl<T: Clone> Counter<T> {
    pub(crate) fn to_item_count(&self) -> ItemCount<T> {
        ItemCount::new(self.item.clone(), self.count, self.error)
    }
}

impl<T: Ord> Ord for Counter<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.count
            .cmp(&other.count)
            .then_with(|| other.item.cmp(&self.item))
    }
}

impl<T: Ord> PartialOrd for Counter<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Entry for the filtered Space-Saving engine
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FilteredCounter<T> {
    pub(crate) item: T,
    /// Full 64-bit hash; the bucket is derived by masking
    pub(crate) bucket_hash: u64,
    pub(crate) count: u64,
    /// Bucket baseline inherited at admission
    pub(crate) over_estimate: u64,
}

impl<T: Clone> FilteredCounter<T> {
    pub(crate) fn to_item_count(&self) -> ItemCount<T> {
        ItemCount::new(self.item.clone(), self.count, self.over_estimate)
    }
}

impl<T: Ord> Ord for FilteredCounter<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.count
            .cmp(&other.count)
            .then_with(|| other.over_estimate.cmp(&self.over_estimate))
            .then_with(|| other.item.cmp(&self.item))
    }
}

impl<T: Ord> PartialOrd for FilteredCounter<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort entries best-ranked first and keep at most `k`
pub(crate) fn rank<E: Ord, T>(
    mut entries: Vec<&E>,
    k: usize,
    convert: impl Fn(&E) -> ItemCount<T>,
) -> Vec<ItemCount<T>> {
    if k == 0 {
        return Vec::new();
    }
    entries.sort_unstable_by(|a, b| b.cmp(a));
    entries.truncate(k.min(entries.len()));
    entries.into_iter().map(convert).collect()
}
