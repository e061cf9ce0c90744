//! Core traits for frequency engines
//!
//! Every engine implements [`FrequencyEngine`]: feed it records one at a time,
//! then ask for the ranked `(item, count)` pairs. Anything that honours the
//! same contract (for example an engine backed by a relational query) can be
//! driven by the pipeline in place of the built-in ones.

use crate::frequency::ItemCount;

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Counters describing the work an engine did during a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineStats {
    /// Records observed
    pub records: u64,
    /// Items currently tracked individually
    pub tracked: usize,
    /// Upper bound on individually tracked items, `None` when unbounded
    pub capacity: Option<usize>,
    /// Entries created or reassigned to a new item
    pub admissions: u64,
    /// Monitored entries that lost their slot to a newcomer
    pub evictions: u64,
    /// Records absorbed by an aggregate counter instead of being tracked
    pub rejections: u64,
}

/// A single-pass frequency estimator over a stream of items
pub trait FrequencyEngine {
    /// The type of record this engine counts
    type Item: Clone;

    /// Account for one occurrence of `item`
    fn observe(&mut self, item: &Self::Item);

    /// Number of records observed so far
    fn total(&self) -> u64;

    /// The `k` the engine was configured with
    fn k(&self) -> usize;

    /// Up to `k` items ordered by estimated count, highest first
    ///
    /// Ties are broken deterministically, so `ranking(j)` is always a prefix
    /// of `ranking(k)` for `j <= k`.
    fn ranking(&self, k: usize) -> Vec<ItemCount<Self::Item>>;

    /// Snapshot of the engine's bookkeeping counters
    fn stats(&self) -> EngineStats;

    /// The configured top-k
    fn top_k(&self) -> Vec<ItemCount<Self::Item>> {
        self.ranking(self.k())
    }

    /// Observe every item of an iterator
    fn extend<'a, I>(&mut self, items: I)
    where
        I: IntoIterator<Item = &'a Self::Item>,
        Self::Item: 'a,
    {
        for item in items {
            self.observe(item);
        }
    }

    /// Check if no record has been observed
    fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
