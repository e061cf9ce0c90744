//! Filtered Space-Saving
//!
//! Space-Saving with an admission filter in front of the monitored set. Items
//! are hashed into `2^filter_bits` buckets; each bucket keeps a baseline count
//! for the items that hash there without being monitored, plus the number of
//! monitored items that hash there. A newcomer is only admitted when its
//! bucket baseline could plausibly beat the smallest monitored count, which
//! keeps the long tail of a skewed stream from churning the heap.

use crate::config::{EngineConfig, MAX_FILTER_BITS};
use crate::frequency::counter::{rank, FilteredCounter, ItemCount};
use crate::heap::{EntryId, IndexedMinHeap};
use crate::traits::{EngineStats, FrequencyEngine};
use core::hash::Hash;
use xxhash_rust::xxh3::xxh3_64_with_seed;

#[cfg(feature = "std")]
use std::{collections::HashMap, vec::Vec};

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::{collections::BTreeMap as HashMap, vec::Vec};

/// Per-bucket admission state
#[derive(Clone, Debug, Default)]
struct Filter {
    /// Count floor for unmonitored items in the bucket
    baseline: HashMap<u64, u64>,
    /// Monitored items hashing to the bucket
    occupied: HashMap<u64, u32>,
}

impl Filter {
    fn baseline(&self, bucket: u64) -> u64 {
        self.baseline.get(&bucket).copied().unwrap_or(0)
    }

    fn occupied(&self, bucket: u64) -> u32 {
        self.occupied.get(&bucket).copied().unwrap_or(0)
    }
}

/// Space-Saving gated by a bucketed admission filter
///
/// Reported counts never under-estimate an item admitted through the filter:
/// `count` includes the bucket baseline inherited at admission, which is
/// the item's `error`. Hash collisions may merge the baselines of unrelated
/// items, and a record whose bucket is occupied by a different item is only
/// reflected in the total.
///
/// # Example
///
/// ```
/// use topflow::frequency::FilteredSpaceSaving;
/// use topflow::traits::FrequencyEngine;
///
/// let mut fss = FilteredSpaceSaving::new(1, 5, 8, 0);
/// for i in 0..1000 {
///     if i % 2 == 0 {
///         fss.observe(&"hot".to_string());
///     } else {
///         fss.observe(&format!("cold-{i}"));
///     }
/// }
///
/// let top = fss.top_k();
/// assert_eq!(top[0].item, "hot");
/// assert!(top[0].count >= 500);
/// ```
#[derive(Clone, Debug)]
pub struct FilteredSpaceSaving<T: AsRef<[u8]> + Hash + Eq + Ord + Clone> {
    k: usize,
    capacity: usize,
    mask: u64,
    seed: u64,
    filter: Filter,
    monitored: HashMap<T, EntryId>,
    heap: IndexedMinHeap<FilteredCounter<T>>,
    total_count: u64,
    admissions: u64,
    evictions: u64,
    rejections: u64,
    collisions: u64,
}

impl<T: AsRef<[u8]> + Hash + Eq + Ord + Clone> FilteredSpaceSaving<T> {
    /// Create a filtered Space-Saving structure
    ///
    /// # Arguments
    ///
    /// * `k` - Number of items to report
    /// * `capacity` - Monitored-set size, raised to `k` if smaller
    /// * `filter_bits` - log2 of the number of filter buckets
    /// * `seed` - Seed for the bucket hash
    ///
    /// # Panics
    ///
    /// Panics if `filter_bits` is not in `1..=32`
    pub fn new(k: usize, capacity: usize, filter_bits: u8, seed: u64) -> Self {
        assert!(
            (1..=MAX_FILTER_BITS).contains(&filter_bits),
            "filter_bits must be in 1..=32"
        );
        Self::with_mask(k, capacity, (1u64 << filter_bits) - 1, seed)
    }

    /// Create from a validated configuration, resolving its hash seed
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::with_mask(
            config.k,
            config.heap_capacity(),
            config.filter_mask(),
            config.seed.resolve(),
        )
    }

    // The heap grows on demand; `capacity` may be far larger than the stream
    fn with_mask(k: usize, capacity: usize, mask: u64, seed: u64) -> Self {
        Self {
            k,
            capacity: capacity.max(k),
            mask,
            seed,
            filter: Filter::default(),
            monitored: HashMap::new(),
            heap: IndexedMinHeap::new(),
            total_count: 0,
            admissions: 0,
            evictions: 0,
            rejections: 0,
            collisions: 0,
        }
    }

    /// Get the capacity (monitored-set size)
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The seed the bucket hash uses
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Get the number of distinct items currently tracked
    pub fn num_tracked(&self) -> usize {
        self.heap.len()
    }

    /// Items admitted to the monitored set
    pub fn admissions(&self) -> u64 {
        self.admissions
    }

    /// Monitored items pushed out by a newcomer
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Records folded into a bucket baseline instead of being admitted
    pub fn rejections(&self) -> u64 {
        self.rejections
    }

    /// Records dropped because their bucket is held by a different item
    pub fn collisions(&self) -> u64 {
        self.collisions
    }

    /// Number of filter buckets touched so far
    pub fn buckets(&self) -> usize {
        let occupied_only = self
            .filter
            .occupied
            .keys()
            .filter(|bucket| !self.filter.baseline.contains_key(bucket))
            .count();
        self.filter.baseline.len() + occupied_only
    }

    /// Add one occurrence of an item
    pub fn add(&mut self, item: &T) {
        self.total_count += 1;

        let hash = xxh3_64_with_seed(item.as_ref(), self.seed);
        let bucket = hash & self.mask;

        if self.filter.occupied(bucket) > 0 {
            match self.monitored.get(item) {
                Some(&id) => {
                    self.heap.update(id, |counter| counter.count += 1);
                }
                None => self.collisions += 1,
            }
            return;
        }

        let h_min = self.heap.peek_min().map(|c| c.count).unwrap_or(0);
        let baseline = self.filter.baseline(bucket);

        if self.capacity == 0 || baseline + 1 < h_min {
            *self.filter.baseline.entry(bucket).or_insert(0) += 1;
            self.rejections += 1;
            return;
        }

        if self.heap.len() >= self.capacity {
            self.evict_min();
        }

        let id = self.heap.push(FilteredCounter {
            item: item.clone(),
            bucket_hash: hash,
            count: baseline + 1,
            over_estimate: baseline,
        });
        self.monitored.insert(item.clone(), id);
        *self.filter.occupied.entry(bucket).or_insert(0) += 1;
        self.admissions += 1;
    }

    /// Estimate the frequency of an item (0 if not tracked)
    pub fn estimate(&self, item: &T) -> u64 {
        self.counter(item).map(|c| c.count).unwrap_or(0)
    }

    /// Baseline inherited by an item on admission (0 if not tracked)
    pub fn error(&self, item: &T) -> u64 {
        self.counter(item).map(|c| c.over_estimate).unwrap_or(0)
    }

    /// Check if an item is currently tracked
    pub fn contains(&self, item: &T) -> bool {
        self.monitored.contains_key(item)
    }

    /// Smallest monitored count (0 when nothing is tracked)
    pub fn min_count(&self) -> u64 {
        self.heap.peek_min().map(|c| c.count).unwrap_or(0)
    }

    /// Reset to empty state, keeping the seed
    pub fn clear(&mut self) {
        self.filter = Filter::default();
        self.monitored.clear();
        self.heap.clear();
        self.total_count = 0;
        self.admissions = 0;
        self.evictions = 0;
        self.rejections = 0;
        self.collisions = 0;
    }

    /// Drop the minimum from heap and map, leaving its count as the bucket baseline
    fn evict_min(&mut self) {
        let Some(evicted) = self.heap.pop_min() else {
            return;
        };
        self.monitored.remove(&evicted.item);

        let bucket = evicted.bucket_hash & self.mask;
        self.filter.baseline.insert(bucket, evicted.count);
        if let Some(occupied) = self.filter.occupied.get_mut(&bucket) {
            *occupied = occupied.saturating_sub(1);
        }
        self.evictions += 1;
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> Result<(), &'static str> {
        self.heap.check_invariants()?;
        if self.heap.len() > self.capacity {
            return Err("monitored set exceeds capacity");
        }
        if self.monitored.len() != self.heap.len() {
            return Err("monitored map and heap sizes differ");
        }
        let occupied: u64 = self.filter.occupied.values().map(|&n| u64::from(n)).sum();
        if occupied != self.heap.len() as u64 {
            return Err("occupancy does not match monitored items");
        }
        for (item, &id) in &self.monitored {
            match self.heap.get(id) {
                Some(counter) if &counter.item == item => {}
                _ => return Err("map entry does not point at its counter"),
            }
        }
        Ok(())
    }

    fn counter(&self, item: &T) -> Option<&FilteredCounter<T>> {
        self.monitored.get(item).and_then(|&id| self.heap.get(id))
    }
}

impl<T: AsRef<[u8]> + Hash + Eq + Ord + Clone> FrequencyEngine for FilteredSpaceSaving<T> {
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
        rank(self.heap.iter().collect(), k, FilteredCounter::to_item_count)
    }

    fn stats(&self) -> EngineStats {
        EngineStats {
            records: self.total_count,
            tracked: self.heap.len(),
            capacity: Some(self.capacity),
            admissions: self.admissions,
            evictions: self.evictions,
            rejections: self.rejections + self.collisions,
        }
    }
}
