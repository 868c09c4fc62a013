//! Merge result cache.
//!
//! [`MergeCache`] memoizes merged conditioning sets keyed by the
//! [`Fingerprint`] of their inputs, so re-running a graph whose region inputs
//! did not change skips the mask painting entirely.
//!
//! # Usage
//!
//! ```
//! use regcond::{ConditioningEntry, ConditioningSet, MergeCache, RegionDescriptor};
//! use regcond_core::geometry::Canvas;
//!
//! let mut cache = MergeCache::new(16);
//! let cond: ConditioningSet<String> = vec![ConditioningEntry::new("e1".to_owned())].into();
//! let slots = [Some(RegionDescriptor::pixels(cond, 0, 0, 64, 64, 1.0))];
//!
//! let first = cache.merge(Canvas::new(512, 512), &slots).unwrap();
//! let second = cache.merge(Canvas::new(512, 512), &slots).unwrap();
//!
//! assert!(first.ptr_eq(&second));
//! assert_eq!(cache.stats().hits, 1);
//! ```
//!
//! # Invalidation
//!
//! Inputs are part of the key, so a changed region never hits a stale entry.
//! [`MergeCache::invalidate_all`] exists for callers that swap embeddings
//! behind an unchanged serialized form.
//!
//! # Cache Eviction
//!
//! When full, the entry with the fewest accesses is evicted.

use regcond_core::geometry::Canvas;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::conditioning::ConditioningSet;
use crate::fingerprint::{Fingerprint, merge_fingerprint};
use crate::merge::merge_regions;
use crate::region::RegionDescriptor;

/// Cached merge result with metadata for eviction.
#[derive(Debug)]
struct CachedMerge<E> {
    merged: ConditioningSet<E>,
    /// Generation when this entry was created.
    generation: u64,
    /// Access count for LRU eviction.
    access_count: u32,
}

/// Statistics about merge cache performance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeCacheStats {
    /// Number of entries currently in the cache.
    pub entries: usize,
    /// Total cache hits since creation or last reset.
    pub hits: u64,
    /// Total cache misses since creation or last reset.
    pub misses: u64,
    /// Hit rate as a fraction (0.0 to 1.0).
    pub hit_rate: f64,
}

/// Capacity-bounded memo of merge results.
#[derive(Debug)]
pub struct MergeCache<E> {
    entries: FxHashMap<Fingerprint, CachedMerge<E>>,
    generation: u64,
    max_entries: usize,
    hits: u64,
    misses: u64,
}

impl<E> MergeCache<E> {
    /// Create a cache holding at most `max_entries` results (minimum 1).
    pub fn new(max_entries: usize) -> Self {
        let max_entries = max_entries.max(1);
        Self {
            entries: FxHashMap::with_capacity_and_hasher(max_entries, Default::default()),
            generation: 0,
            max_entries,
            hits: 0,
            misses: 0,
        }
    }

    /// Get the cached set for `key` or compute and cache a new one.
    ///
    /// The returned set shares its allocation with the cached copy.
    pub fn get_or_compute<F>(&mut self, key: Fingerprint, compute: F) -> ConditioningSet<E>
    where
        F: FnOnce() -> ConditioningSet<E>,
    {
        if let Some(entry) = self.entries.get_mut(&key)
            && entry.generation == self.generation
        {
            self.hits += 1;
            entry.access_count = entry.access_count.saturating_add(1);

            #[cfg(feature = "tracing")]
            tracing::trace!(%key, "merge cache hit");

            return entry.merged.clone();
        }

        self.misses += 1;

        #[cfg(feature = "tracing")]
        tracing::trace!(%key, "merge cache miss");

        let merged = compute();

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.evict_lru();
        }
        self.entries.insert(
            key,
            CachedMerge {
                merged: merged.clone(),
                generation: self.generation,
                access_count: 1,
            },
        );

        merged
    }

    /// Invalidate all entries by bumping the generation.
    ///
    /// O(1): stale entries are replaced on their next access.
    #[inline]
    pub fn invalidate_all(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn stats(&self) -> MergeCacheStats {
        let total = self.hits + self.misses;
        MergeCacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
            hit_rate: if total > 0 {
                self.hits as f64 / total as f64
            } else {
                0.0
            },
        }
    }

    #[inline]
    pub fn reset_stats(&mut self) {
        self.hits = 0;
        self.misses = 0;
    }

    /// Drop every entry immediately.
    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    /// Drop stale generations first; evict by access count only if the
    /// cache is still full.
    fn evict_lru(&mut self) {
        let generation = self.generation;
        self.entries.retain(|_, e| e.generation == generation);
        if self.entries.len() < self.max_entries {
            return;
        }
        if let Some(key) = self
            .entries
            .iter()
            .min_by_key(|(_, e)| e.access_count)
            .map(|(k, _)| *k)
        {
            self.entries.remove(&key);
        }
    }
}

impl<E: Serialize> MergeCache<E> {
    /// Fingerprint the inputs and merge through the cache.
    pub fn merge(
        &mut self,
        canvas: Canvas,
        slots: &[Option<RegionDescriptor<E>>],
    ) -> Result<ConditioningSet<E>, serde_json::Error> {
        let key = merge_fingerprint(canvas, slots)?;
        Ok(self.get_or_compute(key, || merge_regions(canvas, slots)))
    }
}

impl<E> Default for MergeCache<E> {
    /// Creates a cache with default capacity of 64 entries.
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditioning::ConditioningEntry;

    fn slots(label: &str, x: u32) -> [Option<RegionDescriptor<String>>; 1] {
        let cond: ConditioningSet<String> = vec![ConditioningEntry::new(label.to_owned())].into();
        [Some(RegionDescriptor::pixels(cond, x, 0, 16, 16, 1.0))]
    }

    #[test]
    fn repeated_merge_hits() {
        let mut cache = MergeCache::new(4);
        let canvas = Canvas::new(64, 64);
        let a = cache.merge(canvas, &slots("e", 0)).unwrap();
        let b = cache.merge(canvas, &slots("e", 0)).unwrap();
        assert!(a.ptr_eq(&b));
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.stats().hit_rate, 0.5);
    }

    #[test]
    fn changed_inputs_miss() {
        let mut cache = MergeCache::new(4);
        let canvas = Canvas::new(64, 64);
        cache.merge(canvas, &slots("e", 0)).unwrap();
        cache.merge(canvas, &slots("e", 1)).unwrap();
        cache.merge(Canvas::new(65, 64), &slots("e", 0)).unwrap();
        assert_eq!(cache.stats().misses, 3);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn invalidate_forces_recompute() {
        let mut cache = MergeCache::new(4);
        let canvas = Canvas::new(64, 64);
        let a = cache.merge(canvas, &slots("e", 0)).unwrap();
        cache.invalidate_all();
        let b = cache.merge(canvas, &slots("e", 0)).unwrap();
        assert!(!a.ptr_eq(&b));
        assert_eq!(a, b);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn capacity_evicts_least_used() {
        let mut cache = MergeCache::new(2);
        let canvas = Canvas::new(32, 32);
        cache.merge(canvas, &slots("hot", 0)).unwrap();
        cache.merge(canvas, &slots("hot", 0)).unwrap();
        cache.merge(canvas, &slots("cold", 0)).unwrap();
        cache.merge(canvas, &slots("new", 0)).unwrap();
        assert_eq!(cache.len(), 2);

        cache.reset_stats();
        cache.merge(canvas, &slots("hot", 0)).unwrap();
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn stale_entries_are_evicted_before_fresh_ones() {
        let mut cache = MergeCache::new(2);
        let canvas = Canvas::new(32, 32);
        for _ in 0..5 {
            cache.merge(canvas, &slots("hot", 0)).unwrap();
        }
        cache.invalidate_all();
        cache.merge(canvas, &slots("a", 0)).unwrap();
        cache.merge(canvas, &slots("b", 0)).unwrap();
        assert_eq!(cache.len(), 2);

        cache.reset_stats();
        cache.merge(canvas, &slots("b", 0)).unwrap();
        cache.merge(canvas, &slots("a", 0)).unwrap();
        assert_eq!(cache.stats().hits, 2);
        assert_eq!(cache.stats().misses, 0);
    }

    #[test]
    fn clear_empties() {
        let mut cache = MergeCache::default();
        cache.merge(Canvas::new(8, 8), &slots("e", 0)).unwrap();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 64);
    }
}
