use std::mem::size_of;

use super::tt::{TTEntry, TTStats, TranspositionTable};
use crate::hash::spread_key;

/// Fixed-size direct-mapped transposition table.
/// - Capacity is a power of two
/// - Index = spread(key) & mask
/// - Replacement: depth-preferred (replace if new.depth >= old.depth)
/// - Stores the full 128-bit key for verification
pub struct FixedTT<A> {
    mask: usize,
    slots: Vec<Option<(u128, TTEntry<A>)>>,
    count: usize,
    stats: TTStats,
}

impl<A: Clone> FixedTT<A> {
    /// Capacity is rounded up to the next power of two (at least 1).
    pub fn with_capacity_pow2(cap: usize) -> Self {
        let cap = cap.max(1).next_power_of_two();
        Self {
            mask: cap - 1,
            slots: vec![None; cap],
            count: 0,
            stats: TTStats::default(),
        }
    }

    /// Convenience: construct a table using a MiB budget (rounded down to a power-of-two capacity).
    #[inline]
    pub fn with_budget_mib(mib: usize) -> Self {
        let budget = mib.saturating_mul(1024 * 1024);
        Self::with_capacity_pow2(Self::capacity_for_budget_bytes(budget))
    }
}

impl<A> FixedTT<A> {
    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn index(&self, key: u128) -> usize {
        (spread_key(key) as usize) & self.mask
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Approximate bytes per slot.
    #[inline]
    pub fn bytes_per_entry() -> usize {
        size_of::<Option<(u128, TTEntry<A>)>>()
    }

    /// Largest power-of-two capacity that fits under the provided budget (in bytes).
    /// Returns at least 1.
    #[inline]
    pub fn capacity_for_budget_bytes(budget_bytes: usize) -> usize {
        let bpe = Self::bytes_per_entry();
        if bpe == 0 || budget_bytes < bpe {
            return 1;
        }
        let max_entries = budget_bytes / bpe;
        // round down to the nearest power of two
        let cap = (max_entries + 1).next_power_of_two() >> 1;
        cap.max(1)
    }

    /// Approximate total bytes for a given capacity.
    #[inline]
    pub fn approx_bytes_for_capacity(capacity: usize) -> usize {
        capacity.saturating_mul(Self::bytes_per_entry())
    }
}

impl<A: Clone> TranspositionTable<A> for FixedTT<A> {
    #[inline]
    fn get(&self, key: u128) -> Option<TTEntry<A>> {
        match &self.slots[self.index(key)] {
            Some((k, e)) if *k == key => Some(e.clone()),
            _ => None,
        }
    }

    #[inline]
    fn put(&mut self, key: u128, entry: TTEntry<A>) {
        self.stats.record_put(entry.flag);
        let idx = self.index(key);
        let slot = &mut self.slots[idx];
        match slot {
            None => {
                *slot = Some((key, entry));
                self.count += 1;
            }
            Some((k, old)) => {
                // Same key or collision: the deeper entry stays resident
                if entry.depth >= old.depth {
                    *k = key;
                    *old = entry;
                    self.stats.replaced = self.stats.replaced.saturating_add(1);
                } else {
                    self.stats.rejected = self.stats.rejected.saturating_add(1);
                }
            }
        }
    }

    #[inline]
    fn clear(&mut self) {
        for s in &mut self.slots {
            *s = None;
        }
        self.count = 0;
        self.stats = TTStats::default();
    }

    #[inline]
    fn len(&self) -> usize {
        self.count
    }

    #[inline]
    fn stats(&self) -> TTStats {
        self.stats
    }
}
