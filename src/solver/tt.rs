use std::hash::BuildHasherDefault;

use hashbrown::HashMap as HbHashMap;

use crate::types::Value;

type FastHasher = BuildHasherDefault<ahash::AHasher>;

/// Bound type used for alpha-beta aware TT entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    Lower, // fail-high: true value >= stored value
    Upper, // fail-low: true value <= stored value
}

/// Transposition table entry storing value bounds, depth, and the best move for ordering/PV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TTEntry<A> {
    pub value: Value,          // side-to-move perspective, mate scores node-relative
    pub depth: u8,             // remaining search depth when stored
    pub flag: Bound,           // Exact / Lower / Upper
    pub best_move: Option<A>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TTStats {
    pub puts: u64,
    pub replaced: u64,
    pub rejected: u64,
    pub exact_count: u64,
    pub lower_count: u64,
    pub upper_count: u64,
}

impl TTStats {
    #[inline]
    pub(crate) fn record_put(&mut self, flag: Bound) {
        self.puts = self.puts.saturating_add(1);
        match flag {
            Bound::Exact => self.exact_count = self.exact_count.saturating_add(1),
            Bound::Lower => self.lower_count = self.lower_count.saturating_add(1),
            Bound::Upper => self.upper_count = self.upper_count.saturating_add(1),
        }
    }
}

/// Position-keyed cache scoped to one solve session.
pub trait TranspositionTable<A> {
    fn get(&self, key: u128) -> Option<TTEntry<A>>;
    fn put(&mut self, key: u128, entry: TTEntry<A>);
    fn clear(&mut self);
    fn len(&self) -> usize;
    fn stats(&self) -> TTStats;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Hash map implementation with depth-preferred replacement.
#[derive(Debug)]
pub struct InMemoryTT<A> {
    map: HbHashMap<u128, TTEntry<A>, FastHasher>,
    stats: TTStats,
}

impl<A> Default for InMemoryTT<A> {
    fn default() -> Self {
        Self {
            map: HbHashMap::default(),
            stats: TTStats::default(),
        }
    }
}

impl<A> InMemoryTT<A> {
    #[inline]
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            map: HbHashMap::with_capacity_and_hasher(cap, FastHasher::default()),
            stats: TTStats::default(),
        }
    }
}

impl<A: Clone> TranspositionTable<A> for InMemoryTT<A> {
    #[inline]
    fn get(&self, key: u128) -> Option<TTEntry<A>> {
        self.map.get(&key).cloned()
    }

    #[inline]
    fn put(&mut self, key: u128, entry: TTEntry<A>) {
        self.stats.record_put(entry.flag);

        // Depth-preferred replacement: replace if new.depth >= old.depth
        match self.map.get_mut(&key) {
            Some(old) if entry.depth >= old.depth => {
                *old = entry;
                self.stats.replaced = self.stats.replaced.saturating_add(1);
            }
            Some(_) => self.stats.rejected = self.stats.rejected.saturating_add(1),
            None => {
                self.map.insert(key, entry);
            }
        }
    }

    #[inline]
    fn clear(&mut self) {
        self.map.clear();
        self.stats = TTStats::default();
    }

    #[inline]
    fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    fn stats(&self) -> TTStats {
        self.stats
    }
}
