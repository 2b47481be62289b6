use serde::{Deserialize, Serialize};

use crate::types::{Player, Value};

pub mod backward;
pub mod move_order;
pub mod negamax;
pub mod precompute;
pub mod tt;
pub mod tt_array;

pub use backward::BackwardInduction;
pub use move_order::{order_actions, MoveOrder};
pub use negamax::{minimax, reconstruct_pv, Solver, MAX_PLY};
pub use precompute::{analyze_roots, RootAnalysis};
pub use tt::{Bound, InMemoryTT, TTEntry, TTStats, TranspositionTable};
pub use tt_array::FixedTT;

/// Remaining-depth value meaning "search to terminal positions".
pub const EXACT_DEPTH: u8 = u8::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimits {
    pub max_depth: u8,
    pub time_ms: Option<u64>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_depth: EXACT_DEPTH, // exact solve unless capped
            time_ms: None,          // no time limit by default
        }
    }
}

impl SearchLimits {
    #[inline]
    pub fn depth(max_depth: u8) -> Self {
        Self { max_depth, ..Self::default() }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    pub limits: SearchLimits,
    pub order: MoveOrder,
    /// Use a fixed-size table of this many MiB instead of the growable map.
    pub tt_mib: Option<usize>,
}

/// Value and one-hot policy recorded for a non-terminal position.
#[derive(Debug, Clone, PartialEq)]
pub struct Strategy<A> {
    pub value: Value,
    pub best_action: Option<A>,
    /// Every legal action in rules order; 1.0 on the best one.
    pub distribution: Vec<(A, f64)>,
}

impl<A: Clone + PartialEq> Strategy<A> {
    pub fn one_hot(value: Value, actions: &[A], best: Option<&A>) -> Self {
        let distribution = actions
            .iter()
            .map(|a| (a.clone(), if Some(a) == best { 1.0 } else { 0.0 }))
            .collect();
        Self {
            value,
            best_action: best.cloned(),
            distribution,
        }
    }

    /// Probability assigned to `action` (0.0 when absent).
    pub fn probability(&self, action: &A) -> f64 {
        self.distribution
            .iter()
            .find(|(a, _)| a == action)
            .map_or(0.0, |(_, p)| *p)
    }
}

/// Outcome of a depth-limited search from one root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult<A> {
    /// Root mover's perspective.
    pub value: Value,
    pub best_move: Option<A>,
    pub principal_variation: Vec<A>,
    pub nodes: u64,
    pub depth: u8,
}

/// Convert a mover-relative value to the first player's scale.
#[inline]
pub fn absolute_value(mover: Player, value: Value) -> Value {
    mover.sign() * value
}
