use std::collections::BTreeMap;
use std::hash::BuildHasherDefault;

use hashbrown::HashMap as HbHashMap;

use crate::error::SearchError;
use crate::persist::StrategyTables;
use crate::rules::{Action, Rules, StateOf};
use crate::types::{Player, Value};

use super::negamax::MAX_PLY;
use super::Strategy;

type FastHasher = BuildHasherDefault<ahash::AHasher>;

/// Strategy plus what is needed to export it.
#[derive(Debug, Clone)]
struct Solved<A> {
    canonical: String,
    player: Player,
    strategy: Strategy<A>,
}

/// One expanded position on the explicit stack.
struct Frame<R: Rules> {
    state: StateOf<R>,
    actions: Vec<Action<R>>,
    next: usize,
    best_val: Value,
    best_idx: Option<usize>,
}

impl<R: Rules> Frame<R> {
    fn new(state: StateOf<R>, actions: Vec<Action<R>>) -> Self {
        Self {
            state,
            actions,
            next: 0,
            best_val: Value::MIN,
            best_idx: None,
        }
    }

    /// Fold in the value of the child reached by `actions[next]`.
    #[inline]
    fn absorb(&mut self, child_value: Value) {
        let v = -child_value;
        if v > self.best_val {
            self.best_val = v;
            self.best_idx = Some(self.next);
        }
        self.next += 1;
    }
}

/// Exact backward induction without pruning.
///
/// Every non-terminal position reached gets a one-hot strategy on its first
/// visit; later visits through a transposition reuse it.
pub struct BackwardInduction<'a, R: Rules> {
    rules: &'a R,
    table: HbHashMap<u128, Solved<Action<R>>, FastHasher>,
    nodes: u64,
}

impl<'a, R: Rules> BackwardInduction<'a, R> {
    pub fn new(rules: &'a R) -> Self {
        Self {
            rules,
            table: HbHashMap::default(),
            nodes: 0,
        }
    }

    /// Value of `state` for the player to move.
    pub fn solve(&mut self, state: &StateOf<R>) -> Result<Value, SearchError> {
        self.nodes += 1;
        if self.rules.is_terminal(state) {
            return Ok(self.rules.terminal_value(state));
        }
        if let Some(solved) = self.table.get(&state.key()) {
            return Ok(solved.strategy.value);
        }
        let actions = self.rules.legal_actions(state);
        if actions.is_empty() {
            return Ok(self.rules.terminal_value(state));
        }

        let mut stack: Vec<Frame<R>> = vec![Frame::new(state.clone(), actions)];
        let mut pending: Option<Value> = None;
        let mut root_value = 0;

        while let Some(top) = stack.last_mut() {
            if let Some(v) = pending.take() {
                top.absorb(v);
            }

            if top.next < top.actions.len() {
                let child = top.state.play(&top.actions[top.next])?;
                self.nodes += 1;
                if self.rules.is_terminal(&child) {
                    pending = Some(self.rules.terminal_value(&child));
                    continue;
                }
                if let Some(solved) = self.table.get(&child.key()) {
                    pending = Some(solved.strategy.value);
                    continue;
                }
                let actions = self.rules.legal_actions(&child);
                if actions.is_empty() {
                    pending = Some(self.rules.terminal_value(&child));
                    continue;
                }
                if stack.len() > MAX_PLY {
                    return Err(SearchError::DepthExceeded { ply: stack.len() });
                }
                stack.push(Frame::new(child, actions));
                continue;
            }

            let Some(frame) = stack.pop() else { break };
            let value = frame.best_val;
            self.record(frame);
            pending = Some(value);
            root_value = value;
        }

        log::debug!(
            "[backward] value={} positions={} nodes={}",
            root_value,
            self.table.len(),
            self.nodes
        );
        Ok(root_value)
    }

    fn record(&mut self, frame: Frame<R>) {
        let best = frame.best_idx.map(|i| &frame.actions[i]);
        let strategy = Strategy::one_hot(frame.best_val, &frame.actions, best);
        let solved = Solved {
            canonical: frame.state.canonical(),
            player: self.rules.current_player(&frame.state),
            strategy,
        };
        self.table.insert(frame.state.key(), solved);
    }

    /// Strategy recorded for `state`, if it was reached by a solve.
    #[inline]
    pub fn strategy(&self, state: &StateOf<R>) -> Option<&Strategy<Action<R>>> {
        self.table.get(&state.key()).map(|s| &s.strategy)
    }

    /// Per-role tables keyed by canonical position, then by action id.
    pub fn strategy_tables(&self) -> StrategyTables {
        let mut tables = StrategyTables::default();
        for solved in self.table.values() {
            let row: BTreeMap<String, f64> = solved
                .strategy
                .distribution
                .iter()
                .map(|(a, p)| (self.rules.action_id(a), *p))
                .collect();
            let target = match solved.player {
                Player::First => &mut tables.first,
                Player::Second => &mut tables.second,
            };
            target.insert(solved.canonical.clone(), row);
        }
        tables
    }

    /// Canonical position → value for the player to move.
    pub fn values(&self) -> BTreeMap<String, Value> {
        self.table
            .values()
            .map(|s| (s.canonical.clone(), s.strategy.value))
            .collect()
    }

    /// Positions with a recorded strategy.
    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn clear(&mut self) {
        self.table.clear();
        self.nodes = 0;
    }
}
