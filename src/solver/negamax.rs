use std::time::{Duration, Instant};

use crate::engine::eval::{Evaluator, NullEvaluator};
use crate::error::SearchError;
use crate::rules::{Action, Rules, StateOf};
use crate::types::{Value, INF, MATE, MATE_THRESHOLD};

use super::move_order::order_actions;
use super::tt::{Bound, InMemoryTT, TTEntry, TranspositionTable};
use super::tt_array::FixedTT;
use super::{SearchResult, SolverConfig};

/// Recursion guard, counted from the search root.
pub const MAX_PLY: usize = 256;

static NULL_EVAL: NullEvaluator = NullEvaluator;

#[inline]
fn ply_value(ply: usize) -> Value {
    Value::try_from(ply).map_or(MATE / 2, |p| p.min(MATE / 2))
}

/// Mate scores are stored relative to the node so transpositions at another ply stay correct.
#[inline]
fn value_to_tt(v: Value, ply: usize) -> Value {
    let ply = ply_value(ply);
    if v >= MATE_THRESHOLD {
        v + ply
    } else if v <= -MATE_THRESHOLD {
        v - ply
    } else {
        v
    }
}

#[inline]
fn value_from_tt(v: Value, ply: usize) -> Value {
    let ply = ply_value(ply);
    if v >= MATE_THRESHOLD {
        v - ply
    } else if v <= -MATE_THRESHOLD {
        v + ply
    } else {
        v
    }
}

/// Static value at the depth cutoff, from the mover's perspective.
#[inline]
fn cutoff_value<R: Rules>(rules: &R, eval: &dyn Evaluator<R::Board>, state: &StateOf<R>) -> Value {
    rules.current_player(state).sign() * eval.score(state.board())
}

/// Alpha-beta negamax session over one rules provider.
///
/// Conventions:
/// - Values are from the side to move's perspective and negated one ply up.
/// - The table is owned by the solver; `clear()` ends the session.
pub struct Solver<'a, R: Rules> {
    rules: &'a R,
    eval: &'a dyn Evaluator<R::Board>,
    config: SolverConfig,
    tt: Box<dyn TranspositionTable<Action<R>>>,
    nodes: u64,
    deadline: Option<Instant>,
}

impl<'a, R: Rules> Solver<'a, R> {
    pub fn new(rules: &'a R, eval: &'a dyn Evaluator<R::Board>, config: SolverConfig) -> Self {
        let tt: Box<dyn TranspositionTable<Action<R>>> = match config.tt_mib {
            Some(mib) => Box::new(FixedTT::with_budget_mib(mib)),
            None => Box::new(InMemoryTT::default()),
        };
        Self {
            rules,
            eval,
            config,
            tt,
            nodes: 0,
            deadline: None,
        }
    }

    /// Full-depth solver for games that always reach terminal positions.
    pub fn exact(rules: &'a R) -> Self {
        Self::new(rules, &NULL_EVAL, SolverConfig::default())
    }

    #[inline]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Nodes visited by the last search.
    #[inline]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    #[inline]
    pub fn tt(&self) -> &dyn TranspositionTable<Action<R>> {
        self.tt.as_ref()
    }

    pub fn clear(&mut self) {
        self.tt.clear();
        self.nodes = 0;
        self.deadline = None;
    }

    /// Search to `config.limits.max_depth` with the full window.
    pub fn search(&mut self, state: &StateOf<R>) -> Result<SearchResult<Action<R>>, SearchError> {
        let depth = self.config.limits.max_depth;
        let start = Instant::now();
        let (value, best_move) = self.search_with_window(state, depth, -INF, INF)?;

        let mut principal_variation = Vec::new();
        if let Some(best) = &best_move {
            principal_variation.push(best.clone());
            let child = state.play(best)?;
            let max_len = usize::from(depth).min(MAX_PLY).saturating_sub(1);
            principal_variation.extend(reconstruct_pv(self.rules, &child, self.tt(), max_len));
        }

        let stats = self.tt.stats();
        log::debug!(
            "[search] depth={} value={} nodes={} tt_len={} puts={} exact={} lower={} upper={} elapsed_ms={}",
            depth,
            value,
            self.nodes,
            self.tt.len(),
            stats.puts,
            stats.exact_count,
            stats.lower_count,
            stats.upper_count,
            start.elapsed().as_millis()
        );

        Ok(SearchResult {
            value,
            best_move,
            principal_variation,
            nodes: self.nodes,
            depth,
        })
    }

    /// Value and best action of `state`, fail-soft inside `(alpha, beta)`.
    pub fn search_with_window(
        &mut self,
        state: &StateOf<R>,
        depth: u8,
        alpha: Value,
        beta: Value,
    ) -> Result<(Value, Option<Action<R>>), SearchError> {
        self.nodes = 0;
        self.deadline = self
            .config
            .limits
            .time_ms
            .map(|ms| Instant::now() + Duration::from_millis(ms));
        self.negamax(state, depth, 0, alpha, beta)
    }

    fn negamax(
        &mut self,
        state: &StateOf<R>,
        depth: u8,
        ply: usize,
        mut alpha: Value,
        beta: Value,
    ) -> Result<(Value, Option<Action<R>>), SearchError> {
        self.nodes += 1;
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(SearchError::Aborted { nodes: self.nodes });
            }
        }
        if ply > MAX_PLY {
            return Err(SearchError::DepthExceeded { ply });
        }

        if self.rules.is_terminal(state) {
            return Ok((self.rules.terminal_value(state), None));
        }
        if depth == 0 {
            return Ok((cutoff_value(self.rules, self.eval, state), None));
        }

        let key = state.key();
        let game_ply = state.ply();
        let mut tt_best = None;
        if let Some(entry) = self.tt.get(key) {
            if entry.depth == depth {
                let v = value_from_tt(entry.value, game_ply);
                let usable = match entry.flag {
                    Bound::Exact => true,
                    Bound::Lower => v >= beta,
                    Bound::Upper => v <= alpha,
                };
                if usable {
                    return Ok((v, entry.best_move));
                }
            }
            tt_best = entry.best_move;
        }

        let mut actions = self.rules.legal_actions(state);
        if actions.is_empty() {
            return Ok((self.rules.terminal_value(state), None));
        }
        order_actions(
            self.rules,
            self.eval,
            state,
            &mut actions,
            self.config.order,
            tt_best.as_ref(),
        );

        let alpha_orig = alpha;
        let mut best_val = -INF;
        let mut best_move = None;
        for action in actions {
            let child = state.play(&action)?;
            let (child_val, _) = self.negamax(&child, depth - 1, ply + 1, -beta, -alpha)?;
            let v = -child_val;
            if v > best_val {
                best_val = v;
                best_move = Some(action);
            }
            if v > alpha {
                alpha = v;
            }
            if alpha >= beta {
                break;
            }
        }

        let flag = if best_val <= alpha_orig {
            Bound::Upper
        } else if best_val >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.tt.put(
            key,
            TTEntry {
                value: value_to_tt(best_val, game_ply),
                depth,
                flag,
                best_move: best_move.clone(),
            },
        );

        Ok((best_val, best_move))
    }
}

/// Unpruned, uncached negamax to `depth`, with the same cutoff rules as `Solver`.
pub fn minimax<R: Rules>(
    rules: &R,
    eval: &dyn Evaluator<R::Board>,
    state: &StateOf<R>,
    depth: u8,
) -> Result<Value, SearchError> {
    if rules.is_terminal(state) {
        return Ok(rules.terminal_value(state));
    }
    if depth == 0 {
        return Ok(cutoff_value(rules, eval, state));
    }
    let actions = rules.legal_actions(state);
    if actions.is_empty() {
        return Ok(rules.terminal_value(state));
    }
    let mut best = -INF;
    for a in &actions {
        let child = state.play(a)?;
        best = best.max(-minimax(rules, eval, &child, depth - 1)?);
    }
    Ok(best)
}

/// Follow exact best moves stored in `tt`, starting at `state`.
pub fn reconstruct_pv<R: Rules>(
    rules: &R,
    state: &StateOf<R>,
    tt: &dyn TranspositionTable<Action<R>>,
    max_len: usize,
) -> Vec<Action<R>> {
    let mut pv = Vec::new();
    let mut cur = state.clone();
    while pv.len() < max_len && !rules.is_terminal(&cur) {
        let Some(entry) = tt.get(cur.key()) else { break };
        if entry.flag != Bound::Exact {
            break;
        }
        let Some(mv) = entry.best_move else { break };
        let Ok(next) = rules.apply_action(&cur, &mv) else { break };
        pv.push(mv);
        cur = next;
    }
    pv
}
