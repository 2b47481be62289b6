use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::engine::eval::Evaluator;
use crate::rules::{Action, Rules, StateOf};
use crate::types::Value;

/// Child expansion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOrder {
    /// Rules-provider order.
    #[default]
    Natural,
    Reversed,
    /// Highest one-ply estimate first.
    BestFirst,
    /// Lowest one-ply estimate first.
    WorstFirst,
}

/// One-ply estimate of `action` from the mover's perspective:
/// the exact value when the child is terminal, the static score otherwise.
fn estimate<R: Rules>(
    rules: &R,
    eval: &dyn Evaluator<R::Board>,
    state: &StateOf<R>,
    action: &Action<R>,
) -> Value {
    let mover = rules.current_player(state);
    match state.play(action) {
        Ok(child) if rules.is_terminal(&child) => -rules.terminal_value(&child),
        Ok(child) => mover.sign() * eval.score(child.board()),
        Err(_) => Value::MIN,
    }
}

/// Deterministic move ordering:
/// - Sorted per `order` (stable, so ties keep the rules order)
/// - TT best move first (if provided and present), others keep their relative order
pub fn order_actions<R: Rules>(
    rules: &R,
    eval: &dyn Evaluator<R::Board>,
    state: &StateOf<R>,
    actions: &mut Vec<Action<R>>,
    order: MoveOrder,
    tt_best: Option<&Action<R>>,
) {
    match order {
        MoveOrder::Natural => {}
        MoveOrder::Reversed => actions.reverse(),
        MoveOrder::BestFirst | MoveOrder::WorstFirst => {
            let mut scored: Vec<(Value, Action<R>)> = actions
                .drain(..)
                .map(|a| (estimate(rules, eval, state, &a), a))
                .collect();
            if order == MoveOrder::BestFirst {
                scored.sort_by_key(|(v, _)| Reverse(*v));
            } else {
                scored.sort_by_key(|(v, _)| *v);
            }
            actions.extend(scored.into_iter().map(|(_, a)| a));
        }
    }

    // If TT suggests a best move, place it first
    if let Some(best) = tt_best {
        if let Some(pos) = actions.iter().position(|m| m == best) {
            actions[..=pos].rotate_right(1);
        }
    }
}
