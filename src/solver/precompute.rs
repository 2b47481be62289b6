use std::time::Instant;

use indicatif::ProgressBar;
use rayon::prelude::*;

use crate::engine::eval::Evaluator;
use crate::error::SearchError;
use crate::rules::{Action, Rules, StateOf};
use crate::types::{Value, INF};

use super::negamax::Solver;
use super::SolverConfig;

/// Value of playing `action` at the analysed root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootAnalysis<A> {
    pub action: A,
    /// Root mover's perspective.
    pub value: Value,
    pub nodes: u64,
}

fn analyze_one<R: Rules>(
    rules: &R,
    eval: &dyn Evaluator<R::Board>,
    state: &StateOf<R>,
    config: &SolverConfig,
    action: &Action<R>,
) -> Result<RootAnalysis<Action<R>>, SearchError> {
    let child = rules.apply_action(state, action)?;
    let mut solver = Solver::new(rules, eval, *config);
    let depth = config.limits.max_depth.saturating_sub(1);
    let (v, _) = solver.search_with_window(&child, depth, -INF, INF)?;
    Ok(RootAnalysis {
        action: action.clone(),
        value: -v,
        nodes: solver.nodes(),
    })
}

/// Full-window value of every root action, in legal-action order.
///
/// Strategy:
/// - Enumerate root actions in rules order
/// - With `parallel`, map over them with rayon; each worker owns its solver and table
/// - Results are collected in input order, so output is deterministic either way
pub fn analyze_roots<R: Rules>(
    rules: &R,
    eval: &dyn Evaluator<R::Board>,
    state: &StateOf<R>,
    config: &SolverConfig,
    parallel: bool,
    progress: Option<&ProgressBar>,
) -> Result<Vec<RootAnalysis<Action<R>>>, SearchError> {
    let start = Instant::now();
    let roots = rules.legal_actions(state);
    if let Some(pb) = progress {
        pb.set_length(u64::try_from(roots.len()).unwrap_or(u64::MAX));
    }

    let run = |action: &Action<R>| {
        let res = analyze_one(rules, eval, state, config, action);
        if let Some(pb) = progress {
            pb.inc(1);
        }
        res
    };

    let results: Vec<RootAnalysis<Action<R>>> = if parallel {
        roots.par_iter().map(run).collect::<Result<_, _>>()?
    } else {
        roots.iter().map(run).collect::<Result<_, _>>()?
    };

    let nodes: u64 = results.iter().map(|r| r.nodes).sum();
    log::info!(
        "[precompute] roots={} nodes={} parallel={} elapsed_ms={}",
        results.len(),
        nodes,
        parallel,
        start.elapsed().as_millis()
    );
    Ok(results)
}
