use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use gametree::solver::{minimax, MoveOrder};
use gametree::{
    GameState, Notakto, NullEvaluator, Rules, SearchLimits, Solver, SolverConfig, StateOf,
    TicTacToe, TicTacToeBoard, Value, INF,
};

/// Play `plies` random legal actions from the root, stopping early at a terminal.
fn random_playout<R: Rules>(rules: &R, seed: u64, plies: usize) -> StateOf<R> {
    let mut rng = Pcg64::seed_from_u64(seed);
    let mut state = rules.root();
    for _ in 0..plies {
        let actions = rules.legal_actions(&state);
        if actions.is_empty() {
            break;
        }
        let pick = &actions[rng.gen_range(0..actions.len())];
        state = rules.apply_action(&state, pick).expect("legal action");
    }
    state
}

fn config(depth: u8, order: MoveOrder) -> SolverConfig {
    SolverConfig {
        limits: SearchLimits::depth(depth),
        order,
        tt_mib: None,
    }
}

#[test]
fn tictactoe_alpha_beta_equals_minimax_at_every_depth() {
    let rules = TicTacToe;
    for seed in 0..6u64 {
        let state = random_playout(&rules, seed, 1 + (seed as usize % 3));
        for order in [MoveOrder::Natural, MoveOrder::Reversed, MoveOrder::BestFirst] {
            // one session across depths: cached entries must not leak between depths
            let mut solver = Solver::new(&rules, &NullEvaluator, config(1, order));
            for depth in 1..=9u8 {
                let expected = minimax(&rules, &NullEvaluator, &state, depth).expect("playable");
                let (got, _) = solver
                    .search_with_window(&state, depth, -INF, INF)
                    .expect("no limits");
                assert_eq!(
                    got, expected,
                    "seed {seed} order {order:?} depth {depth} history {:?}",
                    state.history()
                );
            }
        }
    }
}

#[test]
fn notakto_alpha_beta_equals_minimax_on_random_positions() {
    let rules = Notakto::new(2).expect("valid board count");
    for seed in 10..14u64 {
        let state = random_playout(&rules, seed, 6);
        let mut solver = Solver::new(&rules, &NullEvaluator, config(1, MoveOrder::Natural));
        for depth in 1..=3u8 {
            let expected = minimax(&rules, &NullEvaluator, &state, depth).expect("playable");
            let (got, _) = solver
                .search_with_window(&state, depth, -INF, INF)
                .expect("no limits");
            assert_eq!(got, expected, "seed {seed} depth {depth}");
        }
    }
}

#[test]
fn exact_search_equals_full_minimax_from_random_positions() {
    let rules = TicTacToe;
    for seed in 20..26u64 {
        let state = random_playout(&rules, seed, 2);
        let expected = minimax(&rules, &NullEvaluator, &state, u8::MAX).expect("playable");
        let mut solver = Solver::exact(&rules);
        let res = solver.search(&state).expect("no limits");
        assert_eq!(res.value, expected, "seed {seed}");
        if let Some(best) = &res.best_move {
            let child = rules.apply_action(&state, best).expect("legal");
            let child_value = minimax(&rules, &NullEvaluator, &child, u8::MAX).expect("playable");
            assert_eq!(-child_value, expected, "best move attains the value");
        }
    }
}

/// Tic-tac-toe whose action lists are sorted by exact child value.
struct Oracle {
    values: HashMap<u128, Value>,
    best_first: bool,
}

impl Oracle {
    fn new(best_first: bool) -> Self {
        fn fill(rules: &TicTacToe, state: &StateOf<TicTacToe>, memo: &mut HashMap<u128, Value>) -> Value {
            if let Some(v) = memo.get(&state.key()) {
                return *v;
            }
            let v = if rules.is_terminal(state) {
                rules.terminal_value(state)
            } else {
                rules
                    .legal_actions(state)
                    .iter()
                    .map(|a| -fill(rules, &state.play(a).expect("legal"), memo))
                    .max()
                    .expect("non-terminal has actions")
            };
            memo.insert(state.key(), v);
            v
        }
        let mut values = HashMap::new();
        fill(&TicTacToe, &TicTacToe.root(), &mut values);
        Self { values, best_first }
    }
}

impl Rules for Oracle {
    type Board = TicTacToeBoard;

    fn root(&self) -> StateOf<Self> {
        GameState::new(TicTacToeBoard::new())
    }

    fn is_terminal(&self, state: &StateOf<Self>) -> bool {
        TicTacToe.is_terminal(state)
    }

    fn terminal_value(&self, state: &StateOf<Self>) -> Value {
        TicTacToe.terminal_value(state)
    }

    fn legal_actions(&self, state: &StateOf<Self>) -> Vec<u8> {
        let mut actions = TicTacToe.legal_actions(state);
        // mover's value of each child, highest first for best-first
        actions.sort_by_key(|a| {
            let child = state.play(a).expect("legal");
            let mover_value = -self.values[&child.key()];
            if self.best_first {
                -mover_value
            } else {
                mover_value
            }
        });
        actions
    }

    fn action_id(&self, action: &u8) -> String {
        action.to_string()
    }
}

#[test]
fn better_ordering_never_expands_more_nodes() {
    let best = Oracle::new(true);
    let worst = Oracle::new(false);
    let mut best_solver = Solver::exact(&best);
    let mut worst_solver = Solver::exact(&worst);

    let b = best_solver.search(&best.root()).expect("no limits");
    let w = worst_solver.search(&worst.root()).expect("no limits");
    assert_eq!(b.value, 0);
    assert_eq!(w.value, 0);
    assert!(
        b.nodes <= w.nodes,
        "best-first expanded {} nodes, worst-first {}",
        b.nodes,
        w.nodes
    );
}

#[test]
fn narrow_window_fails_soft_on_the_right_side() {
    let rules = TicTacToe;
    let root = rules.root();
    let mut solver = Solver::exact(&rules);
    // true value 0: a window above it fails low, one below fails high
    let (low, _) = solver.search_with_window(&root, u8::MAX, 1, 2).expect("no limits");
    assert!(low <= 1, "fail-low bound {low}");
    solver.clear();
    let (high, _) = solver.search_with_window(&root, u8::MAX, -2, -1).expect("no limits");
    assert!(high >= -1, "fail-high bound {high}");
    solver.clear();
    let (exact, _) = solver.search_with_window(&root, u8::MAX, -INF, INF).expect("no limits");
    assert_eq!(exact, 0);
}

#[test]
fn one_session_narrow_windows_then_full_window_matches_minimax() {
    let rules = TicTacToe;
    let windows = [(1, 2), (-2, -1), (0, 1), (-1, 0), (-1, 1)];
    for seed in 30..36u64 {
        let state = random_playout(&rules, seed, seed as usize % 4);
        let expected = minimax(&rules, &NullEvaluator, &state, u8::MAX).expect("playable");
        // bound entries from the narrow windows stay cached for the full search
        let mut solver = Solver::exact(&rules);
        for (alpha, beta) in windows {
            let (v, _) = solver
                .search_with_window(&state, u8::MAX, alpha, beta)
                .expect("no limits");
            if v <= alpha {
                assert!(expected <= v, "seed {seed} window ({alpha},{beta}): fail-low {v} vs {expected}");
            } else if v >= beta {
                assert!(expected >= v, "seed {seed} window ({alpha},{beta}): fail-high {v} vs {expected}");
            } else {
                assert_eq!(v, expected, "seed {seed} window ({alpha},{beta})");
            }
        }
        let (full, _) = solver
            .search_with_window(&state, u8::MAX, -INF, INF)
            .expect("no limits");
        assert_eq!(full, expected, "seed {seed} history {:?}", state.history());
    }
}
