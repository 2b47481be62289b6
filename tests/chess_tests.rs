use gametree::games::chess::{uci, START_FEN};
use gametree::solver::minimax;
use gametree::{
    ChessEvaluator, ChessRules, GameError, Rules, SearchError, SearchLimits, Solver, SolverConfig,
    INF, MATE, MATE_THRESHOLD,
};

const BACK_RANK_MATE: &str = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1";

fn config(depth: u8) -> SolverConfig {
    SolverConfig {
        limits: SearchLimits::depth(depth),
        ..SolverConfig::default()
    }
}

#[test]
fn finds_back_rank_mate_in_one() {
    let rules = ChessRules::from_fen(BACK_RANK_MATE).expect("valid fen");
    let root = rules.root();
    for depth in [1u8, 3] {
        let mut solver = Solver::new(&rules, &ChessEvaluator, config(depth));
        let res = solver.search(&root).expect("no deadline");
        assert!(res.value >= MATE_THRESHOLD, "depth {depth}: value {}", res.value);
        assert_eq!(res.value, MATE - 1, "mate lands one ply from the root");
        let best = res.best_move.as_ref().map(uci);
        assert_eq!(best.as_deref(), Some("a1a8"), "depth {depth}");
        assert_eq!(res.principal_variation.first().map(uci).as_deref(), Some("a1a8"));
    }
}

#[test]
fn checkmated_root_has_no_best_move() {
    let rules = ChessRules::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1").expect("valid fen");
    let root = rules.root();
    assert!(rules.is_terminal(&root));
    assert_eq!(rules.terminal_value(&root), -MATE);

    let mut solver = Solver::new(&rules, &ChessEvaluator, config(2));
    let res = solver.search(&root).expect("no deadline");
    assert_eq!(res.value, -MATE);
    assert!(res.best_move.is_none());
    assert!(res.principal_variation.is_empty());
}

#[test]
fn stalemate_is_a_draw() {
    let rules = ChessRules::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").expect("valid fen");
    let root = rules.root();
    assert!(rules.is_terminal(&root));
    assert_eq!(rules.terminal_value(&root), 0);
    assert!(rules.legal_actions(&root).is_empty());
}

#[test]
fn alpha_beta_equals_minimax_at_small_depths() {
    for fen in [START_FEN, BACK_RANK_MATE, "4k3/8/8/3q4/8/2N5/8/4K3 w - - 0 1"] {
        let rules = ChessRules::from_fen(fen).expect("valid fen");
        let root = rules.root();
        let mut solver = Solver::new(&rules, &ChessEvaluator, config(1));
        for depth in 1..=3u8 {
            let expected = minimax(&rules, &ChessEvaluator, &root, depth).expect("playable");
            let (got, _) = solver
                .search_with_window(&root, depth, -INF, INF)
                .expect("no deadline");
            assert_eq!(got, expected, "fen {fen} depth {depth}");
        }
    }
}

#[test]
fn cached_bounds_from_narrow_windows_do_not_skew_the_full_window() {
    for fen in [START_FEN, BACK_RANK_MATE] {
        let rules = ChessRules::from_fen(fen).expect("valid fen");
        let root = rules.root();
        let expected = minimax(&rules, &ChessEvaluator, &root, 3).expect("playable");
        let mut solver = Solver::new(&rules, &ChessEvaluator, config(3));
        for (alpha, beta) in [(-10, 10), (50, 60)] {
            solver
                .search_with_window(&root, 3, alpha, beta)
                .expect("no deadline");
        }
        let (full, _) = solver
            .search_with_window(&root, 3, -INF, INF)
            .expect("no deadline");
        assert_eq!(full, expected, "fen {fen}");
    }
}

#[test]
fn fixed_table_matches_growable_map() {
    let rules = ChessRules::default();
    let root = rules.root();
    let mut map_solver = Solver::new(&rules, &ChessEvaluator, config(3));
    let mut fixed_solver = Solver::new(
        &rules,
        &ChessEvaluator,
        SolverConfig {
            tt_mib: Some(1),
            ..config(3)
        },
    );
    let a = map_solver.search(&root).expect("no deadline");
    let b = fixed_solver.search(&root).expect("no deadline");
    assert_eq!(a.value, b.value);
}

#[test]
fn expired_deadline_aborts() {
    let rules = ChessRules::default();
    let root = rules.root();
    let cfg = SolverConfig {
        limits: SearchLimits {
            max_depth: 6,
            time_ms: Some(0),
        },
        ..SolverConfig::default()
    };
    let mut solver = Solver::new(&rules, &ChessEvaluator, cfg);
    let err = solver.search(&root).expect_err("deadline already passed");
    assert!(matches!(err, SearchError::Aborted { .. }), "got {err:?}");
}

#[test]
fn moves_are_validated_by_the_rules_library() {
    let rules = ChessRules::default();
    let root = rules.root();
    let e4 = rules.find_move(&root, "e2e4").expect("e2e4 is legal");
    let after = rules.apply_action(&root, &e4).expect("legal");
    assert_eq!(after.ply(), 1);
    assert_eq!(rules.legal_actions(&root).len(), 20);

    // e2e4 again from the new position is not legal for black
    let again = rules.apply_action(&after, &e4);
    assert!(matches!(again, Err(GameError::IllegalAction { .. })), "got {again:?}");

    assert!(matches!(ChessRules::from_fen("not a fen"), Err(GameError::InvalidFen(_))));
}

#[test]
fn transposed_move_orders_share_the_key() {
    let rules = ChessRules::default();
    let play = |moves: &[&str]| {
        let mut s = rules.root();
        for m in moves {
            let mv = rules.find_move(&s, m).expect("legal");
            s = rules.apply_action(&s, &mv).expect("legal");
        }
        s
    };
    let a = play(&["g1f3", "g8f6", "b1c3"]);
    let b = play(&["b1c3", "g8f6", "g1f3"]);
    assert_eq!(a.key(), b.key());
    assert_eq!(a.canonical(), b.canonical());
}

#[test]
fn white_is_the_maximizer() {
    let white = ChessRules::default();
    assert!(white.is_maximizer(white.current_player(&white.root())));
    let black = ChessRules::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1").expect("valid fen");
    assert!(!black.is_maximizer(black.current_player(&black.root())));
}
