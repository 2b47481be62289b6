use gametree::games::notakto::MAX_BOARDS;
use gametree::solver::{absolute_value, analyze_roots};
use gametree::{
    BackwardInduction, GameError, GameState, Notakto, NotaktoBoards, NullEvaluator, Player, Rules,
    Solver, SolverConfig,
};

#[test]
fn single_board_first_player_wins_with_center_only() {
    let rules = Notakto::new(1).expect("valid board count");
    let root = rules.root();
    let mut solver = Solver::exact(&rules);
    let res = solver.search(&root).expect("no limits");
    assert_eq!(res.value, 1, "first player wins single-board notakto");
    assert_eq!(res.best_move, Some(4), "center opening");

    let roots = analyze_roots(&rules, &NullEvaluator, &root, &SolverConfig::default(), false, None)
        .expect("no limits");
    let actions: Vec<u8> = roots.iter().map(|r| r.action).collect();
    assert_eq!(actions, vec![4, 0, 2, 6, 8, 1, 3, 5, 7], "center, corners, edges");
    for r in &roots {
        let expected = if r.action == 4 { 1 } else { -1 };
        assert_eq!(r.value, expected, "root action {}", r.action);
    }
}

#[test]
fn two_boards_second_player_wins() {
    let rules = Notakto::new(2).expect("valid board count");
    let root = rules.root();
    let mut solver = Solver::exact(&rules);
    let res = solver.search(&root).expect("no limits");
    assert_eq!(absolute_value(rules.current_player(&root), res.value), -1);
    // every opening loses; the first listed one is reported
    assert_eq!(res.best_move, Some(4));
}

#[test]
fn parallel_root_analysis_matches_sequential() {
    let rules = Notakto::new(2).expect("valid board count");
    let root = rules.root();
    let config = SolverConfig::default();
    let seq = analyze_roots(&rules, &NullEvaluator, &root, &config, false, None).expect("no limits");
    let par = analyze_roots(&rules, &NullEvaluator, &root, &config, true, None).expect("no limits");
    assert_eq!(seq.len(), 18);
    let seq_pairs: Vec<(u8, i32)> = seq.iter().map(|r| (r.action, r.value)).collect();
    let par_pairs: Vec<(u8, i32)> = par.iter().map(|r| (r.action, r.value)).collect();
    assert_eq!(seq_pairs, par_pairs, "deterministic order and values");
    assert!(seq.iter().all(|r| r.value == -1), "every opening loses on two boards");
}

#[test]
fn backward_induction_agrees_with_alpha_beta() {
    let rules = Notakto::new(1).expect("valid board count");
    let root = rules.root();
    let mut exact = BackwardInduction::new(&rules);
    assert_eq!(exact.solve(&root).expect("solves"), 1);
    let strategy = exact.strategy(&root).expect("root recorded");
    assert_eq!(strategy.best_action, Some(4));

    let tables = exact.strategy_tables();
    let row = tables.first.get("000000000").expect("root row");
    assert_eq!(row.len(), 9);
    assert_eq!(row.get("4"), Some(&1.0));
}

#[test]
fn last_line_loses() {
    let rules = Notakto::new(2).expect("valid board count");
    let root = rules.root();
    // board 0 dies first (cells 0,1,2), then board 1 (cells 9,10,11)
    let state = GameState::replay(root.board().clone(), [0u8, 1, 2, 9, 10, 11]).expect("legal");
    assert!(rules.is_terminal(&state));
    assert_eq!(rules.current_player(&state), Player::First);
    assert_eq!(rules.winner(&state), Some(Player::First), "second player completed the last line");
    assert_eq!(rules.terminal_value(&state), 1);

    let dead_board_move = rules.apply_action(&GameState::replay(root.board().clone(), [0u8, 1, 2]).expect("legal"), &4);
    assert!(matches!(dead_board_move, Err(GameError::IllegalAction { .. })));
}

#[test]
fn dead_boards_drop_out_of_legal_actions() {
    let rules = Notakto::new(2).expect("valid board count");
    let state = GameState::replay(rules.root().board().clone(), [0u8, 4, 8]).expect("legal");
    assert!(!rules.is_terminal(&state));
    let actions = rules.legal_actions(&state);
    assert_eq!(actions, vec![13, 9, 11, 15, 17, 10, 12, 14, 16]);
}

#[test]
fn board_count_is_validated() {
    assert!(matches!(Notakto::new(0), Err(GameError::InvalidBoardCount { got: 0, .. })));
    assert!(matches!(
        NotaktoBoards::new(MAX_BOARDS + 1),
        Err(GameError::InvalidBoardCount { .. })
    ));
    assert!(Notakto::new(MAX_BOARDS).is_ok());
}

#[test]
fn first_mover_is_the_maximizer() {
    let rules = Notakto::new(2).expect("valid board count");
    let root = rules.root();
    assert!(rules.is_maximizer(rules.current_player(&root)));
    let reply = rules.apply_action(&root, &4).expect("legal");
    assert!(!rules.is_maximizer(rules.current_player(&reply)));
}
