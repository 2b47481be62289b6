use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use gametree::games::chess::{uci, START_FEN};
use gametree::persist::{
    save_strategy_tables, save_values, ValuesHeader, FORMAT_VERSION, NOTAKTO_POLICY_FILES,
    TICTACTOE_POLICY_FILES,
};
use gametree::solver::{absolute_value, analyze_roots, EXACT_DEPTH};
use gametree::{
    BackwardInduction, ChessEvaluator, ChessRules, Notakto, NullEvaluator, Player, Rules,
    SearchLimits, Solver, SolverConfig, TicTacToe,
};

/// Largest Notakto board count whose full strategy table is exported.
const MAX_EXPORT_BOARDS: usize = 2;

#[derive(Debug, Parser)]
#[command(name = "solve", about = "Game-tree solver for tic-tac-toe, Notakto and chess")]
struct Args {
    #[command(subcommand)]
    game: Game,
}

#[derive(Debug, Subcommand)]
enum Game {
    /// Exact backward induction over the full tic-tac-toe tree
    Tictactoe {
        /// Directory for policy_x.json / policy_o.json
        #[arg(long)]
        export: Option<PathBuf>,

        /// File for the solved value table
        #[arg(long)]
        values: Option<PathBuf>,
    },

    /// Alpha-beta solve of N-board Notakto
    Notakto {
        /// Number of boards (1..=8)
        #[arg(long, default_value_t = 1)]
        boards: usize,

        /// Depth cap; exact when omitted
        #[arg(long)]
        depth: Option<u8>,

        /// Also report the value of every first action
        #[arg(long)]
        roots: bool,

        /// Worker threads for --roots (rayon default when omitted)
        #[arg(long)]
        threads: Option<usize>,

        /// Directory for policy_p1.json / policy_p2.json (exact, unpruned solve; at most 2 boards)
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Depth-limited heuristic search from a FEN
    Chess {
        #[arg(long, default_value = START_FEN)]
        fen: String,

        #[arg(long, default_value_t = 4)]
        depth: u8,

        /// Abort after this many milliseconds
        #[arg(long)]
        time_ms: Option<u64>,

        /// Fixed transposition table size in MiB (growable map when omitted)
        #[arg(long)]
        tt_mib: Option<usize>,
    },
}

fn print_best(best: Option<String>) {
    match best {
        Some(a) => println!("best_action: {a}"),
        None => println!("best_action: None"),
    }
}

fn winner_label(mover: Player, value: i32) -> &'static str {
    match absolute_value(mover, value).signum() {
        1 => "first",
        -1 => "second",
        _ => "draw",
    }
}

fn run_tictactoe(export: Option<PathBuf>, values: Option<PathBuf>) -> Result<()> {
    let rules = TicTacToe;
    let root = rules.root();
    let mut solver = BackwardInduction::new(&rules);
    let value = solver.solve(&root)?;
    let best = solver
        .strategy(&root)
        .and_then(|s| s.best_action.as_ref())
        .map(|a| rules.action_id(a));

    println!("value: {value}");
    print_best(best);
    println!("positions: {}", solver.len());

    if let Some(dir) = export {
        let paths = save_strategy_tables(&dir, &solver.strategy_tables(), TICTACTOE_POLICY_FILES)
            .with_context(|| format!("exporting strategies to {}", dir.display()))?;
        log::info!("[solve] wrote {} and {}", paths[0].display(), paths[1].display());
    }
    if let Some(path) = values {
        let header = ValuesHeader {
            version: FORMAT_VERSION,
            game: "tictactoe".into(),
            boards: None,
            max_depth: EXACT_DEPTH,
        };
        save_values(&path, &header, &solver.values())
            .with_context(|| format!("writing values to {}", path.display()))?;
    }
    Ok(())
}

fn run_notakto(
    boards: usize,
    depth: Option<u8>,
    roots: bool,
    threads: Option<usize>,
    export: Option<PathBuf>,
) -> Result<()> {
    let rules = Notakto::new(boards)?;
    anyhow::ensure!(
        export.is_none() || boards <= MAX_EXPORT_BOARDS,
        "--export enumerates every position and supports at most {MAX_EXPORT_BOARDS} boards, got {boards}"
    );
    let root = rules.root();
    let config = SolverConfig {
        limits: SearchLimits::depth(depth.unwrap_or(EXACT_DEPTH)),
        ..SolverConfig::default()
    };

    let mut solver = Solver::new(&rules, &NullEvaluator, config);
    let result = solver.search(&root)?;
    let mover = rules.current_player(&root);
    println!("boards: {boards}");
    println!("value: {}", result.value);
    println!("winner: {}", winner_label(mover, result.value));
    print_best(result.best_move.as_ref().map(|a| rules.action_id(a)));
    println!("nodes: {}", result.nodes);

    if roots {
        if let Some(t) = threads {
            rayon::ThreadPoolBuilder::new()
                .num_threads(t)
                .build_global()
                .context("configuring rayon thread pool")?;
        }
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] roots {bar:40.cyan/blue} {pos}/{len}")?
                .progress_chars("=>-"),
        );
        let analysis = analyze_roots(&rules, &NullEvaluator, &root, &config, true, Some(&pb))?;
        pb.finish_and_clear();
        for r in analysis {
            println!("root {}: {}", rules.action_id(&r.action), r.value);
        }
    }

    if let Some(dir) = export {
        let mut exact = BackwardInduction::new(&rules);
        exact.solve(&root)?;
        save_strategy_tables(&dir, &exact.strategy_tables(), NOTAKTO_POLICY_FILES)
            .with_context(|| format!("exporting strategies to {}", dir.display()))?;
    }
    Ok(())
}

fn run_chess(fen: &str, depth: u8, time_ms: Option<u64>, tt_mib: Option<usize>) -> Result<()> {
    let rules = ChessRules::from_fen(fen)?;
    let root = rules.root();
    let config = SolverConfig {
        limits: SearchLimits { max_depth: depth, time_ms },
        tt_mib,
        ..SolverConfig::default()
    };
    let mut solver = Solver::new(&rules, &ChessEvaluator, config);
    let result = solver.search(&root).context("chess search")?;

    let pv: Vec<String> = result.principal_variation.iter().map(uci).collect();
    println!("value: {}", result.value);
    print_best(result.best_move.as_ref().map(uci));
    println!("pv: {}", pv.join(" "));
    println!("nodes: {}", result.nodes);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    match args.game {
        Game::Tictactoe { export, values } => run_tictactoe(export, values),
        Game::Notakto {
            boards,
            depth,
            roots,
            threads,
            export,
        } => run_notakto(boards, depth, roots, threads, export),
        Game::Chess {
            fen,
            depth,
            time_ms,
            tt_mib,
        } => run_chess(&fen, depth, time_ms, tt_mib),
    }
}
