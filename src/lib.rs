#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)] // may be revisited
#![allow(clippy::must_use_candidate, clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod types;
pub mod error;
pub mod history;
pub mod state;
pub mod rules;
pub mod board;
pub mod hash;

pub mod games {
    pub mod chess;
    pub mod notakto;
    pub mod tictactoe;
}

pub mod engine {
    pub mod eval;
}

pub mod solver;
pub mod persist;

// Re-exports: stable minimal API surface for external callers
pub use crate::engine::eval::{ChessEvaluator, Evaluator, NullEvaluator};
pub use crate::error::{GameError, SearchError};
pub use crate::games::chess::{ChessBoard, ChessRules};
pub use crate::games::notakto::{Notakto, NotaktoBoards};
pub use crate::games::tictactoe::{TicTacToe, TicTacToeBoard};
pub use crate::history::MoveHistory;
pub use crate::rules::{Action, Rules, StateOf};
pub use crate::solver::{
    BackwardInduction, MoveOrder, SearchLimits, SearchResult, Solver, SolverConfig, Strategy,
};
pub use crate::state::{BoardView, GameState};
pub use crate::types::{Player, Value, INF, MATE, MATE_THRESHOLD};
