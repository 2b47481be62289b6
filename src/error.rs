use thiserror::Error;

/// Errors raised by rules providers and state construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameError {
    #[error("illegal action {action}: {reason}")]
    IllegalAction { action: String, reason: String },

    #[error("board is inconsistent with its move history: {0}")]
    InvalidState(String),

    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("notakto needs between 1 and {max} boards, got {got}")]
    InvalidBoardCount { got: usize, max: usize },
}

impl GameError {
    pub fn illegal(action: impl ToString, reason: impl Into<String>) -> Self {
        GameError::IllegalAction {
            action: action.to_string(),
            reason: reason.into(),
        }
    }
}

/// Reasons a search stops without producing a game value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("search aborted at deadline after {nodes} nodes")]
    Aborted { nodes: u64 },

    #[error("search exceeded the ply limit at ply {ply}")]
    DepthExceeded { ply: usize },

    /// A listed legal action was rejected by the board.
    #[error("rules provider listed an unplayable action: {0}")]
    Rules(#[from] GameError),
}
