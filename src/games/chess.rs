use shakmaty::fen::Fen;
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Position};

use crate::error::GameError;
use crate::rules::{Rules, StateOf};
use crate::state::{BoardView, GameState};
use crate::types::{Player, Value, MATE};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Chess position backed by `shakmaty`.
#[derive(Debug, Clone)]
pub struct ChessBoard {
    pos: Chess,
}

impl ChessBoard {
    #[inline]
    pub fn startpos() -> Self {
        Self {
            pos: Chess::default(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        let parsed: Fen = fen
            .trim()
            .parse()
            .map_err(|e: shakmaty::fen::ParseFenError| GameError::InvalidFen(e.to_string()))?;
        let pos: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| GameError::InvalidFen(e.to_string()))?;
        Ok(Self { pos })
    }

    #[inline]
    pub fn position(&self) -> &Chess {
        &self.pos
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.pos.turn()
    }
}

/// UCI text of a move, e.g. `a1a8` or `e7e8q`.
#[inline]
pub fn uci(m: &Move) -> String {
    m.to_uci(CastlingMode::Standard).to_string()
}

impl BoardView for ChessBoard {
    type Action = Move;

    fn play(&self, action: &Move) -> Result<Self, GameError> {
        let pos = self
            .pos
            .clone()
            .play(action)
            .map_err(|_| GameError::illegal(uci(action), "not legal in this position"))?;
        Ok(Self { pos })
    }

    #[inline]
    fn key(&self) -> u128 {
        let z: Zobrist64 = self.pos.zobrist_hash(EnPassantMode::Legal);
        u128::from(z.0)
    }

    /// Board part of the FEN plus side to move.
    fn canonical(&self) -> String {
        let side = match self.pos.turn() {
            Color::White => 'w',
            Color::Black => 'b',
        };
        format!("{} {side}", self.pos.board())
    }
}

/// Rules provider over a fixed starting position.
#[derive(Debug, Clone)]
pub struct ChessRules {
    start: ChessBoard,
}

impl Default for ChessRules {
    fn default() -> Self {
        Self::new(ChessBoard::startpos())
    }
}

impl ChessRules {
    #[inline]
    pub fn new(start: ChessBoard) -> Self {
        Self { start }
    }

    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        ChessBoard::from_fen(fen).map(Self::new)
    }

    /// Legal move matching a UCI string, if any.
    pub fn find_move(&self, state: &StateOf<Self>, text: &str) -> Option<Move> {
        self.legal_actions(state).into_iter().find(|m| uci(m) == text)
    }
}

impl Rules for ChessRules {
    type Board = ChessBoard;

    fn root(&self) -> StateOf<Self> {
        GameState::new(self.start.clone())
    }

    fn is_terminal(&self, state: &StateOf<Self>) -> bool {
        let pos = state.board().position();
        pos.is_checkmate() || pos.is_stalemate() || pos.is_insufficient_material()
    }

    /// Being mated scores `-(MATE - ply)`, so a shorter mate is worth more to the winner.
    fn terminal_value(&self, state: &StateOf<Self>) -> Value {
        if state.board().position().is_checkmate() {
            let ply = Value::try_from(state.ply()).unwrap_or(Value::MAX);
            -(MATE - ply.min(MATE / 2))
        } else {
            0
        }
    }

    fn legal_actions(&self, state: &StateOf<Self>) -> Vec<Move> {
        state.board().position().legal_moves().into_iter().collect()
    }

    #[inline]
    fn action_id(&self, action: &Move) -> String {
        uci(action)
    }

    #[inline]
    fn current_player(&self, state: &StateOf<Self>) -> Player {
        match state.board().turn() {
            Color::White => Player::First,
            Color::Black => Player::Second,
        }
    }
}
