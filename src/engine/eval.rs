use shakmaty::{Board, Color, Piece, Position, Role, Square};

use crate::games::chess::ChessBoard;
use crate::types::Value;

/// Static evaluation used at the depth cutoff.
///
/// Scores are on the absolute scale: positive favors the first player
/// (White in chess). The search converts to the mover's perspective.
pub trait Evaluator<B>: Sync {
    fn score(&self, board: &B) -> Value;
}

/// Evaluator for games that are always searched to terminal positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEvaluator;

impl<B> Evaluator<B> for NullEvaluator {
    #[inline]
    fn score(&self, _board: &B) -> Value {
        0
    }
}

pub const PAWN: Value = 100;
pub const KNIGHT: Value = 295;
pub const BISHOP: Value = 300;
pub const ROOK: Value = 500;
pub const QUEEN: Value = 900;
pub const KING: Value = 1000;

const DOUBLED_PAWN: Value = 80;
const PAWN_IN_CENTER: Value = 110;
const PAWN_ON_SIXTH: Value = 150;
const PAWN_ON_SEVENTH: Value = 300;

const CORNER_KNIGHT: Value = 285;
const KNIGHT_IN_CENTER: Value = 310;

const FIANCHETTO: Value = 310;
const BISHOP_IN_CENTER: Value = 305;
const BACK_RANK_BISHOP: Value = 290;

const CASTLED_KING: Value = 1050;

/// Non-king material (both sides) below which king placement stops scoring.
pub const ENDGAME_MATERIAL: Value = 1800;

/// Hanging pieces keep 35% of their positional value.
const HANGING_NUM: Value = 35;
const HANGING_DEN: Value = 100;

/// Multiplier applied to an attacked king's value.
pub const KING_EXPOSURE: Value = -1000;

#[inline]
pub fn role_value(role: Role) -> Value {
    match role {
        Role::Pawn => PAWN,
        Role::Knight => KNIGHT,
        Role::Bishop => BISHOP,
        Role::Rook => ROOK,
        Role::Queen => QUEEN,
        Role::King => KING,
    }
}

#[inline]
fn signed(color: Color, v: Value) -> Value {
    match color {
        Color::White => v,
        Color::Black => -v,
    }
}

/// (rank, file) of a square, both 0..=7, rank counted from White's side.
#[inline]
fn rank_file(sq: Square) -> (u8, u8) {
    let idx = u8::from(sq);
    (idx / 8, idx % 8)
}

/// Rank counted from the piece owner's back rank.
#[inline]
fn relative_rank(color: Color, rank: u8) -> u8 {
    match color {
        Color::White => rank,
        Color::Black => 7 - rank,
    }
}

/// Signed material balance, ignoring kings.
pub fn material(board: &Board) -> Value {
    board
        .occupied()
        .into_iter()
        .filter_map(|sq| board.piece_at(sq))
        .filter(|p| p.role != Role::King)
        .map(|p| signed(p.color, role_value(p.role)))
        .sum()
}

/// Non-king material of both sides combined.
pub fn total_material(board: &Board) -> Value {
    board
        .occupied()
        .into_iter()
        .filter_map(|sq| board.piece_at(sq))
        .filter(|p| p.role != Role::King)
        .map(|p| role_value(p.role))
        .sum()
}

/// Piece-square heuristic with hanging-piece damping and king exposure.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChessEvaluator;

impl ChessEvaluator {
    fn pawn(color: Color, rank: u8, file: u8, pawns: &[Option<Color>; 64]) -> Value {
        let rel = relative_rank(color, rank);
        match rel {
            6 => return PAWN_ON_SEVENTH,
            5 => return PAWN_ON_SIXTH,
            _ => {}
        }
        let behind = match color {
            Color::White => rank.checked_sub(1),
            Color::Black => (rank < 7).then(|| rank + 1),
        };
        if let Some(r) = behind {
            if pawns[usize::from(r * 8 + file)] == Some(color) {
                return DOUBLED_PAWN;
            }
        }
        if (file == 3 || file == 4) && (rel == 3 || rel == 4) {
            return PAWN_IN_CENTER;
        }
        PAWN
    }

    fn knight(rank: u8, file: u8) -> Value {
        if file == 0 || file == 7 {
            CORNER_KNIGHT
        } else if (2..=5).contains(&rank) && (2..=5).contains(&file) {
            KNIGHT_IN_CENTER
        } else {
            KNIGHT
        }
    }

    fn bishop(color: Color, rank: u8, file: u8) -> Value {
        let rel = relative_rank(color, rank);
        if (file == 1 || file == 6) && rel == 1 {
            FIANCHETTO
        } else if rel == 0 {
            BACK_RANK_BISHOP
        } else if (2..=5).contains(&rel) {
            BISHOP_IN_CENTER
        } else {
            BISHOP
        }
    }

    fn king(color: Color, rank: u8, file: u8, non_king_material: Value) -> Value {
        let rel = relative_rank(color, rank);
        if non_king_material >= ENDGAME_MATERIAL && rel == 0 && (file == 6 || file == 7) {
            CASTLED_KING
        } else {
            KING
        }
    }

    /// Unsigned contribution of one piece, before the color sign.
    fn contribution(
        board: &Board,
        sq: Square,
        piece: Piece,
        pawns: &[Option<Color>; 64],
        non_king_material: Value,
    ) -> Value {
        let (rank, file) = rank_file(sq);
        let occupied = board.occupied();
        let attackers = board.attacks_to(sq, !piece.color, occupied).count();

        if piece.role == Role::King {
            let base = Self::king(piece.color, rank, file, non_king_material);
            return if attackers > 0 { KING_EXPOSURE * base } else { base };
        }

        let base = match piece.role {
            Role::Pawn => Self::pawn(piece.color, rank, file, pawns),
            Role::Knight => Self::knight(rank, file),
            Role::Bishop => Self::bishop(piece.color, rank, file),
            Role::Rook => ROOK,
            Role::Queen => QUEEN,
            Role::King => KING,
        };
        let defenders = board.attacks_to(sq, piece.color, occupied).count();
        if attackers > defenders {
            base * HANGING_NUM / HANGING_DEN
        } else {
            base
        }
    }
}

impl Evaluator<ChessBoard> for ChessEvaluator {
    fn score(&self, board: &ChessBoard) -> Value {
        let pos = board.position();
        if pos.is_insufficient_material() || pos.is_stalemate() {
            return 0;
        }
        let b = pos.board();

        let mut pawns: [Option<Color>; 64] = [None; 64];
        for sq in b.occupied() {
            if let Some(p) = b.piece_at(sq) {
                if p.role == Role::Pawn {
                    pawns[usize::from(sq)] = Some(p.color);
                }
            }
        }
        let non_king = total_material(b);

        b.occupied()
            .into_iter()
            .filter_map(|sq| b.piece_at(sq).map(|p| (sq, p)))
            .map(|(sq, p)| signed(p.color, Self::contribution(b, sq, p, &pawns, non_king)))
            .sum()
    }
}
