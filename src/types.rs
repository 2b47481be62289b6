use serde::{Deserialize, Serialize};

/// Game-theoretic value. Search code keeps it from the side-to-move perspective.
pub type Value = i32;

/// Window bound that no reachable value meets.
pub const INF: Value = 100_000_000;

/// Base score for a checkmate, reduced by the ply at which it happens.
pub const MATE: Value = 10_000_000;

/// Scores at or above this magnitude are forced mates.
pub const MATE_THRESHOLD: Value = MATE - 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    First,
    Second,
}

impl Player {
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// Player to move after `ply` half-moves from a first-player start.
    #[inline]
    pub fn from_ply(ply: usize) -> Self {
        if ply % 2 == 0 {
            Player::First
        } else {
            Player::Second
        }
    }

    /// +1 for the first player, -1 for the second.
    #[inline]
    pub fn sign(self) -> Value {
        match self {
            Player::First => 1,
            Player::Second => -1,
        }
    }
}
