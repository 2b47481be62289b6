use crate::board::{Grid, Mark};
use crate::error::GameError;
use crate::rules::{Rules, StateOf};
use crate::state::{BoardView, GameState};
use crate::types::{Player, Value};

/// Single 3x3 board; X moves on even plies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TicTacToeBoard {
    grid: Grid,
}

impl TicTacToeBoard {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Board with arbitrary marks, for consistency checks against a history.
    pub fn parse(s: &str) -> Option<Self> {
        Grid::parse(s).map(|grid| Self { grid })
    }

    #[inline]
    pub fn to_move(&self) -> Mark {
        if self.grid.filled_count() % 2 == 0 {
            Mark::X
        } else {
            Mark::O
        }
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.grid.has_line() || self.grid.is_full()
    }
}

impl BoardView for TicTacToeBoard {
    type Action = u8;

    fn play(&self, action: &u8) -> Result<Self, GameError> {
        let cell = *action;
        if cell >= 9 {
            return Err(GameError::illegal(cell, "cell index out of range"));
        }
        if !self.grid.is_empty(cell) {
            return Err(GameError::illegal(cell, "cell is not empty"));
        }
        if self.grid.has_line() {
            return Err(GameError::illegal(cell, "game is over"));
        }
        let mut next = *self;
        next.grid.set(cell, Some(self.to_move()));
        Ok(next)
    }

    #[inline]
    fn key(&self) -> u128 {
        u128::from(self.grid.bits2())
    }

    fn canonical(&self) -> String {
        let mut s = String::with_capacity(9);
        self.grid.write_canonical(&mut s);
        s
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToe;

impl TicTacToe {
    /// Player owning a completed line. Depends on the board only, not on the route to it.
    #[inline]
    pub fn winner(&self, state: &StateOf<Self>) -> Option<Player> {
        state.board().grid.winner().map(Mark::owner)
    }
}

impl Rules for TicTacToe {
    type Board = TicTacToeBoard;

    fn root(&self) -> StateOf<Self> {
        GameState::new(TicTacToeBoard::new())
    }

    #[inline]
    fn is_terminal(&self, state: &StateOf<Self>) -> bool {
        state.board().is_over()
    }

    fn terminal_value(&self, state: &StateOf<Self>) -> Value {
        match self.winner(state) {
            Some(p) if p == self.current_player(state) => 1,
            Some(_) => -1,
            None => 0,
        }
    }

    fn legal_actions(&self, state: &StateOf<Self>) -> Vec<u8> {
        if self.is_terminal(state) {
            return Vec::new();
        }
        state.board().grid.empty_cells().collect()
    }

    #[inline]
    fn action_id(&self, action: &u8) -> String {
        action.to_string()
    }

    /// Parity of the filled cells, which equals the history length.
    #[inline]
    fn current_player(&self, state: &StateOf<Self>) -> Player {
        state.board().to_move().owner()
    }
}
