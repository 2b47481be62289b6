use crate::board::{Grid, Mark};
use crate::error::GameError;
use crate::rules::{Rules, StateOf};
use crate::state::{BoardView, GameState};
use crate::types::{Player, Value};

/// Largest supported board count; keeps every position inside a 128-bit key.
pub const MAX_BOARDS: usize = 8;

/// Per-board expansion order: center, corners, then edges.
const CELL_ORDER: [u8; 9] = [4, 0, 2, 6, 8, 1, 3, 5, 7];

/// N independent 3x3 boards holding X marks only.
/// Action `9*b + c` marks cell `c` of board `b`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotaktoBoards {
    grids: Vec<Grid>,
}

impl NotaktoBoards {
    pub fn new(boards: usize) -> Result<Self, GameError> {
        if boards == 0 || boards > MAX_BOARDS {
            return Err(GameError::InvalidBoardCount {
                got: boards,
                max: MAX_BOARDS,
            });
        }
        Ok(Self {
            grids: vec![Grid::new(); boards],
        })
    }

    #[inline]
    pub fn num_boards(&self) -> usize {
        self.grids.len()
    }

    #[inline]
    pub fn grid(&self, board: usize) -> Option<&Grid> {
        self.grids.get(board)
    }

    /// A board with three in a row can no longer be played on.
    #[inline]
    pub fn is_dead(&self, board: usize) -> bool {
        self.grids.get(board).map_or(true, Grid::has_line)
    }

    #[inline]
    pub fn all_dead(&self) -> bool {
        self.grids.iter().all(Grid::has_line)
    }

    #[inline]
    pub fn marks(&self) -> usize {
        self.grids.iter().map(|g| usize::from(g.filled_count())).sum()
    }
}

impl BoardView for NotaktoBoards {
    type Action = u8;

    fn play(&self, action: &u8) -> Result<Self, GameError> {
        let board = usize::from(*action / 9);
        let cell = *action % 9;
        if board >= self.grids.len() {
            return Err(GameError::illegal(action, "board index out of range"));
        }
        if self.is_dead(board) {
            return Err(GameError::illegal(action, "board is dead"));
        }
        if !self.grids[board].is_empty(cell) {
            return Err(GameError::illegal(action, "cell is not empty"));
        }
        let mut next = self.clone();
        next.grids[board].set(cell, Some(Mark::X));
        Ok(next)
    }

    fn key(&self) -> u128 {
        self.grids
            .iter()
            .enumerate()
            .fold(0u128, |acc, (b, g)| acc | (u128::from(g.occupancy()) << (9 * b)))
    }

    fn canonical(&self) -> String {
        let mut s = String::with_capacity(9 * self.grids.len());
        for g in &self.grids {
            g.write_canonical(&mut s);
        }
        s
    }
}

/// Misère multi-board game: whoever completes the last live board's line loses.
#[derive(Debug, Clone, Copy)]
pub struct Notakto {
    boards: usize,
}

impl Notakto {
    pub fn new(boards: usize) -> Result<Self, GameError> {
        NotaktoBoards::new(boards)?;
        Ok(Self { boards })
    }

    #[inline]
    pub fn num_boards(&self) -> usize {
        self.boards
    }

    /// At a terminal position the player to move has won.
    pub fn winner(&self, state: &StateOf<Self>) -> Option<Player> {
        self.is_terminal(state).then(|| self.current_player(state))
    }
}

impl Rules for Notakto {
    type Board = NotaktoBoards;

    fn root(&self) -> StateOf<Self> {
        // `new` already validated the board count.
        let boards = NotaktoBoards {
            grids: vec![Grid::new(); self.boards],
        };
        GameState::new(boards)
    }

    #[inline]
    fn is_terminal(&self, state: &StateOf<Self>) -> bool {
        state.board().all_dead()
    }

    #[inline]
    fn terminal_value(&self, _state: &StateOf<Self>) -> Value {
        1
    }

    fn legal_actions(&self, state: &StateOf<Self>) -> Vec<u8> {
        let boards = state.board();
        let mut actions = Vec::with_capacity(9 * boards.num_boards());
        for (b, grid) in (0u8..).zip(boards.grids.iter()) {
            if grid.has_line() {
                continue;
            }
            let base = 9 * b;
            actions.extend(CELL_ORDER.iter().filter(|&&c| grid.is_empty(c)).map(|&c| base + c));
        }
        actions
    }

    #[inline]
    fn action_id(&self, action: &u8) -> String {
        action.to_string()
    }

    /// Every move adds one mark, so parity of the marks is parity of the history.
    #[inline]
    fn current_player(&self, state: &StateOf<Self>) -> Player {
        Player::from_ply(state.board().marks())
    }
}
