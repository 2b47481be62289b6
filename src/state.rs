use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::GameError;
use crate::history::MoveHistory;

/// Board projection of a move history.
///
/// Implementors must make `play` a pure function of `(self, action)`; the key
/// and canonical string encode the position only, never the route to it.
pub trait BoardView: Clone + Debug {
    type Action: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    /// Board after `action`, or `IllegalAction` if the board cannot take it.
    fn play(&self, action: &Self::Action) -> Result<Self, GameError>;

    /// Compact position key used by the transposition caches.
    fn key(&self) -> u128;

    /// Stable string encoding used as the persisted strategy key.
    fn canonical(&self) -> String;
}

/// Immutable snapshot: the move history since `root` plus the board it produces.
#[derive(Debug, Clone)]
pub struct GameState<B: BoardView> {
    root: Arc<B>,
    history: MoveHistory<B::Action>,
    board: B,
}

impl<B: BoardView> GameState<B> {
    #[inline]
    pub fn new(root: B) -> Self {
        Self {
            board: root.clone(),
            root: Arc::new(root),
            history: MoveHistory::new(),
        }
    }

    /// Build a state by replaying `actions` from `root`.
    pub fn replay<I>(root: B, actions: I) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = B::Action>,
    {
        let mut state = Self::new(root);
        for action in actions {
            state = state.play(&action)?;
        }
        Ok(state)
    }

    /// Build a state from an explicit board, checking it against the replayed history.
    pub fn from_parts(root: B, actions: &[B::Action], board: B) -> Result<Self, GameError> {
        let replayed = Self::replay(root, actions.iter().cloned())?;
        if replayed.board.key() != board.key() {
            return Err(GameError::InvalidState(format!(
                "history {:?} yields {} but board is {}",
                actions,
                replayed.board.canonical(),
                board.canonical()
            )));
        }
        Ok(Self { board, ..replayed })
    }

    /// Child state; the history prefix is shared with `self`.
    #[inline]
    pub fn play(&self, action: &B::Action) -> Result<Self, GameError> {
        let board = self.board.play(action)?;
        Ok(Self {
            root: Arc::clone(&self.root),
            history: self.history.push(action.clone()),
            board,
        })
    }

    #[inline]
    pub fn board(&self) -> &B {
        &self.board
    }

    #[inline]
    pub fn root(&self) -> &B {
        &self.root
    }

    #[inline]
    pub fn history(&self) -> &MoveHistory<B::Action> {
        &self.history
    }

    /// Number of actions played since the root.
    #[inline]
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    #[inline]
    pub fn key(&self) -> u128 {
        self.board.key()
    }

    #[inline]
    pub fn canonical(&self) -> String {
        self.board.canonical()
    }
}
