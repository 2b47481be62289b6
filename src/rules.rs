use crate::error::GameError;
use crate::state::{BoardView, GameState};
use crate::types::{Player, Value};

/// Action type of a rules provider.
pub type Action<R> = <<R as Rules>::Board as BoardView>::Action;

/// State type of a rules provider.
pub type StateOf<R> = GameState<<R as Rules>::Board>;

/// Rules provider consumed by the solvers.
///
/// Conventions:
/// - `terminal_value` is from the perspective of the player to move.
/// - `legal_actions` order is the tie-break order: the first action reaching
///   the best value is the one reported.
pub trait Rules: Sync {
    type Board: BoardView + Send + Sync;

    fn root(&self) -> StateOf<Self>;

    fn is_terminal(&self, state: &StateOf<Self>) -> bool;

    /// Only meaningful when `is_terminal(state)` holds.
    fn terminal_value(&self, state: &StateOf<Self>) -> Value;

    fn legal_actions(&self, state: &StateOf<Self>) -> Vec<Action<Self>>;

    /// Stringified action identifier used in persisted strategies.
    fn action_id(&self, action: &Action<Self>) -> String;

    #[inline]
    fn current_player(&self, state: &StateOf<Self>) -> Player {
        Player::from_ply(state.ply())
    }

    #[inline]
    fn is_maximizer(&self, player: Player) -> bool {
        player == Player::First
    }

    /// Validated transition: rejects actions outside `legal_actions`.
    fn apply_action(
        &self,
        state: &StateOf<Self>,
        action: &Action<Self>,
    ) -> Result<StateOf<Self>, GameError> {
        if self.is_terminal(state) {
            return Err(GameError::illegal(self.action_id(action), "game is over"));
        }
        if !self.legal_actions(state).contains(action) {
            return Err(GameError::illegal(
                self.action_id(action),
                "not in the legal actions of this position",
            ));
        }
        state.play(action)
    }
}
