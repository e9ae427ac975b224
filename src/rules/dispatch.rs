//! Action dispatcher.
//!
//! Total over its input: every `(state, action)` pair yields a state.
//! Actions that do not fit the current phase are logged and ignored, so
//! a host can replay a stale or duplicated action without corrupting the
//! match.

use tracing::debug;

use crate::core::{Action, Die, GameState, Phase};

use super::engine::Rules;

impl Rules {
    /// Apply one external action.
    #[must_use]
    pub fn dispatch(&self, state: &GameState, action: Action) -> GameState {
        match action {
            Action::Roll(die) => self.apply_roll(state, die),
            Action::SelectMove(id) => {
                if state.phase != Phase::Select {
                    debug!(id = %id, "select ignored: not waiting for a move choice");
                    return state.clone();
                }
                match state.legal_moves.iter().find(|m| m.id == id) {
                    Some(mv) => self.apply_move(state, mv),
                    None => {
                        debug!(id = %id, "select ignored: unknown move id");
                        state.clone()
                    }
                }
            }
            Action::ApplyMove(mv) => self.apply_move(state, &mv),
            Action::ApplyBonus(piece) => self.apply_bonus(state, piece),
            Action::Reset(fresh) => *fresh,
        }
    }

    /// Every action that would change `state` right now.
    ///
    /// Six rolls while waiting for a die, one selection per cached move, or
    /// one bonus choice per eligible piece. Empty once the game is over.
    #[must_use]
    pub fn legal_actions(&self, state: &GameState) -> Vec<Action> {
        if state.winner.is_some() {
            return Vec::new();
        }
        if let Some(pending) = &state.bonus_pending {
            return pending.choices.iter().map(|&p| Action::ApplyBonus(p)).collect();
        }
        match state.phase {
            Phase::Roll => Die::FACES.iter().map(|&d| Action::Roll(d)).collect(),
            Phase::Select => state
                .legal_moves
                .iter()
                .map(|m| Action::SelectMove(m.id))
                .collect(),
        }
    }
}
