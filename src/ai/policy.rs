//! Strategy trait and the uniform-random baseline.
//!
//! A strategy only ever reads the snapshot it is given; any lookahead goes
//! through `Rules::try_advance`, which works on a scratch copy.

use crate::core::{GameRng, GameState, Move, PieceId};
use crate::rules::Rules;

/// How a CPU seat picks moves and bonus pieces.
pub trait Strategy: Send + Sync {
    /// Pick one of the current player's legal moves for the attached die.
    ///
    /// Returns `None` if there is no die or no legal move.
    fn choose_move(&self, rules: &Rules, state: &GameState, rng: &mut GameRng) -> Option<Move>;

    /// Pick a piece for the pending bonus award.
    ///
    /// Returns `None` only if nothing is pending or the award has no choices.
    fn choose_bonus(&self, rules: &Rules, state: &GameState, rng: &mut GameRng) -> Option<PieceId>;
}

/// Moves the strategy may choose from: the cached set, or a fresh
/// generation for the attached die if nothing is cached.
#[must_use]
pub fn candidate_moves(rules: &Rules, state: &GameState) -> Vec<Move> {
    if !state.legal_moves().is_empty() {
        return state.legal_moves().to_vec();
    }
    match state.dice() {
        Some(die) => rules.legal_moves(state, state.current_player(), die),
        None => Vec::new(),
    }
}

/// Uniform choice among legal options.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomStrategy;

impl Strategy for RandomStrategy {
    fn choose_move(&self, rules: &Rules, state: &GameState, rng: &mut GameRng) -> Option<Move> {
        let moves = candidate_moves(rules, state);
        rng.choose(&moves).cloned()
    }

    fn choose_bonus(&self, _rules: &Rules, state: &GameState, rng: &mut GameRng) -> Option<PieceId> {
        let pending = state.bonus_pending()?;
        rng.choose(pending.choices.as_slice()).copied()
    }
}
