//! Greedy move scoring.
//!
//! Priority, highest first:
//! 1. Capturing an opponent
//! 2. Reaching the goal
//! 3. Landing on a safe square
//! 4. Progress: goal > home stretch (deeper is better) > track (further
//!    from the start is better)
//! 5. A small bonus for leaving the yard
//!
//! Equal scores are broken uniformly at random.

use crate::core::{BoardConfig, GameRng, GameState, Move, PieceId, PlayerId, Position};
use crate::rules::Rules;

use super::policy::{candidate_moves, Strategy};

pub const CAPTURE_SCORE: i64 = 1_000_000;
pub const GOAL_SCORE: i64 = 500_000;
pub const SAFE_SCORE: i64 = 10_000;
pub const YARD_EXIT_SCORE: i64 = 250;

/// Greedy strategy using the weights above.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicStrategy;

impl HeuristicStrategy {
    /// Score a candidate move.
    #[must_use]
    pub fn score_move(board: &BoardConfig, mv: &Move) -> i64 {
        let mut score = 0;
        if mv.is_capture() {
            score += CAPTURE_SCORE;
        }
        if mv.reaches_goal {
            score += GOAL_SCORE;
        }
        score += safety(board, mv.to) * SAFE_SCORE;
        score += progress(board, mv.player, mv.to);
        if mv.is_spawn() {
            score += YARD_EXIT_SCORE;
        }
        score
    }

    /// Score advancing `piece` by the pending award's steps, simulated on a
    /// scratch copy. `None` if the advance is not possible.
    #[must_use]
    pub fn score_bonus(rules: &Rules, state: &GameState, piece: PieceId, steps: u16) -> Option<i64> {
        let advance = rules.try_advance(state, piece, steps)?;
        let pos = advance.state.position(piece);

        let mut score = 0;
        if !advance.captures.is_empty() {
            score += CAPTURE_SCORE;
        }
        score += safety(rules.board(), pos) * SAFE_SCORE;
        score += progress(rules.board(), piece.owner(), pos);
        Some(score)
    }
}

impl Strategy for HeuristicStrategy {
    fn choose_move(&self, rules: &Rules, state: &GameState, rng: &mut GameRng) -> Option<Move> {
        let moves = candidate_moves(rules, state);
        let scored = moves.iter().map(|m| (m, Self::score_move(rules.board(), m)));
        best(scored, rng).cloned()
    }

    fn choose_bonus(&self, rules: &Rules, state: &GameState, rng: &mut GameRng) -> Option<PieceId> {
        let pending = state.bonus_pending()?;
        let scored = pending
            .choices
            .iter()
            .filter_map(|&p| Self::score_bonus(rules, state, p, pending.steps).map(|s| (p, s)));

        best(scored, rng).or_else(|| pending.choices.first().copied())
    }
}

fn safety(board: &BoardConfig, pos: Position) -> i64 {
    match pos {
        Position::Track(label) if board.is_safe(label) => 1,
        _ => 0,
    }
}

fn progress(board: &BoardConfig, owner: PlayerId, pos: Position) -> i64 {
    match pos {
        Position::Goal => 10_000,
        Position::Home(offset) => 5_000 + i64::from(offset),
        Position::Track(label) => 100 + i64::from(board.track_progress(owner, label)),
        Position::Yard => 0,
    }
}

/// Highest-scoring candidate, ties broken by `rng`.
fn best<T: Copy>(scored: impl Iterator<Item = (T, i64)>, rng: &mut GameRng) -> Option<T> {
    let mut top = i64::MIN;
    let mut tied: Vec<T> = Vec::new();
    for (candidate, score) in scored {
        if score > top {
            top = score;
            tied.clear();
            tied.push(candidate);
        } else if score == top {
            tied.push(candidate);
        }
    }

    match tied.as_slice() {
        [only] => Some(*only),
        _ => rng.choose(&tied).copied(),
    }
}
