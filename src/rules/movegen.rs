//! Move generation and legality.
//!
//! ## Path function
//!
//! - Yard → own start square, only on a six.
//! - Track → one label down per step; off the owner's home-entry square a
//!   piece steps into `Home(0)` instead.
//! - Home → next offset; offset `home_length` is the goal. Overshooting the
//!   goal has no destination.
//!
//! ## Landing rules
//!
//! - Never a third piece of one owner on a square (track or home offset).
//! - Safe track square: at most two pieces of any mix, no capture. A full
//!   safe square rejects every landing, capturing or not.
//! - Other track squares: one opponent there is captured. Two pieces there
//!   admit a landing only if it captures: the oldest opponent is kicked.
//!   Two pieces of one opponent form a block and cannot be landed on.
//! - An opponent block on an intermediate track square stops the move.

use tracing::trace;

use crate::core::{
    BoardConfig, Captures, Die, GameState, Move, MoveId, Piece, PieceId, PlayerId, Position,
    MAX_PER_SQUARE,
};

/// Every legal move for `player` with `die`.
///
/// Empty when the game is over, a bonus is pending, or the player is
/// inactive.
#[must_use]
pub fn legal_moves(board: &BoardConfig, state: &GameState, player: PlayerId, die: Die) -> Vec<Move> {
    if state.winner().is_some() || state.bonus_pending().is_some() || !state.player(player).active {
        return Vec::new();
    }

    let moves: Vec<Move> = state
        .pieces_of(player)
        .filter_map(|piece| candidate(board, state, piece, die))
        .collect();

    trace!(
        player = %player,
        die = die.value(),
        count = moves.len(),
        "generated legal moves"
    );
    moves
}

fn candidate(board: &BoardConfig, state: &GameState, piece: &Piece, die: Die) -> Option<Move> {
    let owner = piece.owner();
    let to = match piece.pos {
        Position::Goal => return None,
        Position::Yard if die.is_six() => Position::Track(board.start_square[owner]),
        Position::Yard => return None,
        from => advance(board, owner, from, die.steps())?,
    };

    if !can_land(board, state, piece, to, die.steps()) {
        return None;
    }

    Some(Move {
        id: MoveId {
            piece: piece.id,
            die,
            from: piece.pos,
            to,
        },
        player: owner,
        piece: piece.id,
        die,
        from: piece.pos,
        to,
        captures: captures_at(board, state, owner, to),
        reaches_goal: to.is_goal(),
    })
}

/// Where a piece already in play ends up after a fixed number of steps.
///
/// Used for bonus awards; `None` for yard/goal pieces, home overshoot, or an
/// illegal landing.
#[must_use]
pub fn advance_destination(
    board: &BoardConfig,
    state: &GameState,
    id: PieceId,
    steps: u16,
) -> Option<Position> {
    let piece = state.piece(id);
    if steps == 0 || matches!(piece.pos, Position::Yard | Position::Goal) {
        return None;
    }
    let to = advance(board, piece.owner(), piece.pos, steps)?;
    can_land(board, state, piece, to, steps).then_some(to)
}

/// One step along `owner`'s path.
#[must_use]
pub fn step_once(board: &BoardConfig, owner: PlayerId, from: Position) -> Option<Position> {
    match from {
        Position::Yard | Position::Goal => None,
        Position::Home(offset) => {
            let next = offset + 1;
            if next == board.home_length {
                Some(Position::Goal)
            } else if next > board.home_length {
                None
            } else {
                Some(Position::Home(next))
            }
        }
        Position::Track(label) if label == board.home_entry[owner] => Some(Position::Home(0)),
        Position::Track(label) => Some(Position::Track(board.step_track(label))),
    }
}

/// Walk `steps` squares. Exact goal only: running past it yields `None`.
#[must_use]
pub fn advance(board: &BoardConfig, owner: PlayerId, from: Position, steps: u16) -> Option<Position> {
    (0..steps).try_fold(from, |pos, _| step_once(board, owner, pos))
}

/// Opponents a piece of `owner` would kick by landing on `to`.
///
/// Computed from the live occupancy index: on a non-safe track square the
/// oldest opponent is captured.
#[must_use]
pub fn captures_at(board: &BoardConfig, state: &GameState, owner: PlayerId, to: Position) -> Captures {
    let mut captures = Captures::new();
    if let Position::Track(label) = to {
        if !board.is_safe(label) {
            if let Some(&victim) = state.occupants(label).iter().find(|p| p.owner() != owner) {
                captures.push(victim);
            }
        }
    }
    captures
}

/// Two pieces of one owner other than `mover` on a track square.
#[must_use]
pub fn is_opponent_block(state: &GameState, label: u16, mover: PlayerId) -> bool {
    match state.occupants(label) {
        [a, b] => a.owner() == b.owner() && a.owner() != mover,
        _ => false,
    }
}

fn is_path_clear(board: &BoardConfig, state: &GameState, owner: PlayerId, from: Position, steps: u16) -> bool {
    let mut pos = from;
    for step in 1..=steps {
        let Some(next) = step_once(board, owner, pos) else {
            return false;
        };
        // The landing square itself is judged by the landing rules.
        if step < steps {
            if let Position::Track(label) = next {
                if is_opponent_block(state, label, owner) {
                    return false;
                }
            }
        }
        pos = next;
    }
    true
}

fn can_land(board: &BoardConfig, state: &GameState, piece: &Piece, to: Position, steps: u16) -> bool {
    let owner = piece.owner();

    if !piece.pos.is_yard() && !is_path_clear(board, state, owner, piece.pos, steps) {
        return false;
    }

    match to {
        Position::Yard => false,
        Position::Goal => true,
        Position::Home(offset) => state.home_count(owner, offset) < MAX_PER_SQUARE,
        Position::Track(label) => {
            let occupants = state.occupants(label);
            let own = occupants.iter().filter(|p| p.owner() == owner).count();
            if own >= MAX_PER_SQUARE {
                return false;
            }
            if board.is_safe(label) {
                return occupants.len() < MAX_PER_SQUARE;
            }
            occupants.len() < MAX_PER_SQUARE || !is_opponent_block(state, label, owner)
        }
    }
}
