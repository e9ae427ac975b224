//! Transition engine.
//!
//! `Rules` owns the board configuration and turns one snapshot into the
//! next. Every transition is pure: it clones the input (O(1) thanks to
//! persistent vectors), edits the clone, and returns it. An action that is
//! not allowed in the current state returns an unchanged copy.
//!
//! ## Turn flow
//!
//! 1. `apply_roll` attaches the die and caches the legal moves. No moves
//!    passes the turn; a six with a spawn available spawns at once; exactly
//!    one move applies at once; otherwise the phase becomes `Select`.
//! 2. `apply_move` relocates the piece, resolves captures, checks for a
//!    winner, then either grants bonuses and keeps the turn (six, capture,
//!    or goal) or passes to the next active player.
//! 3. Bonus awards resolve through `apply_bonus` (see `bonus`).

use tracing::{debug, info};

use crate::core::{
    BoardConfig, BonusKind, Captures, ConfigError, Die, GameState, Move, Phase, PieceId, PlayerId,
    PlayersConfig, Position,
};

use super::movegen;

/// Outcome of advancing one piece a fixed distance on a scratch copy.
#[derive(Clone, Debug, PartialEq)]
pub struct Advance {
    pub state: GameState,
    pub captures: Captures,
}

/// The rules of one board.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rules {
    board: BoardConfig,
}

impl Rules {
    /// Rules for a validated board.
    pub fn new(board: BoardConfig) -> Result<Self, ConfigError> {
        board.validate()?;
        Ok(Self { board })
    }

    #[must_use]
    pub fn board(&self) -> &BoardConfig {
        &self.board
    }

    /// Initial snapshot for a match.
    #[must_use]
    pub fn new_game(&self, config: &PlayersConfig) -> GameState {
        GameState::new(&self.board, config)
    }

    /// Legal moves for `player` with `die` in `state`.
    #[must_use]
    pub fn legal_moves(&self, state: &GameState, player: PlayerId, die: Die) -> Vec<Move> {
        movegen::legal_moves(&self.board, state, player, die)
    }

    /// Pieces of `player` with at least one move in the cached legal set.
    /// Empty when nothing is cached or another player is on turn.
    #[must_use]
    pub fn movable_pieces(&self, state: &GameState, player: PlayerId) -> Vec<PieceId> {
        let mut pieces: Vec<PieceId> = state
            .legal_moves
            .iter()
            .filter(|m| m.player == player)
            .map(|m| m.piece)
            .collect();
        pieces.dedup();
        pieces
    }

    /// Attach a die roll for the current player.
    #[must_use]
    pub fn apply_roll(&self, state: &GameState, die: Die) -> GameState {
        if state.winner.is_some() {
            debug!(die = die.value(), "roll ignored: game is over");
            return state.clone();
        }
        if state.bonus_pending.is_some() {
            debug!(die = die.value(), "roll ignored: bonus pending");
            return state.clone();
        }
        if state.phase != Phase::Roll {
            debug!(die = die.value(), "roll ignored: waiting for a move choice");
            return state.clone();
        }

        let mut next = state.clone();
        let player = next.current_player;

        if !next.players[player].active {
            self.pass_turn(&mut next);
            return next;
        }

        let moves = self.legal_moves(state, player, die);
        next.dice = Some(die);

        if die.is_six() {
            if let Some(spawn) = moves.iter().find(|m| m.is_spawn()) {
                self.resolve_move(&mut next, spawn);
                return next;
            }
        }

        match moves.len() {
            0 => self.pass_turn(&mut next),
            1 => self.resolve_move(&mut next, &moves[0]),
            _ => {
                next.phase = Phase::Select;
                next.legal_moves = moves;
            }
        }
        next
    }

    /// Apply a move chosen from the cached legal set.
    #[must_use]
    pub fn apply_move(&self, state: &GameState, mv: &Move) -> GameState {
        if state.winner.is_some() {
            debug!(id = %mv.id, "move rejected: game is over");
            return state.clone();
        }
        if state.bonus_pending.is_some() {
            debug!(id = %mv.id, "move rejected: bonus pending");
            return state.clone();
        }
        if mv.player != state.current_player || mv.piece.owner() != mv.player {
            debug!(id = %mv.id, current = %state.current_player, "move rejected: not this player's move");
            return state.clone();
        }
        if state.dice != Some(mv.die) {
            debug!(id = %mv.id, "move rejected: die does not match the attached roll");
            return state.clone();
        }

        let canonical = if state.legal_moves.is_empty() {
            self.legal_moves(state, mv.player, mv.die)
                .into_iter()
                .find(|m| m.id == mv.id)
        } else {
            state.legal_moves.iter().find(|m| m.id == mv.id).cloned()
        };
        let Some(canonical) = canonical else {
            debug!(id = %mv.id, "move rejected: not in the legal set");
            return state.clone();
        };
        if canonical != *mv {
            debug!(id = %mv.id, "move rejected: does not match the legal move with this id");
            return state.clone();
        }

        let mut next = state.clone();
        self.resolve_move(&mut next, &canonical);
        next
    }

    /// Pass the turn to the next active player.
    #[must_use]
    pub fn advance_turn(&self, state: &GameState) -> GameState {
        let mut next = state.clone();
        if next.winner.is_none() {
            self.pass_turn(&mut next);
        }
        next
    }

    /// Advance one of the current player's pieces `steps` squares on a copy.
    ///
    /// Simulation primitive for strategies; `None` when the advance is not
    /// legal (wrong owner, piece in yard or goal, overshoot, blocked path, or
    /// a forbidden landing).
    #[must_use]
    pub fn try_advance(&self, state: &GameState, piece: PieceId, steps: u16) -> Option<Advance> {
        if state.winner.is_some() || piece.owner() != state.current_player {
            return None;
        }
        let to = movegen::advance_destination(&self.board, state, piece, steps)?;

        let mut next = state.clone();
        next.bonus_pending = None;
        next.dice = None;
        next.legal_moves.clear();
        next.phase = Phase::Roll;
        let captures = self.relocate(&mut next, piece, to);
        Some(Advance {
            state: next,
            captures,
        })
    }

    // === Internal transitions ===

    pub(super) fn resolve_move(&self, next: &mut GameState, mv: &Move) {
        let captures = self.relocate(next, mv.piece, mv.to);
        next.dice = None;
        next.legal_moves.clear();
        next.phase = Phase::Roll;

        let player = mv.player;
        if self.check_winner(next, player) {
            return;
        }

        let captured = !captures.is_empty();
        let reached_goal = next.position(mv.piece).is_goal();

        if mv.die.is_six() || captured || reached_goal {
            if captured {
                self.grant_bonus(next, player, BonusKind::Capture, None);
            }
            if reached_goal {
                self.grant_bonus(next, player, BonusKind::Goal, Some(mv.piece));
            }
            self.activate_next_bonus(next);
        } else {
            self.pass_turn(next);
        }

        debug_assert_eq!(next.check_invariants(&self.board), Ok(()));
    }

    /// Move `piece` to `to`, sending any captured opponent to its yard.
    pub(super) fn relocate(&self, next: &mut GameState, piece: PieceId, to: Position) -> Captures {
        let captures = movegen::captures_at(&self.board, next, piece.owner(), to);

        if let Position::Track(label) = next.position(piece) {
            next.remove_occupant(label, piece);
        }
        for &victim in &captures {
            if let Position::Track(label) = next.position(victim) {
                next.remove_occupant(label, victim);
            }
            next.set_position(victim, Position::Yard);
            debug!(victim = %victim, by = %piece, "captured");
        }
        next.set_position(piece, to);
        if let Position::Track(label) = to {
            next.push_occupant(label, piece);
        }
        captures
    }

    /// Record `player` as winner if all its pieces are home. Clears every
    /// bonus and the roll.
    pub(super) fn check_winner(&self, next: &mut GameState, player: PlayerId) -> bool {
        if !next.pieces_of(player).all(|p| p.pos.is_goal()) {
            return false;
        }
        next.winner = Some(player);
        next.bonus_pending = None;
        next.bonus_queue.clear();
        next.dice = None;
        next.legal_moves.clear();
        next.phase = Phase::Roll;
        info!(winner = %player, turn = next.turn, "game over");
        true
    }

    pub(super) fn pass_turn(&self, next: &mut GameState) {
        let mut candidate = self.board.next_in_order(next.current_player);
        for _ in 0..self.board.turn_order.len() {
            if next.players[candidate].active {
                break;
            }
            candidate = self.board.next_in_order(candidate);
        }

        next.current_player = candidate;
        next.phase = Phase::Roll;
        next.dice = None;
        next.legal_moves.clear();
        next.turn += 1;
    }
}
