//! Game state: one immutable snapshot of a match.
//!
//! ## Layout
//!
//! - Pieces live in an arena indexed by `PieceId::arena_index`.
//! - The track occupancy index holds, per track label, the pieces standing
//!   there in arrival order (oldest first). It is the source of truth for
//!   which opponent a landing captures and must always agree with each
//!   piece's own `Position::Track`.
//! - Bonus awards: at most one pending, the rest queued FIFO.
//!
//! Uses `im` persistent vectors so cloning a snapshot is O(1); every
//! transition clones, edits the clone, and returns it. Callers only get
//! read access.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use super::action::{BonusAward, BonusId, Die, Move};
use super::config::BoardConfig;
use super::piece::{Piece, PieceId, Position, PIECE_COUNT};
use super::player::{Player, PlayerId, PlayerMap, PlayersConfig};

/// Pieces on one track square, oldest arrival first.
pub type Occupants = SmallVec<[PieceId; 2]>;

/// Most pieces that may share a square, and most of one owner on a square.
pub const MAX_PER_SQUARE: usize = 2;

/// What the current player is expected to do next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Waiting for a die roll (or a bonus choice, if one is pending).
    #[default]
    Roll,
    /// A roll produced several legal moves; waiting for a choice.
    Select,
}

/// A broken snapshot invariant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantError {
    #[error("piece arena has {0} entries, expected 16")]
    PieceCount(usize),

    #[error("arena slot {index} holds {found}")]
    ArenaMismatch { index: usize, found: PieceId },

    #[error("{piece} is at {pos}, which is off the board")]
    OutOfBounds { piece: PieceId, pos: Position },

    #[error("track square {label} holds {count} pieces")]
    Overcrowded { label: u16, count: usize },

    #[error("{owner} has {count} pieces on {pos}")]
    StackTooTall {
        owner: PlayerId,
        pos: Position,
        count: usize,
    },

    #[error("occupancy index lists {piece} on square {label}, but it is at {pos}")]
    StaleOccupant {
        piece: PieceId,
        label: u16,
        pos: Position,
    },

    #[error("{piece} is listed {count} times in the occupancy index")]
    IndexedTwice { piece: PieceId, count: usize },

    #[error("{piece} stands on square {label} but is missing from the occupancy index")]
    Unindexed { piece: PieceId, label: u16 },

    #[error("occupancy index has {0} squares, expected the track length")]
    TrackSize(usize),
}

/// Complete game snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) phase: Phase,
    pub(crate) current_player: PlayerId,
    pub(crate) dice: Option<Die>,
    pub(crate) players: PlayerMap<Player>,
    pub(crate) pieces: Vector<Piece>,
    pub(crate) track: Vector<Occupants>,
    pub(crate) bonus_pending: Option<BonusAward>,
    pub(crate) bonus_queue: Vector<BonusAward>,
    pub(crate) legal_moves: Vec<Move>,
    pub(crate) turn: u32,
    pub(crate) winner: Option<PlayerId>,
    pub(crate) next_bonus_id: u32,
}

impl GameState {
    /// Fresh match: each active player starts with slot 1 on its start
    /// square, everything else in the yard. The first active player in turn
    /// order rolls first.
    #[must_use]
    pub fn new(board: &BoardConfig, config: &PlayersConfig) -> Self {
        let mut state = Self::empty(board, config.players());

        for &player in &board.turn_order {
            if !state.players[player].active {
                continue;
            }
            let first = PieceId::new(player, 1);
            let start = board.start_square[player];
            state.set_position(first, Position::Track(start));
            state.push_occupant(start, first);
        }

        state.current_player = state.first_active(board);
        state
    }

    /// Snapshot with pieces placed explicitly, in arrival order.
    ///
    /// Pieces not mentioned stay in the yard. The result is checked against
    /// every invariant.
    pub fn from_layout(
        board: &BoardConfig,
        config: &PlayersConfig,
        current_player: PlayerId,
        layout: impl IntoIterator<Item = (PieceId, Position)>,
    ) -> Result<Self, InvariantError> {
        let mut state = Self::empty(board, config.players());
        state.current_player = current_player;

        for (id, pos) in layout {
            if let Position::Track(label) = state.position(id) {
                state.remove_occupant(label, id);
            }
            state.set_position(id, pos);
            if let Position::Track(label) = pos {
                if !board.is_on_track(label) {
                    return Err(InvariantError::OutOfBounds { piece: id, pos });
                }
                state.push_occupant(label, id);
            }
        }

        state.check_invariants(board)?;
        Ok(state)
    }

    fn empty(board: &BoardConfig, players: PlayerMap<Player>) -> Self {
        Self {
            phase: Phase::Roll,
            current_player: board.turn_order.first().copied().unwrap_or(PlayerId::Red),
            dice: None,
            players,
            pieces: PieceId::all()
                .map(|id| Piece {
                    id,
                    pos: Position::Yard,
                })
                .collect(),
            track: (0..board.track_length).map(|_| Occupants::new()).collect(),
            bonus_pending: None,
            bonus_queue: Vector::new(),
            legal_moves: Vec::new(),
            turn: 1,
            winner: None,
            next_bonus_id: 0,
        }
    }

    fn first_active(&self, board: &BoardConfig) -> PlayerId {
        board
            .turn_order
            .iter()
            .copied()
            .find(|&p| self.players[p].active)
            .unwrap_or(self.current_player)
    }

    // === Read access ===

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    /// The die attached by the last roll, cleared once it is used.
    #[must_use]
    pub fn dice(&self) -> Option<Die> {
        self.dice
    }

    #[must_use]
    pub fn players(&self) -> &PlayerMap<Player> {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id]
    }

    #[must_use]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.arena_index()]
    }

    #[must_use]
    pub fn position(&self, id: PieceId) -> Position {
        self.piece(id).pos
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter()
    }

    pub fn pieces_of(&self, owner: PlayerId) -> impl Iterator<Item = &Piece> {
        PieceId::of(owner).map(move |id| self.piece(id))
    }

    /// Pieces on a track square, oldest arrival first.
    #[must_use]
    pub fn occupants(&self, label: u16) -> &[PieceId] {
        label
            .checked_sub(1)
            .and_then(|i| self.track.get(usize::from(i)))
            .map_or(&[], |o| o.as_slice())
    }

    /// How many of `owner`'s pieces stand on a home-stretch offset.
    #[must_use]
    pub fn home_count(&self, owner: PlayerId, offset: u16) -> usize {
        self.pieces_of(owner)
            .filter(|p| p.pos == Position::Home(offset))
            .count()
    }

    /// Legal moves cached for the attached die.
    #[must_use]
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    #[must_use]
    pub fn bonus_pending(&self) -> Option<&BonusAward> {
        self.bonus_pending.as_ref()
    }

    pub fn bonus_queue(&self) -> impl Iterator<Item = &BonusAward> {
        self.bonus_queue.iter()
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.winner.is_some()
    }

    // === Mutation (engine only) ===

    pub(crate) fn set_position(&mut self, id: PieceId, pos: Position) {
        self.pieces[id.arena_index()].pos = pos;
    }

    pub(crate) fn remove_occupant(&mut self, label: u16, id: PieceId) {
        if let Some(square) = self.square_mut(label) {
            square.retain(|&mut p| p != id);
        }
    }

    pub(crate) fn push_occupant(&mut self, label: u16, id: PieceId) {
        if let Some(square) = self.square_mut(label) {
            square.push(id);
        }
    }

    fn square_mut(&mut self, label: u16) -> Option<&mut Occupants> {
        let index = usize::from(label.checked_sub(1)?);
        self.track.get_mut(index)
    }

    pub(crate) fn alloc_bonus_id(&mut self) -> BonusId {
        let id = BonusId(self.next_bonus_id);
        self.next_bonus_id += 1;
        id
    }

    // === Invariants ===

    /// Verify piece count, bounds, stacking limits and the occupancy index.
    pub fn check_invariants(&self, board: &BoardConfig) -> Result<(), InvariantError> {
        if self.pieces.len() != PIECE_COUNT {
            return Err(InvariantError::PieceCount(self.pieces.len()));
        }
        if self.track.len() != usize::from(board.track_length) {
            return Err(InvariantError::TrackSize(self.track.len()));
        }

        let mut stacks: FxHashMap<(PlayerId, Position), usize> = FxHashMap::default();
        for (index, piece) in self.pieces.iter().enumerate() {
            if piece.id.arena_index() != index {
                return Err(InvariantError::ArenaMismatch {
                    index,
                    found: piece.id,
                });
            }

            let in_bounds = match piece.pos {
                Position::Yard | Position::Goal => true,
                Position::Track(label) => board.is_on_track(label),
                Position::Home(offset) => offset < board.home_length,
            };
            if !in_bounds {
                return Err(InvariantError::OutOfBounds {
                    piece: piece.id,
                    pos: piece.pos,
                });
            }

            if matches!(piece.pos, Position::Track(_) | Position::Home(_)) {
                let count = stacks.entry((piece.owner(), piece.pos)).or_default();
                *count += 1;
                if *count > MAX_PER_SQUARE {
                    return Err(InvariantError::StackTooTall {
                        owner: piece.owner(),
                        pos: piece.pos,
                        count: *count,
                    });
                }
            }
        }

        let mut listed: FxHashMap<PieceId, usize> = FxHashMap::default();
        for (i, square) in self.track.iter().enumerate() {
            let label = i as u16 + 1;
            if square.len() > MAX_PER_SQUARE {
                return Err(InvariantError::Overcrowded {
                    label,
                    count: square.len(),
                });
            }
            for &id in square {
                let pos = self.position(id);
                if pos != Position::Track(label) {
                    return Err(InvariantError::StaleOccupant {
                        piece: id,
                        label,
                        pos,
                    });
                }
                *listed.entry(id).or_default() += 1;
            }
        }

        for piece in self.pieces.iter() {
            if let Position::Track(label) = piece.pos {
                match listed.get(&piece.id).copied().unwrap_or(0) {
                    1 => {}
                    0 => {
                        return Err(InvariantError::Unindexed {
                            piece: piece.id,
                            label,
                        })
                    }
                    count => {
                        return Err(InvariantError::IndexedTwice {
                            piece: piece.id,
                            count,
                        })
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::player::SeatConfig;

    fn red(slot: u8) -> PieceId {
        PieceId::new(PlayerId::Red, slot)
    }

    fn blue(slot: u8) -> PieceId {
        PieceId::new(PlayerId::Blue, slot)
    }

    #[test]
    fn test_new_state_spawns_one_piece_per_active_player() {
        let board = BoardConfig::default();
        let state = GameState::new(&board, &PlayersConfig::new());

        assert_eq!(state.phase(), Phase::Roll);
        assert_eq!(state.current_player(), PlayerId::Red);
        assert_eq!(state.turn(), 1);
        assert_eq!(state.position(red(1)), Position::Track(14));
        assert_eq!(state.position(red(2)), Position::Yard);
        assert_eq!(state.occupants(31), &[blue(1)]);
        assert!(state.check_invariants(&board).is_ok());
    }

    #[test]
    fn test_inactive_players_keep_all_pieces_in_yard() {
        let board = BoardConfig::default();
        let config = PlayersConfig::new()
            .with_seat(PlayerId::Red, SeatConfig::inactive())
            .with_seat(PlayerId::Green, SeatConfig::inactive());
        let state = GameState::new(&board, &config);

        assert!(state.pieces_of(PlayerId::Red).all(|p| p.pos.is_yard()));
        assert!(state.pieces_of(PlayerId::Green).all(|p| p.pos.is_yard()));
        assert_eq!(state.current_player(), PlayerId::Blue);
    }

    #[test]
    fn test_from_layout_keeps_arrival_order() {
        let board = BoardConfig::default();
        let state = GameState::from_layout(
            &board,
            &PlayersConfig::new(),
            PlayerId::Red,
            [(blue(2), Position::Track(10)), (red(3), Position::Track(10))],
        )
        .unwrap();

        assert_eq!(state.occupants(10), &[blue(2), red(3)]);
        assert_eq!(state.position(red(1)), Position::Yard);
    }

    #[test]
    fn test_from_layout_rejects_third_occupant() {
        let board = BoardConfig::default();
        let result = GameState::from_layout(
            &board,
            &PlayersConfig::new(),
            PlayerId::Red,
            [
                (red(1), Position::Track(10)),
                (red(2), Position::Track(10)),
                (blue(1), Position::Track(10)),
            ],
        );

        assert_eq!(result, Err(InvariantError::Overcrowded { label: 10, count: 3 }));
    }

    #[test]
    fn test_from_layout_rejects_tall_home_stack() {
        let board = BoardConfig::default();
        let result = GameState::from_layout(
            &board,
            &PlayersConfig::new(),
            PlayerId::Red,
            [
                (red(1), Position::Home(3)),
                (red(2), Position::Home(3)),
                (red(3), Position::Home(3)),
            ],
        );

        assert!(matches!(result, Err(InvariantError::StackTooTall { count: 3, .. })));
    }

    #[test]
    fn test_from_layout_rejects_off_board_positions() {
        let board = BoardConfig::default();

        let track = GameState::from_layout(
            &board,
            &PlayersConfig::new(),
            PlayerId::Red,
            [(red(1), Position::Track(69))],
        );
        assert!(matches!(track, Err(InvariantError::OutOfBounds { .. })));

        let home = GameState::from_layout(
            &board,
            &PlayersConfig::new(),
            PlayerId::Red,
            [(red(1), Position::Home(7))],
        );
        assert!(matches!(home, Err(InvariantError::OutOfBounds { .. })));
    }

    #[test]
    fn test_occupants_out_of_range_is_empty() {
        let board = BoardConfig::default();
        let state = GameState::new(&board, &PlayersConfig::new());

        assert!(state.occupants(0).is_empty());
        assert!(state.occupants(500).is_empty());
    }

    #[test]
    fn test_clone_is_independent() {
        let board = BoardConfig::default();
        let state = GameState::new(&board, &PlayersConfig::new());
        let mut copy = state.clone();

        copy.remove_occupant(14, red(1));
        copy.set_position(red(1), Position::Yard);

        assert_eq!(state.occupants(14), &[red(1)]);
        assert_eq!(state.position(red(1)), Position::Track(14));
    }

    #[test]
    fn test_state_serialization() {
        let board = BoardConfig::default();
        let state = GameState::new(&board, &PlayersConfig::new());

        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();

        assert_eq!(state, back);
    }
}
