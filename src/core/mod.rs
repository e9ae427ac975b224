//! Core types: players, pieces, board configuration, dice, actions, RNG, state.
//!
//! Everything here is plain data. Rules live in `rules`; nothing in this
//! module decides whether a move is legal.

pub mod player;
pub mod piece;
pub mod config;
pub mod action;
pub mod rng;
pub mod state;

pub use player::{MatchMode, Player, PlayerId, PlayerKind, PlayerMap, PlayersConfig, SeatConfig, PLAYER_COUNT};
pub use piece::{Piece, PieceId, PieceIdError, Position, PIECES_PER_PLAYER, PIECE_COUNT};
pub use config::{BoardConfig, ConfigError};
pub use action::{
    Action, BonusAward, BonusId, BonusKind, BonusStatus, Captures, Die, DieError, Move, MoveId,
};
pub use rng::GameRng;
pub use state::{GameState, InvariantError, Occupants, Phase, MAX_PER_SQUARE};
