//! # parchis-engine
//!
//! Rules engine for Parchís, the four-player race game in the Ludo family.
//!
//! ## Design Principles
//!
//! 1. **Pure Transitions**: every operation takes an immutable snapshot and
//!    returns a new one. Nothing is mutated in place and there is no global
//!    state.
//!
//! 2. **Total Dispatch**: an action that does not fit the current state is
//!    logged and ignored. Hosts never see an error for a stale or duplicated
//!    action.
//!
//! 3. **Injected Randomness**: the engine never rolls dice. Hosts and the CPU
//!    driver supply rolls and tie-breaks through a seeded `GameRng`.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) snapshot cloning via `im-rs`, so
//!   strategies can simulate freely on scratch copies.
//!
//! - **Arena + Occupancy Index**: pieces are addressed by stable identity;
//!   each track square keeps its occupants in arrival order.
//!
//! ## Modules
//!
//! - `core`: players, pieces, board configuration, dice, actions, RNG, state
//! - `rules`: move generation, transitions, bonus chain, dispatcher
//! - `ai`: strategies and the CPU driver
//!
//! ## Example
//!
//! ```
//! use parchis_engine::{Action, Die, PlayersConfig, Rules};
//!
//! let rules = Rules::default();
//! let state = rules.new_game(&PlayersConfig::new());
//! let state = rules.dispatch(&state, Action::Roll(Die::SIX));
//! assert_eq!(state.occupants(14).len(), 2);
//! ```

pub mod core;
pub mod rules;
pub mod ai;

// Re-export commonly used types
pub use crate::core::{
    Action, BoardConfig, BonusAward, BonusId, BonusKind, BonusStatus, ConfigError, Die, DieError,
    GameRng, GameState, InvariantError, MatchMode, Move, MoveId, Phase, Piece, PieceId, PieceIdError, Player,
    PlayerId, PlayerKind, PlayerMap, PlayersConfig, Position, SeatConfig,
};

pub use crate::rules::{Advance, Rules};

pub use crate::ai::{next_cpu_action, play_out, HeuristicStrategy, PlayOut, RandomStrategy, Strategy};
