//! Piece identification and board positions.
//!
//! Every player owns exactly four pieces for the lifetime of a match. Pieces
//! are never created or destroyed, only relocated, so identities are stable
//! and double as arena indices:
//!
//! - `0..4`: red slots 1-4
//! - `4..8`: blue slots 1-4
//! - `8..12`: yellow slots 1-4
//! - `12..16`: green slots 1-4
//!
//! ```
//! use parchis_engine::core::{PieceId, PlayerId};
//!
//! let id = PieceId::new(PlayerId::Blue, 2);
//! assert_eq!(id.arena_index(), 5);
//! assert_eq!(PieceId::from_arena_index(5), Some(id));
//! assert_eq!(id.to_string(), "blue-2");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::player::{PlayerId, PLAYER_COUNT};

/// Pieces owned by each player.
pub const PIECES_PER_PLAYER: u8 = 4;

/// Total pieces on the table.
pub const PIECE_COUNT: usize = PLAYER_COUNT * PIECES_PER_PLAYER as usize;

/// Piece slot outside 1-4.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("piece slot must be 1-4, got {0}")]
pub struct PieceIdError(pub u8);

/// Stable piece identity: owner plus a 1-based slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPieceId", into = "RawPieceId")]
pub struct PieceId {
    owner: PlayerId,
    slot: u8,
}

/// Wire shape of `PieceId`, checked on the way in.
#[derive(Serialize, Deserialize)]
struct RawPieceId {
    owner: PlayerId,
    slot: u8,
}

impl PieceId {
    /// Create a piece ID.
    ///
    /// Panics if `slot` is not in `1..=4`; use `try_new` for untrusted input.
    #[must_use]
    pub fn new(owner: PlayerId, slot: u8) -> Self {
        match Self::try_new(owner, slot) {
            Ok(id) => id,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_new(owner: PlayerId, slot: u8) -> Result<Self, PieceIdError> {
        if (1..=PIECES_PER_PLAYER).contains(&slot) {
            Ok(Self { owner, slot })
        } else {
            Err(PieceIdError(slot))
        }
    }

    #[must_use]
    pub const fn owner(self) -> PlayerId {
        self.owner
    }

    /// Position of this piece in the state's piece arena.
    #[must_use]
    pub const fn arena_index(self) -> usize {
        self.owner.index() * PIECES_PER_PLAYER as usize + (self.slot as usize - 1)
    }

    #[must_use]
    pub fn from_arena_index(index: usize) -> Option<Self> {
        let owner = PlayerId::from_index(index / PIECES_PER_PLAYER as usize)?;
        Some(Self {
            owner,
            slot: (index % PIECES_PER_PLAYER as usize) as u8 + 1,
        })
    }

    /// The four pieces of one player, slot order.
    pub fn of(owner: PlayerId) -> impl Iterator<Item = PieceId> {
        (1..=PIECES_PER_PLAYER).map(move |slot| PieceId { owner, slot })
    }

    /// Every piece on the table, arena order.
    pub fn all() -> impl Iterator<Item = PieceId> {
        PlayerId::all().flat_map(PieceId::of)
    }
}

impl TryFrom<RawPieceId> for PieceId {
    type Error = PieceIdError;

    fn try_from(raw: RawPieceId) -> Result<Self, Self::Error> {
        PieceId::try_new(raw.owner, raw.slot)
    }
}

impl From<PieceId> for RawPieceId {
    fn from(id: PieceId) -> Self {
        RawPieceId {
            owner: id.owner,
            slot: id.slot,
        }
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.owner, self.slot)
    }
}

/// Where a piece stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "at", rename_all = "lowercase")]
pub enum Position {
    /// Not yet in play.
    Yard,
    /// Shared track square, labeled `1..=track_length`.
    Track(u16),
    /// Private home stretch, offset `0..home_length`.
    Home(u16),
    /// Finished.
    Goal,
}

impl Position {
    #[must_use]
    pub const fn is_yard(self) -> bool {
        matches!(self, Position::Yard)
    }

    #[must_use]
    pub const fn is_goal(self) -> bool {
        matches!(self, Position::Goal)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Yard => f.write_str("yard"),
            Position::Track(label) => write!(f, "t{label}"),
            Position::Home(offset) => write!(f, "h{offset}"),
            Position::Goal => f.write_str("goal"),
        }
    }
}

/// A piece and where it stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub pos: Position,
}

impl Piece {
    #[must_use]
    pub const fn owner(&self) -> PlayerId {
        self.id.owner()
    }
}
