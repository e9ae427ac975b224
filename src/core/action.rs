//! Dice, moves, bonus awards and the external action protocol.
//!
//! Actions are the only way a host changes the game: it holds the current
//! snapshot, builds an `Action`, and hands both to the dispatcher.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use super::piece::{PieceId, Position};
use super::player::PlayerId;
use super::state::GameState;

/// Die value outside 1-6.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("die value must be 1-6, got {0}")]
pub struct DieError(pub u8);

/// A six-sided die face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Die(u8);

impl Die {
    /// The face that lets a piece leave the yard and grants an extra turn.
    pub const SIX: Die = Die(6);

    /// Every face, ascending.
    pub const FACES: [Die; 6] = [Die(1), Die(2), Die(3), Die(4), Die(5), Die(6)];

    pub fn new(value: u8) -> Result<Self, DieError> {
        if (1..=6).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DieError(value))
        }
    }

    /// Caller guarantees `value` is 1-6.
    pub(crate) const fn from_face(value: u8) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn steps(self) -> u16 {
        self.0 as u16
    }

    #[must_use]
    pub const fn is_six(self) -> bool {
        self.0 == 6
    }
}

impl TryFrom<u8> for Die {
    type Error = DieError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Die::new(value)
    }
}

impl From<Die> for u8 {
    fn from(die: Die) -> u8 {
        die.0
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Deterministic move identity.
///
/// Derived from (piece, die, source, destination); the player is the piece's
/// owner. Two generations of the same move from the same snapshot always
/// produce equal ids, so hosts can look moves up idempotently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveId {
    pub piece: PieceId,
    pub die: Die,
    pub from: Position,
    pub to: Position,
}

impl std::fmt::Display for MoveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}->{}",
            self.piece.owner(),
            self.piece,
            self.die,
            self.from,
            self.to
        )
    }
}

/// Captured pieces; a landing kicks at most one opponent.
pub type Captures = SmallVec<[PieceId; 1]>;

/// A candidate transition for one piece.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub id: MoveId,
    pub player: PlayerId,
    pub piece: PieceId,
    pub die: Die,
    pub from: Position,
    pub to: Position,
    /// Opponents kicked back to the yard, as seen when the move was generated.
    pub captures: Captures,
    pub reaches_goal: bool,
}

impl Move {
    #[must_use]
    pub fn is_capture(&self) -> bool {
        !self.captures.is_empty()
    }

    #[must_use]
    pub fn is_spawn(&self) -> bool {
        self.from.is_yard()
    }
}

/// Monotonic bonus-award identity, allocated by the snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BonusId(pub u32);

impl std::fmt::Display for BonusId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Bonus({})", self.0)
    }
}

/// Why a bonus was granted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BonusKind {
    Capture,
    Goal,
}

impl BonusKind {
    /// Extra steps granted by this award.
    #[must_use]
    pub const fn steps(self) -> u16 {
        match self {
            BonusKind::Capture => 20,
            BonusKind::Goal => 10,
        }
    }
}

/// Lifecycle of an award.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BonusStatus {
    /// Waiting in the queue behind the active award.
    Queued,
    /// The active award, awaiting a piece choice.
    Pending,
}

/// An extra, fixed-distance move awarded for a capture or reaching the goal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusAward {
    pub id: BonusId,
    pub grantee: PlayerId,
    pub kind: BonusKind,
    pub steps: u16,
    /// Pieces that could legally advance `steps` when the award was last checked.
    pub choices: SmallVec<[PieceId; 4]>,
    /// Piece excluded from the choice set (the one that just finished).
    pub exclude: Option<PieceId>,
    pub status: BonusStatus,
}

/// External action protocol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Attach a die roll. Requires phase `Roll` and no pending bonus.
    Roll(Die),
    /// Apply a cached legal move by identity. Requires phase `Select`.
    SelectMove(MoveId),
    /// Apply a move value; it must still be in the cached legal set.
    ApplyMove(Move),
    /// Resolve the pending bonus with one of its eligible pieces.
    ApplyBonus(PieceId),
    /// Replace the whole state (new-match bootstrap).
    Reset(Box<GameState>),
}
