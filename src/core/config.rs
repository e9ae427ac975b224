//! Board configuration.
//!
//! Static geometry and rule knobs supplied once at match start:
//! - Track length `T` (labels `1..=T`) and home-stretch length `H`
//! - Turn order
//! - Per-player start square and home-entry square
//! - Safe squares
//!
//! Movement on the shared track always decrements the label (label 1 wraps
//! to `T`). A piece standing on its owner's home-entry square steps into
//! `Home(0)` instead of continuing around the track.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::player::{PlayerId, PlayerMap};

/// Standard track length.
pub const DEFAULT_TRACK_LENGTH: u16 = 68;

/// Standard home-stretch length.
pub const DEFAULT_HOME_LENGTH: u16 = 7;

/// Standard start squares, red/blue/yellow/green.
pub const DEFAULT_START_SQUARES: [u16; 4] = [14, 31, 48, 65];

/// Standard safe squares: each start plus the squares 7 and 12 steps ahead of it.
pub const DEFAULT_SAFE_SQUARES: [u16; 12] = [2, 7, 14, 19, 24, 31, 36, 41, 48, 53, 58, 65];

/// Rejected board configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("track length must be positive")]
    EmptyTrack,

    #[error("home length must be positive")]
    EmptyHome,

    #[error("turn order is empty")]
    EmptyTurnOrder,

    #[error("{0} appears more than once in the turn order")]
    DuplicateTurn(PlayerId),

    #[error("{what} square {label} for {player} is outside 1..={track_length}")]
    SquareOutOfRange {
        what: &'static str,
        player: PlayerId,
        label: u16,
        track_length: u16,
    },

    #[error("safe square {label} is outside 1..={track_length}")]
    SafeSquareOutOfRange { label: u16, track_length: u16 },

    #[error("home entry for {0} coincides with its start square")]
    EntryIsStart(PlayerId),
}

/// Immutable board parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Number of labeled squares on the shared circular track.
    pub track_length: u16,

    /// Steps from the home entry to the goal, exclusive. Goal is offset `home_length`.
    pub home_length: u16,

    /// Cyclic turn order.
    pub turn_order: Vec<PlayerId>,

    /// Square a piece lands on when leaving the yard.
    pub start_square: PlayerMap<u16>,

    /// Stepping forward off this square enters the home stretch.
    pub home_entry: PlayerMap<u16>,

    /// Squares where capture is disallowed.
    pub safe_squares: FxHashSet<u16>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        let track_length = DEFAULT_TRACK_LENGTH;
        let start_square = PlayerMap::new(|p| DEFAULT_START_SQUARES[p.index()]);
        let home_entry = PlayerMap::new(|p| start_square[p] % track_length + 1);

        Self {
            track_length,
            home_length: DEFAULT_HOME_LENGTH,
            turn_order: PlayerId::ALL.to_vec(),
            start_square,
            home_entry,
            safe_squares: DEFAULT_SAFE_SQUARES.into_iter().collect(),
        }
    }
}

impl BoardConfig {
    /// Set the home-stretch length.
    #[must_use]
    pub fn with_home_length(mut self, home_length: u16) -> Self {
        self.home_length = home_length;
        self
    }

    /// Set the turn order.
    #[must_use]
    pub fn with_turn_order(mut self, order: impl Into<Vec<PlayerId>>) -> Self {
        self.turn_order = order.into();
        self
    }

    /// Set a player's start square; the home entry follows as one step past it.
    #[must_use]
    pub fn with_start_square(mut self, player: PlayerId, label: u16) -> Self {
        self.start_square[player] = label;
        self.home_entry[player] = label % self.track_length + 1;
        self
    }

    /// Override a player's home-entry square.
    #[must_use]
    pub fn with_home_entry(mut self, player: PlayerId, label: u16) -> Self {
        self.home_entry[player] = label;
        self
    }

    /// Replace the safe-square set.
    #[must_use]
    pub fn with_safe_squares(mut self, labels: impl IntoIterator<Item = u16>) -> Self {
        self.safe_squares = labels.into_iter().collect();
        self
    }

    /// Check every label and count against the track geometry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.track_length == 0 {
            return Err(ConfigError::EmptyTrack);
        }
        if self.home_length == 0 {
            return Err(ConfigError::EmptyHome);
        }
        if self.turn_order.is_empty() {
            return Err(ConfigError::EmptyTurnOrder);
        }

        let mut seen = FxHashSet::default();
        for &player in &self.turn_order {
            if !seen.insert(player) {
                return Err(ConfigError::DuplicateTurn(player));
            }
        }

        for player in PlayerId::all() {
            for (what, label) in [
                ("start", self.start_square[player]),
                ("home entry", self.home_entry[player]),
            ] {
                if !self.is_on_track(label) {
                    return Err(ConfigError::SquareOutOfRange {
                        what,
                        player,
                        label,
                        track_length: self.track_length,
                    });
                }
            }
            if self.track_length > 1 && self.start_square[player] == self.home_entry[player] {
                return Err(ConfigError::EntryIsStart(player));
            }
        }

        if let Some(&label) = self.safe_squares.iter().find(|&&l| !self.is_on_track(l)) {
            return Err(ConfigError::SafeSquareOutOfRange {
                label,
                track_length: self.track_length,
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn is_on_track(&self, label: u16) -> bool {
        (1..=self.track_length).contains(&label)
    }

    #[must_use]
    pub fn is_safe(&self, label: u16) -> bool {
        self.safe_squares.contains(&label)
    }

    /// Label one step forward from `label` (decrementing, 1 wraps to `T`).
    #[must_use]
    pub fn step_track(&self, label: u16) -> u16 {
        if label <= 1 {
            self.track_length
        } else {
            label - 1
        }
    }

    /// Steps a piece of `owner` standing on `label` has travelled since its start.
    #[must_use]
    pub fn track_progress(&self, owner: PlayerId, label: u16) -> u16 {
        let t = u32::from(self.track_length);
        let start = u32::from(self.start_square[owner]);
        ((start + t - u32::from(label)) % t) as u16
    }

    /// Player after `current` in turn order, wrapping.
    ///
    /// A player missing from the turn order hands over to the first entry.
    #[must_use]
    pub fn next_in_order(&self, current: PlayerId) -> PlayerId {
        match self.turn_order.iter().position(|&p| p == current) {
            Some(i) => self.turn_order[(i + 1) % self.turn_order.len()],
            None => self.turn_order[0],
        }
    }
}
