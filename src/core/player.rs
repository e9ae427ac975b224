//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! The four seat colors. The set is closed: a match always has four seats,
//! some of which may be inactive.
//!
//! ## PlayerMap
//!
//! Fixed-size per-player storage with O(1) access, indexed by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// Number of seats at the table.
pub const PLAYER_COUNT: usize = 4;

/// Seat color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerId {
    Red,
    Blue,
    Yellow,
    Green,
}

impl PlayerId {
    /// All seats in index order.
    pub const ALL: [PlayerId; PLAYER_COUNT] =
        [PlayerId::Red, PlayerId::Blue, PlayerId::Yellow, PlayerId::Green];

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a seat by index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Iterate over all seats.
    ///
    /// ```
    /// use parchis_engine::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all().collect();
    /// assert_eq!(players.len(), 4);
    /// assert_eq!(players[0], PlayerId::Red);
    /// assert_eq!(players[3], PlayerId::Green);
    /// ```
    pub fn all() -> impl Iterator<Item = PlayerId> {
        Self::ALL.into_iter()
    }

    /// Lowercase color name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PlayerId::Red => "red",
            PlayerId::Blue => "blue",
            PlayerId::Yellow => "yellow",
            PlayerId::Green => "green",
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Who controls a seat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    #[default]
    Human,
    Cpu,
}

/// A seat at the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub kind: PlayerKind,
    /// Inactive seats are skipped in turn order and never spawn pieces.
    pub active: bool,
}

impl Player {
    #[must_use]
    pub fn is_cpu(&self) -> bool {
        self.kind == PlayerKind::Cpu
    }
}

/// Per-seat settings supplied at match start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatConfig {
    pub kind: PlayerKind,
    pub active: bool,
}

impl Default for SeatConfig {
    fn default() -> Self {
        Self {
            kind: PlayerKind::Human,
            active: true,
        }
    }
}

impl SeatConfig {
    #[must_use]
    pub const fn human() -> Self {
        Self {
            kind: PlayerKind::Human,
            active: true,
        }
    }

    #[must_use]
    pub const fn cpu() -> Self {
        Self {
            kind: PlayerKind::Cpu,
            active: true,
        }
    }

    #[must_use]
    pub const fn inactive() -> Self {
        Self {
            kind: PlayerKind::Human,
            active: false,
        }
    }
}

/// Seat configuration for a whole match.
///
/// Seats left unset default to an active human.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayersConfig {
    seats: PlayerMap<Option<SeatConfig>>,
}

impl PlayersConfig {
    /// All four seats active and human.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure one seat.
    #[must_use]
    pub fn with_seat(mut self, player: PlayerId, seat: SeatConfig) -> Self {
        self.seats[player] = Some(seat);
        self
    }

    /// Resolve a seat, applying defaults.
    #[must_use]
    pub fn seat(&self, player: PlayerId) -> SeatConfig {
        self.seats[player].unwrap_or_default()
    }

    /// Build the resolved player table.
    #[must_use]
    pub fn players(&self) -> PlayerMap<Player> {
        PlayerMap::new(|id| {
            let seat = self.seat(id);
            Player {
                id,
                kind: seat.kind,
                active: seat.active,
            }
        })
    }
}

/// Table presets offered by the game menu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Red is human, the other three seats are CPU.
    #[default]
    Solo,
    /// Red and blue, both human.
    Local2,
    /// Red, blue and yellow, all human.
    Local3,
    /// All four seats human.
    Local4,
}

impl MatchMode {
    #[must_use]
    pub fn players_config(self) -> PlayersConfig {
        use PlayerId::*;

        match self {
            MatchMode::Solo => PlayersConfig::new()
                .with_seat(Red, SeatConfig::human())
                .with_seat(Blue, SeatConfig::cpu())
                .with_seat(Yellow, SeatConfig::cpu())
                .with_seat(Green, SeatConfig::cpu()),
            MatchMode::Local2 => PlayersConfig::new()
                .with_seat(Yellow, SeatConfig::inactive())
                .with_seat(Green, SeatConfig::inactive()),
            MatchMode::Local3 => PlayersConfig::new().with_seat(Green, SeatConfig::inactive()),
            MatchMode::Local4 => PlayersConfig::new(),
        }
    }
}

impl FromStr for MatchMode {
    type Err = std::convert::Infallible;

    /// Unknown names fall back to `Solo`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "local2" => MatchMode::Local2,
            "local3" => MatchMode::Local3,
            "local4" => MatchMode::Local4,
            _ => MatchMode::Solo,
        })
    }
}

/// Per-player data storage with O(1) access.
///
/// Backed by a fixed array with one entry per seat.
///
/// ## Example
///
/// ```
/// use parchis_engine::core::{PlayerId, PlayerMap};
///
/// let mut score: PlayerMap<i32> = PlayerMap::new(|_| 0);
/// score[PlayerId::Blue] = 3;
/// assert_eq!(score[PlayerId::Blue], 3);
/// assert_eq!(score[PlayerId::Red], 0);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; PLAYER_COUNT],
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: std::array::from_fn(|i| factory(PlayerId::ALL[i])),
        }
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::ALL.into_iter().zip(self.data.iter())
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        assert_eq!(PlayerId::Red.index(), 0);
        assert_eq!(PlayerId::Green.index(), 3);
        assert_eq!(PlayerId::from_index(2), Some(PlayerId::Yellow));
        assert_eq!(PlayerId::from_index(4), None);
        assert_eq!(format!("{}", PlayerId::Blue), "blue");
    }

    #[test]
    fn test_player_map_new() {
        let map: PlayerMap<usize> = PlayerMap::new(|p| p.index() * 10);

        assert_eq!(map[PlayerId::Red], 0);
        assert_eq!(map[PlayerId::Blue], 10);
        assert_eq!(map[PlayerId::Yellow], 20);
        assert_eq!(map[PlayerId::Green], 30);
    }

    #[test]
    fn test_player_map_iter() {
        let map: PlayerMap<usize> = PlayerMap::new(|p| p.index());

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[0], (PlayerId::Red, &0));
        assert_eq!(pairs[3], (PlayerId::Green, &3));
    }

    #[test]
    fn test_players_config_defaults() {
        let players = PlayersConfig::new()
            .with_seat(PlayerId::Blue, SeatConfig::cpu())
            .players();

        assert_eq!(players[PlayerId::Red].kind, PlayerKind::Human);
        assert!(players[PlayerId::Red].active);
        assert!(players[PlayerId::Blue].is_cpu());
    }

    #[test]
    fn test_match_mode_presets() {
        let solo = MatchMode::Solo.players_config().players();
        assert!(!solo[PlayerId::Red].is_cpu());
        assert!(solo[PlayerId::Green].is_cpu());

        let local2 = MatchMode::Local2.players_config().players();
        assert!(local2[PlayerId::Blue].active);
        assert!(!local2[PlayerId::Yellow].active);
        assert!(!local2[PlayerId::Green].active);

        let local3 = MatchMode::Local3.players_config().players();
        assert!(local3[PlayerId::Yellow].active);
        assert!(!local3[PlayerId::Green].active);
    }

    #[test]
    fn test_match_mode_parse_falls_back_to_solo() {
        assert_eq!("local3".parse::<MatchMode>().unwrap(), MatchMode::Local3);
        assert_eq!("online".parse::<MatchMode>().unwrap(), MatchMode::Solo);
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<u16> = PlayerMap::new(|p| p.index() as u16 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: PlayerMap<u16> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}
