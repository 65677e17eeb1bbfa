//! Core types for the profile store.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One of the four cumulative play counters.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum StatField {
    GamesPlayed,
    GamesWin,
    GuessTotal,
    GuessHit,
}

impl StatField {
    /// JSON key of this counter inside the `statistics` object.
    pub fn key(self) -> &'static str {
        match self {
            StatField::GamesPlayed => "games_played",
            StatField::GamesWin => "games_win",
            StatField::GuessTotal => "guess_total",
            StatField::GuessHit => "guess_hit",
        }
    }

    /// The counter this one is ordered against.
    ///
    /// `games_played`/`games_win` and `guess_total`/`guess_hit` form pairs in
    /// which the win/hit side must never exceed the played/total side.
    pub fn paired(self) -> StatField {
        match self {
            StatField::GamesPlayed => StatField::GamesWin,
            StatField::GamesWin => StatField::GamesPlayed,
            StatField::GuessTotal => StatField::GuessHit,
            StatField::GuessHit => StatField::GuessTotal,
        }
    }

    /// Whether the paired counter is an upper bound for this one (true for
    /// `games_win`/`guess_hit`) rather than a lower bound.
    pub fn bounded_above(self) -> bool {
        matches!(self, StatField::GamesWin | StatField::GuessHit)
    }
}

impl fmt::Debug for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StatField({})", self.key())
    }
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A game outcome, applied to a record as one transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Won,
    Lost,
    Hit,
    Miss,
}

impl GameEvent {
    /// Counters this event increments, in update order.
    ///
    /// The played/total counter always comes first so that the win/hit
    /// increment is checked against the already-advanced bound.
    pub fn counters(self) -> &'static [StatField] {
        match self {
            GameEvent::Won => &[StatField::GamesPlayed, StatField::GamesWin],
            GameEvent::Lost => &[StatField::GamesPlayed],
            GameEvent::Hit => &[StatField::GuessTotal, StatField::GuessHit],
            GameEvent::Miss => &[StatField::GuessTotal],
        }
    }
}

/// Identity half of a user record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Display name; must match the record's document key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,

    /// Fields written by other collaborators, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Cumulative play counters for one user.
///
/// Counters are stored signed: the file is hand-editable and may hold
/// negative values, which clamp to zero on read. A `None` field round-trips
/// as an absent key, which is not the same thing as a stored zero.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub games_played: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub games_win: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guess_total: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guess_hit: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Statistics {
    /// All counters explicitly zeroed, as account creation writes them.
    pub fn zeroed() -> Self {
        Self {
            games_played: Some(0),
            games_win: Some(0),
            guess_total: Some(0),
            guess_hit: Some(0),
            extra: Map::new(),
        }
    }

    /// Read a counter; missing fields default to 0 and negative stored
    /// values clamp to 0.
    pub fn get(&self, field: StatField) -> u64 {
        let raw = match field {
            StatField::GamesPlayed => self.games_played,
            StatField::GamesWin => self.games_win,
            StatField::GuessTotal => self.guess_total,
            StatField::GuessHit => self.guess_hit,
        };
        raw.unwrap_or(0).max(0) as u64
    }

    /// Set a counter.
    pub fn set(&mut self, field: StatField, value: u64) {
        let value = Some(i64::try_from(value).unwrap_or(i64::MAX));
        match field {
            StatField::GamesPlayed => self.games_played = value,
            StatField::GamesWin => self.games_win = value,
            StatField::GuessTotal => self.guess_total = value,
            StatField::GuessHit => self.guess_hit = value,
        }
    }
}

/// Everything stored for one username: identity plus play counters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    /// A well-formed record with zeroed statistics, as the account-creation
    /// flow writes it.
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            profile: Some(Profile {
                player_name: Some(player_name.into()),
                extra: Map::new(),
            }),
            statistics: Some(Statistics::zeroed()),
            extra: Map::new(),
        }
    }
}
