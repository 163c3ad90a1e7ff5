// ABOUTME: Games and per-player stat lines as a sport-tagged union with a generic stat bag
// ABOUTME: Derives basketball points and win/loss records from raw rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Game statistics
//!
//! A [`StatLine`] carries only the counters relevant to its sport. Counters
//! default to zero. Stat entry payloads arrive untagged, so the variant is
//! chosen from the team's [`Sport`] by [`StatLine::from_counters`].
//!
//! Basketball points are derivable from made shots, but a caller may also
//! store `total_points` directly; the two are kept side by side and never
//! reconciled.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use uuid::Uuid;

use super::Sport;
use crate::constants::limits::MAX_STAT_VALUE;
use crate::errors::{AppError, AppResult};

/// Payload key holding a caller supplied point total
pub const TOTAL_POINTS_KEY: &str = "total_points";

/// A played game and its result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    /// Unique identifier
    pub id: Uuid,
    /// Owning coach
    pub coach_id: Uuid,
    /// Team that played
    pub team_id: Uuid,
    /// Event whose stat entry produced the game, if it still exists
    pub event_id: Option<Uuid>,
    /// Title
    pub title: String,
    /// Opponent name
    pub opponent: String,
    /// Date played
    pub date: NaiveDate,
    /// Whether the team won
    pub is_win: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Wins and losses over a set of games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WinLossRecord {
    /// Games won
    pub wins: u32,
    /// Games not won
    pub losses: u32,
}

impl WinLossRecord {
    /// Games counted
    #[must_use]
    pub const fn played(&self) -> u32 {
        self.wins.saturating_add(self.losses)
    }
}

/// Basketball box score counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasketballStats {
    /// Two point field goals made
    pub two_pt_made: u32,
    /// Two point field goals attempted
    pub two_pt_att: u32,
    /// Three point field goals made
    pub three_pt_made: u32,
    /// Three point field goals attempted
    pub three_pt_att: u32,
    /// Free throws made
    pub ft_made: u32,
    /// Free throws attempted
    pub ft_att: u32,
    /// Offensive rebounds
    pub rebound_off: u32,
    /// Defensive rebounds
    pub rebound_def: u32,
    /// Assists
    pub assists: u32,
    /// Steals
    pub steals: u32,
    /// Blocks
    pub blocks: u32,
    /// Turnovers
    pub turnovers: u32,
    /// Personal fouls
    pub fouls: u32,
    /// Minutes on court
    pub minutes_played: u32,
}

impl BasketballStats {
    /// Points from made shots: 2 per two, 3 per three, 1 per free throw
    #[must_use]
    pub const fn derived_points(&self) -> u32 {
        self.two_pt_made
            .saturating_mul(2)
            .saturating_add(self.three_pt_made.saturating_mul(3))
            .saturating_add(self.ft_made)
    }

    /// Offensive plus defensive rebounds
    #[must_use]
    pub const fn total_rebounds(&self) -> u32 {
        self.rebound_off.saturating_add(self.rebound_def)
    }
}

/// Soccer counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoccerStats {
    /// Goals scored
    pub goals: u32,
    /// Assists
    pub assists: u32,
    /// Shots
    pub shots: u32,
    /// Shots on target
    pub shots_on_target: u32,
    /// Saves (goalkeepers)
    pub saves: u32,
    /// Fouls committed
    pub fouls: u32,
    /// Yellow cards
    pub yellow_cards: u32,
    /// Red cards
    pub red_cards: u32,
    /// Minutes on pitch
    pub minutes_played: u32,
}

/// American football counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootballStats {
    /// Passing yards
    pub passing_yards: u32,
    /// Passing touchdowns
    pub passing_tds: u32,
    /// Interceptions thrown
    pub interceptions: u32,
    /// Rushing yards
    pub rushing_yards: u32,
    /// Rushing touchdowns
    pub rushing_tds: u32,
    /// Receptions
    pub receptions: u32,
    /// Receiving yards
    pub receiving_yards: u32,
    /// Receiving touchdowns
    pub receiving_tds: u32,
    /// Tackles
    pub tackles: u32,
    /// Sacks
    pub sacks: u32,
}

/// Baseball counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseballStats {
    /// At bats
    pub at_bats: u32,
    /// Hits
    pub hits: u32,
    /// Runs scored
    pub runs: u32,
    /// Runs batted in
    pub rbis: u32,
    /// Home runs
    pub home_runs: u32,
    /// Walks
    pub walks: u32,
    /// Strikeouts
    pub strikeouts: u32,
    /// Stolen bases
    pub stolen_bases: u32,
}

impl BaseballStats {
    /// Hits over at bats; `None` without at bats
    #[must_use]
    pub fn batting_average(&self) -> Option<f64> {
        (self.at_bats > 0).then(|| f64::from(self.hits) / f64::from(self.at_bats))
    }
}

/// Volleyball counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolleyballStats {
    /// Kills
    pub kills: u32,
    /// Attack errors
    pub attack_errors: u32,
    /// Service aces
    pub aces: u32,
    /// Service errors
    pub service_errors: u32,
    /// Digs
    pub digs: u32,
    /// Blocks
    pub blocks: u32,
    /// Set assists
    pub assists: u32,
}

/// Track & Field result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackStats {
    /// Race time in seconds
    pub race_time_seconds: f64,
    /// Distance in meters (races) or mark in meters (field events)
    pub distance_meters: f64,
    /// Finishing place
    pub placement: u32,
}

/// Tennis counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TennisStats {
    /// Aces
    pub aces: u32,
    /// Double faults
    pub double_faults: u32,
    /// Winners
    pub winners: u32,
    /// Unforced errors
    pub unforced_errors: u32,
    /// Games won
    pub games_won: u32,
    /// Sets won
    pub sets_won: u32,
}

/// Swimming result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwimmingStats {
    /// Race time in seconds
    pub race_time_seconds: f64,
    /// Distance in meters
    pub distance_meters: f64,
    /// Laps completed
    pub laps: u32,
    /// Finishing place
    pub placement: u32,
}

/// Counters for sports without a dedicated schema, keyed by name
pub type StatBag = BTreeMap<String, f64>;

/// Sport-specific stat line for one player in one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "sport")]
pub enum StatLine {
    /// Basketball box score
    Basketball(BasketballStats),
    /// Soccer line
    Soccer(SoccerStats),
    /// Football line
    Football(FootballStats),
    /// Baseball line
    Baseball(BaseballStats),
    /// Volleyball line
    Volleyball(VolleyballStats),
    /// Track & Field result
    #[serde(rename = "Track & Field")]
    TrackAndField(TrackStats),
    /// Tennis line
    Tennis(TennisStats),
    /// Swimming result
    Swimming(SwimmingStats),
    /// Generic counters, nested so a counter may be named `sport`
    Other {
        /// Numeric counters by name
        counters: StatBag,
    },
}

impl StatLine {
    /// Build a stat line for `sport` from an untagged counter payload
    ///
    /// Numeric strings are accepted, blanks and nulls count as zero, and
    /// counters the sport does not track are ignored (kept for `Other`).
    ///
    /// # Errors
    ///
    /// Returns an invalid input error if a tracked counter is negative,
    /// above [`MAX_STAT_VALUE`] or not a number
    pub fn from_counters(sport: Sport, counters: &Map<String, Value>) -> AppResult<Self> {
        let normalized = normalize_counters(counters);
        let line = match sport {
            Sport::Basketball => Self::Basketball(parse_counters(normalized)?),
            Sport::Soccer => Self::Soccer(parse_counters(normalized)?),
            Sport::Football => Self::Football(parse_counters(normalized)?),
            Sport::Baseball => Self::Baseball(parse_counters(normalized)?),
            Sport::Volleyball => Self::Volleyball(parse_counters(normalized)?),
            Sport::TrackAndField => Self::TrackAndField(parse_counters(normalized)?),
            Sport::Tennis => Self::Tennis(parse_counters(normalized)?),
            Sport::Swimming => Self::Swimming(parse_counters(normalized)?),
            Sport::Other => Self::Other {
                counters: normalized
                    .into_iter()
                    .filter(|(key, _)| key != TOTAL_POINTS_KEY)
                    .filter_map(|(key, value)| value.as_f64().map(|v| (key, v)))
                    .collect(),
            },
        };
        let encoded = serde_json::to_value(&line)
            .map_err(|e| AppError::internal(format!("Failed to encode stat line: {e}")))?;
        check_counter_range("stats", &encoded)?;
        Ok(line)
    }

    /// Sport of this line
    #[must_use]
    pub const fn sport(&self) -> Sport {
        match self {
            Self::Basketball(_) => Sport::Basketball,
            Self::Soccer(_) => Sport::Soccer,
            Self::Football(_) => Sport::Football,
            Self::Baseball(_) => Sport::Baseball,
            Self::Volleyball(_) => Sport::Volleyball,
            Self::TrackAndField(_) => Sport::TrackAndField,
            Self::Tennis(_) => Sport::Tennis,
            Self::Swimming(_) => Sport::Swimming,
            Self::Other { .. } => Sport::Other,
        }
    }

    /// Points derived from made shots; basketball only
    #[must_use]
    pub const fn derived_points(&self) -> Option<u32> {
        match self {
            Self::Basketball(stats) => Some(stats.derived_points()),
            _ => None,
        }
    }

    /// Offensive plus defensive rebounds; basketball only
    #[must_use]
    pub const fn total_rebounds(&self) -> Option<u32> {
        match self {
            Self::Basketball(stats) => Some(stats.total_rebounds()),
            _ => None,
        }
    }

    /// Hits over at bats; baseball lines with at bats only
    #[must_use]
    pub fn batting_average(&self) -> Option<f64> {
        match self {
            Self::Baseball(stats) => stats.batting_average(),
            _ => None,
        }
    }
}

/// Read an optional caller supplied point total from a counter payload
///
/// # Errors
///
/// Returns an invalid input error if the value is present but not a
/// whole number between zero and [`MAX_STAT_VALUE`]
pub fn supplied_total_points(counters: &Map<String, Value>) -> AppResult<Option<u32>> {
    let Some(value) = counters.get(TOTAL_POINTS_KEY).and_then(normalize_value) else {
        return Ok(None);
    };
    value
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| *v <= MAX_STAT_VALUE)
        .map(Some)
        .ok_or_else(|| AppError::invalid_input(format!("Invalid {TOTAL_POINTS_KEY}: {value}")))
}

/// Stat line stored for one player in one game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStat {
    /// Unique identifier
    pub id: Uuid,
    /// Game
    pub game_id: Uuid,
    /// Player
    pub player_id: Uuid,
    /// Counters
    pub line: StatLine,
    /// Point total as supplied by the caller
    pub total_points: Option<u32>,
    /// First save
    pub created_at: DateTime<Utc>,
    /// Latest save
    pub updated_at: DateTime<Utc>,
}

impl PlayerStat {
    /// Points derived from the counters (basketball only)
    #[must_use]
    pub const fn derived_points(&self) -> Option<u32> {
        self.line.derived_points()
    }

    /// Points for season summaries: the stored total when present,
    /// otherwise the derived one
    #[must_use]
    pub fn summary_points(&self) -> Option<u32> {
        self.total_points.or_else(|| self.derived_points())
    }
}

fn parse_counters<T: DeserializeOwned>(counters: Map<String, Value>) -> AppResult<T> {
    serde_json::from_value(Value::Object(counters))
        .map_err(|e| AppError::invalid_input(format!("Invalid stat value: {e}")))
}

/// Every number in an encoded stat line must lie in `0..=MAX_STAT_VALUE`
fn check_counter_range(key: &str, value: &Value) -> AppResult<()> {
    match value {
        Value::Object(map) => map
            .iter()
            .try_for_each(|(key, value)| check_counter_range(key, value)),
        Value::Number(n) => match n.as_f64() {
            Some(v) if (0.0..=f64::from(MAX_STAT_VALUE)).contains(&v) => Ok(()),
            _ => Err(AppError::invalid_input(format!(
                "Invalid stat value for {key}: {n}"
            ))),
        },
        _ => Ok(()),
    }
}

fn normalize_counters(counters: &Map<String, Value>) -> Map<String, Value> {
    counters
        .iter()
        .filter_map(|(key, value)| normalize_value(value).map(|v| (key.clone(), v)))
        .collect()
}

/// Coerce a counter to a JSON number where possible; `None` drops it
fn normalize_value(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Number(n) => Some(normalize_number(n)),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().map_or_else(
                |_| Some(value.clone()),
                |f| Number::from_f64(f).map(|n| normalize_number(&n)),
            )
        }
        other => Some(other.clone()),
    }
}

/// Whole non-negative floats become integers so `u32` counters accept `3.0`
fn normalize_number(n: &Number) -> Value {
    if n.is_u64() || n.is_i64() {
        return Value::Number(n.clone());
    }
    match n.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) => {
            Value::Number(Number::from(f as u64))
        }
        _ => Value::Number(n.clone()),
    }
}
