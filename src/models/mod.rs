// ABOUTME: Domain model for coaches, teams, players, events, attendance and game statistics
// ABOUTME: Pure data types and derivations with no database or HTTP dependencies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain model
//!
//! Every entity is reachable from exactly one [`Coach`]. The enums in
//! [`choices`] round-trip through their display strings, which are also what
//! the database stores and what forms submit.

/// Enumerated choices (sport, gender, team status, event type)
pub mod choices;
/// Coach account and profile
pub mod coach;
/// Events and attendance
pub mod event;
/// Games, per-player stat lines and derived figures
pub mod stats;
/// Teams and players
pub mod team;

pub use choices::{EventType, Gender, Sport, TeamStatus};
pub use coach::{Coach, CoachProfile};
pub use event::{AttendanceRatio, Event};
pub use stats::{
    BaseballStats, BasketballStats, FootballStats, Game, PlayerStat, SoccerStats, StatBag,
    StatLine, SwimmingStats, TennisStats, TrackStats, VolleyballStats, WinLossRecord,
};
pub use team::{Player, Team};
