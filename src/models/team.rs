// ABOUTME: Team and Player entities with roster capacity and age derivations
// ABOUTME: A player may be rosterless; a team limits its roster only when max_players > 0
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Sport, TeamStatus};

/// A team owned by one coach
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier
    pub id: Uuid,
    /// Owning coach
    pub coach_id: Uuid,
    /// Display name
    pub name: String,
    /// Sport played
    pub sport: Sport,
    /// Season label, e.g. "2024-2025"
    pub season: Option<String>,
    /// Roster limit; 0 means unlimited
    pub max_players: u32,
    /// Lifecycle status
    pub status: TeamStatus,
    /// Home location
    pub location: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Whether a roster of `current` players can take one more
    #[must_use]
    pub const fn has_room_for_one_more(&self, current: u32) -> bool {
        self.max_players == 0 || current < self.max_players
    }
}

/// A player owned by one coach, optionally on one team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier
    pub id: Uuid,
    /// Owning coach
    pub coach_id: Uuid,
    /// Team, if rostered
    pub team_id: Option<Uuid>,
    /// Display name, `first last`
    pub name: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Optional contact email
    pub email: Option<String>,
    /// Jersey label; free text ("00", "12A")
    pub jersey_number: Option<String>,
    /// Playing position
    pub position: Option<String>,
    /// Date of birth
    pub date_of_birth: Option<NaiveDate>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Display name derived from the two name parts
    #[must_use]
    pub fn display_name(first_name: &str, last_name: &str) -> String {
        format!("{} {}", first_name.trim(), last_name.trim())
            .trim()
            .to_owned()
    }

    /// Age in whole years on `today`; `None` without a date of birth
    ///
    /// The year difference is decremented when this year's birthday is still
    /// ahead of `today`.
    #[must_use]
    pub fn age_on(&self, today: NaiveDate) -> Option<i32> {
        let dob = self.date_of_birth?;
        let mut age = today.year() - dob.year();
        if (today.month(), today.day()) < (dob.month(), dob.day()) {
            age -= 1;
        }
        Some(age)
    }
}
