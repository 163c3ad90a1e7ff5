// ABOUTME: Scheduled events (games and practices) and per-player attendance rows
// ABOUTME: Includes the "present/total" attendance ratio shown on team pages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EventType;

/// A practice or game on a team's schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier
    pub id: Uuid,
    /// Owning coach
    pub coach_id: Uuid,
    /// Team the event belongs to
    pub team_id: Uuid,
    /// Title
    pub title: String,
    /// Game or practice
    pub event_type: EventType,
    /// Calendar date
    pub date: NaiveDate,
    /// Start time
    pub time: NaiveTime,
    /// Venue
    pub location: String,
    /// Opponent, for games
    pub opponent: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Present count over total team events, rendered as `x/y`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttendanceRatio {
    /// Events the player attended
    pub present: u32,
    /// Events scheduled for the team
    pub total: u32,
}

impl fmt::Display for AttendanceRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.present, self.total)
    }
}

impl Serialize for AttendanceRatio {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_formatting() {
        assert_eq!(AttendanceRatio::default().to_string(), "0/0");
        assert_eq!(
            AttendanceRatio {
                present: 3,
                total: 5
            }
            .to_string(),
            "3/5"
        );
    }
}
