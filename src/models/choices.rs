// ABOUTME: Enumerated choices used by forms and storage: sport, gender, team status, event type
// ABOUTME: Each enum stores and displays as the same human readable string
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sport coached or played by a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Sport {
    /// Basketball
    Basketball,
    /// American football
    Football,
    /// Soccer
    Soccer,
    /// Baseball
    Baseball,
    /// Volleyball
    Volleyball,
    /// Track & Field
    #[serde(rename = "Track & Field")]
    TrackAndField,
    /// Tennis
    Tennis,
    /// Swimming
    Swimming,
    /// Anything else
    #[default]
    Other,
}

impl Sport {
    /// Every sport, in the order forms list them
    pub const ALL: [Self; 9] = [
        Self::Basketball,
        Self::Football,
        Self::Soccer,
        Self::Baseball,
        Self::Volleyball,
        Self::TrackAndField,
        Self::Tennis,
        Self::Swimming,
        Self::Other,
    ];

    /// Stored and displayed name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Basketball => "Basketball",
            Self::Football => "Football",
            Self::Soccer => "Soccer",
            Self::Baseball => "Baseball",
            Self::Volleyball => "Volleyball",
            Self::TrackAndField => "Track & Field",
            Self::Tennis => "Tennis",
            Self::Swimming => "Swimming",
            Self::Other => "Other",
        }
    }

    /// Parse a submitted or stored name (case-insensitive)
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|sport| sport.as_str().eq_ignore_ascii_case(s))
    }

    /// Parse a stored name, falling back to `Other` for legacy values
    #[must_use]
    pub fn parse_lossy(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coach gender as entered on the profile page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Male
    Male,
    /// Female
    Female,
    /// Other
    Other,
    /// Prefer not to say
    #[serde(rename = "Prefer not to say")]
    PreferNotToSay,
}

impl Gender {
    /// Every choice
    pub const ALL: [Self; 4] = [Self::Male, Self::Female, Self::Other, Self::PreferNotToSay];

    /// Stored and displayed name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
            Self::PreferNotToSay => "Prefer not to say",
        }
    }

    /// Parse a submitted or stored name (case-insensitive)
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|gender| gender.as_str().eq_ignore_ascii_case(s))
    }
}

/// Lifecycle status of a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TeamStatus {
    /// Currently playing
    #[default]
    Active,
    /// Paused
    Inactive,
    /// Kept for history only
    Archived,
}

impl TeamStatus {
    /// Every status
    pub const ALL: [Self; 3] = [Self::Active, Self::Inactive, Self::Archived];

    /// Stored and displayed name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Archived => "Archived",
        }
    }

    /// Parse a submitted or stored name (case-insensitive)
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
    }
}

/// Kind of scheduled event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// Competitive game
    Game,
    /// Practice session
    Practice,
}

impl EventType {
    /// Stored and displayed name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Game => "Game",
            Self::Practice => "Practice",
        }
    }

    /// Parse a submitted or stored name (case-insensitive)
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "game" => Some(Self::Game),
            "practice" => Some(Self::Practice),
            _ => None,
        }
    }
}
