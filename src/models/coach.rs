// ABOUTME: Coach account (the authenticated tenant) and its one-to-one profile
// ABOUTME: Password hashes never leave this type through serialization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Gender, Sport};

/// Authenticated account; the sole tenant boundary for all data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coach {
    /// Unique identifier
    pub id: Uuid,
    /// Unique login name (case-insensitive)
    pub username: String,
    /// Unique email, stored lower-cased
    pub email: String,
    /// bcrypt hash
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Registration time
    pub created_at: DateTime<Utc>,
}

impl Coach {
    /// Name shown in page headers
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_owned()
        }
    }
}

/// Per-coach profile, created lazily
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachProfile {
    /// Owning coach
    pub coach_id: Uuid,
    /// Sport used as the default for new teams
    pub sport: Sport,
    /// Optional gender
    pub gender: Option<Gender>,
    /// Optional birthday
    pub birthday: Option<NaiveDate>,
    /// Optional path or URL of the profile picture
    pub profile_picture: Option<String>,
}
