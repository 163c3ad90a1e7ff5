// ABOUTME: Application constants: user-facing messages and operational limits
// ABOUTME: Centralizes validation wording so page templates and tests agree
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// User-facing validation and authentication messages
pub mod error_messages {
    /// Registration with any blank field
    pub const FILL_ALL_FIELDS: &str = "Please fill in all fields.";
    /// Malformed email address
    pub const INVALID_EMAIL_FORMAT: &str =
        "Please enter a valid email address (e.g., user@example.com).";
    /// Password confirmation mismatch
    pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match.";
    /// Password shorter than the minimum
    pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters.";
    /// Username already registered
    pub const USERNAME_TAKEN: &str = "Username is already taken.";
    /// Email already registered
    pub const EMAIL_TAKEN: &str = "An account with that email already exists.";
    /// Failed login, deliberately uninformative
    pub const INVALID_CREDENTIALS: &str =
        "Invalid credentials. Check your email/username and password.";
    /// Password change with a wrong current password
    pub const CURRENT_PASSWORD_INCORRECT: &str = "Your current password is incorrect.";
    /// Team form without a name
    pub const TEAM_NAME_REQUIRED: &str = "Team name is required.";
    /// Sport outside the supported list
    pub const INVALID_SPORT: &str = "Please choose a valid sport.";
    /// Team status outside the supported list
    pub const INVALID_STATUS: &str = "Please choose a valid team status.";
    /// Negative or non-numeric roster limit
    pub const INVALID_MAX_PLAYERS: &str = "Max players must be a whole number of 0 or more.";
    /// Player form without both names
    pub const PLAYER_NAME_REQUIRED: &str = "First and last name are required.";
    /// Event form missing one of the required fields
    pub const EVENT_FIELDS_REQUIRED: &str =
        "Team, title, type, date, time and location are required.";
    /// Event type outside Game/Practice
    pub const INVALID_EVENT_TYPE: &str = "Event type must be Game or Practice.";
    /// Unparseable calendar date
    pub const INVALID_DATE: &str = "Dates must use the YYYY-MM-DD format.";
    /// Unparseable time of day
    pub const INVALID_TIME: &str = "Times must use the HH:MM format.";
    /// Gender outside the supported list
    pub const INVALID_GENDER: &str = "Please choose a valid gender.";
}

/// Operational limits
pub mod limits {
    /// Minimum password length for registration and password change
    pub const MIN_PASSWORD_LENGTH: usize = 8;
    /// Session lifetime when `JWT_EXPIRY_HOURS` is unset
    pub const DEFAULT_SESSION_HOURS: i64 = 24;
    /// Upcoming events shown on the dashboard
    pub const DASHBOARD_UPCOMING_EVENTS: u32 = 5;
    /// Largest value a single stat counter or point total may hold
    pub const MAX_STAT_VALUE: u32 = 100_000;
}

/// Cookie and header names
pub mod session {
    /// Cookie carrying the session token
    pub const AUTH_COOKIE: &str = "auth_token";
    /// Page unauthenticated page requests are redirected to
    pub const LOGIN_PATH: &str = "/login";
    /// Page shown after a successful login or registration
    pub const DASHBOARD_PATH: &str = "/dashboard";
    /// Page shown after logout
    pub const LANDING_PATH: &str = "/";
}
