// ABOUTME: Route module organization for the team management server
// ABOUTME: One module per use-case family plus shared form parsing helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Routes
//!
//! Two families share the router:
//!
//! - *page* routes take form posts and answer with a render context or a
//!   redirect (see [`pages`]);
//! - *JSON* routes under `/api` back the attendance, stats and calendar
//!   widgets and answer `401` instead of redirecting.
//!
//! Each handler authenticates first and then passes the coach id into the
//! database layer.

// ═══════════════════════════════════════════════════════════════
// Infrastructure
// ═══════════════════════════════════════════════════════════════

/// Health check route
pub mod health;
/// Page response helpers
pub mod pages;

// ═══════════════════════════════════════════════════════════════
// Page family
// ═══════════════════════════════════════════════════════════════

/// Landing, login, registration, logout and password change
pub mod auth;
/// Dashboard
pub mod dashboard;
/// Teams list, detail, edit and delete
pub mod teams;
/// Roster management and the players page
pub mod players;
/// Schedule and event mutations, plus calendar data
pub mod events;
/// Stats page and stats JSON endpoints
pub mod stats;
/// Coach profile
pub mod profile;

// ═══════════════════════════════════════════════════════════════
// JSON family
// ═══════════════════════════════════════════════════════════════

/// Attendance marking endpoints
pub mod attendance;

pub use attendance::AttendanceRoutes;
pub use auth::AuthRoutes;
pub use dashboard::DashboardRoutes;
pub use events::EventRoutes;
pub use health::HealthRoutes;
pub use players::PlayerRoutes;
pub use profile::ProfileRoutes;
pub use stats::StatsRoutes;
pub use teams::TeamRoutes;

use axum::extract::rejection::{FormRejection, JsonRejection};
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::constants::error_messages;
use crate::errors::{AppError, AppResult};

/// Parse a path id; anything unparseable is reported as not found
///
/// # Errors
///
/// Returns `ResourceNotFound` naming `resource`
pub fn parse_path_id(raw: &str, resource: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::not_found(resource))
}

/// Trimmed text, `None` when blank
#[must_use]
pub fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Parse a `YYYY-MM-DD` form field
///
/// # Errors
///
/// Returns `InvalidInput` if the value is not a calendar date
pub fn parse_form_date(raw: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::invalid_input(error_messages::INVALID_DATE))
}

/// Parse an optional `YYYY-MM-DD` form field; blank clears it
///
/// # Errors
///
/// Returns `InvalidInput` if a non-blank value is not a calendar date
pub fn parse_optional_form_date(raw: &str) -> AppResult<Option<NaiveDate>> {
    optional_text(raw).map(|s| parse_form_date(&s)).transpose()
}

/// Parse an `HH:MM` or `HH:MM:SS` form field
///
/// # Errors
///
/// Returns `InvalidInput` if the value is not a time of day
pub fn parse_form_time(raw: &str) -> AppResult<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| AppError::invalid_input(error_messages::INVALID_TIME))
}

/// Map a JSON body rejection to a `400` without touching any state
pub(crate) fn json_rejection(rejection: &JsonRejection) -> AppError {
    AppError::invalid_format(format!("Malformed JSON body: {}", rejection.body_text()))
}

/// Map a form body rejection to an invalid format error; page handlers
/// resolve the session first so a missing one still redirects to login
pub(crate) fn form_rejection(rejection: &FormRejection) -> AppError {
    AppError::invalid_format(format!("Malformed form body: {}", rejection.body_text()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unparseable_path_id_is_not_found() {
        let err = parse_path_id("42", "Team").unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn test_time_accepts_both_precisions() {
        assert!(parse_form_time("18:30").is_ok());
        assert!(parse_form_time("18:30:00").is_ok());
        assert!(parse_form_time("6pm").is_err());
    }

    #[test]
    fn test_blank_optional_date_clears() {
        assert!(matches!(parse_optional_form_date("  "), Ok(None)));
        assert!(parse_optional_form_date("2024-02-30").is_err());
    }
}
