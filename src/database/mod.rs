// ABOUTME: SQLite connection pool, embedded migrations and per-aggregate manager accessors
// ABOUTME: Also hosts the row decoding helpers shared by every manager
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Persistence layer
//!
//! One manager per aggregate. Every query that reads or mutates coach-owned
//! data takes the acting coach id explicitly and filters on it, so an entity
//! owned by another coach is indistinguishable from a missing one.

/// Attendance rows per event and player
pub mod attendance;
/// Coach accounts and profiles
pub mod coaches;
/// Scheduled events and attendance provisioning
pub mod events;
/// Games and win/loss data
pub mod games;
/// Players and roster capacity
pub mod players;
/// Per-player game statistics
pub mod stats;
/// Teams
pub mod teams;

pub use attendance::{AttendanceManager, RosterAttendance};
pub use coaches::{CoachManager, NewCoach, ProfileUpdate};
pub use events::{EventInput, EventManager, EventWithTeam};
pub use games::{GameInput, GameManager};
pub use players::{PlayerInput, PlayerManager, PlayerWithTeam};
pub use stats::{PlayerStatEntry, PlayerStatHistory, StatsManager};
pub use teams::{TeamInput, TeamManager};

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite, SqlitePool};
use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Storage format for times of day
const TIME_FORMAT: &str = "%H:%M:%S";

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Connect to `database_url` and run pending migrations
    ///
    /// The database file is created if missing and foreign key enforcement
    /// is switched on for every connection.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Database URL is invalid or malformed
    /// - Database connection fails
    /// - Migration process fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid DATABASE_URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        // Each in-memory connection is its own database
        let pool_options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run all database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any migration fails
    pub async fn migrate(&self) -> AppResult<()> {
        info!("Running database migrations...");

        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Round-trip a trivial query
    ///
    /// # Errors
    ///
    /// Returns an error if the database is unreachable
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }

    /// Coach account manager
    #[must_use]
    pub fn coaches(&self) -> CoachManager {
        CoachManager::new(self.pool.clone())
    }

    /// Team manager
    #[must_use]
    pub fn teams(&self) -> TeamManager {
        TeamManager::new(self.pool.clone())
    }

    /// Player manager
    #[must_use]
    pub fn players(&self) -> PlayerManager {
        PlayerManager::new(self.pool.clone())
    }

    /// Event manager
    #[must_use]
    pub fn events(&self) -> EventManager {
        EventManager::new(self.pool.clone())
    }

    /// Attendance manager
    #[must_use]
    pub fn attendance(&self) -> AttendanceManager {
        AttendanceManager::new(self.pool.clone())
    }

    /// Game manager
    #[must_use]
    pub fn games(&self) -> GameManager {
        GameManager::new(self.pool.clone())
    }

    /// Player statistics manager
    #[must_use]
    pub fn stats(&self) -> StatsManager {
        StatsManager::new(self.pool.clone())
    }
}

/// Timestamp in the stored RFC 3339 form; microsecond precision keeps
/// text ordering equal to chronological ordering
pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

pub(crate) fn parse_uuid(value: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))
}

pub(crate) fn parse_optional_uuid(value: Option<String>) -> AppResult<Option<Uuid>> {
    value.as_deref().map(parse_uuid).transpose()
}

pub(crate) fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))
}

pub(crate) fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| AppError::internal(format!("Invalid date: {e}")))
}

pub(crate) fn parse_optional_date(value: Option<String>) -> AppResult<Option<NaiveDate>> {
    value.as_deref().map(parse_date).transpose()
}

pub(crate) fn parse_time(value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|e| AppError::internal(format!("Invalid time: {e}")))
}

pub(crate) fn to_u32(value: i64) -> AppResult<u32> {
    u32::try_from(value).map_err(|e| AppError::internal(format!("Invalid count: {e}")))
}
