// ABOUTME: Database operations for teams, always scoped to the owning coach
// ABOUTME: Deleting a team cascades to its players, events, games and their rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, parse_uuid, to_u32};
use crate::errors::{AppError, AppResult};
use crate::models::{Sport, Team, TeamStatus};

const TEAM_COLUMNS: &str =
    "id, coach_id, name, sport, season, max_players, status, location, created_at";

/// Validated team fields for create and full-replace edit
#[derive(Debug, Clone)]
pub struct TeamInput {
    /// Trimmed, non-empty name
    pub name: String,
    /// Sport
    pub sport: Sport,
    /// Optional season label
    pub season: Option<String>,
    /// Roster limit, 0 for unlimited
    pub max_players: u32,
    /// Status
    pub status: TeamStatus,
    /// Location, empty when not given
    pub location: String,
}

/// Team manager
pub struct TeamManager {
    pool: SqlitePool,
}

impl TeamManager {
    /// Create a new team manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a team owned by `coach_id`
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create(&self, coach_id: Uuid, input: &TeamInput) -> AppResult<Team> {
        let team = Team {
            id: Uuid::new_v4(),
            coach_id,
            name: input.name.clone(),
            sport: input.sport,
            season: input.season.clone(),
            max_players: input.max_players,
            status: input.status,
            location: input.location.clone(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r"
            INSERT INTO teams (id, coach_id, name, sport, season, max_players, status, location, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(team.id.to_string())
        .bind(coach_id.to_string())
        .bind(&team.name)
        .bind(team.sport.as_str())
        .bind(&team.season)
        .bind(i64::from(team.max_players))
        .bind(team.status.as_str())
        .bind(&team.location)
        .bind(format_timestamp(team.created_at))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create team: {e}")))?;

        info!(coach_id = %coach_id, team_id = %team.id, name = %team.name, "Team created");
        Ok(team)
    }

    /// Get a team if it is owned by `coach_id`
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, coach_id: Uuid, team_id: Uuid) -> AppResult<Option<Team>> {
        let row = sqlx::query(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1 AND coach_id = $2"
        ))
        .bind(team_id.to_string())
        .bind(coach_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get team: {e}")))?;

        row.map(|r| row_to_team(&r)).transpose()
    }

    /// Get an owned team or fail with `ResourceNotFound`
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the team is missing or owned by another
    /// coach, or a database error
    pub async fn require(&self, coach_id: Uuid, team_id: Uuid) -> AppResult<Team> {
        self.get(coach_id, team_id)
            .await?
            .ok_or_else(|| AppError::not_found("Team"))
    }

    /// All teams of the coach, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self, coach_id: Uuid) -> AppResult<Vec<Team>> {
        let rows = sqlx::query(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE coach_id = $1 ORDER BY created_at DESC, rowid DESC"
        ))
        .bind(coach_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list teams: {e}")))?;

        rows.iter().map(row_to_team).collect()
    }

    /// Replace every editable field of an owned team
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the team is missing or owned by another
    /// coach, or a database error
    pub async fn update(&self, coach_id: Uuid, team_id: Uuid, input: &TeamInput) -> AppResult<()> {
        let result = sqlx::query(
            r"
            UPDATE teams
            SET name = $1, sport = $2, season = $3, max_players = $4, status = $5, location = $6
            WHERE id = $7 AND coach_id = $8
            ",
        )
        .bind(&input.name)
        .bind(input.sport.as_str())
        .bind(&input.season)
        .bind(i64::from(input.max_players))
        .bind(input.status.as_str())
        .bind(&input.location)
        .bind(team_id.to_string())
        .bind(coach_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update team: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Team"));
        }
        info!(coach_id = %coach_id, team_id = %team_id, "Team updated");
        Ok(())
    }

    /// Delete an owned team and everything hanging off it
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the team is missing or owned by another
    /// coach, or a database error
    pub async fn delete(&self, coach_id: Uuid, team_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1 AND coach_id = $2")
            .bind(team_id.to_string())
            .bind(coach_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete team: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Team"));
        }
        info!(coach_id = %coach_id, team_id = %team_id, "Team deleted");
        Ok(())
    }

    /// Players currently on the team
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn player_count(&self, team_id: Uuid) -> AppResult<u32> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM players WHERE team_id = $1")
            .bind(team_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count players: {e}")))?;
        to_u32(count)
    }
}

pub(super) fn row_to_team(row: &SqliteRow) -> AppResult<Team> {
    let id: String = row.get("id");
    let coach_id: String = row.get("coach_id");
    let sport: String = row.get("sport");
    let status: String = row.get("status");
    let max_players: i64 = row.get("max_players");
    let created_at: String = row.get("created_at");

    Ok(Team {
        id: parse_uuid(&id)?,
        coach_id: parse_uuid(&coach_id)?,
        name: row.get("name"),
        sport: Sport::parse_lossy(&sport),
        season: row.get("season"),
        max_players: to_u32(max_players)?,
        status: TeamStatus::parse(&status).unwrap_or_default(),
        location: row.get("location"),
        created_at: parse_timestamp(&created_at)?,
    })
}
