// ABOUTME: Database operations for players with atomic roster capacity enforcement
// ABOUTME: Removing a player cascades to their attendance and stat rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{info, warn};
use uuid::Uuid;

use super::{format_timestamp, parse_optional_date, parse_optional_uuid, parse_timestamp, parse_uuid};
use crate::errors::{AppError, AppResult};
use crate::models::{Player, Team};

const PLAYER_COLUMNS: &str = "p.id, p.coach_id, p.team_id, p.name, p.first_name, p.last_name, \
     p.email, p.jersey_number, p.position, p.date_of_birth, p.created_at";

/// Validated player fields for add and edit
#[derive(Debug, Clone)]
pub struct PlayerInput {
    /// Trimmed, non-empty given name
    pub first_name: String,
    /// Trimmed, non-empty family name
    pub last_name: String,
    /// Optional email
    pub email: Option<String>,
    /// Optional jersey label
    pub jersey_number: Option<String>,
    /// Optional position
    pub position: Option<String>,
    /// Optional date of birth
    pub date_of_birth: Option<NaiveDate>,
}

/// A player with the name of their team, for the cross-team players page
#[derive(Debug, Clone, Serialize)]
pub struct PlayerWithTeam {
    /// Player
    #[serde(flatten)]
    pub player: Player,
    /// Team name when rostered
    pub team_name: Option<String>,
}

/// Player manager
pub struct PlayerManager {
    pool: SqlitePool,
}

impl PlayerManager {
    /// Create a new player manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Add a player to an owned team, respecting `max_players`
    ///
    /// The roster count and the insert happen in one statement, so two
    /// concurrent adds cannot both take the last slot.
    ///
    /// # Errors
    ///
    /// Returns `CapacityExceeded` if the roster is full, or a database error
    pub async fn add_to_team(
        &self,
        coach_id: Uuid,
        team: &Team,
        input: &PlayerInput,
    ) -> AppResult<Player> {
        let player = Player {
            id: Uuid::new_v4(),
            coach_id,
            team_id: Some(team.id),
            name: Player::display_name(&input.first_name, &input.last_name),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            email: input.email.clone(),
            jersey_number: input.jersey_number.clone(),
            position: input.position.clone(),
            date_of_birth: input.date_of_birth,
            created_at: Utc::now(),
        };

        let result = sqlx::query(
            r"
            INSERT INTO players (
                id, coach_id, team_id, name, first_name, last_name,
                email, jersey_number, position, date_of_birth, created_at
            )
            SELECT $1, $2, t.id, $3, $4, $5, $6, $7, $8, $9, $10
            FROM teams t
            WHERE t.id = $11 AND t.coach_id = $2
              AND (t.max_players = 0
                   OR (SELECT COUNT(*) FROM players WHERE team_id = t.id) < t.max_players)
            ",
        )
        .bind(player.id.to_string())
        .bind(coach_id.to_string())
        .bind(&player.name)
        .bind(&player.first_name)
        .bind(&player.last_name)
        .bind(&player.email)
        .bind(&player.jersey_number)
        .bind(&player.position)
        .bind(player.date_of_birth.map(|d| d.to_string()))
        .bind(format_timestamp(player.created_at))
        .bind(team.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to add player: {e}")))?;

        if result.rows_affected() == 0 {
            warn!(team_id = %team.id, max_players = team.max_players, "Roster full");
            return Err(AppError::capacity(format!(
                "Team \"{}\" has reached its maximum of {} players.",
                team.name, team.max_players
            )));
        }

        info!(coach_id = %coach_id, team_id = %team.id, player_id = %player.id, "Player added");
        Ok(player)
    }

    /// Get a player if owned by `coach_id`
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, coach_id: Uuid, player_id: Uuid) -> AppResult<Option<Player>> {
        let row = sqlx::query(&format!(
            "SELECT {PLAYER_COLUMNS} FROM players p WHERE p.id = $1 AND p.coach_id = $2"
        ))
        .bind(player_id.to_string())
        .bind(coach_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get player: {e}")))?;

        row.map(|r| row_to_player(&r)).transpose()
    }

    /// Players on an owned team, by last then first name
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_for_team(&self, coach_id: Uuid, team_id: Uuid) -> AppResult<Vec<Player>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {PLAYER_COLUMNS} FROM players p
            WHERE p.team_id = $1 AND p.coach_id = $2
            ORDER BY p.last_name COLLATE NOCASE, p.first_name COLLATE NOCASE
            "
        ))
        .bind(team_id.to_string())
        .bind(coach_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list team players: {e}")))?;

        rows.iter().map(row_to_player).collect()
    }

    /// Every player of the coach across teams, with team names
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_for_coach(&self, coach_id: Uuid) -> AppResult<Vec<PlayerWithTeam>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {PLAYER_COLUMNS}, t.name AS team_name
            FROM players p
            LEFT JOIN teams t ON t.id = p.team_id
            WHERE p.coach_id = $1
            ORDER BY p.last_name COLLATE NOCASE, p.first_name COLLATE NOCASE
            "
        ))
        .bind(coach_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list players: {e}")))?;

        rows.iter()
            .map(|row| {
                Ok(PlayerWithTeam {
                    player: row_to_player(row)?,
                    team_name: row.get("team_name"),
                })
            })
            .collect()
    }

    /// Number of players the coach owns
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn count_for_coach(&self, coach_id: Uuid) -> AppResult<u32> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM players WHERE coach_id = $1")
            .bind(coach_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count players: {e}")))?;
        super::to_u32(count)
    }

    /// Update a player on an owned team in place
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the player is not on that team or not
    /// owned by the coach, or a database error
    pub async fn update(
        &self,
        coach_id: Uuid,
        team_id: Uuid,
        player_id: Uuid,
        input: &PlayerInput,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r"
            UPDATE players
            SET name = $1, first_name = $2, last_name = $3, email = $4,
                jersey_number = $5, position = $6, date_of_birth = $7
            WHERE id = $8 AND team_id = $9 AND coach_id = $10
            ",
        )
        .bind(Player::display_name(&input.first_name, &input.last_name))
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(&input.email)
        .bind(&input.jersey_number)
        .bind(&input.position)
        .bind(input.date_of_birth.map(|d| d.to_string()))
        .bind(player_id.to_string())
        .bind(team_id.to_string())
        .bind(coach_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update player: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Player"));
        }
        info!(coach_id = %coach_id, team_id = %team_id, player_id = %player_id, "Player updated");
        Ok(())
    }

    /// Hard delete a player from an owned team
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the player is not on that team or not
    /// owned by the coach, or a database error
    pub async fn remove(&self, coach_id: Uuid, team_id: Uuid, player_id: Uuid) -> AppResult<()> {
        let result =
            sqlx::query("DELETE FROM players WHERE id = $1 AND team_id = $2 AND coach_id = $3")
                .bind(player_id.to_string())
                .bind(team_id.to_string())
                .bind(coach_id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to remove player: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Player"));
        }
        info!(coach_id = %coach_id, team_id = %team_id, player_id = %player_id, "Player removed");
        Ok(())
    }
}

pub(super) fn row_to_player(row: &SqliteRow) -> AppResult<Player> {
    let id: String = row.get("id");
    let coach_id: String = row.get("coach_id");
    let created_at: String = row.get("created_at");

    Ok(Player {
        id: parse_uuid(&id)?,
        coach_id: parse_uuid(&coach_id)?,
        team_id: parse_optional_uuid(row.get("team_id"))?,
        name: row.get("name"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        jersey_number: row.get("jersey_number"),
        position: row.get("position"),
        date_of_birth: parse_optional_date(row.get("date_of_birth"))?,
        created_at: parse_timestamp(&created_at)?,
    })
}
