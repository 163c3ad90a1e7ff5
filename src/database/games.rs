// ABOUTME: Database operations for games and their win/loss results
// ABOUTME: A game linked to an event is unique per team and event and upserted on save
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::{format_timestamp, parse_date, parse_optional_uuid, parse_timestamp, parse_uuid, to_u32};
use crate::errors::{AppError, AppResult};
use crate::models::{Game, WinLossRecord};

const GAME_COLUMNS: &str =
    "g.id, g.coach_id, g.team_id, g.event_id, g.title, g.opponent, g.date, g.is_win, g.created_at";

/// Game header of a stats submission, with defaults already resolved
#[derive(Debug, Clone)]
pub struct GameInput {
    /// Owned team
    pub team_id: Uuid,
    /// Owned event on that team, if the stats belong to one
    pub event_id: Option<Uuid>,
    /// Title
    pub title: String,
    /// Opponent, possibly empty
    pub opponent: String,
    /// Date played
    pub date: NaiveDate,
    /// Whether the team won
    pub is_win: bool,
}

/// Game manager
pub struct GameManager {
    pool: SqlitePool,
}

impl GameManager {
    /// Create a new game manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Games of an owned team, most recent first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_for_team(&self, coach_id: Uuid, team_id: Uuid) -> AppResult<Vec<Game>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {GAME_COLUMNS} FROM games g
            WHERE g.team_id = $1 AND g.coach_id = $2
            ORDER BY g.date DESC, g.created_at DESC, g.rowid DESC
            "
        ))
        .bind(team_id.to_string())
        .bind(coach_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list games: {e}")))?;

        rows.iter().map(row_to_game).collect()
    }

    /// Most recent game linked to an owned event
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn latest_for_event(&self, coach_id: Uuid, event_id: Uuid) -> AppResult<Option<Game>> {
        let row = sqlx::query(&format!(
            r"
            SELECT {GAME_COLUMNS} FROM games g
            WHERE g.event_id = $1 AND g.coach_id = $2
            ORDER BY g.date DESC, g.created_at DESC, g.rowid DESC
            LIMIT 1
            "
        ))
        .bind(event_id.to_string())
        .bind(coach_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get event game: {e}")))?;

        row.map(|r| row_to_game(&r)).transpose()
    }

    /// Wins and losses of an owned team
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn record_for_team(&self, coach_id: Uuid, team_id: Uuid) -> AppResult<WinLossRecord> {
        let (wins, losses): (i64, i64) = sqlx::query_as(
            r"
            SELECT COALESCE(SUM(is_win = 1), 0), COALESCE(SUM(is_win = 0), 0)
            FROM games
            WHERE team_id = $1 AND coach_id = $2
            ",
        )
        .bind(team_id.to_string())
        .bind(coach_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load win/loss record: {e}")))?;

        Ok(WinLossRecord {
            wins: to_u32(wins)?,
            losses: to_u32(losses)?,
        })
    }
}

/// Insert a game, or update the one already linked to the same team and
/// event; returns the game id
pub(super) async fn upsert(
    conn: &mut SqliteConnection,
    coach_id: Uuid,
    input: &GameInput,
) -> AppResult<Uuid> {
    let (id,): (String,) = sqlx::query_as(
        r"
        INSERT INTO games (id, coach_id, team_id, event_id, title, opponent, date, is_win, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (team_id, event_id) WHERE event_id IS NOT NULL DO UPDATE SET
            title = excluded.title,
            opponent = excluded.opponent,
            date = excluded.date,
            is_win = excluded.is_win
        RETURNING id
        ",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(coach_id.to_string())
    .bind(input.team_id.to_string())
    .bind(input.event_id.map(|id| id.to_string()))
    .bind(&input.title)
    .bind(&input.opponent)
    .bind(input.date.to_string())
    .bind(input.is_win)
    .bind(format_timestamp(Utc::now()))
    .fetch_one(conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to save game: {e}")))?;

    parse_uuid(&id)
}

pub(super) fn row_to_game(row: &SqliteRow) -> AppResult<Game> {
    let id: String = row.get("id");
    let coach_id: String = row.get("coach_id");
    let team_id: String = row.get("team_id");
    let date: String = row.get("date");
    let created_at: String = row.get("created_at");

    Ok(Game {
        id: parse_uuid(&id)?,
        coach_id: parse_uuid(&coach_id)?,
        team_id: parse_uuid(&team_id)?,
        event_id: parse_optional_uuid(row.get("event_id"))?,
        title: row.get("title"),
        opponent: row.get("opponent"),
        date: parse_date(&date)?,
        is_win: row.get("is_win"),
        created_at: parse_timestamp(&created_at)?,
    })
}
