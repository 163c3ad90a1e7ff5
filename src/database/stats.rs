// ABOUTME: Database operations for per-player game statistics stored as tagged JSON
// ABOUTME: Saving upserts the game and every valid player line in one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashSet;

use chrono::Utc;
use serde::Serialize;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use super::games::{self, row_to_game, GameInput};
use super::{format_timestamp, parse_timestamp, parse_uuid, to_u32};
use crate::errors::{AppError, AppResult};
use crate::models::{Game, PlayerStat, StatLine};

const STAT_COLUMNS: &str =
    "s.id AS stat_id, s.game_id, s.player_id, s.stats, s.total_points, s.created_at AS stat_created_at, s.updated_at";

/// One player's line in a stats submission
#[derive(Debug, Clone)]
pub struct PlayerStatEntry {
    /// Player the line belongs to
    pub player_id: Uuid,
    /// Counters
    pub line: StatLine,
    /// Caller supplied point total
    pub total_points: Option<u32>,
}

/// A stat line with the game and team it was recorded in
#[derive(Debug, Clone, Serialize)]
pub struct PlayerStatHistory {
    /// Stat line
    pub stat: PlayerStat,
    /// Game
    pub game: Game,
    /// Team name
    pub team_name: String,
}

/// Player statistics manager
pub struct StatsManager {
    pool: SqlitePool,
}

impl StatsManager {
    /// Create a new stats manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Upsert a game and replace the listed players' lines for it
    ///
    /// Entries for players not on the game's team are skipped. Returns the
    /// game id and the number of lines saved. The caller has already
    /// checked that the team (and event, if any) belong to `coach_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn save_game(
        &self,
        coach_id: Uuid,
        game: &GameInput,
        entries: &[PlayerStatEntry],
    ) -> AppResult<(Uuid, u32)> {
        let now = format_timestamp(Utc::now());

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let game_id = games::upsert(&mut *tx, coach_id, game).await?;

        let roster: Vec<(String,)> =
            sqlx::query_as("SELECT id FROM players WHERE team_id = $1 AND coach_id = $2")
                .bind(game.team_id.to_string())
                .bind(coach_id.to_string())
                .fetch_all(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to load roster: {e}")))?;
        let roster: HashSet<Uuid> = roster
            .iter()
            .map(|(id,)| parse_uuid(id))
            .collect::<AppResult<_>>()?;

        let mut saved = 0_u32;
        for entry in entries {
            if !roster.contains(&entry.player_id) {
                debug!(player_id = %entry.player_id, "Skipping stats for player not on team");
                continue;
            }
            let stats_json = serde_json::to_string(&entry.line)?;
            sqlx::query(
                r"
                INSERT INTO player_stats (
                    id, game_id, player_id, sport, stats, total_points, created_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
                ON CONFLICT (game_id, player_id) DO UPDATE SET
                    sport = excluded.sport,
                    stats = excluded.stats,
                    total_points = excluded.total_points,
                    updated_at = excluded.updated_at
                ",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(game_id.to_string())
            .bind(entry.player_id.to_string())
            .bind(entry.line.sport().as_str())
            .bind(&stats_json)
            .bind(entry.total_points.map(i64::from))
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to save player stats: {e}")))?;
            saved += 1;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit stats: {e}")))?;

        info!(
            coach_id = %coach_id,
            game_id = %game_id,
            team_id = %game.team_id,
            saved,
            skipped = entries.len().saturating_sub(saved as usize),
            "Game stats saved"
        );
        Ok((game_id, saved))
    }

    /// Every stat line of a game
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn for_game(&self, game_id: Uuid) -> AppResult<Vec<PlayerStat>> {
        let rows = sqlx::query(&format!(
            "SELECT {STAT_COLUMNS} FROM player_stats s WHERE s.game_id = $1"
        ))
        .bind(game_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load game stats: {e}")))?;

        rows.iter().map(row_to_stat).collect()
    }

    /// Every stat line recorded in an owned team's games
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn for_team(&self, coach_id: Uuid, team_id: Uuid) -> AppResult<Vec<PlayerStat>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {STAT_COLUMNS}
            FROM player_stats s JOIN games g ON g.id = s.game_id
            WHERE g.team_id = $1 AND g.coach_id = $2
            "
        ))
        .bind(team_id.to_string())
        .bind(coach_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load team stats: {e}")))?;

        rows.iter().map(row_to_stat).collect()
    }

    /// Stat history of an owned player, most recent game first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn history_for_player(
        &self,
        coach_id: Uuid,
        player_id: Uuid,
    ) -> AppResult<Vec<PlayerStatHistory>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {STAT_COLUMNS},
                   g.id, g.coach_id, g.team_id, g.event_id, g.title, g.opponent, g.date,
                   g.is_win, g.created_at, t.name AS team_name
            FROM player_stats s
            JOIN games g ON g.id = s.game_id
            JOIN teams t ON t.id = g.team_id
            WHERE s.player_id = $1 AND g.coach_id = $2
            ORDER BY g.date DESC, g.created_at DESC, g.rowid DESC
            "
        ))
        .bind(player_id.to_string())
        .bind(coach_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load player history: {e}")))?;

        rows.iter()
            .map(|row| {
                Ok(PlayerStatHistory {
                    stat: row_to_stat(row)?,
                    game: row_to_game(row)?,
                    team_name: row.get("team_name"),
                })
            })
            .collect()
    }
}

fn row_to_stat(row: &SqliteRow) -> AppResult<PlayerStat> {
    let id: String = row.get("stat_id");
    let game_id: String = row.get("game_id");
    let player_id: String = row.get("player_id");
    let stats: String = row.get("stats");
    let total_points: Option<i64> = row.get("total_points");
    let created_at: String = row.get("stat_created_at");
    let updated_at: String = row.get("updated_at");

    let line: StatLine = serde_json::from_str(&stats)
        .map_err(|e| AppError::internal(format!("Invalid stored stat line: {e}")))?;

    Ok(PlayerStat {
        id: parse_uuid(&id)?,
        game_id: parse_uuid(&game_id)?,
        player_id: parse_uuid(&player_id)?,
        line,
        total_points: total_points.map(to_u32).transpose()?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
