// ABOUTME: Database operations for attendance rows, one per event and player
// ABOUTME: Saving replaces the whole roster's attendance for an event in one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::{format_timestamp, parse_uuid, to_u32};
use crate::errors::{AppError, AppResult};
use crate::models::{AttendanceRatio, Event};

/// Attendance of one rostered player, as shown in the marking modal
#[derive(Debug, Clone, Serialize)]
pub struct RosterAttendance {
    /// Player
    pub player_id: Uuid,
    /// Display name
    pub name: String,
    /// Jersey label
    pub jersey: Option<String>,
    /// Whether marked present; players without a row are absent
    pub present: bool,
}

/// Attendance manager
pub struct AttendanceManager {
    pool: SqlitePool,
}

impl AttendanceManager {
    /// Create a new attendance manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Attendance of every player currently on the event's team
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn for_event(&self, coach_id: Uuid, event: &Event) -> AppResult<Vec<RosterAttendance>> {
        let rows = sqlx::query(
            r"
            SELECT p.id, p.name, p.jersey_number, COALESCE(a.present, 0) AS present
            FROM players p
            LEFT JOIN attendance a ON a.player_id = p.id AND a.event_id = $1
            WHERE p.team_id = $2 AND p.coach_id = $3
            ORDER BY p.last_name COLLATE NOCASE, p.first_name COLLATE NOCASE
            ",
        )
        .bind(event.id.to_string())
        .bind(event.team_id.to_string())
        .bind(coach_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load attendance: {e}")))?;

        rows.iter()
            .map(|row| {
                let player_id: String = row.get("id");
                let present: i64 = row.get("present");
                Ok(RosterAttendance {
                    player_id: parse_uuid(&player_id)?,
                    name: row.get("name"),
                    jersey: row.get("jersey_number"),
                    present: present != 0,
                })
            })
            .collect()
    }

    /// Replace the event's attendance for the whole roster
    ///
    /// Every rostered player is upserted; those in `present` are marked
    /// present and everyone else absent. Ids not on the roster are ignored.
    /// Returns the roster size.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn save(
        &self,
        coach_id: Uuid,
        event: &Event,
        present: &HashSet<Uuid>,
    ) -> AppResult<u32> {
        let now = format_timestamp(Utc::now());

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let roster: Vec<(String,)> =
            sqlx::query_as("SELECT id FROM players WHERE team_id = $1 AND coach_id = $2")
                .bind(event.team_id.to_string())
                .bind(coach_id.to_string())
                .fetch_all(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to load roster: {e}")))?;

        let mut marked_present = 0_u32;
        for (player_id,) in &roster {
            let is_present = present.contains(&parse_uuid(player_id)?);
            marked_present += u32::from(is_present);
            sqlx::query(
                r"
                INSERT INTO attendance (id, event_id, player_id, present, recorded_by, recorded_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (event_id, player_id) DO UPDATE SET
                    present = excluded.present,
                    recorded_by = excluded.recorded_by,
                    recorded_at = excluded.recorded_at
                ",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(event.id.to_string())
            .bind(player_id)
            .bind(is_present)
            .bind(coach_id.to_string())
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to save attendance: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit attendance: {e}")))?;

        let updated = u32::try_from(roster.len())
            .map_err(|e| AppError::internal(format!("Roster too large: {e}")))?;
        info!(
            coach_id = %coach_id,
            event_id = %event.id,
            updated,
            present = marked_present,
            "Attendance saved"
        );
        Ok(updated)
    }

    /// `present/total` per rostered player, where total is the number of
    /// events the team has
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn ratios_for_team(&self, team_id: Uuid) -> AppResult<HashMap<Uuid, AttendanceRatio>> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events WHERE team_id = $1")
            .bind(team_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count events: {e}")))?;
        let total = to_u32(total)?;

        let rows = sqlx::query(
            r"
            SELECT p.id,
                   (SELECT COUNT(*) FROM attendance a
                    JOIN events e ON e.id = a.event_id
                    WHERE a.player_id = p.id AND e.team_id = $1 AND a.present = 1) AS present
            FROM players p
            WHERE p.team_id = $1
            ",
        )
        .bind(team_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load attendance ratios: {e}")))?;

        rows.iter()
            .map(|row| {
                let player_id: String = row.get("id");
                let present: i64 = row.get("present");
                Ok((
                    parse_uuid(&player_id)?,
                    AttendanceRatio {
                        present: to_u32(present)?,
                        total,
                    },
                ))
            })
            .collect()
    }
}
