// ABOUTME: Database operations for scheduled events, scoped to the owning coach
// ABOUTME: Creating an event provisions an absent attendance row per rostered player
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    format_time, format_timestamp, parse_date, parse_time, parse_timestamp, parse_uuid, to_u32,
};
use crate::errors::{AppError, AppResult};
use crate::models::{Event, EventType};

const EVENT_COLUMNS: &str = "e.id, e.coach_id, e.team_id, e.title, e.event_type, e.date, e.time, \
     e.location, e.opponent, e.notes, e.created_at";

/// Validated event fields for create and full-replace edit
#[derive(Debug, Clone)]
pub struct EventInput {
    /// Team the event belongs to; must be owned by the acting coach
    pub team_id: Uuid,
    /// Title
    pub title: String,
    /// Game or practice
    pub event_type: EventType,
    /// Date
    pub date: NaiveDate,
    /// Start time
    pub time: NaiveTime,
    /// Venue
    pub location: String,
    /// Optional opponent
    pub opponent: Option<String>,
    /// Optional notes
    pub notes: Option<String>,
}

/// An event with its team name, for schedule and calendar listings
#[derive(Debug, Clone, Serialize)]
pub struct EventWithTeam {
    /// Event
    #[serde(flatten)]
    pub event: Event,
    /// Name of the event's team
    pub team_name: String,
}

/// Event manager
pub struct EventManager {
    pool: SqlitePool,
}

impl EventManager {
    /// Create a new event manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an event and provision attendance for the current roster
    ///
    /// Both happen in one transaction; every provisioned row starts absent
    /// and is recorded by the creating coach.
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the team is not owned by the coach, or
    /// a database error
    pub async fn create(&self, coach_id: Uuid, input: &EventInput) -> AppResult<Event> {
        let event = Event {
            id: Uuid::new_v4(),
            coach_id,
            team_id: input.team_id,
            title: input.title.clone(),
            event_type: input.event_type,
            date: input.date,
            time: input.time,
            location: input.location.clone(),
            opponent: input.opponent.clone(),
            notes: input.notes.clone(),
            created_at: Utc::now(),
        };
        let now = format_timestamp(event.created_at);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))?;

        let result = sqlx::query(
            r"
            INSERT INTO events (
                id, coach_id, team_id, title, event_type, date, time,
                location, opponent, notes, created_at
            )
            SELECT $1, $2, t.id, $3, $4, $5, $6, $7, $8, $9, $10
            FROM teams t
            WHERE t.id = $11 AND t.coach_id = $2
            ",
        )
        .bind(event.id.to_string())
        .bind(coach_id.to_string())
        .bind(&event.title)
        .bind(event.event_type.as_str())
        .bind(event.date.to_string())
        .bind(format_time(event.time))
        .bind(&event.location)
        .bind(&event.opponent)
        .bind(&event.notes)
        .bind(&now)
        .bind(input.team_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create event: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Team"));
        }

        let roster: Vec<(String,)> = sqlx::query_as("SELECT id FROM players WHERE team_id = $1")
            .bind(input.team_id.to_string())
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to load roster: {e}")))?;

        for (player_id,) in &roster {
            sqlx::query(
                r"
                INSERT INTO attendance (id, event_id, player_id, present, recorded_by, recorded_at)
                VALUES ($1, $2, $3, 0, $4, $5)
                ",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(event.id.to_string())
            .bind(player_id)
            .bind(coach_id.to_string())
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to provision attendance: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit event: {e}")))?;

        info!(
            coach_id = %coach_id,
            event_id = %event.id,
            team_id = %event.team_id,
            attendance_rows = roster.len(),
            "Event created"
        );
        Ok(event)
    }

    /// Get an event if owned by `coach_id`
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get(&self, coach_id: Uuid, event_id: Uuid) -> AppResult<Option<Event>> {
        let row = sqlx::query(&format!(
            "SELECT {EVENT_COLUMNS} FROM events e WHERE e.id = $1 AND e.coach_id = $2"
        ))
        .bind(event_id.to_string())
        .bind(coach_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get event: {e}")))?;

        row.map(|r| row_to_event(&r)).transpose()
    }

    /// Get an owned event or fail with `ResourceNotFound`
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the event is missing or owned by
    /// another coach, or a database error
    pub async fn require(&self, coach_id: Uuid, event_id: Uuid) -> AppResult<Event> {
        self.get(coach_id, event_id)
            .await?
            .ok_or_else(|| AppError::not_found("Event"))
    }

    /// Replace every field of an owned event, possibly moving it to another
    /// owned team
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the event or the target team is not
    /// owned by the coach, or a database error
    pub async fn update(&self, coach_id: Uuid, event_id: Uuid, input: &EventInput) -> AppResult<()> {
        let result = sqlx::query(
            r"
            UPDATE events
            SET team_id = $1, title = $2, event_type = $3, date = $4, time = $5,
                location = $6, opponent = $7, notes = $8
            WHERE id = $9 AND coach_id = $10
              AND EXISTS (SELECT 1 FROM teams WHERE id = $1 AND coach_id = $10)
            ",
        )
        .bind(input.team_id.to_string())
        .bind(&input.title)
        .bind(input.event_type.as_str())
        .bind(input.date.to_string())
        .bind(format_time(input.time))
        .bind(&input.location)
        .bind(&input.opponent)
        .bind(&input.notes)
        .bind(event_id.to_string())
        .bind(coach_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update event: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Event"));
        }
        info!(coach_id = %coach_id, event_id = %event_id, team_id = %input.team_id, "Event updated");
        Ok(())
    }

    /// Delete an owned event; linked games keep their row
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the event is missing or owned by
    /// another coach, or a database error
    pub async fn delete(&self, coach_id: Uuid, event_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND coach_id = $2")
            .bind(event_id.to_string())
            .bind(coach_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete event: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Event"));
        }
        info!(coach_id = %coach_id, event_id = %event_id, "Event deleted");
        Ok(())
    }

    /// Events on or after `today`, soonest first; `limit` caps the count
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_upcoming(
        &self,
        coach_id: Uuid,
        today: NaiveDate,
        limit: Option<u32>,
    ) -> AppResult<Vec<EventWithTeam>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {EVENT_COLUMNS}, t.name AS team_name
            FROM events e JOIN teams t ON t.id = e.team_id
            WHERE e.coach_id = $1 AND e.date >= $2
            ORDER BY e.date ASC, e.time ASC
            LIMIT $3
            "
        ))
        .bind(coach_id.to_string())
        .bind(today.to_string())
        .bind(limit.map_or(-1, i64::from))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list upcoming events: {e}")))?;

        rows.iter().map(row_to_event_with_team).collect()
    }

    /// Events before `today`, most recent first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_past(&self, coach_id: Uuid, today: NaiveDate) -> AppResult<Vec<EventWithTeam>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {EVENT_COLUMNS}, t.name AS team_name
            FROM events e JOIN teams t ON t.id = e.team_id
            WHERE e.coach_id = $1 AND e.date < $2
            ORDER BY e.date DESC, e.time DESC
            "
        ))
        .bind(coach_id.to_string())
        .bind(today.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list past events: {e}")))?;

        rows.iter().map(row_to_event_with_team).collect()
    }

    /// Events of an owned team, most recent first, optionally of one type
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_for_team(
        &self,
        coach_id: Uuid,
        team_id: Uuid,
        event_type: Option<EventType>,
    ) -> AppResult<Vec<Event>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT {EVENT_COLUMNS} FROM events e
            WHERE e.team_id = $1 AND e.coach_id = $2 AND ($3 IS NULL OR e.event_type = $3)
            ORDER BY e.date DESC, e.time DESC
            "
        ))
        .bind(team_id.to_string())
        .bind(coach_id.to_string())
        .bind(event_type.map(|t| t.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list team events: {e}")))?;

        rows.iter().map(row_to_event).collect()
    }

    /// Number of events scheduled for a team
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn count_for_team(&self, team_id: Uuid) -> AppResult<u32> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events WHERE team_id = $1")
            .bind(team_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count events: {e}")))?;
        to_u32(count)
    }

    /// Events of the coach within an optional inclusive date range,
    /// in chronological order
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_in_range(
        &self,
        coach_id: Uuid,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AppResult<Vec<EventWithTeam>> {
        debug!(coach_id = %coach_id, ?start, ?end, "Loading calendar range");
        let rows = sqlx::query(&format!(
            r"
            SELECT {EVENT_COLUMNS}, t.name AS team_name
            FROM events e JOIN teams t ON t.id = e.team_id
            WHERE e.coach_id = $1
              AND ($2 IS NULL OR e.date >= $2)
              AND ($3 IS NULL OR e.date <= $3)
            ORDER BY e.date ASC, e.time ASC
            "
        ))
        .bind(coach_id.to_string())
        .bind(start.map(|d| d.to_string()))
        .bind(end.map(|d| d.to_string()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list calendar events: {e}")))?;

        rows.iter().map(row_to_event_with_team).collect()
    }
}

pub(super) fn row_to_event(row: &SqliteRow) -> AppResult<Event> {
    let id: String = row.get("id");
    let coach_id: String = row.get("coach_id");
    let team_id: String = row.get("team_id");
    let event_type: String = row.get("event_type");
    let date: String = row.get("date");
    let time: String = row.get("time");
    let created_at: String = row.get("created_at");

    Ok(Event {
        id: parse_uuid(&id)?,
        coach_id: parse_uuid(&coach_id)?,
        team_id: parse_uuid(&team_id)?,
        title: row.get("title"),
        event_type: EventType::parse(&event_type)
            .ok_or_else(|| AppError::internal(format!("Invalid event type: {event_type}")))?,
        date: parse_date(&date)?,
        time: parse_time(&time)?,
        location: row.get("location"),
        opponent: row.get("opponent"),
        notes: row.get("notes"),
        created_at: parse_timestamp(&created_at)?,
    })
}

fn row_to_event_with_team(row: &SqliteRow) -> AppResult<EventWithTeam> {
    Ok(EventWithTeam {
        event: row_to_event(row)?,
        team_name: row.get("team_name"),
    })
}
