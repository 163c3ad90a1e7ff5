// ABOUTME: Schedule page, event create/edit/delete form routes and the calendar JSON feed
// ABOUTME: Creating an event provisions one absent attendance row per rostered player
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Event routes
//!
//! The schedule splits events around the server's current UTC date. The
//! calendar feed is a JSON route and answers `401` without a session.

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Form, Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use super::pages::{self, PageResult};
use super::{
    form_rejection, optional_text, parse_form_date, parse_form_time, parse_optional_form_date,
    parse_path_id,
};
use crate::{
    constants::error_messages,
    database::{EventInput, EventWithTeam},
    errors::{AppError, AppResult},
    models::EventType,
    resources::ServerResources,
};

const SCHEDULE_PATH: &str = "/schedule";

/// Event create/edit form
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EventForm {
    /// Owning team id
    #[serde(alias = "team")]
    pub team_id: String,
    /// Title
    pub title: String,
    /// `Game` or `Practice`
    #[serde(alias = "type")]
    pub event_type: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    /// Venue
    pub location: String,
    /// Optional opponent
    pub opponent: String,
    /// Optional notes
    pub notes: String,
}

impl EventForm {
    /// Validate into an [`EventInput`]; team ownership is checked by the
    /// database layer
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing field, an unknown event type
    /// or a malformed date or time, and `ResourceNotFound` for a team id
    /// that is not a valid id
    pub fn validate(&self) -> AppResult<EventInput> {
        let required = [
            &self.team_id,
            &self.title,
            &self.event_type,
            &self.date,
            &self.time,
            &self.location,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(AppError::missing_field(
                error_messages::EVENT_FIELDS_REQUIRED,
            ));
        }

        let event_type = EventType::parse(&self.event_type)
            .ok_or_else(|| AppError::invalid_input(error_messages::INVALID_EVENT_TYPE))?;

        Ok(EventInput {
            team_id: parse_path_id(&self.team_id, "Team")?,
            title: self.title.trim().to_owned(),
            event_type,
            date: parse_form_date(&self.date)?,
            time: parse_form_time(&self.time)?,
            location: self.location.trim().to_owned(),
            opponent: optional_text(&self.opponent),
            notes: optional_text(&self.notes),
        })
    }

    fn echo(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Calendar range query; both bounds are inclusive and optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CalendarQuery {
    /// First date, `YYYY-MM-DD`
    pub start: String,
    /// Last date, `YYYY-MM-DD`
    pub end: String,
}

/// One event in the calendar feed
#[derive(Debug, Serialize)]
pub struct CalendarEvent {
    /// Event id
    pub id: Uuid,
    /// Title
    pub title: String,
    /// `Game` or `Practice`
    pub event_type: EventType,
    /// Date
    pub date: NaiveDate,
    /// Start time
    pub time: NaiveTime,
    /// Team id
    pub team_id: Uuid,
    /// Team name
    pub team_name: String,
    /// Venue
    pub location: String,
    /// Opponent, if any
    pub opponent: Option<String>,
}

impl From<EventWithTeam> for CalendarEvent {
    fn from(row: EventWithTeam) -> Self {
        let EventWithTeam { event, team_name } = row;
        Self {
            id: event.id,
            title: event.title,
            event_type: event.event_type,
            date: event.date,
            time: event.time,
            team_id: event.team_id,
            team_name,
            location: event.location,
            opponent: event.opponent,
        }
    }
}

/// Event routes handler
pub struct EventRoutes;

impl EventRoutes {
    /// Create schedule, event form and calendar routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(SCHEDULE_PATH, get(Self::handle_schedule))
            .route("/events", post(Self::handle_create))
            .route("/events/:id/edit", post(Self::handle_edit))
            .route("/events/:id/delete", post(Self::handle_delete))
            .route("/api/calendar", get(Self::handle_calendar))
            .with_state(resources)
    }

    async fn schedule_context(resources: &ServerResources, coach_id: Uuid) -> AppResult<Value> {
        let db = &resources.database;
        let today = Utc::now().date_naive();
        let upcoming = db.events().list_upcoming(coach_id, today, None).await?;
        let past = db.events().list_past(coach_id, today).await?;
        let teams = db.teams().list(coach_id).await?;

        Ok(json!({
            "today": today,
            "upcoming": upcoming,
            "past": past,
            "teams": teams,
            "event_types": [EventType::Game.as_str(), EventType::Practice.as_str()],
        }))
    }

    async fn rerender_schedule(
        resources: &ServerResources,
        coach_id: Uuid,
        err: AppError,
        form: &EventForm,
    ) -> PageResult {
        let context = Self::schedule_context(resources, coach_id).await?;
        pages::rerender_or_fail("schedule", err, form.echo(), context)
    }

    /// Handle GET /schedule
    async fn handle_schedule(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> PageResult {
        let auth = pages::authenticate(&resources, &headers)?;
        let context = Self::schedule_context(&resources, auth.coach_id).await?;
        Ok(pages::render("schedule", context))
    }

    /// Handle POST /events
    #[tracing::instrument(skip(resources, headers, form), fields(route = "event_create"))]
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        form: Result<Form<EventForm>, FormRejection>,
    ) -> PageResult {
        let auth = pages::authenticate(&resources, &headers)?;
        let Form(form) = form.map_err(|rejection| form_rejection(&rejection))?;

        let result = match form.validate() {
            Ok(input) => resources.database.events().create(auth.coach_id, &input).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(event) => {
                info!(event_id = %event.id, team_id = %event.team_id, "Event scheduled via page");
                Ok(pages::redirect(SCHEDULE_PATH))
            }
            Err(err) => Self::rerender_schedule(&resources, auth.coach_id, err, &form).await,
        }
    }

    /// Handle POST /events/:id/edit
    #[tracing::instrument(skip(resources, headers, form), fields(route = "event_edit"))]
    async fn handle_edit(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        form: Result<Form<EventForm>, FormRejection>,
    ) -> PageResult {
        let auth = pages::authenticate(&resources, &headers)?;
        let Form(form) = form.map_err(|rejection| form_rejection(&rejection))?;
        let event_id = parse_path_id(&id, "Event")?;
        resources.database.events().require(auth.coach_id, event_id).await?;

        let result = match form.validate() {
            Ok(input) => {
                resources
                    .database
                    .events()
                    .update(auth.coach_id, event_id, &input)
                    .await
            }
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => Ok(pages::redirect(SCHEDULE_PATH)),
            Err(err) => Self::rerender_schedule(&resources, auth.coach_id, err, &form).await,
        }
    }

    /// Handle POST /events/:id/delete
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> PageResult {
        let auth = pages::authenticate(&resources, &headers)?;
        let event_id = parse_path_id(&id, "Event")?;
        resources.database.events().delete(auth.coach_id, event_id).await?;
        Ok(pages::redirect(SCHEDULE_PATH))
    }

    /// Handle GET /api/calendar
    async fn handle_calendar(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<CalendarQuery>,
    ) -> AppResult<impl IntoResponse> {
        let auth = resources.auth_manager.authenticate_request(&headers)?;
        let start = parse_optional_form_date(&query.start)?;
        let end = parse_optional_form_date(&query.end)?;

        let events: Vec<CalendarEvent> = resources
            .database
            .events()
            .list_in_range(auth.coach_id, start, end)
            .await?
            .into_iter()
            .map(CalendarEvent::from)
            .collect();

        Ok(Json(json!({ "events": events })))
    }
}
