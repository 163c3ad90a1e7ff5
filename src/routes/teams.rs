// ABOUTME: Team page routes: list, create, detail, edit and delete
// ABOUTME: The detail context aggregates roster, practices, games, record and attendance ratios
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Team routes
//!
//! All lookups filter by the acting coach, so another coach's team answers
//! exactly like a missing one.

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Form, Path, State},
    http::HeaderMap,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use super::pages::{self, PageResult};
use super::{form_rejection, optional_text, parse_path_id};
use crate::{
    constants::error_messages,
    database::TeamInput,
    errors::{AppError, AppResult},
    models::{AttendanceRatio, Event, EventType, Game, Player, Sport, Team, TeamStatus},
    resources::ServerResources,
};

/// Team create/edit form
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TeamForm {
    /// Team name
    #[serde(alias = "team_name")]
    pub name: String,
    /// Sport; blank uses the coach's profile sport
    pub sport: String,
    /// Season label
    pub season: String,
    /// Location
    pub location: String,
    /// Roster limit; blank means unlimited
    pub max_players: String,
    /// Status; blank means active
    pub status: String,
}

impl TeamForm {
    /// Validate into a [`TeamInput`]
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name, or an invalid sport,
    /// status or roster limit
    pub fn validate(&self, default_sport: Sport) -> AppResult<TeamInput> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::missing_field(error_messages::TEAM_NAME_REQUIRED));
        }

        let sport = match optional_text(&self.sport) {
            None => default_sport,
            Some(raw) => Sport::parse(&raw)
                .ok_or_else(|| AppError::invalid_input(error_messages::INVALID_SPORT))?,
        };

        let status = match optional_text(&self.status) {
            None => TeamStatus::default(),
            Some(raw) => TeamStatus::parse(&raw)
                .ok_or_else(|| AppError::invalid_input(error_messages::INVALID_STATUS))?,
        };

        let max_players = match optional_text(&self.max_players) {
            None => 0,
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|_| AppError::invalid_input(error_messages::INVALID_MAX_PLAYERS))?,
        };

        Ok(TeamInput {
            name: name.to_owned(),
            sport,
            season: optional_text(&self.season),
            max_players,
            status,
            location: self.location.trim().to_owned(),
        })
    }

    /// Submitted values for re-rendering
    #[must_use]
    pub fn echo(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Rostered player with derived figures
#[derive(Debug, Serialize)]
pub struct RosterEntry {
    /// Player
    #[serde(flatten)]
    pub player: Player,
    /// Age in whole years
    pub age: Option<i32>,
    /// `present/total` over the team's events
    pub attendance: AttendanceRatio,
}

/// Team detail page context
#[derive(Debug, Serialize)]
pub struct TeamDetailContext {
    /// Team
    pub team: Team,
    /// Roster by last then first name
    pub players: Vec<RosterEntry>,
    /// Practices, most recent first
    pub practices: Vec<Event>,
    /// Games, most recent first
    pub games: Vec<Game>,
    /// Games won
    pub wins: u32,
    /// Games lost
    pub losses: u32,
    /// Selectable sports
    pub sport_choices: Vec<&'static str>,
    /// Selectable statuses
    pub status_choices: Vec<&'static str>,
}

/// Sports offered by team forms
#[must_use]
pub fn sport_choices() -> Vec<&'static str> {
    Sport::ALL.iter().map(Sport::as_str).collect()
}

fn status_choices() -> Vec<&'static str> {
    TeamStatus::ALL.iter().map(TeamStatus::as_str).collect()
}

/// The coach's profile sport, used when a team form leaves sport blank
///
/// # Errors
///
/// Returns an error if database operation fails
pub async fn default_sport(resources: &ServerResources, coach_id: Uuid) -> AppResult<Sport> {
    Ok(resources.database.coaches().profile(coach_id).await?.sport)
}

/// Build the team detail context for an owned team
///
/// # Errors
///
/// Returns an error if database operation fails
pub async fn team_detail_context(
    resources: &ServerResources,
    coach_id: Uuid,
    team: Team,
) -> AppResult<TeamDetailContext> {
    let db = &resources.database;
    let today = Utc::now().date_naive();

    let players = db.players().list_for_team(coach_id, team.id).await?;
    let ratios = db.attendance().ratios_for_team(team.id).await?;
    let total_events = db.events().count_for_team(team.id).await?;
    let practices = db
        .events()
        .list_for_team(coach_id, team.id, Some(EventType::Practice))
        .await?;
    let games = db.games().list_for_team(coach_id, team.id).await?;
    let record = db.games().record_for_team(coach_id, team.id).await?;

    let players = players
        .into_iter()
        .map(|player| {
            let attendance = ratios.get(&player.id).copied().unwrap_or(AttendanceRatio {
                present: 0,
                total: total_events,
            });
            RosterEntry {
                age: player.age_on(today),
                attendance,
                player,
            }
        })
        .collect();

    Ok(TeamDetailContext {
        team,
        players,
        practices,
        games,
        wins: record.wins,
        losses: record.losses,
        sport_choices: sport_choices(),
        status_choices: status_choices(),
    })
}

/// Team detail context as JSON for re-rendering forms on the detail page
///
/// # Errors
///
/// Returns an error if the team is not owned by the coach or database
/// operation fails
pub async fn team_detail_value(
    resources: &ServerResources,
    coach_id: Uuid,
    team_id: Uuid,
) -> AppResult<Value> {
    let team = resources.database.teams().require(coach_id, team_id).await?;
    let context = team_detail_context(resources, coach_id, team).await?;
    Ok(serde_json::to_value(context)?)
}

/// Team routes handler
pub struct TeamRoutes;

impl TeamRoutes {
    /// Create all team routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/teams", get(Self::handle_list).post(Self::handle_create))
            .route("/teams/:id", get(Self::handle_detail))
            .route("/teams/:id/edit", post(Self::handle_edit))
            .route("/teams/:id/delete", post(Self::handle_delete))
            .with_state(resources)
    }

    async fn list_context(resources: &ServerResources, coach_id: Uuid) -> AppResult<Value> {
        let teams = resources.database.teams().list(coach_id).await?;
        Ok(json!({
            "teams": teams,
            "sport_choices": sport_choices(),
            "status_choices": status_choices(),
        }))
    }

    /// Handle GET /teams
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> PageResult {
        let auth = pages::authenticate(&resources, &headers)?;
        let context = Self::list_context(&resources, auth.coach_id).await?;
        Ok(pages::render("teams", context))
    }

    /// Handle POST /teams
    #[tracing::instrument(skip(resources, headers, form), fields(route = "team_create"))]
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        form: Result<Form<TeamForm>, FormRejection>,
    ) -> PageResult {
        let auth = pages::authenticate(&resources, &headers)?;
        let Form(form) = form.map_err(|rejection| form_rejection(&rejection))?;
        let sport = default_sport(&resources, auth.coach_id).await?;

        match form.validate(sport) {
            Ok(input) => {
                resources.database.teams().create(auth.coach_id, &input).await?;
                Ok(pages::redirect("/teams"))
            }
            Err(err) => {
                let context = Self::list_context(&resources, auth.coach_id).await?;
                pages::rerender_or_fail("teams", err, form.echo(), context)
            }
        }
    }

    /// Handle GET /teams/:id
    async fn handle_detail(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> PageResult {
        let auth = pages::authenticate(&resources, &headers)?;
        let team_id = parse_path_id(&id, "Team")?;
        let team = resources.database.teams().require(auth.coach_id, team_id).await?;
        let context = team_detail_context(&resources, auth.coach_id, team).await?;
        Ok(pages::render("team_detail", context))
    }

    /// Handle POST /teams/:id/edit
    #[tracing::instrument(skip(resources, headers, form), fields(route = "team_edit"))]
    async fn handle_edit(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        form: Result<Form<TeamForm>, FormRejection>,
    ) -> PageResult {
        let auth = pages::authenticate(&resources, &headers)?;
        let Form(form) = form.map_err(|rejection| form_rejection(&rejection))?;
        let team_id = parse_path_id(&id, "Team")?;
        let teams = resources.database.teams();
        let team = teams.require(auth.coach_id, team_id).await?;

        match form.validate(team.sport) {
            Ok(input) => {
                teams.update(auth.coach_id, team_id, &input).await?;
                Ok(pages::redirect(&format!("/teams/{team_id}")))
            }
            Err(err) => {
                let context = team_detail_context(&resources, auth.coach_id, team).await?;
                pages::rerender_or_fail(
                    "team_detail",
                    err,
                    form.echo(),
                    serde_json::to_value(context).map_err(AppError::from)?,
                )
            }
        }
    }

    /// Handle POST /teams/:id/delete
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
    ) -> PageResult {
        let auth = pages::authenticate(&resources, &headers)?;
        let team_id = parse_path_id(&id, "Team")?;
        resources.database.teams().delete(auth.coach_id, team_id).await?;
        info!(coach_id = %auth.coach_id, team_id = %team_id, "Team removed via page");
        Ok(pages::redirect("/teams"))
    }
}
