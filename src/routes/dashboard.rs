// ABOUTME: Dashboard page route: the coach's teams, player count and next events
// ABOUTME: The dashboard also hosts a quick team-create form
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Form, State},
    http::HeaderMap,
    routing::get,
    Router,
};
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::form_rejection;
use super::pages::{self, PageResult};
use super::teams::{default_sport, sport_choices, TeamForm};
use crate::{
    constants::{limits::DASHBOARD_UPCOMING_EVENTS, session::DASHBOARD_PATH},
    database::EventWithTeam,
    errors::{AppError, AppResult},
    models::Team,
    resources::ServerResources,
};

/// Acting coach summary shown in the page header
#[derive(Debug, Serialize)]
pub struct CoachSummary {
    /// Coach id
    pub id: Uuid,
    /// Login name
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
}

/// Dashboard page context
#[derive(Debug, Serialize)]
pub struct DashboardContext {
    /// Coach
    pub coach: CoachSummary,
    /// Teams, newest first
    pub teams: Vec<Team>,
    /// Players across all teams
    pub players_count: u32,
    /// Next events, soonest first
    pub upcoming_events: Vec<EventWithTeam>,
    /// Sports offered by the team form
    pub sport_choices: Vec<&'static str>,
}

/// Dashboard routes handler
pub struct DashboardRoutes;

impl DashboardRoutes {
    /// Create dashboard routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                DASHBOARD_PATH,
                get(Self::handle_dashboard).post(Self::handle_create_team),
            )
            .with_state(resources)
    }

    async fn context(resources: &ServerResources, coach_id: Uuid) -> AppResult<DashboardContext> {
        let db = &resources.database;
        let coach = db
            .coaches()
            .get(coach_id)
            .await?
            .ok_or_else(AppError::auth_required)?;
        let today = Utc::now().date_naive();

        Ok(DashboardContext {
            coach: CoachSummary {
                id: coach.id,
                username: coach.username,
                first_name: coach.first_name,
                last_name: coach.last_name,
            },
            teams: db.teams().list(coach_id).await?,
            players_count: db.players().count_for_coach(coach_id).await?,
            upcoming_events: db
                .events()
                .list_upcoming(coach_id, today, Some(DASHBOARD_UPCOMING_EVENTS))
                .await?,
            sport_choices: sport_choices(),
        })
    }

    /// Handle GET /dashboard
    async fn handle_dashboard(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> PageResult {
        let auth = pages::authenticate(&resources, &headers)?;
        let context = Self::context(&resources, auth.coach_id).await?;
        Ok(pages::render("dashboard", context))
    }

    /// Handle POST /dashboard - quick team create
    #[tracing::instrument(skip(resources, headers, form), fields(route = "dashboard_team_create"))]
    async fn handle_create_team(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        form: Result<Form<TeamForm>, FormRejection>,
    ) -> PageResult {
        let auth = pages::authenticate(&resources, &headers)?;
        let Form(form) = form.map_err(|rejection| form_rejection(&rejection))?;
        let sport = default_sport(&resources, auth.coach_id).await?;

        match form.validate(sport) {
            Ok(input) => {
                let team = resources.database.teams().create(auth.coach_id, &input).await?;
                info!(team_id = %team.id, "Team created from dashboard");
                Ok(pages::redirect(DASHBOARD_PATH))
            }
            Err(err) => {
                let context = serde_json::to_value(Self::context(&resources, auth.coach_id).await?)
                    .map_err(AppError::from)?;
                pages::rerender_or_fail("dashboard", err, form.echo(), context)
            }
        }
    }
}
