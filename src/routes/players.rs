// ABOUTME: Roster page routes: add, edit and remove players on a team, plus the all-players page
// ABOUTME: Adding past the team's roster limit re-renders the team page with a capacity error
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Form, Path, State},
    http::HeaderMap,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::pages::{self, PageResult};
use super::teams::team_detail_value;
use super::{form_rejection, optional_text, parse_optional_form_date, parse_path_id};
use crate::{
    auth::is_valid_email,
    constants::error_messages,
    database::{PlayerInput, PlayerWithTeam},
    errors::{AppError, AppResult},
    resources::ServerResources,
};

/// Player add/edit form
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerForm {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Optional email
    pub email: String,
    /// Optional jersey label
    #[serde(alias = "jersey")]
    pub jersey_number: String,
    /// Optional position
    pub position: String,
    /// Optional `YYYY-MM-DD` birth date
    #[serde(alias = "dob")]
    pub date_of_birth: String,
}

impl PlayerForm {
    /// Validate into a [`PlayerInput`]
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing name, a malformed email or
    /// an invalid birth date
    pub fn validate(&self) -> AppResult<PlayerInput> {
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(AppError::missing_field(
                error_messages::PLAYER_NAME_REQUIRED,
            ));
        }

        let email = optional_text(&self.email).map(|e| e.to_lowercase());
        if email.as_deref().is_some_and(|e| !is_valid_email(e)) {
            return Err(AppError::invalid_input(
                error_messages::INVALID_EMAIL_FORMAT,
            ));
        }

        Ok(PlayerInput {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            email,
            jersey_number: optional_text(&self.jersey_number),
            position: optional_text(&self.position),
            date_of_birth: parse_optional_form_date(&self.date_of_birth)?,
        })
    }

    fn echo(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Row on the players page
#[derive(Debug, Serialize)]
struct PlayerRow {
    #[serde(flatten)]
    player: PlayerWithTeam,
    age: Option<i32>,
}

/// Player routes handler
pub struct PlayerRoutes;

impl PlayerRoutes {
    /// Create all roster routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/players", get(Self::handle_list))
            .route("/teams/:id/players", post(Self::handle_add))
            .route("/teams/:id/players/:player_id/edit", post(Self::handle_edit))
            .route(
                "/teams/:id/players/:player_id/remove",
                post(Self::handle_remove),
            )
            .with_state(resources)
    }

    /// Re-render the team detail page for a failed roster form
    async fn rerender_team(
        resources: &ServerResources,
        coach_id: Uuid,
        team_id: Uuid,
        err: AppError,
        form: &PlayerForm,
    ) -> PageResult {
        let context = team_detail_value(resources, coach_id, team_id).await?;
        pages::rerender_or_fail("team_detail", err, form.echo(), context)
    }

    /// Handle GET /players
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> PageResult {
        let auth = pages::authenticate(&resources, &headers)?;
        let today = Utc::now().date_naive();
        let players: Vec<PlayerRow> = resources
            .database
            .players()
            .list_for_coach(auth.coach_id)
            .await?
            .into_iter()
            .map(|player| PlayerRow {
                age: player.player.age_on(today),
                player,
            })
            .collect();

        Ok(pages::render(
            "players",
            serde_json::json!({ "players": players }),
        ))
    }

    /// Handle POST /teams/:id/players
    #[tracing::instrument(skip(resources, headers, form), fields(route = "player_add"))]
    async fn handle_add(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<String>,
        form: Result<Form<PlayerForm>, FormRejection>,
    ) -> PageResult {
        let auth = pages::authenticate(&resources, &headers)?;
        let Form(form) = form.map_err(|rejection| form_rejection(&rejection))?;
        let team_id = parse_path_id(&id, "Team")?;
        let team = resources.database.teams().require(auth.coach_id, team_id).await?;

        let result = match form.validate() {
            Ok(input) => {
                resources
                    .database
                    .players()
                    .add_to_team(auth.coach_id, &team, &input)
                    .await
            }
            Err(err) => Err(err),
        };

        match result {
            Ok(player) => {
                info!(team_id = %team_id, player_id = %player.id, "Player added via page");
                Ok(pages::redirect(&format!("/teams/{team_id}")))
            }
            Err(err) => Self::rerender_team(&resources, auth.coach_id, team_id, err, &form).await,
        }
    }

    /// Handle POST /teams/:id/players/:player_id/edit
    #[tracing::instrument(skip(resources, headers, form), fields(route = "player_edit"))]
    async fn handle_edit(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path((id, player_id)): Path<(String, String)>,
        form: Result<Form<PlayerForm>, FormRejection>,
    ) -> PageResult {
        let auth = pages::authenticate(&resources, &headers)?;
        let Form(form) = form.map_err(|rejection| form_rejection(&rejection))?;
        let team_id = parse_path_id(&id, "Team")?;
        let player_id = parse_path_id(&player_id, "Player")?;
        resources.database.teams().require(auth.coach_id, team_id).await?;

        let result = match form.validate() {
            Ok(input) => {
                resources
                    .database
                    .players()
                    .update(auth.coach_id, team_id, player_id, &input)
                    .await
            }
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => Ok(pages::redirect(&format!("/teams/{team_id}"))),
            Err(err) => Self::rerender_team(&resources, auth.coach_id, team_id, err, &form).await,
        }
    }

    /// Handle POST /teams/:id/players/:player_id/remove
    async fn handle_remove(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path((id, player_id)): Path<(String, String)>,
    ) -> PageResult {
        let auth = pages::authenticate(&resources, &headers)?;
        let team_id = parse_path_id(&id, "Team")?;
        let player_id = parse_path_id(&player_id, "Player")?;
        resources
            .database
            .players()
            .remove(auth.coach_id, team_id, player_id)
            .await?;
        Ok(pages::redirect(&format!("/teams/{team_id}")))
    }
}
