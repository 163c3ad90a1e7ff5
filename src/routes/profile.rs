// ABOUTME: Coach profile page: view account and profile fields, submit edits
// ABOUTME: The profile row is created on first view when registration did not provide one
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
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::pages::{self, PageResult};
use super::teams::sport_choices;
use super::{form_rejection, optional_text, parse_optional_form_date};
use crate::{
    auth::is_valid_email,
    constants::error_messages,
    database::ProfileUpdate,
    errors::{AppError, AppResult},
    models::{CoachProfile, Gender, Sport},
    resources::ServerResources,
};

const PROFILE_PATH: &str = "/profile";

/// Profile edit form
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProfileForm {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Email
    pub email: String,
    /// Default sport; blank keeps the current one
    pub sport: String,
    /// Gender; blank clears it
    pub gender: String,
    /// `YYYY-MM-DD`; blank clears it
    pub birthday: String,
    /// Picture reference; blank clears it
    pub profile_picture: String,
}

impl ProfileForm {
    /// Validate into a [`ProfileUpdate`]
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name or email, a malformed
    /// email, or an invalid sport, gender or birthday
    pub fn validate(&self, current_sport: Sport) -> AppResult<ProfileUpdate> {
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        let email = self.email.trim().to_lowercase();
        if first_name.is_empty() || last_name.is_empty() || email.is_empty() {
            return Err(AppError::missing_field(error_messages::FILL_ALL_FIELDS));
        }
        if !is_valid_email(&email) {
            return Err(AppError::invalid_input(
                error_messages::INVALID_EMAIL_FORMAT,
            ));
        }

        let sport = match optional_text(&self.sport) {
            None => current_sport,
            Some(raw) => Sport::parse(&raw)
                .ok_or_else(|| AppError::invalid_input(error_messages::INVALID_SPORT))?,
        };
        let gender = optional_text(&self.gender)
            .map(|raw| {
                Gender::parse(&raw)
                    .ok_or_else(|| AppError::invalid_input(error_messages::INVALID_GENDER))
            })
            .transpose()?;

        Ok(ProfileUpdate {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            email,
            sport,
            gender,
            birthday: parse_optional_form_date(&self.birthday)?,
            profile_picture: optional_text(&self.profile_picture),
        })
    }

    fn echo(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Profile page context
#[derive(Debug, Serialize)]
pub struct ProfileContext {
    /// Login name
    pub username: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Email
    pub email: String,
    /// Profile
    pub profile: CoachProfile,
    /// Selectable sports
    pub sport_choices: Vec<&'static str>,
    /// Selectable genders
    pub gender_choices: Vec<&'static str>,
}

/// Profile routes handler
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                PROFILE_PATH,
                get(Self::handle_profile).post(Self::handle_update),
            )
            .with_state(resources)
    }

    async fn context(resources: &ServerResources, coach_id: Uuid) -> AppResult<ProfileContext> {
        let coaches = resources.database.coaches();
        let coach = coaches
            .get(coach_id)
            .await?
            .ok_or_else(AppError::auth_required)?;
        let profile = coaches.profile(coach_id).await?;

        Ok(ProfileContext {
            username: coach.username,
            first_name: coach.first_name,
            last_name: coach.last_name,
            email: coach.email,
            profile,
            sport_choices: sport_choices(),
            gender_choices: Gender::ALL.iter().map(Gender::as_str).collect(),
        })
    }

    /// Handle GET /profile
    async fn handle_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> PageResult {
        let auth = pages::authenticate(&resources, &headers)?;
        let context = Self::context(&resources, auth.coach_id).await?;
        Ok(pages::render("profile", context))
    }

    /// Handle POST /profile
    #[tracing::instrument(skip(resources, headers, form), fields(route = "profile_update"))]
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        form: Result<Form<ProfileForm>, FormRejection>,
    ) -> PageResult {
        let auth = pages::authenticate(&resources, &headers)?;
        let Form(form) = form.map_err(|rejection| form_rejection(&rejection))?;
        let context = Self::context(&resources, auth.coach_id).await?;

        match Self::apply(&resources, auth.coach_id, context.profile.sport, &form).await {
            Ok(()) => Ok(pages::redirect(PROFILE_PATH)),
            Err(err) => pages::rerender_or_fail(
                "profile",
                err,
                form.echo(),
                serde_json::to_value(context).map_err(AppError::from)?,
            ),
        }
    }

    async fn apply(
        resources: &ServerResources,
        coach_id: Uuid,
        current_sport: Sport,
        form: &ProfileForm,
    ) -> AppResult<()> {
        let update = form.validate(current_sport)?;
        let coaches = resources.database.coaches();
        if coaches.email_taken(&update.email, Some(coach_id)).await? {
            return Err(AppError::already_exists(error_messages::EMAIL_TAKEN));
        }
        coaches.update_profile(coach_id, &update).await
    }
}
