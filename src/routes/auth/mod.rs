// ABOUTME: Landing, login, registration, logout and password change page routes
// ABOUTME: Successful login or registration sets the session cookie and redirects to the dashboard
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Authentication routes
//!
//! Business rules live in [`AuthService`]; handlers translate its results
//! into redirects, cookies and re-rendered forms.
//!
//! ## Module Structure
//! - `types` - Form and context types for auth pages

mod types;

pub use types::{LandingContext, LoginForm, PasswordChangeForm, RegisterForm};

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Form, State},
    http::HeaderMap,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::form_rejection;
use super::pages::{self, PageResult};
use crate::{
    auth::{hash_password, is_valid_email, verify_password},
    constants::{
        error_messages, limits,
        session::{DASHBOARD_PATH, LANDING_PATH},
    },
    database::NewCoach,
    errors::{AppError, AppResult},
    models::Coach,
    resources::ServerResources,
    security::cookies::{clear_auth_cookie, set_auth_cookie},
};

/// Account rules for registration, login and password change
pub struct AuthService<'a> {
    resources: &'a ServerResources,
}

impl<'a> AuthService<'a> {
    /// Create a service over shared resources
    #[must_use]
    pub const fn new(resources: &'a ServerResources) -> Self {
        Self { resources }
    }

    /// Validate a registration form and create the coach with an empty
    /// profile; the first failing rule wins
    ///
    /// # Errors
    ///
    /// Returns a validation or already-exists error carrying the message
    /// to show, or a database error
    #[tracing::instrument(skip(self, form), fields(route = "register"))]
    pub async fn register(&self, form: &RegisterForm) -> AppResult<Coach> {
        let username = form.username.trim();
        let first_name = form.first_name.trim();
        let last_name = form.last_name.trim();
        let email = form.email.trim().to_lowercase();

        if [username, first_name, last_name, email.as_str()]
            .iter()
            .any(|field| field.is_empty())
            || form.password1.is_empty()
            || form.password2.is_empty()
        {
            return Err(AppError::missing_field(error_messages::FILL_ALL_FIELDS));
        }
        if !is_valid_email(&email) {
            return Err(AppError::invalid_input(
                error_messages::INVALID_EMAIL_FORMAT,
            ));
        }
        if form.password1 != form.password2 {
            return Err(AppError::invalid_input(
                error_messages::PASSWORDS_DO_NOT_MATCH,
            ));
        }
        validate_password_length(&form.password1)?;

        let coaches = self.resources.database.coaches();
        if coaches.username_taken(username).await? {
            return Err(AppError::already_exists(error_messages::USERNAME_TAKEN));
        }
        if coaches.email_taken(&email, None).await? {
            return Err(AppError::already_exists(error_messages::EMAIL_TAKEN));
        }

        let password_hash =
            hash_password(form.password1.clone(), self.resources.config.bcrypt_cost).await?;
        coaches
            .create(&NewCoach {
                username: username.to_owned(),
                email,
                password_hash,
                first_name: first_name.to_owned(),
                last_name: last_name.to_owned(),
            })
            .await
    }

    /// Resolve and verify login credentials
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` with the same message whether the identifier
    /// or the password is wrong
    #[tracing::instrument(skip(self, form), fields(route = "login"))]
    pub async fn login(&self, form: &LoginForm) -> AppResult<Coach> {
        let invalid = || AppError::auth_invalid(error_messages::INVALID_CREDENTIALS);

        let Some(coach) = self
            .resources
            .database
            .coaches()
            .find_by_identifier(&form.username)
            .await?
        else {
            debug!("Login failed: unknown identifier");
            return Err(invalid());
        };

        if !verify_password(form.password.clone(), coach.password_hash.clone()).await? {
            warn!(coach_id = %coach.id, "Login failed: wrong password");
            return Err(invalid());
        }

        info!(coach_id = %coach.id, "Coach logged in");
        Ok(coach)
    }

    /// Verify the current password and store a new one
    ///
    /// # Errors
    ///
    /// Returns a validation error for a wrong current password, a
    /// mismatched confirmation or a short password, or a database error
    #[tracing::instrument(skip(self, form), fields(route = "password_change"))]
    pub async fn change_password(&self, coach_id: Uuid, form: &PasswordChangeForm) -> AppResult<()> {
        let coaches = self.resources.database.coaches();
        let coach = coaches
            .get(coach_id)
            .await?
            .ok_or_else(AppError::auth_required)?;

        if !verify_password(form.old_password.clone(), coach.password_hash.clone()).await? {
            return Err(AppError::invalid_input(
                error_messages::CURRENT_PASSWORD_INCORRECT,
            ));
        }
        if form.new_password1 != form.new_password2 {
            return Err(AppError::invalid_input(
                error_messages::PASSWORDS_DO_NOT_MATCH,
            ));
        }
        validate_password_length(&form.new_password1)?;

        let password_hash =
            hash_password(form.new_password1.clone(), self.resources.config.bcrypt_cost).await?;
        coaches.update_password(coach_id, &password_hash).await
    }
}

fn validate_password_length(password: &str) -> AppResult<()> {
    if password.chars().count() < limits::MIN_PASSWORD_LENGTH {
        return Err(AppError::invalid_input(error_messages::PASSWORD_TOO_SHORT));
    }
    Ok(())
}

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/", get(Self::handle_landing))
            .route("/login", get(Self::handle_login_page).post(Self::handle_login))
            .route(
                "/register",
                get(Self::handle_register_page).post(Self::handle_register),
            )
            .route("/logout", post(Self::handle_logout))
            .route(
                "/password-change",
                get(Self::handle_password_page).post(Self::handle_password_change),
            )
            .with_state(resources)
    }

    /// Redirect to the dashboard with a fresh session cookie
    fn start_session(resources: &ServerResources, coach: &Coach) -> PageResult {
        let token = resources.auth_manager.generate_token(coach)?;
        let mut headers = HeaderMap::new();
        set_auth_cookie(
            &mut headers,
            &token,
            resources.auth_manager.session_max_age_secs(),
            resources.config.secure_cookies(),
        );
        Ok(pages::redirect_with(DASHBOARD_PATH, headers))
    }

    /// Handle GET / - public landing page
    async fn handle_landing(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> PageResult {
        let authenticated = resources.auth_manager.authenticate_request(&headers).is_ok();
        Ok(pages::render("landing", LandingContext { authenticated }))
    }

    /// Handle GET /login
    async fn handle_login_page(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> PageResult {
        if resources.auth_manager.authenticate_request(&headers).is_ok() {
            return Ok(pages::redirect(DASHBOARD_PATH));
        }
        Ok(pages::render("login", json!({})))
    }

    /// Handle POST /login
    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Form(form): Form<LoginForm>,
    ) -> PageResult {
        match AuthService::new(&resources).login(&form).await {
            Ok(coach) => Self::start_session(&resources, &coach),
            Err(err) => pages::rerender_or_fail("login", err, form.echo(), Value::Null),
        }
    }

    /// Handle GET /register
    async fn handle_register_page() -> PageResult {
        Ok(pages::render("register", json!({})))
    }

    /// Handle POST /register
    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Form(form): Form<RegisterForm>,
    ) -> PageResult {
        match AuthService::new(&resources).register(&form).await {
            Ok(coach) => Self::start_session(&resources, &coach),
            Err(err) => pages::rerender_or_fail("register", err, form.echo(), Value::Null),
        }
    }

    /// Handle POST /logout
    async fn handle_logout(State(resources): State<Arc<ServerResources>>) -> PageResult {
        let mut headers = HeaderMap::new();
        clear_auth_cookie(&mut headers, resources.config.secure_cookies());
        Ok(pages::redirect_with(LANDING_PATH, headers))
    }

    /// Handle GET /password-change
    async fn handle_password_page(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> PageResult {
        pages::authenticate(&resources, &headers)?;
        Ok(pages::render("password_change", json!({})))
    }

    /// Handle POST /password-change
    async fn handle_password_change(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        form: Result<Form<PasswordChangeForm>, FormRejection>,
    ) -> PageResult {
        let auth = pages::authenticate(&resources, &headers)?;
        let Form(form) = form.map_err(|rejection| form_rejection(&rejection))?;
        match AuthService::new(&resources)
            .change_password(auth.coach_id, &form)
            .await
        {
            Ok(()) => Ok(pages::redirect("/profile")),
            Err(err) => pages::rerender_or_fail("password_change", err, Value::Null, Value::Null),
        }
    }
}
