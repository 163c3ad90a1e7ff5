// ABOUTME: Session tokens (HS256 JWT) and bcrypt password hashing for coach accounts
// ABOUTME: Resolves the acting coach from a Bearer header or the auth_token cookie
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Authentication
//!
//! A session is a signed token naming the coach. Handlers call
//! [`AuthManager::authenticate_request`] and pass the resulting
//! [`AuthResult::coach_id`] explicitly into every database call.

use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tokio::task;
use tracing::debug;
use uuid::Uuid;

use crate::constants::session::AUTH_COOKIE;
use crate::errors::{AppError, AppResult};
use crate::models::Coach;
use crate::security::cookies::get_cookie_value;

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Coach id
    pub sub: String,
    /// Username at issue time
    pub username: String,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Authenticated coach for the current request
#[derive(Debug, Clone)]
pub struct AuthResult {
    /// Acting coach
    pub coach_id: Uuid,
    /// Username from the token
    pub username: String,
}

/// Issues and validates session tokens
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_hours: i64,
}

impl AuthManager {
    /// Create a manager signing with `secret`
    #[must_use]
    pub fn new(secret: &[u8], expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry_hours,
        }
    }

    /// Session lifetime in seconds
    #[must_use]
    pub const fn session_max_age_secs(&self) -> i64 {
        self.expiry_hours * 3600
    }

    /// Issue a session token for `coach`
    ///
    /// # Errors
    ///
    /// Returns an internal error if signing fails
    pub fn generate_token(&self, coach: &Coach) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: coach.id.to_string(),
            username: coach.username.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.expiry_hours)).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign session token: {e}")))
    }

    /// Validate a token and return its claims
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` if the token is malformed, forged or expired
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Session token rejected");
                AppError::auth_invalid("Invalid or expired session")
            })
    }

    /// Resolve the acting coach from `Authorization: Bearer` or the
    /// session cookie, in that order
    ///
    /// # Errors
    ///
    /// Returns `AuthRequired` when no session is presented and
    /// `AuthInvalid` when it does not validate
    pub fn authenticate_request(&self, headers: &HeaderMap) -> AppResult<AuthResult> {
        let token = bearer_token(headers)
            .or_else(|| get_cookie_value(headers, AUTH_COOKIE).filter(|t| !t.is_empty()))
            .ok_or_else(AppError::auth_required)?;

        let claims = self.validate_token(&token)?;
        let coach_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::auth_invalid("Invalid or expired session"))?;

        Ok(AuthResult {
            coach_id,
            username: claims.username,
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty())
}

/// Hash a password with bcrypt off the async executor
///
/// # Errors
///
/// Returns an internal error if hashing fails
pub async fn hash_password(password: String, cost: u32) -> AppResult<String> {
    task::spawn_blocking(move || bcrypt::hash(&password, cost))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
}

/// Verify a password against a bcrypt hash off the async executor
///
/// A malformed stored hash verifies as `false`.
///
/// # Errors
///
/// Returns an internal error if the blocking task fails
pub async fn verify_password(password: String, hash: String) -> AppResult<bool> {
    task::spawn_blocking(move || bcrypt::verify(&password, &hash).unwrap_or(false))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))
}

/// Loose structural email check: one `@`, non-empty local part, dotted
/// domain without spaces
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}
