// ABOUTME: Unified error type and error codes for the team management server
// ABOUTME: Maps validation, capacity, ownership and infrastructure failures onto HTTP responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Error handling
//!
//! Every fallible operation returns [`AppResult`]. Errors carry an
//! [`ErrorCode`] that decides the HTTP status and the error *kind* surfaced to
//! page templates (`validation`, `capacity`, `not_found`, ...).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Standard error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No session was presented
    AuthRequired,
    /// Session or credentials were rejected
    AuthInvalid,
    /// A field failed validation
    InvalidInput,
    /// A required field was blank or absent
    MissingRequiredField,
    /// Request body could not be parsed
    InvalidFormat,
    /// Team roster is already at its maximum size
    CapacityExceeded,
    /// Entity does not exist or is not owned by the acting coach
    ResourceNotFound,
    /// Unique value (username, email) is already taken
    ResourceAlreadyExists,
    /// Database failure
    DatabaseError,
    /// Configuration failure
    ConfigError,
    /// Anything else
    InternalError,
}

impl ErrorCode {
    /// HTTP status used for JSON responses carrying this code
    #[must_use]
    pub const fn http_status(self) -> StatusCode {
        match self {
            Self::AuthRequired | Self::AuthInvalid => StatusCode::UNAUTHORIZED,
            Self::InvalidInput | Self::MissingRequiredField | Self::InvalidFormat => {
                StatusCode::BAD_REQUEST
            }
            Self::CapacityExceeded | Self::ResourceAlreadyExists => StatusCode::CONFLICT,
            Self::ResourceNotFound => StatusCode::NOT_FOUND,
            Self::DatabaseError | Self::ConfigError | Self::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Coarse error kind used by page templates to pick an affordance
    #[must_use]
    pub const fn kind(self) -> &'static str {
        match self {
            Self::AuthRequired | Self::AuthInvalid => "auth",
            Self::InvalidInput
            | Self::MissingRequiredField
            | Self::InvalidFormat
            | Self::ResourceAlreadyExists => "validation",
            Self::CapacityExceeded => "capacity",
            Self::ResourceNotFound => "not_found",
            Self::DatabaseError | Self::ConfigError | Self::InternalError => "internal",
        }
    }

    /// Whether the message is safe to show to the client
    #[must_use]
    pub const fn is_client_error(self) -> bool {
        !matches!(
            self,
            Self::DatabaseError | Self::ConfigError | Self::InternalError
        )
    }
}

/// Application error with code and human readable message
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// Error classification
    pub code: ErrorCode,
    /// Message; shown to the user for client errors
    pub message: String,
}

/// Result alias used throughout the crate
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create an error with an explicit code
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Database failure
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Internal failure
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Configuration failure
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Validation failure
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Required field missing
    pub fn missing_field(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingRequiredField, message)
    }

    /// Unparseable request body
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFormat, message)
    }

    /// Roster is full
    pub fn capacity(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CapacityExceeded, message)
    }

    /// Entity missing or owned by someone else; `resource` is e.g. `"Team"`
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Duplicate unique value
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ResourceAlreadyExists, message)
    }

    /// No session
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "Authentication required")
    }

    /// Rejected session or credentials
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Error kind for page templates
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.code.kind()
    }

    /// Message that may be returned to the client
    #[must_use]
    pub fn public_message(&self) -> &str {
        if self.code.is_client_error() {
            &self.message
        } else {
            "Internal server error"
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        Self::database(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        Self::internal(format!("JSON serialization error: {e}"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if !self.code.is_client_error() {
            error!(code = ?self.code, message = %self.message, "Request failed");
        }
        let body = json!({
            "error": {
                "code": self.code,
                "kind": self.kind(),
                "message": self.public_message(),
            }
        });
        (self.code.http_status(), Json(body)).into_response()
    }
}

/// Whether a sqlx error is a unique constraint violation
#[must_use]
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}
