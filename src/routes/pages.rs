// ABOUTME: Response helpers for the page route family: render contexts, re-renders and redirects
// ABOUTME: Unauthenticated page requests become a 303 redirect to the login page
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Page responses
//!
//! A page route answers with either a JSON render context
//! `{page, ...context}` for the template layer, or a `303 See Other`
//! redirect after a successful form post. A failed form post re-renders the
//! page with `{page, error: {kind, message}, form, ...context}` and a status
//! that tells validation (422), capacity (409) and not-found (404) apart.

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::AuthResult;
use crate::constants::session::LOGIN_PATH;
use crate::errors::{AppError, ErrorCode};
use crate::resources::ServerResources;

/// Result of a page handler
pub type PageResult = Result<Response, PageError>;

/// Failure of a page handler
#[derive(Debug)]
pub enum PageError {
    /// No valid session; send the browser to the login page
    Login,
    /// Anything else, rendered as an error page
    App(AppError),
}

impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        match err.code {
            ErrorCode::AuthRequired | ErrorCode::AuthInvalid => Self::Login,
            _ => Self::App(err),
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            Self::Login => redirect(LOGIN_PATH),
            Self::App(err) if err.code.is_client_error() => {
                let page = if err.code == ErrorCode::ResourceNotFound {
                    "not_found"
                } else {
                    "error"
                };
                rerender(page, &err, Value::Null, Value::Null)
            }
            Self::App(err) => err.into_response(),
        }
    }
}

#[derive(Serialize)]
struct PageBody<'a, T: Serialize> {
    page: &'a str,
    #[serde(flatten)]
    context: T,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    kind: &'static str,
    message: &'a str,
}

#[derive(Serialize)]
struct RerenderBody<'a> {
    page: &'a str,
    error: ErrorBody<'a>,
    form: Value,
    #[serde(flatten)]
    context: Value,
}

/// Resolve the acting coach for a page request
///
/// # Errors
///
/// Returns [`PageError::Login`] when the request carries no valid session
pub fn authenticate(resources: &ServerResources, headers: &HeaderMap) -> Result<AuthResult, PageError> {
    resources
        .auth_manager
        .authenticate_request(headers)
        .map_err(PageError::from)
}

/// `303 See Other` to `location`
#[must_use]
pub fn redirect(location: &str) -> Response {
    redirect_with(location, HeaderMap::new())
}

/// `303 See Other` to `location` carrying extra headers (e.g. `Set-Cookie`)
#[must_use]
pub fn redirect_with(location: &str, mut headers: HeaderMap) -> Response {
    if let Ok(value) = HeaderValue::from_str(location) {
        headers.insert(header::LOCATION, value);
    }
    (StatusCode::SEE_OTHER, headers).into_response()
}

/// `200` render context for `page`
#[must_use]
pub fn render<T: Serialize>(page: &str, context: T) -> Response {
    (StatusCode::OK, Json(PageBody { page, context })).into_response()
}

/// Status of a re-rendered page for `err`
#[must_use]
pub const fn rerender_status(err: &AppError) -> StatusCode {
    match err.code {
        ErrorCode::InvalidInput
        | ErrorCode::MissingRequiredField
        | ErrorCode::InvalidFormat
        | ErrorCode::ResourceAlreadyExists => StatusCode::UNPROCESSABLE_ENTITY,
        code => code.http_status(),
    }
}

/// Re-render `page` with the error, the submitted `form` and `context`
///
/// `context` must be a JSON object or `null`.
#[must_use]
pub fn rerender(page: &str, err: &AppError, form: Value, context: Value) -> Response {
    let context = if context.is_object() { context } else { json!({}) };
    let body = RerenderBody {
        page,
        error: ErrorBody {
            kind: err.kind(),
            message: err.public_message(),
        },
        form,
        context,
    };
    (rerender_status(err), Json(body)).into_response()
}

/// Re-render for client errors; infrastructure errors propagate
///
/// # Errors
///
/// Returns the error itself when it is not a client error
pub fn rerender_or_fail(page: &str, err: AppError, form: Value, context: Value) -> PageResult {
    if err.code.is_client_error() {
        Ok(rerender(page, &err, form, context))
    } else {
        Err(PageError::App(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rerender_statuses() {
        assert_eq!(
            rerender_status(&AppError::invalid_input("x")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(rerender_status(&AppError::capacity("x")), StatusCode::CONFLICT);
        assert_eq!(rerender_status(&AppError::not_found("Team")), StatusCode::NOT_FOUND);
        assert_eq!(
            rerender_status(&AppError::already_exists("x")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_auth_errors_become_login_redirect() {
        let response = PageError::from(AppError::auth_required()).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some(LOGIN_PATH)
        );
    }
}
