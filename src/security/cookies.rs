// ABOUTME: Session cookie helpers: HttpOnly, SameSite=Lax, Secure behind https
// ABOUTME: Builds Set-Cookie values for login and logout and reads cookies back from requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Session cookies
//!
//! The `Secure` flag follows the configured base URL (see
//! [`ServerConfig::secure_cookies`](crate::config::ServerConfig::secure_cookies))
//! rather than being read from the environment at call time.

use std::fmt::Write;

use axum::http::{header, HeaderMap, HeaderValue};

use crate::constants::session::AUTH_COOKIE;

/// Attributes of one `Set-Cookie` header
#[derive(Debug, Clone)]
pub struct SessionCookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Max-Age in seconds; 0 expires the cookie
    pub max_age_secs: i64,
    /// `Secure` flag
    pub secure: bool,
}

impl SessionCookie {
    /// `HttpOnly`, `SameSite=Lax` cookie on path `/`
    #[must_use]
    pub fn new(name: &str, value: &str, max_age_secs: i64, secure: bool) -> Self {
        Self {
            name: name.to_owned(),
            value: value.to_owned(),
            max_age_secs,
            secure,
        }
    }

    /// `Set-Cookie` header value
    #[must_use]
    pub fn build(&self) -> String {
        let mut cookie = format!("{}={}", self.name, self.value);
        let _ = write!(cookie, "; Max-Age={}; Path=/; HttpOnly", self.max_age_secs);
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str("; SameSite=Lax");
        cookie
    }
}

/// Attach the session cookie carrying `token`
pub fn set_auth_cookie(headers: &mut HeaderMap, token: &str, max_age_secs: i64, secure: bool) {
    let cookie = SessionCookie::new(AUTH_COOKIE, token, max_age_secs, secure);
    if let Ok(value) = HeaderValue::from_str(&cookie.build()) {
        headers.append(header::SET_COOKIE, value);
    }
}

/// Attach a cookie that expires the session immediately
pub fn clear_auth_cookie(headers: &mut HeaderMap, secure: bool) {
    set_auth_cookie(headers, "", 0, secure);
}

/// Value of `cookie_name` in the request's `Cookie` header
#[must_use]
pub fn get_cookie_value(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|cookie| {
            let (name, value) = cookie.trim().split_once('=')?;
            (name.trim() == cookie_name).then(|| value.trim().to_owned())
        })
}
