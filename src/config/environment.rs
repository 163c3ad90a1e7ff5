// ABOUTME: Environment-based configuration for server port, database, sessions and logging
// ABOUTME: Parses typed values from environment variables with development defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Server configuration from environment variables
//!
//! | Variable | Default |
//! |---|---|
//! | `HOST` | `127.0.0.1` |
//! | `HTTP_PORT` | `8081` |
//! | `DATABASE_URL` | `sqlite:./data/team_mgmt.db` |
//! | `JWT_SECRET` | development-only fallback, required in production |
//! | `JWT_EXPIRY_HOURS` | `24` |
//! | `BASE_URL` | `http://localhost:8081` |
//! | `ENVIRONMENT` | `development` |
//! | `LOG_LEVEL` | `info` |
//! | `LOG_FORMAT` | `text` |
//! | `BCRYPT_COST` | `12` |

use std::{env, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::constants::limits;
use crate::errors::{AppError, AppResult};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_HTTP_PORT: u16 = 8081;
const DEFAULT_DATABASE_URL: &str = "sqlite:./data/team_mgmt.db";
const DEFAULT_BASE_URL: &str = "http://localhost:8081";
const DEVELOPMENT_JWT_SECRET: &str = "team-mgmt-development-secret-change-me";

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string, falling back to development
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Whether this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    /// Parse from string, falling back to text
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP port
    pub http_port: u16,
    /// sqlx database URL
    pub database_url: String,
    /// HMAC secret for session tokens
    pub jwt_secret: String,
    /// Session lifetime in hours
    pub jwt_expiry_hours: i64,
    /// Public base URL; `https://` enables Secure cookies
    pub base_url: String,
    /// Deployment environment
    pub environment: Environment,
    /// Default tracing filter directive
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// bcrypt work factor for new password hashes
    pub bcrypt_cost: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            http_port: DEFAULT_HTTP_PORT,
            database_url: DEFAULT_DATABASE_URL.to_owned(),
            jwt_secret: DEVELOPMENT_JWT_SECRET.to_owned(),
            jwt_expiry_hours: limits::DEFAULT_SESSION_HOURS,
            base_url: DEFAULT_BASE_URL.to_owned(),
            environment: Environment::Development,
            log_level: "info".to_owned(),
            log_format: LogFormat::Text,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A numeric variable cannot be parsed
    /// - `JWT_SECRET` is unset in production
    /// - `JWT_EXPIRY_HOURS` is not positive
    pub fn from_env() -> AppResult<Self> {
        let environment = env::var("ENVIRONMENT")
            .map(|s| Environment::from_str_or_default(&s))
            .unwrap_or_default();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment.is_production() => {
                return Err(AppError::config(
                    "JWT_SECRET must be set when ENVIRONMENT=production",
                ));
            }
            _ => DEVELOPMENT_JWT_SECRET.to_owned(),
        };

        let jwt_expiry_hours: i64 = parse_env("JWT_EXPIRY_HOURS", limits::DEFAULT_SESSION_HOURS)?;
        if jwt_expiry_hours <= 0 {
            return Err(AppError::config("JWT_EXPIRY_HOURS must be positive"));
        }

        let bcrypt_cost: u32 = parse_env("BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(AppError::config("BCRYPT_COST must be between 4 and 31"));
        }

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_owned()),
            http_port: parse_env("HTTP_PORT", DEFAULT_HTTP_PORT)?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned()),
            jwt_secret,
            jwt_expiry_hours,
            base_url: env::var("BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_owned()),
            environment,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_owned()),
            log_format: env::var("LOG_FORMAT")
                .map(|s| LogFormat::from_str_or_default(&s))
                .unwrap_or_default(),
            bcrypt_cost,
        })
    }

    /// Whether cookies should carry the `Secure` flag
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

/// Parse an environment variable, using `default` when it is unset
fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}
