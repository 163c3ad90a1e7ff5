// ABOUTME: Main library entry point for the team management server
// ABOUTME: Coaches manage teams, rosters, schedules, attendance and per-game statistics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Team Management Server
//!
//! A coach-facing web service for running sports teams. Every coach owns
//! their teams, players and events; every query is filtered by the acting
//! coach, so another coach's data is indistinguishable from missing data.
//!
//! ## Architecture
//!
//! - **Models**: domain entities and derived figures (age, win/loss record,
//!   attendance ratio, basketball points)
//! - **Database**: `SQLite` managers, one per aggregate, taking the coach id
//!   explicitly
//! - **Routes**: a page family (form posts, render contexts, redirects) and
//!   a JSON family under `/api`
//! - **Auth**: JWT sessions carried in an `HttpOnly` cookie or a bearer header
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use team_mgmt::config::ServerConfig;
//! use team_mgmt::database::Database;
//! use team_mgmt::errors::AppResult;
//! use team_mgmt::resources::ServerResources;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     let database = Database::new(&config.database_url).await?;
//!     let resources = Arc::new(ServerResources::new(database, config));
//!     team_mgmt::server::run(resources).await
//! }
//! ```

/// Session tokens and password hashing
pub mod auth;

/// Environment configuration
pub mod config;

/// Application constants
pub mod constants;

/// `SQLite` persistence
pub mod database;

/// Unified error handling with standard error codes and HTTP responses
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Domain models
pub mod models;

/// Shared handler state
pub mod resources;

/// HTTP routes
pub mod routes;

/// Session cookie handling
pub mod security;

/// Router assembly and serving
pub mod server;
