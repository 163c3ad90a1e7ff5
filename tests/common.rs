// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory databases, test coaches, sessions and seeded teams
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `team_mgmt`

use std::env;
use std::sync::{Arc, Once};

use anyhow::Result;
use axum::Router;
use team_mgmt::{
    auth::hash_password,
    config::ServerConfig,
    database::{Database, NewCoach, PlayerInput, TeamInput},
    models::{Coach, Player, Sport, Team, TeamStatus},
    resources::ServerResources,
    server::build_router,
};

static INIT_LOGGER: Once = Once::new();

/// Password given to every test coach
pub const TEST_PASSWORD: &str = "correct-horse";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Configuration with a fast bcrypt cost and a fixed secret
pub fn test_config() -> ServerConfig {
    ServerConfig {
        jwt_secret: "test-secret-for-integration-tests".to_owned(),
        bcrypt_cost: 4,
        ..ServerConfig::default()
    }
}

/// Fresh in-memory database with migrations applied
pub async fn create_test_database() -> Result<Database> {
    init_test_logging();
    Ok(Database::new("sqlite::memory:").await?)
}

/// Resources over a fresh in-memory database
pub async fn create_test_server_resources() -> Result<Arc<ServerResources>> {
    let database = create_test_database().await?;
    Ok(Arc::new(ServerResources::new(database, test_config())))
}

/// Create a coach and return it with a session token
pub async fn create_test_coach(
    resources: &ServerResources,
    username: &str,
) -> Result<(Coach, String)> {
    let password_hash = hash_password(TEST_PASSWORD.to_owned(), 4).await?;
    let coach = resources
        .database
        .coaches()
        .create(&NewCoach {
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            password_hash,
            first_name: "Test".to_owned(),
            last_name: username.to_owned(),
        })
        .await?;
    let token = resources.auth_manager.generate_token(&coach)?;
    Ok((coach, token))
}

/// Team input with the given sport and roster limit
pub fn team_input(name: &str, sport: Sport, max_players: u32) -> TeamInput {
    TeamInput {
        name: name.to_owned(),
        sport,
        season: Some("2024".to_owned()),
        max_players,
        status: TeamStatus::Active,
        location: "Main gym".to_owned(),
    }
}

/// Create a team for `coach`
pub async fn create_test_team(
    resources: &ServerResources,
    coach: &Coach,
    name: &str,
    sport: Sport,
    max_players: u32,
) -> Result<Team> {
    Ok(resources
        .database
        .teams()
        .create(coach.id, &team_input(name, sport, max_players))
        .await?)
}

/// Player input with only names set
pub fn player_input(first_name: &str, last_name: &str) -> PlayerInput {
    PlayerInput {
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        email: None,
        jersey_number: None,
        position: None,
        date_of_birth: None,
    }
}

/// Add a player to `team`
pub async fn add_test_player(
    resources: &ServerResources,
    coach: &Coach,
    team: &Team,
    first_name: &str,
    last_name: &str,
) -> Result<Player> {
    Ok(resources
        .database
        .players()
        .add_to_team(coach.id, team, &player_input(first_name, last_name))
        .await?)
}

/// Full application router plus resources and one signed-in coach
pub async fn setup_test_app() -> Result<(Router, Arc<ServerResources>, Coach, String)> {
    let resources = create_test_server_resources().await?;
    let (coach, token) = create_test_coach(&resources, "coach_a").await?;
    let router = build_router(&resources);
    Ok((router, resources, coach, token))
}
