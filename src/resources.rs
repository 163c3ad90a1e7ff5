// ABOUTME: Shared server state handed to every route family through axum State
// ABOUTME: Bundles the database, session manager and configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;

/// Long-lived resources shared by all handlers
#[derive(Clone)]
pub struct ServerResources {
    /// Database pool and managers
    pub database: Arc<Database>,
    /// Session token issuer and validator
    pub auth_manager: Arc<AuthManager>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Assemble resources; the session manager is derived from `config`
    #[must_use]
    pub fn new(database: Database, config: ServerConfig) -> Self {
        let auth_manager = AuthManager::new(config.jwt_secret.as_bytes(), config.jwt_expiry_hours);
        Self {
            database: Arc::new(database),
            auth_manager: Arc::new(auth_manager),
            config: Arc::new(config),
        }
    }
}
