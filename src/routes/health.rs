// ABOUTME: Health check route reporting service version and database reachability
// ABOUTME: Answers 503 when the database ping fails so load balancers can drain the instance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tracing::error;

use crate::resources::ServerResources;

/// Overall health status
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Database reachable
    Ok,
    /// Database unreachable
    Unhealthy,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status
    pub status: HealthStatus,
    /// Crate version
    pub version: &'static str,
    /// Database ping duration in milliseconds
    pub database_ms: u64,
}

/// Health check routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .with_state(resources)
    }

    /// Handle GET /health
    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> impl IntoResponse {
        let start = Instant::now();
        let status = match resources.database.ping().await {
            Ok(()) => HealthStatus::Ok,
            Err(e) => {
                error!("Database health check failed: {}", e);
                HealthStatus::Unhealthy
            }
        };

        let response = HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            database_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        let code = if status == HealthStatus::Ok {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        (code, Json(response))
    }
}
