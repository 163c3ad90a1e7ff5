// ABOUTME: HTTP server assembly: merges every route family behind a request tracing layer
// ABOUTME: Binds the configured address and serves until ctrl-c
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::{info, warn, Level};

use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;
use crate::routes::{
    AttendanceRoutes, AuthRoutes, DashboardRoutes, EventRoutes, HealthRoutes, PlayerRoutes,
    ProfileRoutes, StatsRoutes, TeamRoutes,
};

/// Build the application router with all routes and middleware
pub fn build_router(resources: &Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(resources)))
        .merge(AuthRoutes::routes(Arc::clone(resources)))
        .merge(DashboardRoutes::routes(Arc::clone(resources)))
        .merge(TeamRoutes::routes(Arc::clone(resources)))
        .merge(PlayerRoutes::routes(Arc::clone(resources)))
        .merge(EventRoutes::routes(Arc::clone(resources)))
        .merge(AttendanceRoutes::routes(Arc::clone(resources)))
        .merge(StatsRoutes::routes(Arc::clone(resources)))
        .merge(ProfileRoutes::routes(Arc::clone(resources)))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
}

/// Serve HTTP until interrupted
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails
pub async fn run(resources: Arc<ServerResources>) -> AppResult<()> {
    let host = &resources.config.host;
    let port = resources.config.http_port;
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| AppError::config(format!("Invalid listen address {host}:{port}: {e}")))?;

    let app = build_router(&resources);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("Transport error: {e}")))?;
    info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Transport error: {e}")))?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
