// ABOUTME: Structured logging setup built on tracing-subscriber
// ABOUTME: Selects filter from RUST_LOG or LOG_LEVEL and text or JSON output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, ServerConfig};
use crate::errors::{AppError, AppResult};

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured `log_level`.
///
/// # Errors
///
/// Returns an error if the filter directive is invalid or a global
/// subscriber is already installed
pub fn init_logging(config: &ServerConfig) -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| AppError::config(format!("Invalid log filter: {e}")))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = match config.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    };
    result.map_err(|e| AppError::internal(format!("Failed to install logger: {e}")))?;

    info!(
        environment = ?config.environment,
        format = ?config.log_format,
        "Logging initialized"
    );
    Ok(())
}
