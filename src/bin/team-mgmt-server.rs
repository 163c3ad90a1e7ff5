// ABOUTME: Team management server binary: loads configuration, migrates the database and serves HTTP
// ABOUTME: Command line flags override the matching environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Team Management Server
//!
//! ```bash
//! # Serve with environment configuration
//! cargo run --bin team-mgmt-server
//!
//! # Override port and database
//! cargo run --bin team-mgmt-server -- --port 8080 --database-url sqlite:./data/teams.db
//! ```

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use team_mgmt::config::ServerConfig;
use team_mgmt::database::Database;
use team_mgmt::logging::init_logging;
use team_mgmt::resources::ServerResources;
use team_mgmt::server;

#[derive(Parser)]
#[command(
    name = "team-mgmt-server",
    about = "Sports team management server",
    long_about = "Serve team, roster, schedule, attendance and statistics pages for coaches"
)]
struct Args {
    /// HTTP port override
    #[arg(long)]
    port: Option<u16>,

    /// Listen host override
    #[arg(long)]
    host: Option<String>,

    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env().context("Failed to load configuration")?;
    if let Some(port) = args.port {
        config.http_port = port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }
    if args.verbose {
        "debug".clone_into(&mut config.log_level);
    }

    init_logging(&config)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        database_url = %config.database_url,
        "Starting team management server"
    );

    let database = Database::new(&config.database_url)
        .await
        .context("Failed to open database")?;
    let resources = Arc::new(ServerResources::new(database, config));

    server::run(resources).await?;
    Ok(())
}
