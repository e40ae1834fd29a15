// ABOUTME: Server binary for the liftlog workout tracker
// ABOUTME: Wires configuration, database, backup store, and the HTTP router together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! # Liftlog Server Binary
//!
//! Starts the HTTP API: sqlite-backed exercise, template, workout log,
//! and chart services plus the per-user workout backup slots.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use liftlog::{
    config::environment::ServerConfig,
    database::Database,
    logging::LoggingConfig,
    routes::{self, ServerResources},
    session::BackupStore,
};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "liftlog-server")]
#[command(about = "Liftlog - workout tracking API")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }

    LoggingConfig::from_env().init()?;

    info!("Starting liftlog server");

    // Sqlite's rwc mode creates the file but not its directory.
    if let Some(path) = config.database_url.strip_prefix("sqlite:") {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }

    let database = Database::new(&config.connection_url()).await?;
    let backups = BackupStore::new(&config.backup_dir)?;
    let resources = Arc::new(ServerResources::new(database, backups));

    let app = routes::router(resources);
    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP API listening on {addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
