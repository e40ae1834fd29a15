// ABOUTME: Environment-driven configuration for the liftlog server
// ABOUTME: Parses ports, database URL, and backup directory from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! # Server Configuration
//!
//! Environment-only configuration: every knob has a `LIFTLOG_`-prefixed
//! variable and a development-friendly default. Invalid values are
//! configuration errors at startup, never panics.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Default HTTP port when `LIFTLOG_HTTP_PORT` is unset
const DEFAULT_HTTP_PORT: u16 = 8081;
/// Default sqlite database when `LIFTLOG_DATABASE_URL` is unset
const DEFAULT_DATABASE_URL: &str = "sqlite:data/liftlog.db";
/// Default backup slot directory when `LIFTLOG_BACKUP_DIR` is unset
const DEFAULT_BACKUP_DIR: &str = "data/backups";

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,
    /// Database URL (sqlite path)
    pub database_url: String,
    /// Directory holding per-user workout backup slots
    pub backup_dir: PathBuf,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a variable is present but
    /// unparseable.
    pub fn from_env() -> AppResult<Self> {
        let http_port = match env::var("LIFTLOG_HTTP_PORT") {
            Ok(value) => value.parse::<u16>().map_err(|_| {
                AppError::config(format!("Invalid LIFTLOG_HTTP_PORT value: {value}"))
            })?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let database_url =
            env::var("LIFTLOG_DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_owned());

        let backup_dir = env::var("LIFTLOG_BACKUP_DIR")
            .map_or_else(|_| PathBuf::from(DEFAULT_BACKUP_DIR), PathBuf::from);

        Ok(Self {
            http_port,
            database_url,
            backup_dir,
        })
    }

    /// Database URL with sqlite create-if-missing mode applied
    #[must_use]
    pub fn connection_url(&self) -> String {
        if self.database_url.starts_with("sqlite:") && !self.database_url.contains('?') {
            format!("{}?mode=rwc", self.database_url)
        } else {
            self.database_url.clone()
        }
    }
}
