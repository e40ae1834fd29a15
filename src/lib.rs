// ABOUTME: Main library entry point for the liftlog workout tracker
// ABOUTME: Provides session state management, backups, and sqlite-backed services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

#![deny(unsafe_code)]

//! # Liftlog
//!
//! A workout tracker: reusable templates drive timed, set-by-set workout
//! sessions; finished sessions are logged and feed per-exercise progress
//! metrics.
//!
//! ## Architecture
//!
//! - **Session**: The in-flight workout state machine, rest timer,
//!   template change detection, and crash-recovery backup slots
//! - **Database**: Sqlite-backed managers for the exercise library,
//!   templates, workout logs, and user charts
//! - **Routes**: The REST surface over the managers and the backup store
//! - **Config**: Environment-driven server configuration
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use liftlog::config::environment::ServerConfig;
//! use liftlog::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("liftlog configured with port: HTTP={}", config.http_port);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod database;
pub mod errors;
pub mod logging;
pub mod models;
pub mod routes;
pub mod session;
