// ABOUTME: HTTP route assembly and shared request plumbing for the liftlog server
// ABOUTME: Builds the axum router and extracts the caller identity from headers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! # HTTP Routes
//!
//! REST surface over the database managers and the backup store. Session
//! management is delegated (out of scope here); callers identify
//! themselves with an `x-user-id` header carrying their UUID, and every
//! manager call is additionally scoped by that id.

pub mod backups;
pub mod charts;
pub mod exercises;
pub mod health;
pub mod templates;
pub mod workouts;

use std::sync::Arc;

use axum::http::HeaderMap;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::database::Database;
use crate::errors::{AppError, AppResult};
use crate::session::BackupStore;

/// Shared state handed to every route handler
pub struct ServerResources {
    /// Database handle for the managers
    pub database: Database,
    /// Per-user workout backup slots
    pub backups: BackupStore,
}

impl ServerResources {
    /// Bundle the server's shared state
    #[must_use]
    pub const fn new(database: Database, backups: BackupStore) -> Self {
        Self { database, backups }
    }
}

/// Assemble the full application router
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(health::HealthRoutes::routes())
        .merge(exercises::ExerciseRoutes::routes(resources.clone()))
        .merge(templates::TemplateRoutes::routes(resources.clone()))
        .merge(workouts::WorkoutRoutes::routes(resources.clone()))
        .merge(charts::ChartRoutes::routes(resources.clone()))
        .merge(backups::BackupRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Extract the calling user's id from the `x-user-id` header
///
/// # Errors
///
/// Returns an authentication error when the header is missing or not a
/// valid UUID.
pub(crate) fn require_user(headers: &HeaderMap) -> AppResult<Uuid> {
    let value = headers
        .get("x-user-id")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::auth_invalid("Missing x-user-id header"))?;
    Uuid::parse_str(value).map_err(|_| AppError::auth_invalid("Invalid x-user-id header"))
}
