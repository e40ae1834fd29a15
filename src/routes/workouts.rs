// ABOUTME: Workout log route handlers for history and persistence
// ABOUTME: Exposes create, paginated list, detail, and summary statistics endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! Workout log routes
//!
//! Saving a finished workout clears the caller's backup slot: the session
//! it mirrored no longer exists.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::database::workouts::{WorkoutLogsManager, DEFAULT_HISTORY_LIMIT};
use crate::errors::AppError;
use crate::session::CompletedWorkout;

use super::{require_user, ServerResources};

/// Query parameters for history pagination
#[derive(Deserialize, Default)]
struct HistoryQuery {
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    offset: Option<u32>,
}

/// Workout log routes
pub struct WorkoutRoutes;

impl WorkoutRoutes {
    /// Create all workout log routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/workouts", post(Self::handle_create))
            .route("/workouts", get(Self::handle_list))
            .route("/workouts/stats", get(Self::handle_stats))
            .route("/workouts/:id", get(Self::handle_get))
            .with_state(resources)
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(workout): Json<CompletedWorkout>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;
        let manager = WorkoutLogsManager::new(resources.database.pool().clone());
        let id = manager.create(user_id, &workout).await?;

        // The saved session's backup is stale now; a failure to clear it
        // is logged but does not fail the save.
        if let Err(err) = resources.backups.clear(user_id) {
            warn!(user_id = %user_id, error = %err, "failed to clear backup after save");
        }

        Ok((StatusCode::CREATED, Json(json!({ "id": id }))).into_response())
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(params): Query<HistoryQuery>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;
        let manager = WorkoutLogsManager::new(resources.database.pool().clone());
        let logs = manager
            .list(
                user_id,
                params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT),
                params.offset.unwrap_or(0),
            )
            .await?;
        Ok((StatusCode::OK, Json(logs)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(workout_log_id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;
        let manager = WorkoutLogsManager::new(resources.database.pool().clone());
        let log = manager.get(workout_log_id, user_id).await?.ok_or_else(|| {
            AppError::not_found(format!("Workout log {workout_log_id} not found"))
        })?;
        Ok((StatusCode::OK, Json(log)).into_response())
    }

    async fn handle_stats(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;
        let manager = WorkoutLogsManager::new(resources.database.pool().clone());
        let stats = manager.summary_stats(user_id).await?;
        Ok((StatusCode::OK, Json(stats)).into_response())
    }
}
