// ABOUTME: Exercise library route handlers
// ABOUTME: Lists, filters, and creates exercises; exposes picker categories and metrics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! Exercise library routes
//!
//! Listing accepts an optional `category` filter. Creation requires a
//! name and category; any category is accepted, including Cardio, even
//! though the picker filter list hides it.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::exercises::ExerciseLibraryManager;
use crate::database::workouts::{
    MetricType, WorkoutLogsManager, XAxisMode, DEFAULT_HISTORY_LIMIT,
};
use crate::errors::AppError;
use crate::models::ExerciseCategory;

use super::{require_user, ServerResources};

/// Query parameters for exercise listing
#[derive(Deserialize, Default)]
struct ListQuery {
    #[serde(default)]
    category: Option<String>,
}

/// Request body for exercise creation
#[derive(Deserialize)]
struct CreateExerciseRequest {
    name: String,
    category: Option<String>,
}

/// Query parameters for the metrics endpoint
#[derive(Deserialize, Default)]
struct MetricsQuery {
    #[serde(default)]
    metric: Option<String>,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    limit: Option<u32>,
}

/// Exercise library routes
pub struct ExerciseRoutes;

impl ExerciseRoutes {
    /// Create all exercise routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/exercises", get(Self::handle_list))
            .route("/exercises", post(Self::handle_create))
            .route("/exercises/categories", get(Self::handle_categories))
            .route("/exercises/:id/metrics", get(Self::handle_metrics))
            .route("/exercises/:id/recent", get(Self::handle_recent))
            .with_state(resources)
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(params): Query<ListQuery>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;
        let manager = ExerciseLibraryManager::new(resources.database.pool().clone());

        let exercises = match params.category.as_deref() {
            Some(raw) => {
                manager
                    .list_by_category(user_id, ExerciseCategory::parse(raw))
                    .await?
            }
            None => manager.list(user_id).await?,
        };
        Ok((StatusCode::OK, Json(exercises)).into_response())
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateExerciseRequest>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;
        let category = request
            .category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .map(ExerciseCategory::parse)
            .ok_or_else(|| AppError::missing_field("Exercise category is required"))?;

        let manager = ExerciseLibraryManager::new(resources.database.pool().clone());
        let exercise = manager.create(user_id, &request.name, category).await?;
        Ok((StatusCode::CREATED, Json(exercise)).into_response())
    }

    async fn handle_categories() -> Response {
        let categories: Vec<&str> = ExerciseCategory::picker_categories()
            .iter()
            .map(|c| c.as_str())
            .collect();
        (StatusCode::OK, Json(categories)).into_response()
    }

    async fn handle_metrics(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(exercise_id): Path<Uuid>,
        Query(params): Query<MetricsQuery>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;

        let metric = match params.metric.as_deref() {
            None => MetricType::TotalSets,
            Some(raw) => MetricType::parse(raw)
                .ok_or_else(|| AppError::invalid_input(format!("Unknown metric: {raw}")))?,
        };
        let mode = match params.mode.as_deref() {
            None => XAxisMode::Session,
            Some(raw) => XAxisMode::parse(raw)
                .ok_or_else(|| AppError::invalid_input(format!("Unknown x-axis mode: {raw}")))?,
        };
        let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);

        let manager = WorkoutLogsManager::new(resources.database.pool().clone());
        let series = manager
            .exercise_metrics(user_id, exercise_id, metric, mode, limit)
            .await?;
        Ok((StatusCode::OK, Json(series)).into_response())
    }

    async fn handle_recent(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(exercise_id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;
        let manager = WorkoutLogsManager::new(resources.database.pool().clone());
        let recent = manager.recent_exercise_data(user_id, exercise_id).await?;
        Ok((StatusCode::OK, Json(recent)).into_response())
    }
}
