// ABOUTME: User chart configuration route handlers
// ABOUTME: Exposes list, create, and delete endpoints for dashboard charts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! User chart routes

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::database::charts::UserChartsManager;
use crate::database::workouts::{MetricType, XAxisMode};
use crate::errors::AppError;

use super::{require_user, ServerResources};

/// Request body for chart creation
#[derive(Deserialize)]
struct CreateChartRequest {
    exercise_id: Option<Uuid>,
    metric_type: Option<String>,
    x_axis_mode: Option<String>,
}

/// User chart routes
pub struct ChartRoutes;

impl ChartRoutes {
    /// Create all chart routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/charts", get(Self::handle_list))
            .route("/charts", post(Self::handle_create))
            .route("/charts/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;
        let manager = UserChartsManager::new(resources.database.pool().clone());
        let charts = manager.list(user_id).await?;
        Ok((StatusCode::OK, Json(charts)).into_response())
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateChartRequest>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;

        let exercise_id = request
            .exercise_id
            .ok_or_else(|| AppError::missing_field("Please select an exercise"))?;
        let metric_type = request
            .metric_type
            .as_deref()
            .and_then(MetricType::parse)
            .ok_or_else(|| AppError::missing_field("Please select a metric type"))?;
        let x_axis_mode = request
            .x_axis_mode
            .as_deref()
            .and_then(XAxisMode::parse)
            .ok_or_else(|| AppError::missing_field("Please select an x-axis mode"))?;

        let manager = UserChartsManager::new(resources.database.pool().clone());
        let id = manager
            .create(user_id, exercise_id, metric_type, x_axis_mode)
            .await?;
        Ok((StatusCode::CREATED, Json(json!({ "id": id }))).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(chart_id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;
        let manager = UserChartsManager::new(resources.database.pool().clone());
        manager.delete(chart_id, user_id).await?;
        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }
}
