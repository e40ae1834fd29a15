// ABOUTME: Template route handlers for workout template CRUD
// ABOUTME: Exposes list, detail, create, full-replace update, and delete endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! Template routes
//!
//! Update replaces the template's exercises and sets wholesale, matching
//! the manager's delete-then-reinsert semantics.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::templates::{TemplateExerciseInput, TemplatesManager};
use crate::errors::AppError;

use super::{require_user, ServerResources};

/// Request body for template create and update
#[derive(Deserialize)]
struct SaveTemplateRequest {
    name: String,
    #[serde(default)]
    exercises: Vec<TemplateExerciseInput>,
}

/// Template routes
pub struct TemplateRoutes;

impl TemplateRoutes {
    /// Create all template routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/templates", get(Self::handle_list))
            .route("/templates", post(Self::handle_create))
            .route("/templates/:id", get(Self::handle_get))
            .route("/templates/:id", put(Self::handle_update))
            .route("/templates/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;
        let manager = TemplatesManager::new(resources.database.pool().clone());
        let templates = manager.list(user_id).await?;
        Ok((StatusCode::OK, Json(templates)).into_response())
    }

    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(template_id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;
        let manager = TemplatesManager::new(resources.database.pool().clone());
        let template = manager
            .get(template_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Template {template_id} not found")))?;
        Ok((StatusCode::OK, Json(template)).into_response())
    }

    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<SaveTemplateRequest>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;
        let manager = TemplatesManager::new(resources.database.pool().clone());
        let template = manager
            .create(user_id, &request.name, &request.exercises)
            .await?;
        Ok((StatusCode::CREATED, Json(template)).into_response())
    }

    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(template_id): Path<Uuid>,
        Json(request): Json<SaveTemplateRequest>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;
        let manager = TemplatesManager::new(resources.database.pool().clone());
        let template = manager
            .update(template_id, user_id, &request.name, &request.exercises)
            .await?;
        Ok((StatusCode::OK, Json(template)).into_response())
    }

    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(template_id): Path<Uuid>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;
        let manager = TemplatesManager::new(resources.database.pool().clone());
        manager.delete(template_id, user_id).await?;
        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }
}
