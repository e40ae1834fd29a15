// ABOUTME: Backup slot route handlers for active workout crash recovery
// ABOUTME: Loads, saves, and clears the caller's single backup slot
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! Backup slot routes
//!
//! One slot per user. Loading validates the backed-up workout's template
//! still exists; a backup referencing a deleted template is discarded
//! with a warning rather than restored into a dead end.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::database::templates::TemplatesManager;
use crate::errors::AppError;
use crate::session::diff::TemplateSnapshot;
use crate::session::ActiveWorkout;

use super::{require_user, ServerResources};

/// Request body for saving a backup
#[derive(Deserialize)]
struct SaveBackupRequest {
    active_workout: ActiveWorkout,
    #[serde(default)]
    template_snapshot: Option<TemplateSnapshot>,
}

/// Backup slot routes
pub struct BackupRoutes;

impl BackupRoutes {
    /// Create all backup routes
    #[must_use]
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/backup", get(Self::handle_load))
            .route("/backup", put(Self::handle_save))
            .route("/backup", delete(Self::handle_clear))
            .with_state(resources)
    }

    async fn handle_load(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;

        let Some(record) = resources.backups.load(user_id) else {
            return Ok((StatusCode::OK, Json(json!({ "backup": null }))).into_response());
        };

        // A backup for a template that has since been deleted cannot be
        // resumed; drop it and tell the caller why.
        if let Some(template_id) = record.active_workout.template_id {
            let manager = TemplatesManager::new(resources.database.pool().clone());
            if !manager.exists(template_id, user_id).await? {
                resources.backups.clear(user_id)?;
                info!(user_id = %user_id, template_id = %template_id, "discarded backup for deleted template");
                return Ok((
                    StatusCode::OK,
                    Json(json!({
                        "backup": null,
                        "warning": "Workout discarded because its template was deleted",
                    })),
                )
                    .into_response());
            }
        }

        Ok((StatusCode::OK, Json(json!({ "backup": record }))).into_response())
    }

    async fn handle_save(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<SaveBackupRequest>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;
        resources.backups.save(
            user_id,
            &request.active_workout,
            request.template_snapshot.as_ref(),
        )?;
        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }

    async fn handle_clear(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;
        resources.backups.clear(user_id)?;
        Ok((StatusCode::NO_CONTENT, ()).into_response())
    }
}
