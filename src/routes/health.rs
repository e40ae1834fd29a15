// ABOUTME: Health check route for the liftlog server
// ABOUTME: Reports service name, version, and status for probes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

/// Health check routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health route
    #[must_use]
    pub fn routes() -> Router {
        Router::new().route("/health", get(Self::handle_health))
    }

    async fn handle_health() -> Response {
        let body = json!({
            "status": "ok",
            "service": "liftlog",
            "version": env!("CARGO_PKG_VERSION"),
        });
        (StatusCode::OK, Json(body)).into_response()
    }
}
