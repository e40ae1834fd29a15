// ABOUTME: Database operations for user dashboard chart configurations
// ABOUTME: CRUD over per-user chart definitions joined with exercise names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! # User Charts
//!
//! A chart configuration names an exercise, a metric, and an x-axis mode;
//! the dashboard resolves each one into a series via
//! [`super::workouts::WorkoutLogsManager::exercise_metrics`] and hands the
//! result to the external renderer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::ExerciseCategory;

use super::workouts::{MetricType, XAxisMode};
use super::{parse_timestamp, parse_uuid};

/// A user's chart configuration, joined with the exercise it tracks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserChart {
    /// Unique identifier
    pub id: Uuid,
    /// Exercise the chart tracks
    pub exercise_id: Uuid,
    /// Exercise display name
    pub exercise_name: String,
    /// Exercise category
    pub exercise_category: ExerciseCategory,
    /// Metric plotted on the y axis
    pub metric_type: MetricType,
    /// X-axis bucketing mode
    pub x_axis_mode: XAxisMode,
    /// Dashboard position
    pub order: u32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Manager for user chart configurations
#[derive(Clone)]
pub struct UserChartsManager {
    pool: SqlitePool,
}

impl UserChartsManager {
    /// Create a manager over the shared pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List a user's charts in dashboard order
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<UserChart>> {
        let rows = sqlx::query(
            r"
            SELECT c.id, c.exercise_id, c.metric_type, c.x_axis_mode, c.order_index,
                   c.created_at, e.name, e.category
            FROM user_charts c
            JOIN exercises e ON e.id = c.exercise_id
            WHERE c.user_id = $1
            ORDER BY c.order_index ASC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list charts: {e}")))?;

        rows.iter().map(row_to_chart).collect()
    }

    /// Create a chart configuration at the end of the dashboard
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn create(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
        metric_type: MetricType,
        x_axis_mode: XAxisMode,
    ) -> AppResult<Uuid> {
        let next_order = sqlx::query(
            "SELECT COALESCE(MAX(order_index) + 1, 0) AS next FROM user_charts WHERE user_id = $1",
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to place chart: {e}")))?
        .get::<i64, _>("next");

        let id = Uuid::new_v4();
        sqlx::query(
            r"
            INSERT INTO user_charts
                (id, user_id, exercise_id, metric_type, x_axis_mode, order_index, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(exercise_id.to_string())
        .bind(metric_type.as_str())
        .bind(x_axis_mode.as_str())
        .bind(next_order)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create chart: {e}")))?;

        Ok(id)
    }

    /// Delete a user's chart configuration
    ///
    /// # Errors
    ///
    /// Returns not-found when the chart does not belong to the user, or a
    /// database error on failure.
    pub async fn delete(&self, chart_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM user_charts WHERE id = $1 AND user_id = $2")
            .bind(chart_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete chart: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Chart {chart_id} not found")));
        }
        Ok(())
    }
}

fn row_to_chart(row: &SqliteRow) -> AppResult<UserChart> {
    let id: String = row.get("id");
    let exercise_id: String = row.get("exercise_id");
    let metric_type: String = row.get("metric_type");
    let x_axis_mode: String = row.get("x_axis_mode");
    let category: String = row.get("category");
    let created_at: String = row.get("created_at");

    Ok(UserChart {
        id: parse_uuid(&id)?,
        exercise_id: parse_uuid(&exercise_id)?,
        exercise_name: row.get("name"),
        exercise_category: ExerciseCategory::parse(&category),
        metric_type: MetricType::parse(&metric_type)
            .ok_or_else(|| AppError::database(format!("Invalid metric type: {metric_type}")))?,
        x_axis_mode: XAxisMode::parse(&x_axis_mode)
            .ok_or_else(|| AppError::database(format!("Invalid x-axis mode: {x_axis_mode}")))?,
        order: row.get::<i64, _>("order_index") as u32,
        created_at: parse_timestamp(&created_at)?,
    })
}
