// ABOUTME: Database operations for the exercise library
// ABOUTME: Lists system and user-created exercises and handles user exercise creation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! # Exercise Library
//!
//! The library holds system-provided exercises (visible to everyone) and
//! user-created ones (visible to their owner). Creation validates the
//! name and accepts any [`ExerciseCategory`], including Cardio, which the
//! picker filter later hides.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{Exercise, ExerciseCategory};

use super::{parse_timestamp, parse_uuid};

/// Manager for exercise library operations
#[derive(Clone)]
pub struct ExerciseLibraryManager {
    pool: SqlitePool,
}

impl ExerciseLibraryManager {
    /// Create a manager over the shared pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List exercises visible to a user, name-ascending
    ///
    /// Visible means system-provided or owned by the user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<Exercise>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, name, category, is_system, created_at
            FROM exercises
            WHERE is_system = 1 OR user_id = $1
            ORDER BY name ASC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list exercises: {e}")))?;

        rows.iter().map(row_to_exercise).collect()
    }

    /// List visible exercises in one category, name-ascending
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_by_category(
        &self,
        user_id: Uuid,
        category: ExerciseCategory,
    ) -> AppResult<Vec<Exercise>> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, name, category, is_system, created_at
            FROM exercises
            WHERE category = $1 AND (is_system = 1 OR user_id = $2)
            ORDER BY name ASC
            ",
        )
        .bind(category.as_str())
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list exercises: {e}")))?;

        rows.iter().map(row_to_exercise).collect()
    }

    /// Get one exercise visible to the user
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get(&self, exercise_id: Uuid, user_id: Uuid) -> AppResult<Option<Exercise>> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, name, category, is_system, created_at
            FROM exercises
            WHERE id = $1 AND (is_system = 1 OR user_id = $2)
            ",
        )
        .bind(exercise_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get exercise: {e}")))?;

        row.as_ref().map(row_to_exercise).transpose()
    }

    /// Create a user exercise
    ///
    /// The name is trimmed; user-created exercises are never system
    /// exercises.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name, or a database error
    /// if the insert fails.
    pub async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        category: ExerciseCategory,
    ) -> AppResult<Exercise> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::missing_field("Exercise name is required"));
        }

        let id = Uuid::new_v4();
        let now = Utc::now();
        sqlx::query(
            r"
            INSERT INTO exercises (id, user_id, name, category, is_system, created_at)
            VALUES ($1, $2, $3, $4, 0, $5)
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(name)
        .bind(category.as_str())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create exercise: {e}")))?;

        Ok(Exercise {
            id,
            user_id: Some(user_id),
            name: name.to_owned(),
            category,
            is_system: false,
            created_at: now,
        })
    }

    /// Insert a system exercise, used for seeding
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_system(
        &self,
        name: &str,
        category: ExerciseCategory,
    ) -> AppResult<Exercise> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        sqlx::query(
            r"
            INSERT INTO exercises (id, user_id, name, category, is_system, created_at)
            VALUES ($1, NULL, $2, $3, 1, $4)
            ",
        )
        .bind(id.to_string())
        .bind(name)
        .bind(category.as_str())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create system exercise: {e}")))?;

        Ok(Exercise {
            id,
            user_id: None,
            name: name.to_owned(),
            category,
            is_system: true,
            created_at: now,
        })
    }
}

fn row_to_exercise(row: &SqliteRow) -> AppResult<Exercise> {
    let id: String = row.get("id");
    let user_id: Option<String> = row.get("user_id");
    let category: String = row.get("category");
    let created_at: String = row.get("created_at");

    Ok(Exercise {
        id: parse_uuid(&id)?,
        user_id: user_id.as_deref().map(parse_uuid).transpose()?,
        name: row.get("name"),
        category: ExerciseCategory::parse(&category),
        is_system: row.get::<i64, _>("is_system") != 0,
        created_at: parse_timestamp(&created_at)?,
    })
}
