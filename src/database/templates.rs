// ABOUTME: Database operations for workout templates
// ABOUTME: CRUD over templates with ordered exercises and default sets; update is full replace
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! # Templates
//!
//! A template is a named, reusable definition of exercises and default
//! sets used to seed a workout. Updating a template replaces its
//! exercises and sets wholesale inside one transaction (delete then
//! reinsert); there is no incremental patching.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{
    ExerciseCategory, TemplateExercise, TemplateSet, TemplateSummary, TemplateWithExercises,
};

use super::{parse_timestamp, parse_uuid};

/// One exercise in a create/update template request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateExerciseInput {
    /// Library exercise to reference
    pub exercise_id: Uuid,
    /// Default rest period in seconds, if any
    pub default_rest_seconds: Option<u32>,
    /// Ordered default sets
    pub sets: Vec<TemplateSetInput>,
}

/// One default set in a create/update template request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSetInput {
    /// Default weight in kilograms
    pub weight: f64,
    /// Default repetition count
    pub reps: u32,
}

/// Manager for template operations
#[derive(Clone)]
pub struct TemplatesManager {
    pool: SqlitePool,
}

impl TemplatesManager {
    /// Create a manager over the shared pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List a user's templates with exercise counts, name-ascending
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<TemplateSummary>> {
        let rows = sqlx::query(
            r"
            SELECT t.id, t.name, t.created_at, t.updated_at,
                   (SELECT COUNT(*) FROM template_exercises te
                    WHERE te.template_id = t.id) AS exercise_count
            FROM templates t
            WHERE t.user_id = $1
            ORDER BY t.name ASC
            ",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list templates: {e}")))?;

        rows.iter().map(row_to_summary).collect()
    }

    /// Get a template with its ordered exercises and sets
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get(
        &self,
        template_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<TemplateWithExercises>> {
        let Some(row) = sqlx::query(
            r"
            SELECT id, name, created_at, updated_at
            FROM templates
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(template_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get template: {e}")))?
        else {
            return Ok(None);
        };

        let exercise_rows = sqlx::query(
            r"
            SELECT te.id, te.exercise_id, te.order_index, te.default_rest_seconds,
                   e.name, e.category
            FROM template_exercises te
            JOIN exercises e ON e.id = te.exercise_id
            WHERE te.template_id = $1
            ORDER BY te.order_index ASC
            ",
        )
        .bind(template_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get template exercises: {e}")))?;

        let mut exercises = Vec::with_capacity(exercise_rows.len());
        for exercise_row in &exercise_rows {
            let template_exercise_id: String = exercise_row.get("id");
            let set_rows = sqlx::query(
                r"
                SELECT set_number, weight, reps
                FROM template_sets
                WHERE template_exercise_id = $1
                ORDER BY set_number ASC
                ",
            )
            .bind(&template_exercise_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get template sets: {e}")))?;

            let exercise_id: String = exercise_row.get("exercise_id");
            let category: String = exercise_row.get("category");
            exercises.push(TemplateExercise {
                exercise_id: parse_uuid(&exercise_id)?,
                name: exercise_row.get("name"),
                category: ExerciseCategory::parse(&category),
                order: exercise_row.get::<i64, _>("order_index") as u32,
                default_rest_seconds: exercise_row
                    .get::<Option<i64>, _>("default_rest_seconds")
                    .map(|v| v as u32),
                sets: set_rows
                    .iter()
                    .map(|set_row| TemplateSet {
                        set_number: set_row.get::<i64, _>("set_number") as u32,
                        weight: set_row.get("weight"),
                        reps: set_row.get::<i64, _>("reps") as u32,
                    })
                    .collect(),
            });
        }

        let id: String = row.get("id");
        let created_at: String = row.get("created_at");
        let updated_at: String = row.get("updated_at");
        Ok(Some(TemplateWithExercises {
            id: parse_uuid(&id)?,
            name: row.get("name"),
            exercises,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        }))
    }

    /// Whether a template exists for this user
    ///
    /// Used when restoring a backup to detect a template deleted since
    /// the workout started.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn exists(&self, template_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        let row = sqlx::query("SELECT 1 FROM templates WHERE id = $1 AND user_id = $2")
            .bind(template_id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to check template: {e}")))?;
        Ok(row.is_some())
    }

    /// Create a template with its exercises and sets in one transaction
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name, or a database error
    /// if any insert fails (nothing is persisted in that case).
    pub async fn create(
        &self,
        user_id: Uuid,
        name: &str,
        exercises: &[TemplateExerciseInput],
    ) -> AppResult<TemplateSummary> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::missing_field("Template name is required"));
        }

        let id = Uuid::new_v4();
        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to start transaction: {e}")))?;

        sqlx::query(
            r"
            INSERT INTO templates (id, user_id, name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(name)
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create template: {e}")))?;

        insert_exercises(&mut tx, id, exercises).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit template: {e}")))?;

        Ok(TemplateSummary {
            id,
            name: name.to_owned(),
            exercise_count: exercises.len() as u32,
            created_at: now,
            updated_at: now,
        })
    }

    /// Replace a template's name, exercises, and sets in one transaction
    ///
    /// The exercise list is deleted and reinserted; set-level cascades
    /// follow the exercise rows.
    ///
    /// # Errors
    ///
    /// Returns not-found when the template does not belong to the user, a
    /// validation error for an empty name, or a database error on failure.
    pub async fn update(
        &self,
        template_id: Uuid,
        user_id: Uuid,
        name: &str,
        exercises: &[TemplateExerciseInput],
    ) -> AppResult<TemplateSummary> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::missing_field("Template name is required"));
        }

        let now = Utc::now();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to start transaction: {e}")))?;

        let result = sqlx::query(
            r"
            UPDATE templates SET name = $1, updated_at = $2
            WHERE id = $3 AND user_id = $4
            ",
        )
        .bind(name)
        .bind(now.to_rfc3339())
        .bind(template_id.to_string())
        .bind(user_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to update template: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Template {template_id} not found"
            )));
        }

        sqlx::query("DELETE FROM template_exercises WHERE template_id = $1")
            .bind(template_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to replace exercises: {e}")))?;

        insert_exercises(&mut tx, template_id, exercises).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit template: {e}")))?;

        let created_at = self.created_at(template_id).await.unwrap_or(now);
        Ok(TemplateSummary {
            id: template_id,
            name: name.to_owned(),
            exercise_count: exercises.len() as u32,
            created_at,
            updated_at: now,
        })
    }

    /// Delete a user's template; exercises and sets cascade
    ///
    /// # Errors
    ///
    /// Returns not-found when the template does not belong to the user,
    /// or a database error on failure.
    pub async fn delete(&self, template_id: Uuid, user_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM templates WHERE id = $1 AND user_id = $2")
            .bind(template_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete template: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Template {template_id} not found"
            )));
        }
        Ok(())
    }

    async fn created_at(&self, template_id: Uuid) -> Option<chrono::DateTime<Utc>> {
        let row = sqlx::query("SELECT created_at FROM templates WHERE id = $1")
            .bind(template_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .ok()??;
        let created_at: String = row.get("created_at");
        parse_timestamp(&created_at).ok()
    }
}

async fn insert_exercises(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    template_id: Uuid,
    exercises: &[TemplateExerciseInput],
) -> AppResult<()> {
    for (order, exercise) in exercises.iter().enumerate() {
        let template_exercise_id = Uuid::new_v4();
        sqlx::query(
            r"
            INSERT INTO template_exercises
                (id, template_id, exercise_id, order_index, default_rest_seconds)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(template_exercise_id.to_string())
        .bind(template_id.to_string())
        .bind(exercise.exercise_id.to_string())
        .bind(order as i64)
        .bind(exercise.default_rest_seconds.map(i64::from))
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert template exercise: {e}")))?;

        for (position, set) in exercise.sets.iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO template_sets (id, template_exercise_id, set_number, weight, reps)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(template_exercise_id.to_string())
            .bind(position as i64 + 1)
            .bind(set.weight)
            .bind(i64::from(set.reps))
            .execute(&mut **tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to insert template set: {e}")))?;
        }
    }
    Ok(())
}

fn row_to_summary(row: &SqliteRow) -> AppResult<TemplateSummary> {
    let id: String = row.get("id");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");
    Ok(TemplateSummary {
        id: parse_uuid(&id)?,
        name: row.get("name"),
        exercise_count: row.get::<i64, _>("exercise_count") as u32,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
