// ABOUTME: Database operations for completed workout logs
// ABOUTME: Persists finished sessions and computes history, summary stats, and chart metrics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! # Workout Logs
//!
//! The workout-log service: accepts a completed workout (template
//! reference, start/finish timestamps, ordered exercises with ordered
//! sets) and persists it atomically; reads back paginated history,
//! aggregate summary statistics, and per-exercise metric series for the
//! external chart renderer.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::session::{CompletedWorkout, WorkoutExercise, WorkoutSet};

use super::{parse_timestamp, parse_uuid};

/// Default page size for history listings
pub const DEFAULT_HISTORY_LIMIT: u32 = 52;

/// Workout log list entry with exercise count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutLogSummary {
    /// Unique identifier
    pub id: Uuid,
    /// Originating template, if any
    pub template_id: Option<Uuid>,
    /// Start timestamp
    pub started_at: DateTime<Utc>,
    /// Finish timestamp
    pub finished_at: DateTime<Utc>,
    /// Number of exercises performed
    pub exercise_count: u32,
}

/// Full workout log detail with ordered exercises and sets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutLogDetail {
    /// Unique identifier
    pub id: Uuid,
    /// Originating template, if any
    pub template_id: Option<Uuid>,
    /// Start timestamp
    pub started_at: DateTime<Utc>,
    /// Finish timestamp
    pub finished_at: DateTime<Utc>,
    /// Ordered exercises with their sets
    pub exercises: Vec<WorkoutExercise>,
}

/// Aggregate statistics across a user's workout history
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of logged workouts
    pub total_workouts: u64,
    /// Number of completed sets across all workouts
    pub total_sets: u64,
    /// Total volume (sum of weight x reps over completed sets)
    pub total_volume: f64,
}

/// Metric computed per history point for chart series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    /// Number of sets performed
    TotalSets,
    /// Best single-set volume (weight x reps)
    MaxVolume,
}

impl MetricType {
    /// Convert to wire/database string representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TotalSets => "total_sets",
            Self::MaxVolume => "max_volume",
        }
    }

    /// Parse from string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "total_sets" => Some(Self::TotalSets),
            "max_volume" => Some(Self::MaxVolume),
            _ => None,
        }
    }
}

/// How history points are bucketed on the chart's x axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XAxisMode {
    /// One point per workout session
    Session,
    /// One point per calendar date
    Date,
}

impl XAxisMode {
    /// Convert to wire/database string representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Date => "date",
        }
    }

    /// Parse from string representation
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "session" => Some(Self::Session),
            "date" => Some(Self::Date),
            _ => None,
        }
    }
}

/// A labeled numeric series, oldest point first, for the chart renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSeries {
    /// Point labels (session numbers or dates)
    pub labels: Vec<String>,
    /// Point values
    pub values: Vec<f64>,
}

/// Most recent logged values for an exercise, used to pre-fill defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentExerciseData {
    /// Set count in the most recent session
    pub sets: u32,
    /// Weight of that session's first set
    pub weight: f64,
    /// Reps of that session's first set
    pub reps: u32,
    /// Rest period used
    pub rest_seconds: u32,
}

/// Manager for workout log operations
#[derive(Clone)]
pub struct WorkoutLogsManager {
    pool: SqlitePool,
}

impl WorkoutLogsManager {
    /// Create a manager over the shared pool
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a completed workout with its exercises and sets
    ///
    /// The log row, exercise rows, and set rows are written in one
    /// transaction; a failure leaves nothing behind.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the workout has no exercises, or a
    /// database error if any insert fails.
    pub async fn create(&self, user_id: Uuid, workout: &CompletedWorkout) -> AppResult<Uuid> {
        if workout.exercises.is_empty() {
            return Err(AppError::invalid_input(
                "A workout log needs at least one exercise",
            ));
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
            INSERT INTO workout_logs (id, user_id, template_id, started_at, finished_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(workout.template_id.map(|t| t.to_string()))
        .bind(workout.started_at.to_rfc3339())
        .bind(workout.finished_at.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to create workout log: {e}")))?;

        for (order, exercise) in workout.exercises.iter().enumerate() {
            let exercise_row_id = Uuid::new_v4();
            sqlx::query(
                r"
                INSERT INTO workout_log_exercises
                    (id, workout_log_id, exercise_id, name, category, order_index, rest_seconds)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ",
            )
            .bind(exercise_row_id.to_string())
            .bind(id.to_string())
            .bind(exercise.exercise_id.to_string())
            .bind(&exercise.name)
            .bind(&exercise.category)
            .bind(order as i64)
            .bind(i64::from(exercise.rest_seconds))
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to log exercise: {e}")))?;

            for set in &exercise.sets {
                sqlx::query(
                    r"
                    INSERT INTO workout_log_sets
                        (id, workout_log_exercise_id, set_number, weight, reps, is_done)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    ",
                )
                .bind(Uuid::new_v4().to_string())
                .bind(exercise_row_id.to_string())
                .bind(i64::from(set.set_number))
                .bind(set.weight)
                .bind(i64::from(set.reps))
                .bind(set.is_done)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::database(format!("Failed to log set: {e}")))?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit workout log: {e}")))?;
        Ok(id)
    }

    /// List a user's workout history, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(
        &self,
        user_id: Uuid,
        limit: u32,
        offset: u32,
    ) -> AppResult<Vec<WorkoutLogSummary>> {
        let rows = sqlx::query(
            r"
            SELECT wl.id, wl.template_id, wl.started_at, wl.finished_at,
                   (SELECT COUNT(*) FROM workout_log_exercises we
                    WHERE we.workout_log_id = wl.id) AS exercise_count
            FROM workout_logs wl
            WHERE wl.user_id = $1
            ORDER BY wl.started_at DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(user_id.to_string())
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list workout logs: {e}")))?;

        rows.iter().map(row_to_summary).collect()
    }

    /// Get one workout log with its ordered exercises and sets
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn get(
        &self,
        workout_log_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<WorkoutLogDetail>> {
        let Some(row) = sqlx::query(
            r"
            SELECT id, template_id, started_at, finished_at
            FROM workout_logs
            WHERE id = $1 AND user_id = $2
            ",
        )
        .bind(workout_log_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get workout log: {e}")))?
        else {
            return Ok(None);
        };

        let exercise_rows = sqlx::query(
            r"
            SELECT id, exercise_id, name, category, order_index, rest_seconds
            FROM workout_log_exercises
            WHERE workout_log_id = $1
            ORDER BY order_index ASC
            ",
        )
        .bind(workout_log_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get logged exercises: {e}")))?;

        let mut exercises = Vec::with_capacity(exercise_rows.len());
        for exercise_row in &exercise_rows {
            let exercise_row_id: String = exercise_row.get("id");
            let set_rows = sqlx::query(
                r"
                SELECT set_number, weight, reps, is_done
                FROM workout_log_sets
                WHERE workout_log_exercise_id = $1
                ORDER BY set_number ASC
                ",
            )
            .bind(&exercise_row_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get logged sets: {e}")))?;

            let exercise_id: String = exercise_row.get("exercise_id");
            exercises.push(WorkoutExercise {
                exercise_id: parse_uuid(&exercise_id)?,
                name: exercise_row.get("name"),
                category: exercise_row.get("category"),
                order: exercise_row.get::<i64, _>("order_index") as u32,
                rest_seconds: exercise_row.get::<i64, _>("rest_seconds") as u32,
                sets: set_rows
                    .iter()
                    .map(|set_row| WorkoutSet {
                        set_number: set_row.get::<i64, _>("set_number") as u32,
                        weight: set_row.get("weight"),
                        reps: set_row.get::<i64, _>("reps") as u32,
                        is_done: set_row.get::<i64, _>("is_done") != 0,
                    })
                    .collect(),
            });
        }

        let id: String = row.get("id");
        let template_id: Option<String> = row.get("template_id");
        let started_at: String = row.get("started_at");
        let finished_at: String = row.get("finished_at");
        Ok(Some(WorkoutLogDetail {
            id: parse_uuid(&id)?,
            template_id: template_id.as_deref().map(parse_uuid).transpose()?,
            started_at: parse_timestamp(&started_at)?,
            finished_at: parse_timestamp(&finished_at)?,
            exercises,
        }))
    }

    /// Aggregate statistics across all of a user's workouts
    ///
    /// Sets and volume count completed sets only; a set logged not-done
    /// was skipped, not performed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn summary_stats(&self, user_id: Uuid) -> AppResult<SummaryStats> {
        let row = sqlx::query(
            r"
            SELECT
                (SELECT COUNT(*) FROM workout_logs WHERE user_id = $1) AS total_workouts,
                COUNT(ws.id) AS total_sets,
                COALESCE(SUM(ws.weight * ws.reps), 0.0) AS total_volume
            FROM workout_log_sets ws
            JOIN workout_log_exercises we ON we.id = ws.workout_log_exercise_id
            JOIN workout_logs wl ON wl.id = we.workout_log_id
            WHERE wl.user_id = $1 AND ws.is_done = 1
            ",
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to compute summary stats: {e}")))?;

        Ok(SummaryStats {
            total_workouts: row.get::<i64, _>("total_workouts") as u64,
            total_sets: row.get::<i64, _>("total_sets") as u64,
            total_volume: row.get("total_volume"),
        })
    }

    /// Compute a chart series for one exercise
    ///
    /// History points are the user's most recent `limit` sessions (or
    /// dates) containing the exercise; the series comes back oldest
    /// first, labeled `Session N` or by calendar date. Completed sets
    /// only, the same definition [`Self::summary_stats`] uses.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn exercise_metrics(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
        metric: MetricType,
        mode: XAxisMode,
        limit: u32,
    ) -> AppResult<MetricSeries> {
        let rows = sqlx::query(
            r"
            SELECT wl.id AS workout_id, wl.started_at, ws.weight, ws.reps
            FROM workout_log_sets ws
            JOIN workout_log_exercises we ON we.id = ws.workout_log_exercise_id
            JOIN workout_logs wl ON wl.id = we.workout_log_id
            WHERE wl.user_id = $1 AND we.exercise_id = $2 AND ws.is_done = 1
            ORDER BY wl.started_at DESC
            ",
        )
        .bind(user_id.to_string())
        .bind(exercise_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch exercise history: {e}")))?;

        // Bucket sets by session or by calendar date, newest first as
        // fetched; BTreeMap keyed by (started_at, bucket id) keeps the
        // buckets ordered for the final oldest-first series.
        let mut buckets: BTreeMap<(String, String), (u64, f64)> = BTreeMap::new();
        for row in &rows {
            let workout_id: String = row.get("workout_id");
            let started_at: String = row.get("started_at");
            let weight: f64 = row.get("weight");
            let reps: i64 = row.get("reps");

            let key = match mode {
                XAxisMode::Session => (started_at, workout_id),
                XAxisMode::Date => {
                    let date = started_at.chars().take(10).collect::<String>();
                    (date.clone(), date)
                }
            };
            let entry = buckets.entry(key).or_insert((0, 0.0));
            entry.0 += 1;
            let volume = weight * reps as f64;
            if volume > entry.1 {
                entry.1 = volume;
            }
        }

        // Keep only the most recent `limit` buckets, then emit oldest
        // first.
        let skip = buckets.len().saturating_sub(limit as usize);
        let mut labels = Vec::new();
        let mut values = Vec::new();
        for (index, ((sort_key, _), (total_sets, max_volume))) in
            buckets.into_iter().skip(skip).enumerate()
        {
            let label = match mode {
                XAxisMode::Session => format!("Session {}", index + 1),
                XAxisMode::Date => sort_key,
            };
            labels.push(label);
            values.push(match metric {
                MetricType::TotalSets => total_sets as f64,
                MetricType::MaxVolume => max_volume,
            });
        }

        Ok(MetricSeries { labels, values })
    }

    /// Most recent logged values for an exercise, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn recent_exercise_data(
        &self,
        user_id: Uuid,
        exercise_id: Uuid,
    ) -> AppResult<Option<RecentExerciseData>> {
        let Some(row) = sqlx::query(
            r"
            SELECT we.id, we.rest_seconds
            FROM workout_log_exercises we
            JOIN workout_logs wl ON wl.id = we.workout_log_id
            WHERE wl.user_id = $1 AND we.exercise_id = $2
            ORDER BY wl.started_at DESC
            LIMIT 1
            ",
        )
        .bind(user_id.to_string())
        .bind(exercise_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch recent exercise: {e}")))?
        else {
            return Ok(None);
        };

        let exercise_row_id: String = row.get("id");
        let set_rows = sqlx::query(
            r"
            SELECT weight, reps FROM workout_log_sets
            WHERE workout_log_exercise_id = $1
            ORDER BY set_number ASC
            ",
        )
        .bind(&exercise_row_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch recent sets: {e}")))?;

        let (weight, reps) = set_rows
            .first()
            .map_or((0.0, 0), |r| (r.get("weight"), r.get::<i64, _>("reps") as u32));

        Ok(Some(RecentExerciseData {
            sets: set_rows.len() as u32,
            weight,
            reps,
            rest_seconds: row.get::<i64, _>("rest_seconds") as u32,
        }))
    }
}

fn row_to_summary(row: &SqliteRow) -> AppResult<WorkoutLogSummary> {
    let id: String = row.get("id");
    let template_id: Option<String> = row.get("template_id");
    let started_at: String = row.get("started_at");
    let finished_at: String = row.get("finished_at");
    Ok(WorkoutLogSummary {
        id: parse_uuid(&id)?,
        template_id: template_id.as_deref().map(parse_uuid).transpose()?,
        started_at: parse_timestamp(&started_at)?,
        finished_at: parse_timestamp(&finished_at)?,
        exercise_count: row.get::<i64, _>("exercise_count") as u32,
    })
}
