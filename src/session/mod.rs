// ABOUTME: Active workout session state machine and finish/cancel protocol
// ABOUTME: Owns the in-progress workout, its rest timer, and the template snapshot
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! # Active Workout Session
//!
//! The mutable in-progress workout derived from a template. The session
//! owns three pieces of state and keeps them consistent:
//!
//! - the [`ActiveWorkout`] being performed (exercises, sets, completion
//!   flags),
//! - the single [`RestTimer`] coordinated with set completion,
//! - the immutable [`TemplateSnapshot`] captured at start for change
//!   detection at finish time.
//!
//! The session is single-threaded and event-driven: every mutation happens
//! on the owner's call stack, and the once-per-second timer tick is just
//! another method call. Persistence (the workout-log service, the backup
//! store) is the caller's concern; the session hands out a
//! [`CompletedWorkout`] at finish time and resets once the caller reports
//! the save succeeded.

pub mod backup;
pub mod diff;
pub mod timer;

pub use backup::{BackupRecord, BackupStore, SyncAction};
pub use diff::{has_template_changes, SnapshotExercise, TemplateSnapshot};
pub use timer::{RestTimer, TimerEvent, TimerState};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{Exercise, TemplateWithExercises, DEFAULT_REST_SECONDS};

/// Default set count for an exercise added mid-workout
const ADDED_EXERCISE_SETS: u32 = 3;
/// Default rep count when a set has no predecessor to copy from
const DEFAULT_REPS: u32 = 10;

/// A single set within an active workout exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    /// 1-based position within the exercise; dense after any deletion
    pub set_number: u32,
    /// Weight in kilograms
    pub weight: f64,
    /// Repetition count
    pub reps: u32,
    /// Whether the set has been completed
    pub is_done: bool,
}

/// An exercise being tracked in the active workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    /// Library exercise this entry references
    pub exercise_id: Uuid,
    /// Display name
    pub name: String,
    /// Category name (denormalized for display)
    pub category: String,
    /// 0-based position within the workout
    pub order: u32,
    /// Rest period started when a set is marked done
    pub rest_seconds: u32,
    /// Ordered sets; never empty once created
    pub sets: Vec<WorkoutSet>,
}

/// The in-progress workout owned by a [`WorkoutSession`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveWorkout {
    /// Originating template, if the workout was started from one
    pub template_id: Option<Uuid>,
    /// Template name for display
    pub template_name: String,
    /// Start timestamp; `None` until a workout begins
    pub started_at: Option<DateTime<Utc>>,
    /// Ordered exercises
    pub exercises: Vec<WorkoutExercise>,
}

impl ActiveWorkout {
    /// The empty, not-started workout
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            template_id: None,
            template_name: String::new(),
            started_at: None,
            exercises: Vec::new(),
        }
    }

    /// Whether the workout has been started
    #[must_use]
    pub const fn has_started(&self) -> bool {
        self.started_at.is_some()
    }
}

impl Default for ActiveWorkout {
    fn default() -> Self {
        Self::empty()
    }
}

/// A finished workout ready for persistence to the workout-log service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedWorkout {
    /// Originating template, if any
    pub template_id: Option<Uuid>,
    /// Start timestamp
    pub started_at: DateTime<Utc>,
    /// Finish timestamp
    pub finished_at: DateTime<Utc>,
    /// Ordered exercises with their sets
    pub exercises: Vec<WorkoutExercise>,
}

/// Outcome of [`WorkoutSession::begin_finish`]
#[derive(Debug, Clone)]
pub struct FinishPlan {
    /// The workout data to persist
    pub workout: CompletedWorkout,
    /// Whether the caller should offer the update-template choice first
    pub needs_template_decision: bool,
}

/// Owns and mutates the active workout state
#[derive(Debug, Default)]
pub struct WorkoutSession {
    workout: ActiveWorkout,
    snapshot: Option<TemplateSnapshot>,
    timer: RestTimer,
    submitting: bool,
}

impl WorkoutSession {
    /// Create an empty session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current workout state
    #[must_use]
    pub const fn workout(&self) -> &ActiveWorkout {
        &self.workout
    }

    /// The template snapshot captured at start, if any
    #[must_use]
    pub const fn snapshot(&self) -> Option<&TemplateSnapshot> {
        self.snapshot.as_ref()
    }

    /// The session's rest timer state
    #[must_use]
    pub const fn timer(&self) -> &RestTimer {
        &self.timer
    }

    /// Whether a finish attempt is outstanding
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Start a workout from a template
    ///
    /// Builds the active workout from the template's exercises, defaulting
    /// each rest period from the template (falling back to 90 seconds) and
    /// marking every set not-done. Simultaneously captures a weights/reps
    /// snapshot for change detection at finish time.
    pub fn start_from_template(&mut self, template: &TemplateWithExercises) {
        self.workout = ActiveWorkout {
            template_id: Some(template.id),
            template_name: template.name.clone(),
            started_at: Some(Utc::now()),
            exercises: template
                .exercises
                .iter()
                .enumerate()
                .map(|(index, te)| WorkoutExercise {
                    exercise_id: te.exercise_id,
                    name: te.name.clone(),
                    category: te.category.as_str().to_owned(),
                    order: index as u32,
                    rest_seconds: te.default_rest_seconds.unwrap_or(DEFAULT_REST_SECONDS),
                    sets: te
                        .sets
                        .iter()
                        .map(|set| WorkoutSet {
                            set_number: set.set_number,
                            weight: set.weight,
                            reps: set.reps,
                            is_done: false,
                        })
                        .collect(),
                })
                .collect(),
        };
        self.snapshot = Some(TemplateSnapshot::capture(template));
        self.timer.stop();
        self.submitting = false;
        debug!(template_id = %template.id, exercises = template.exercises.len(), "workout started from template");
    }

    /// Restore a previously backed-up workout, adopting it wholesale
    pub fn restore(&mut self, record: BackupRecord) {
        self.workout = record.active_workout;
        self.snapshot = record.template_snapshot;
        self.submitting = false;
    }

    /// Abandon the session: stop the timer and reset to empty
    ///
    /// Used when another writer cleared the shared backup slot and this
    /// session must give up its state.
    pub fn abandon(&mut self) {
        self.timer.stop();
        self.workout = ActiveWorkout::empty();
        self.snapshot = None;
        self.submitting = false;
    }

    /// Append an exercise picked from the library
    ///
    /// The exercise arrives with three default sets (0 kg, 10 reps) and
    /// the standard rest period.
    pub fn add_exercise(&mut self, exercise: &Exercise) {
        let order = self.workout.exercises.len() as u32;
        self.workout.exercises.push(WorkoutExercise {
            exercise_id: exercise.id,
            name: exercise.name.clone(),
            category: exercise.category.as_str().to_owned(),
            order,
            rest_seconds: DEFAULT_REST_SECONDS,
            sets: (1..=ADDED_EXERCISE_SETS)
                .map(|set_number| WorkoutSet {
                    set_number,
                    weight: 0.0,
                    reps: DEFAULT_REPS,
                    is_done: false,
                })
                .collect(),
        });
    }

    /// Remove an exercise by index
    ///
    /// A timer referencing the removed exercise, or any exercise after it,
    /// is stopped first: removal shifts later indices down, and a stopped
    /// timer beats one pointing at the wrong exercise.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of bounds.
    pub fn remove_exercise(&mut self, index: usize) -> AppResult<()> {
        if index >= self.workout.exercises.len() {
            return Err(AppError::invalid_input(format!(
                "No exercise at index {index}"
            )));
        }
        if let TimerState::Active { exercise_index, .. }
        | TimerState::Paused { exercise_index, .. } = self.timer.state()
        {
            if exercise_index >= index {
                self.timer.stop();
            }
        }
        self.workout.exercises.remove(index);
        for (order, exercise) in self.workout.exercises.iter_mut().enumerate() {
            exercise.order = order as u32;
        }
        Ok(())
    }

    /// Append a set to an exercise, copying the previous set's values
    ///
    /// Defaults to 0 kg and 10 reps when the exercise has no sets yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the exercise index is out of bounds.
    pub fn add_set(&mut self, exercise_index: usize) -> AppResult<()> {
        let exercise = self.exercise_mut(exercise_index)?;
        let (weight, reps) = exercise
            .sets
            .last()
            .map_or((0.0, DEFAULT_REPS), |set| (set.weight, set.reps));
        let set_number = exercise.sets.len() as u32 + 1;
        exercise.sets.push(WorkoutSet {
            set_number,
            weight,
            reps,
            is_done: false,
        });
        Ok(())
    }

    /// Remove a set from an exercise, renumbering the remainder 1..N
    ///
    /// Removing the only remaining set is a silent no-op; an exercise
    /// always keeps at least one set.
    ///
    /// # Errors
    ///
    /// Returns an error if either index is out of bounds.
    pub fn remove_set(&mut self, exercise_index: usize, set_index: usize) -> AppResult<()> {
        let exercise = self.exercise_mut(exercise_index)?;
        if set_index >= exercise.sets.len() {
            return Err(AppError::invalid_input(format!(
                "No set at index {set_index}"
            )));
        }
        if exercise.sets.len() == 1 {
            return Ok(());
        }
        exercise.sets.remove(set_index);
        for (position, set) in exercise.sets.iter_mut().enumerate() {
            set.set_number = position as u32 + 1;
        }
        Ok(())
    }

    /// Update a set's weight and reps in place
    ///
    /// # Errors
    ///
    /// Returns an error if either index is out of bounds or the weight is
    /// negative.
    pub fn update_set(
        &mut self,
        exercise_index: usize,
        set_index: usize,
        weight: f64,
        reps: u32,
    ) -> AppResult<()> {
        if weight < 0.0 {
            return Err(AppError::invalid_input("Weight must be non-negative"));
        }
        let set = self.set_mut(exercise_index, set_index)?;
        set.weight = weight;
        set.reps = reps;
        Ok(())
    }

    /// Toggle a set's completion flag
    ///
    /// Transitioning to done starts the rest timer with the exercise's
    /// rest period, replacing any running timer.
    ///
    /// # Errors
    ///
    /// Returns an error if either index is out of bounds.
    pub fn toggle_set_done(&mut self, exercise_index: usize, set_index: usize) -> AppResult<()> {
        let rest_seconds = self.exercise_mut(exercise_index)?.rest_seconds;
        let set = self.set_mut(exercise_index, set_index)?;
        set.is_done = !set.is_done;
        if set.is_done {
            self.timer.start(exercise_index, rest_seconds);
        }
        Ok(())
    }

    /// Adjust rest time by `delta` seconds for an exercise
    ///
    /// A timer running or paused for that exercise has its total adjusted;
    /// otherwise the exercise's stored default rest period changes, floored
    /// at zero either way.
    ///
    /// # Errors
    ///
    /// Returns an error if the exercise index is out of bounds.
    pub fn adjust_rest(&mut self, exercise_index: usize, delta: i32) -> AppResult<()> {
        if self.timer.references(exercise_index) {
            self.timer.adjust(delta);
            return Ok(());
        }
        let exercise = self.exercise_mut(exercise_index)?;
        exercise.rest_seconds = exercise.rest_seconds.saturating_add_signed(delta);
        Ok(())
    }

    /// Advance the rest timer by one second
    pub fn tick(&mut self) -> Option<TimerEvent> {
        self.timer.tick()
    }

    /// Pause the rest timer
    pub fn pause_timer(&mut self) {
        self.timer.pause();
    }

    /// Resume the rest timer
    pub fn resume_timer(&mut self) {
        self.timer.resume();
    }

    /// Stop the rest timer
    pub fn stop_timer(&mut self) {
        self.timer.stop();
    }

    /// Whether the workout differs structurally from its template snapshot
    ///
    /// Always false for workouts not started from a template.
    #[must_use]
    pub fn has_template_changes(&self) -> bool {
        match (&self.snapshot, self.workout.template_id) {
            (Some(snapshot), Some(_)) => {
                has_template_changes(snapshot, &self.workout.exercises)
            }
            _ => false,
        }
    }

    /// Begin the finish protocol
    ///
    /// Produces the workout data to persist and tells the caller whether to
    /// offer the update-template choice first. The session stays intact
    /// until [`Self::complete_finish`]; a failed save is reported with
    /// [`Self::finish_failed`] so the user can retry.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the workout has no exercises or was
    /// never started, and a conflict when a finish is already outstanding.
    pub fn begin_finish(&mut self) -> AppResult<FinishPlan> {
        if self.submitting {
            return Err(AppError::in_progress("A finish attempt is already in progress"));
        }
        if self.workout.exercises.is_empty() {
            return Err(AppError::invalid_input(
                "Add at least one exercise to finish the workout",
            ));
        }
        let started_at = self
            .workout
            .started_at
            .ok_or_else(|| AppError::invalid_input("Workout has not been started"))?;

        self.submitting = true;
        let needs_template_decision =
            self.workout.template_id.is_some() && self.has_template_changes();
        Ok(FinishPlan {
            workout: CompletedWorkout {
                template_id: self.workout.template_id,
                started_at,
                finished_at: Utc::now(),
                exercises: self.workout.exercises.clone(),
            },
            needs_template_decision,
        })
    }

    /// Record that the pending save failed; the session may retry
    pub fn finish_failed(&mut self) {
        self.submitting = false;
    }

    /// Record that the pending save succeeded and reset to empty
    pub fn complete_finish(&mut self) {
        self.timer.stop();
        self.workout = ActiveWorkout::empty();
        self.snapshot = None;
        self.submitting = false;
    }

    /// Cancel the workout: stop the timer and reset to empty
    ///
    /// The user-facing confirmation step happens before this call; by here
    /// the decision is final. The caller clears the backup slot.
    pub fn cancel(&mut self) {
        self.timer.stop();
        self.workout = ActiveWorkout::empty();
        self.snapshot = None;
        self.submitting = false;
    }

    fn exercise_mut(&mut self, index: usize) -> AppResult<&mut WorkoutExercise> {
        self.workout
            .exercises
            .get_mut(index)
            .ok_or_else(|| AppError::invalid_input(format!("No exercise at index {index}")))
    }

    fn set_mut(&mut self, exercise_index: usize, set_index: usize) -> AppResult<&mut WorkoutSet> {
        self.exercise_mut(exercise_index)?
            .sets
            .get_mut(set_index)
            .ok_or_else(|| AppError::invalid_input(format!("No set at index {set_index}")))
    }
}
