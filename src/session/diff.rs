// ABOUTME: Structural change detection between a workout and its originating template
// ABOUTME: Captures a weights/reps snapshot at start and diffs it against the live session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! # Template Change Detection
//!
//! Compares the in-progress workout against the snapshot of the template it
//! was started from, to decide whether to offer the "update template with
//! these changes?" prompt at finish time. The diff is a full structural
//! comparison: additions, removals, and in-place edits must all be caught,
//! so a same-length positional walk alone would not be enough. The result
//! only gates the prompt; it never blocks saving the workout log itself.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{TemplateSet, TemplateWithExercises};

use super::WorkoutExercise;

/// Snapshot of one template exercise: identity plus ordered weight/reps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotExercise {
    /// Library exercise the template row referenced
    pub exercise_id: Uuid,
    /// Ordered default sets at workout start
    pub sets: Vec<TemplateSet>,
}

/// Immutable deep copy of a template's exercises taken at workout start
///
/// Holds weights and reps only; completion flags have no meaning in a
/// template. Never mutated after capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSnapshot {
    /// Snapshot exercises in template order
    pub exercises: Vec<SnapshotExercise>,
}

impl TemplateSnapshot {
    /// Capture a snapshot from the template a workout is starting from
    #[must_use]
    pub fn capture(template: &TemplateWithExercises) -> Self {
        Self {
            exercises: template
                .exercises
                .iter()
                .map(|exercise| SnapshotExercise {
                    exercise_id: exercise.exercise_id,
                    sets: exercise.sets.clone(),
                })
                .collect(),
        }
    }
}

/// Whether the current exercises differ structurally from the snapshot
///
/// Returns true on any of: exercise count mismatch, an exercise with no
/// snapshot counterpart (added), a set count mismatch, a positional
/// weight/reps mismatch, or a snapshot exercise with no current
/// counterpart (removed). Matching is by `exercise_id`, so list identity
/// and ordering of unchanged exercises do not matter.
#[must_use]
pub fn has_template_changes(snapshot: &TemplateSnapshot, current: &[WorkoutExercise]) -> bool {
    let original = &snapshot.exercises;

    if original.len() != current.len() {
        return true;
    }

    for current_exercise in current {
        let Some(original_exercise) = original
            .iter()
            .find(|e| e.exercise_id == current_exercise.exercise_id)
        else {
            return true;
        };

        if original_exercise.sets.len() != current_exercise.sets.len() {
            return true;
        }

        for (original_set, current_set) in
            original_exercise.sets.iter().zip(&current_exercise.sets)
        {
            if (original_set.weight - current_set.weight).abs() > f64::EPSILON
                || original_set.reps != current_set.reps
            {
                return true;
            }
        }
    }

    original
        .iter()
        .any(|original_exercise| {
            !current
                .iter()
                .any(|e| e.exercise_id == original_exercise.exercise_id)
        })
}
