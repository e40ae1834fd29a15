// ABOUTME: Shared domain types for the liftlog fitness tracking core
// ABOUTME: Defines exercise categories, the exercise library entry, and template structures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! # Data Models
//!
//! Core data structures shared by the session state machine, the database
//! managers, and the HTTP routes.
//!
//! - [`Exercise`]: an entry in the exercise library (system or user-created)
//! - [`ExerciseCategory`]: closed muscle-group enumeration
//! - [`TemplateWithExercises`]: a named, reusable workout definition used to
//!   seed an active session

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default rest period applied when a template exercise carries none
pub const DEFAULT_REST_SECONDS: u32 = 90;

/// Muscle-group category for exercises
///
/// Closed enumeration; unknown database values parse to [`Self::Other`].
/// `Cardio` is a valid category on creation but is excluded from the
/// picker filter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ExerciseCategory {
    /// Chest exercises
    Chest,
    /// Back exercises
    Back,
    /// Shoulder exercises
    Shoulders,
    /// Leg exercises
    Legs,
    /// Arm exercises
    Arms,
    /// Core exercises
    Core,
    /// Cardiovascular work; accepted on create, hidden from the picker filter
    Cardio,
    /// Anything that fits no other category
    #[default]
    Other,
}

impl ExerciseCategory {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chest => "Chest",
            Self::Back => "Back",
            Self::Shoulders => "Shoulders",
            Self::Legs => "Legs",
            Self::Arms => "Arms",
            Self::Core => "Core",
            Self::Cardio => "Cardio",
            Self::Other => "Other",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "Chest" => Self::Chest,
            "Back" => Self::Back,
            "Shoulders" => Self::Shoulders,
            "Legs" => Self::Legs,
            "Arms" => Self::Arms,
            "Core" => Self::Core,
            "Cardio" => Self::Cardio,
            _ => Self::Other,
        }
    }

    /// Categories offered by the exercise picker's filter
    ///
    /// Cardio is deliberately absent: cardio exercises can be created and
    /// stored but are not part of the strength-focused filter set.
    #[must_use]
    pub const fn picker_categories() -> [Self; 7] {
        [
            Self::Chest,
            Self::Back,
            Self::Shoulders,
            Self::Legs,
            Self::Arms,
            Self::Core,
            Self::Other,
        ]
    }
}

/// An entry in the exercise library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user; `None` for system-provided exercises
    pub user_id: Option<Uuid>,
    /// Display name
    pub name: String,
    /// Muscle-group category
    pub category: ExerciseCategory,
    /// Whether the exercise is system-provided rather than user-created
    pub is_system: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// A default set within a template exercise (weight and reps only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSet {
    /// 1-based position within the exercise
    pub set_number: u32,
    /// Default weight in kilograms
    pub weight: f64,
    /// Default repetition count
    pub reps: u32,
}

/// An exercise within a template, with its ordered default sets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateExercise {
    /// Library exercise this row references
    pub exercise_id: Uuid,
    /// Exercise display name (denormalized from the library)
    pub name: String,
    /// Exercise category (denormalized from the library)
    pub category: ExerciseCategory,
    /// 0-based position within the template
    pub order: u32,
    /// Default rest period in seconds; `None` falls back to
    /// [`DEFAULT_REST_SECONDS`] when a workout starts
    pub default_rest_seconds: Option<u32>,
    /// Ordered default sets
    pub sets: Vec<TemplateSet>,
}

/// Template list entry with exercise count, as shown on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSummary {
    /// Unique identifier
    pub id: Uuid,
    /// Template name
    pub name: String,
    /// Number of exercises in the template
    pub exercise_count: u32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// A full template with its ordered exercises and sets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateWithExercises {
    /// Unique identifier
    pub id: Uuid,
    /// Template name
    pub name: String,
    /// Ordered exercises
    pub exercises: Vec<TemplateExercise>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_strings() {
        for category in [
            ExerciseCategory::Chest,
            ExerciseCategory::Legs,
            ExerciseCategory::Cardio,
            ExerciseCategory::Other,
        ] {
            assert_eq!(ExerciseCategory::parse(category.as_str()), category);
        }
    }

    #[test]
    fn unknown_category_parses_to_other() {
        assert_eq!(
            ExerciseCategory::parse("Mobility"),
            ExerciseCategory::Other
        );
    }

    #[test]
    fn picker_excludes_cardio() {
        assert!(!ExerciseCategory::picker_categories().contains(&ExerciseCategory::Cardio));
    }
}
