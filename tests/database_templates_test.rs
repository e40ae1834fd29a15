// ABOUTME: Integration tests for the templates database manager
// ABOUTME: Validates CRUD, full-replace update semantics, and user scoping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use anyhow::Result;
use liftlog::database::exercises::ExerciseLibraryManager;
use liftlog::database::templates::{
    TemplateExerciseInput, TemplateSetInput, TemplatesManager,
};
use liftlog::database::Database;
use liftlog::errors::ErrorCode;
use liftlog::models::{Exercise, ExerciseCategory};
use uuid::Uuid;

async fn create_test_db() -> Result<Database> {
    Ok(Database::new("sqlite::memory:").await?)
}

async fn seed_exercise(db: &Database, user_id: Uuid, name: &str) -> Result<Exercise> {
    let manager = ExerciseLibraryManager::new(db.pool().clone());
    Ok(manager.create(user_id, name, ExerciseCategory::Chest).await?)
}

fn input(exercise_id: Uuid, rest: Option<u32>, sets: &[(f64, u32)]) -> TemplateExerciseInput {
    TemplateExerciseInput {
        exercise_id,
        default_rest_seconds: rest,
        sets: sets
            .iter()
            .map(|&(weight, reps)| TemplateSetInput { weight, reps })
            .collect(),
    }
}

#[tokio::test]
async fn create_and_get_round_trip() -> Result<()> {
    let db = create_test_db().await?;
    let templates = TemplatesManager::new(db.pool().clone());
    let user_id = Uuid::new_v4();
    let bench = seed_exercise(&db, user_id, "Bench Press").await?;
    let fly = seed_exercise(&db, user_id, "Cable Fly").await?;

    let summary = templates
        .create(
            user_id,
            "Push Day",
            &[
                input(bench.id, Some(120), &[(100.0, 10), (100.0, 8)]),
                input(fly.id, None, &[(20.0, 12)]),
            ],
        )
        .await?;
    assert_eq!(summary.exercise_count, 2);

    let full = templates.get(summary.id, user_id).await?.unwrap();
    assert_eq!(full.name, "Push Day");
    assert_eq!(full.exercises.len(), 2);

    let first = &full.exercises[0];
    assert_eq!(first.name, "Bench Press");
    assert_eq!(first.order, 0);
    assert_eq!(first.default_rest_seconds, Some(120));
    assert_eq!(first.sets.len(), 2);
    assert_eq!(first.sets[0].set_number, 1);
    assert_eq!(first.sets[0].weight, 100.0);
    assert_eq!(first.sets[1].reps, 8);

    let second = &full.exercises[1];
    assert_eq!(second.order, 1);
    assert_eq!(second.default_rest_seconds, None);
    Ok(())
}

#[tokio::test]
async fn listing_includes_exercise_counts() -> Result<()> {
    let db = create_test_db().await?;
    let templates = TemplatesManager::new(db.pool().clone());
    let user_id = Uuid::new_v4();
    let bench = seed_exercise(&db, user_id, "Bench Press").await?;

    templates
        .create(user_id, "Push Day", &[input(bench.id, None, &[(100.0, 10)])])
        .await?;
    templates.create(user_id, "Empty Day", &[]).await?;

    let listed = templates.list(user_id).await?;
    assert_eq!(listed.len(), 2);
    // Name-ascending: "Empty Day" before "Push Day".
    assert_eq!(listed[0].name, "Empty Day");
    assert_eq!(listed[0].exercise_count, 0);
    assert_eq!(listed[1].exercise_count, 1);
    Ok(())
}

#[tokio::test]
async fn blank_names_are_rejected() -> Result<()> {
    let db = create_test_db().await?;
    let templates = TemplatesManager::new(db.pool().clone());
    let err = templates
        .create(Uuid::new_v4(), "  ", &[])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);
    Ok(())
}

#[tokio::test]
async fn update_replaces_exercises_wholesale() -> Result<()> {
    let db = create_test_db().await?;
    let templates = TemplatesManager::new(db.pool().clone());
    let user_id = Uuid::new_v4();
    let bench = seed_exercise(&db, user_id, "Bench Press").await?;
    let squat = seed_exercise(&db, user_id, "Squat").await?;

    let summary = templates
        .create(user_id, "Push Day", &[input(bench.id, None, &[(100.0, 10)])])
        .await?;

    templates
        .update(
            summary.id,
            user_id,
            "Leg Day",
            &[input(squat.id, Some(180), &[(140.0, 5), (140.0, 5)])],
        )
        .await?;

    let full = templates.get(summary.id, user_id).await?.unwrap();
    assert_eq!(full.name, "Leg Day");
    assert_eq!(full.exercises.len(), 1);
    assert_eq!(full.exercises[0].name, "Squat");
    assert_eq!(full.exercises[0].sets.len(), 2);
    assert!(full.updated_at >= full.created_at);
    Ok(())
}

#[tokio::test]
async fn update_and_delete_are_user_scoped() -> Result<()> {
    let db = create_test_db().await?;
    let templates = TemplatesManager::new(db.pool().clone());
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let summary = templates.create(alice, "Push Day", &[]).await?;

    let err = templates
        .update(summary.id, bob, "Hijacked", &[])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    let err = templates.delete(summary.id, bob).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);

    assert!(templates.get(summary.id, bob).await?.is_none());
    assert!(templates.exists(summary.id, alice).await?);
    assert!(!templates.exists(summary.id, bob).await?);
    Ok(())
}

#[tokio::test]
async fn delete_removes_the_template_and_its_children() -> Result<()> {
    let db = create_test_db().await?;
    let templates = TemplatesManager::new(db.pool().clone());
    let user_id = Uuid::new_v4();
    let bench = seed_exercise(&db, user_id, "Bench Press").await?;

    let summary = templates
        .create(user_id, "Push Day", &[input(bench.id, None, &[(100.0, 10)])])
        .await?;

    templates.delete(summary.id, user_id).await?;
    assert!(templates.get(summary.id, user_id).await?.is_none());
    assert!(!templates.exists(summary.id, user_id).await?);
    Ok(())
}
