// ABOUTME: Integration tests for the HTTP API surface
// ABOUTME: Exercises routing, header auth, and the backup restore flow end to end
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::sync::Arc;

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use liftlog::database::Database;
use liftlog::routes::{self, ServerResources};
use liftlog::session::{ActiveWorkout, BackupStore, WorkoutExercise, WorkoutSet};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

async fn test_app() -> Result<(Router, TempDir)> {
    let database = Database::new("sqlite::memory:").await?;
    let backup_dir = TempDir::new()?;
    let backups = BackupStore::new(backup_dir.path())?;
    let app = routes::router(Arc::new(ServerResources::new(database, backups)));
    Ok((app, backup_dir))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    user_id: Option<Uuid>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header("x-user-id", user_id.to_string());
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn backed_up_workout(template_id: Uuid) -> ActiveWorkout {
    ActiveWorkout {
        template_id: Some(template_id),
        template_name: "Push Day".to_owned(),
        started_at: Some(Utc::now()),
        exercises: vec![WorkoutExercise {
            exercise_id: Uuid::new_v4(),
            name: "Bench Press".to_owned(),
            category: "Chest".to_owned(),
            order: 0,
            rest_seconds: 90,
            sets: vec![WorkoutSet {
                set_number: 1,
                weight: 100.0,
                reps: 10,
                is_done: true,
            }],
        }],
    }
}

#[tokio::test]
async fn health_needs_no_identity() -> Result<()> {
    let (app, _dir) = test_app().await?;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "liftlog");
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn missing_identity_is_unauthorized() -> Result<()> {
    let (app, _dir) = test_app().await?;
    let (status, body) = send(&app, Method::GET, "/templates", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_INVALID");
    Ok(())
}

#[tokio::test]
async fn exercise_creation_and_listing() -> Result<()> {
    let (app, _dir) = test_app().await?;
    let user_id = Uuid::new_v4();

    let (status, created) = send(
        &app,
        Method::POST,
        "/exercises",
        Some(user_id),
        Some(json!({ "name": "Bench Press", "category": "Chest" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Bench Press");

    let (status, body) = send(
        &app,
        Method::POST,
        "/exercises",
        Some(user_id),
        Some(json!({ "name": "Bench Press" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "MISSING_REQUIRED_FIELD");

    let (status, listed) = send(
        &app,
        Method::GET,
        "/exercises?category=Chest",
        Some(user_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn picker_categories_exclude_cardio() -> Result<()> {
    let (app, _dir) = test_app().await?;
    let (status, body) = send(&app, Method::GET, "/exercises/categories", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let categories = body.as_array().unwrap();
    assert_eq!(categories.len(), 7);
    assert!(!categories.contains(&json!("Cardio")));
    Ok(())
}

#[tokio::test]
async fn template_crud_over_http() -> Result<()> {
    let (app, _dir) = test_app().await?;
    let user_id = Uuid::new_v4();

    let (_, exercise) = send(
        &app,
        Method::POST,
        "/exercises",
        Some(user_id),
        Some(json!({ "name": "Bench Press", "category": "Chest" })),
    )
    .await;
    let exercise_id = exercise["id"].as_str().unwrap().to_owned();

    let (status, created) = send(
        &app,
        Method::POST,
        "/templates",
        Some(user_id),
        Some(json!({
            "name": "Push Day",
            "exercises": [{
                "exercise_id": exercise_id,
                "default_rest_seconds": 120,
                "sets": [
                    { "weight": 100.0, "reps": 10 },
                    { "weight": 100.0, "reps": 8 }
                ]
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let template_id = created["id"].as_str().unwrap().to_owned();

    let (status, full) = send(
        &app,
        Method::GET,
        &format!("/templates/{template_id}"),
        Some(user_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(full["exercises"][0]["sets"][1]["reps"], 8);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/templates/{template_id}"),
        Some(user_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/templates/{template_id}"),
        Some(user_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn backup_round_trip_over_http() -> Result<()> {
    let (app, _dir) = test_app().await?;
    let user_id = Uuid::new_v4();

    let (_, exercise) = send(
        &app,
        Method::POST,
        "/exercises",
        Some(user_id),
        Some(json!({ "name": "Bench Press", "category": "Chest" })),
    )
    .await;
    let (_, template) = send(
        &app,
        Method::POST,
        "/templates",
        Some(user_id),
        Some(json!({
            "name": "Push Day",
            "exercises": [{
                "exercise_id": exercise["id"],
                "default_rest_seconds": null,
                "sets": [{ "weight": 100.0, "reps": 10 }]
            }]
        })),
    )
    .await;
    let template_id: Uuid = template["id"].as_str().unwrap().parse()?;

    let (status, empty) = send(&app, Method::GET, "/backup", Some(user_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(empty["backup"].is_null());

    let workout = backed_up_workout(template_id);
    let (status, _) = send(
        &app,
        Method::PUT,
        "/backup",
        Some(user_id),
        Some(json!({ "active_workout": workout })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, loaded) = send(&app, Method::GET, "/backup", Some(user_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        loaded["backup"]["active_workout"]["template_name"],
        "Push Day"
    );

    let (status, _) = send(&app, Method::DELETE, "/backup", Some(user_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, cleared) = send(&app, Method::GET, "/backup", Some(user_id), None).await;
    assert!(cleared["backup"].is_null());
    Ok(())
}

#[tokio::test]
async fn backup_for_a_deleted_template_is_discarded_with_a_warning() -> Result<()> {
    let (app, _dir) = test_app().await?;
    let user_id = Uuid::new_v4();

    let (_, exercise) = send(
        &app,
        Method::POST,
        "/exercises",
        Some(user_id),
        Some(json!({ "name": "Bench Press", "category": "Chest" })),
    )
    .await;
    let (_, template) = send(
        &app,
        Method::POST,
        "/templates",
        Some(user_id),
        Some(json!({
            "name": "Push Day",
            "exercises": [{
                "exercise_id": exercise["id"],
                "default_rest_seconds": null,
                "sets": [{ "weight": 100.0, "reps": 10 }]
            }]
        })),
    )
    .await;
    let template_id: Uuid = template["id"].as_str().unwrap().parse()?;

    let workout = backed_up_workout(template_id);
    send(
        &app,
        Method::PUT,
        "/backup",
        Some(user_id),
        Some(json!({ "active_workout": workout })),
    )
    .await;

    send(
        &app,
        Method::DELETE,
        &format!("/templates/{template_id}"),
        Some(user_id),
        None,
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/backup", Some(user_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["backup"].is_null());
    assert_eq!(
        body["warning"],
        "Workout discarded because its template was deleted"
    );

    // The slot is gone: a second load has no warning to repeat.
    let (_, again) = send(&app, Method::GET, "/backup", Some(user_id), None).await;
    assert!(again["backup"].is_null());
    assert!(again.get("warning").is_none());
    Ok(())
}

#[tokio::test]
async fn saving_a_workout_clears_the_backup_slot() -> Result<()> {
    let (app, _dir) = test_app().await?;
    let user_id = Uuid::new_v4();

    let workout = backed_up_workout(Uuid::new_v4());
    send(
        &app,
        Method::PUT,
        "/backup",
        Some(user_id),
        Some(json!({ "active_workout": &workout })),
    )
    .await;

    let started_at = Utc::now();
    let (status, created) = send(
        &app,
        Method::POST,
        "/workouts",
        Some(user_id),
        Some(json!({
            "template_id": null,
            "started_at": started_at,
            "finished_at": Utc::now(),
            "exercises": workout.exercises,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["id"].is_string());

    let (_, body) = send(&app, Method::GET, "/backup", Some(user_id), None).await;
    assert!(body["backup"].is_null());

    let (status, stats) = send(&app, Method::GET, "/workouts/stats", Some(user_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_workouts"], 1);
    assert_eq!(stats["total_sets"], 1);
    Ok(())
}

#[tokio::test]
async fn chart_configuration_over_http() -> Result<()> {
    let (app, _dir) = test_app().await?;
    let user_id = Uuid::new_v4();

    let (_, exercise) = send(
        &app,
        Method::POST,
        "/exercises",
        Some(user_id),
        Some(json!({ "name": "Bench Press", "category": "Chest" })),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/charts",
        Some(user_id),
        Some(json!({ "exercise_id": exercise["id"], "metric_type": "total_sets" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "MISSING_REQUIRED_FIELD");

    let (status, created) = send(
        &app,
        Method::POST,
        "/charts",
        Some(user_id),
        Some(json!({
            "exercise_id": exercise["id"],
            "metric_type": "total_sets",
            "x_axis_mode": "session"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let chart_id = created["id"].as_str().unwrap().to_owned();

    let (status, listed) = send(&app, Method::GET, "/charts", Some(user_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["exercise_name"], "Bench Press");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/charts/{chart_id}"),
        Some(user_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    Ok(())
}
