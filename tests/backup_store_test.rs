// ABOUTME: Integration tests for the file-backed workout backup store
// ABOUTME: Covers save/load round trips, corruption handling, and sync arbitration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::fs;

use chrono::Utc;
use liftlog::session::backup::sync_action;
use liftlog::session::{
    ActiveWorkout, BackupRecord, BackupStore, SyncAction, WorkoutExercise, WorkoutSet,
};
use tempfile::TempDir;
use uuid::Uuid;

fn started_workout() -> ActiveWorkout {
    ActiveWorkout {
        template_id: Some(Uuid::new_v4()),
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

fn slot_file(store: &BackupStore, user_id: Uuid) -> std::path::PathBuf {
    store
        .dir()
        .join(format!("{}.json", BackupStore::slot_key(user_id)))
}

#[test]
fn save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = BackupStore::new(dir.path()).unwrap();
    let user_id = Uuid::new_v4();
    let workout = started_workout();

    store.save(user_id, &workout, None).unwrap();
    assert!(store.exists(user_id));

    let record = store.load(user_id).unwrap();
    assert_eq!(record.active_workout, workout);
    assert!(record.template_snapshot.is_none());
    assert!(record.is_restorable());
}

#[test]
fn slot_key_embeds_the_user_id() {
    let user_id = Uuid::new_v4();
    assert_eq!(
        BackupStore::slot_key(user_id),
        format!("activeWorkout_{user_id}")
    );
}

#[test]
fn not_started_workouts_are_not_backed_up() {
    let dir = TempDir::new().unwrap();
    let store = BackupStore::new(dir.path()).unwrap();
    let user_id = Uuid::new_v4();

    store.save(user_id, &ActiveWorkout::empty(), None).unwrap();
    assert!(!store.exists(user_id));

    // Started but empty is equally not worth keeping.
    let mut workout = started_workout();
    workout.exercises.clear();
    store.save(user_id, &workout, None).unwrap();
    assert!(!store.exists(user_id));
}

#[test]
fn corrupted_slot_is_discarded_on_load() {
    let dir = TempDir::new().unwrap();
    let store = BackupStore::new(dir.path()).unwrap();
    let user_id = Uuid::new_v4();

    fs::write(slot_file(&store, user_id), "{not json").unwrap();
    assert!(store.load(user_id).is_none());
    assert!(!store.exists(user_id));

    // A second load observes nothing at all.
    assert!(store.load(user_id).is_none());
}

#[test]
fn non_restorable_slot_is_discarded_on_load() {
    let dir = TempDir::new().unwrap();
    let store = BackupStore::new(dir.path()).unwrap();
    let user_id = Uuid::new_v4();

    let record = BackupRecord {
        active_workout: ActiveWorkout::empty(),
        template_snapshot: None,
        last_saved_at: Utc::now(),
    };
    fs::write(
        slot_file(&store, user_id),
        serde_json::to_string(&record).unwrap(),
    )
    .unwrap();

    assert!(store.load(user_id).is_none());
    assert!(!store.exists(user_id));
}

#[test]
fn clearing_an_absent_slot_is_fine() {
    let dir = TempDir::new().unwrap();
    let store = BackupStore::new(dir.path()).unwrap();
    store.clear(Uuid::new_v4()).unwrap();
}

#[test]
fn users_own_separate_slots() {
    let dir = TempDir::new().unwrap();
    let store = BackupStore::new(dir.path()).unwrap();
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();

    store.save(first, &started_workout(), None).unwrap();
    assert!(store.exists(first));
    assert!(!store.exists(second));

    store.clear(first).unwrap();
    assert!(!store.exists(first));
}

#[test]
fn cleared_slot_means_abandon() {
    assert!(matches!(sync_action(None), SyncAction::Abandon));
}

#[test]
fn replaced_slot_is_adopted_wholesale() {
    let record = BackupRecord {
        active_workout: started_workout(),
        template_snapshot: None,
        last_saved_at: Utc::now(),
    };
    let payload = serde_json::to_string(&record).unwrap();

    match sync_action(Some(&payload)) {
        SyncAction::Adopt(adopted) => {
            assert_eq!(adopted.active_workout, record.active_workout);
        }
        other => panic!("expected Adopt, got {other:?}"),
    }
}

#[test]
fn malformed_or_empty_payloads_are_ignored() {
    assert!(matches!(sync_action(Some("{not json")), SyncAction::Ignore));

    let record = BackupRecord {
        active_workout: ActiveWorkout::empty(),
        template_snapshot: None,
        last_saved_at: Utc::now(),
    };
    let payload = serde_json::to_string(&record).unwrap();
    assert!(matches!(sync_action(Some(&payload)), SyncAction::Ignore));
}
