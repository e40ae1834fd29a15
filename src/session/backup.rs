// ABOUTME: Per-user backup slots for active workouts, enabling crash recovery
// ABOUTME: Mirrors session state to JSON files and arbitrates writer-to-writer sync events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! # Workout Backup Store
//!
//! A local mirror of the active workout, written on every mutation and
//! deleted on finish, cancel, or logout. A crashed or reloaded client
//! restores its session from here. Each user owns one slot, keyed
//! `activeWorkout_<userId>`.
//!
//! Corrupted backups are discarded silently: a backup is a convenience,
//! and surfacing a parse error for one would trade a minor recovery loss
//! for a confusing failure. Loading clears the bad slot so the corruption
//! is not observed twice.
//!
//! Two writers can share a slot, the way two browser tabs share one
//! user's storage. [`sync_action`] interprets a change notification for
//! the slot: a cleared slot tells this session to abandon its state, a
//! replaced value is adopted wholesale. Last writer wins; concurrent edits
//! are not merged.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

use super::diff::TemplateSnapshot;
use super::ActiveWorkout;

/// One persisted backup: the workout, its snapshot, and the save time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRecord {
    /// The active workout at save time
    pub active_workout: ActiveWorkout,
    /// The template snapshot captured at workout start, if any
    pub template_snapshot: Option<TemplateSnapshot>,
    /// When this backup was written
    pub last_saved_at: DateTime<Utc>,
}

impl BackupRecord {
    /// Whether the record represents a restorable workout
    ///
    /// A backup without a start timestamp or without exercises carries
    /// nothing worth restoring.
    #[must_use]
    pub fn is_restorable(&self) -> bool {
        self.active_workout.has_started() && !self.active_workout.exercises.is_empty()
    }
}

/// What a session should do in response to a slot change notification
#[derive(Debug, Clone)]
pub enum SyncAction {
    /// Another writer cleared the slot: abandon the local session
    Abandon,
    /// Another writer replaced the slot: adopt this state wholesale
    Adopt(Box<BackupRecord>),
    /// The new value was malformed: keep the local state
    Ignore,
}

/// Interpret a change notification for a user's backup slot
///
/// `new_value` is the slot's new serialized content, or `None` when the
/// slot was cleared. Malformed or non-restorable payloads are ignored
/// rather than adopted; the remote writer's next valid save will catch
/// this session up.
#[must_use]
pub fn sync_action(new_value: Option<&str>) -> SyncAction {
    let Some(payload) = new_value else {
        return SyncAction::Abandon;
    };
    match serde_json::from_str::<BackupRecord>(payload) {
        Ok(record) if record.is_restorable() => SyncAction::Adopt(Box::new(record)),
        Ok(_) => SyncAction::Ignore,
        Err(err) => {
            debug!(error = %err, "ignoring malformed backup sync payload");
            SyncAction::Ignore
        }
    }
}

/// File-backed store of per-user backup slots
#[derive(Debug, Clone)]
pub struct BackupStore {
    dir: PathBuf,
}

impl BackupStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    ///
    /// # Errors
    ///
    /// Returns a storage error if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            AppError::storage(format!(
                "Failed to create backup directory {}: {e}",
                dir.display()
            ))
        })?;
        Ok(Self { dir })
    }

    /// The slot key for a user, `activeWorkout_<userId>`
    #[must_use]
    pub fn slot_key(user_id: Uuid) -> String {
        format!("activeWorkout_{user_id}")
    }

    fn slot_path(&self, user_id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.json", Self::slot_key(user_id)))
    }

    /// Directory holding the slots
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Mirror the active workout into the user's slot
    ///
    /// A workout that has not started, or has no exercises, is not worth
    /// backing up; the call is a no-op and any prior slot content stands.
    ///
    /// # Errors
    ///
    /// Returns a storage error if serialization or the write fails.
    pub fn save(
        &self,
        user_id: Uuid,
        workout: &ActiveWorkout,
        snapshot: Option<&TemplateSnapshot>,
    ) -> AppResult<()> {
        if !workout.has_started() || workout.exercises.is_empty() {
            return Ok(());
        }
        let record = BackupRecord {
            active_workout: workout.clone(),
            template_snapshot: snapshot.cloned(),
            last_saved_at: Utc::now(),
        };
        let payload = serde_json::to_string(&record)?;
        fs::write(self.slot_path(user_id), payload)
            .map_err(|e| AppError::storage(format!("Failed to write backup: {e}")))?;
        Ok(())
    }

    /// Load the user's backup, if a valid one exists
    ///
    /// Returns `None` when the slot is absent. A slot that fails to parse
    /// or fails validation is cleared and `None` returned; corruption is
    /// logged, never surfaced.
    #[must_use]
    pub fn load(&self, user_id: Uuid) -> Option<BackupRecord> {
        let path = self.slot_path(user_id);
        let payload = match fs::read_to_string(&path) {
            Ok(payload) => payload,
            Err(err) if err.kind() == ErrorKind::NotFound => return None,
            Err(err) => {
                warn!(error = %err, "failed to read backup slot");
                return None;
            }
        };
        match serde_json::from_str::<BackupRecord>(&payload) {
            Ok(record) if record.is_restorable() => Some(record),
            Ok(_) => {
                debug!(user_id = %user_id, "discarding non-restorable backup");
                self.discard(user_id);
                None
            }
            Err(err) => {
                debug!(user_id = %user_id, error = %err, "discarding corrupted backup");
                self.discard(user_id);
                None
            }
        }
    }

    /// Remove the user's slot
    ///
    /// # Errors
    ///
    /// Returns a storage error if the removal fails for a reason other
    /// than the slot already being absent.
    pub fn clear(&self, user_id: Uuid) -> AppResult<()> {
        match fs::remove_file(self.slot_path(user_id)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AppError::storage(format!("Failed to clear backup: {err}"))),
        }
    }

    /// Whether the user currently has a slot on disk
    #[must_use]
    pub fn exists(&self, user_id: Uuid) -> bool {
        self.slot_path(user_id).exists()
    }

    fn discard(&self, user_id: Uuid) {
        if let Err(err) = self.clear(user_id) {
            warn!(user_id = %user_id, error = %err, "failed to discard invalid backup");
        }
    }
}
