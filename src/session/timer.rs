// ABOUTME: Rest timer state machine for active workout sessions
// ABOUTME: Models idle/active/paused as a discriminated union with tick-driven countdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! # Rest Timer
//!
//! A single-interval countdown coordinated with set completion. The state
//! is a discriminated union so impossible combinations (active with no
//! exercise, active and paused at once) are unrepresentable. Exactly one
//! timer exists per session; starting a new one implicitly stops the
//! previous.

use serde::{Deserialize, Serialize};

/// Rest timer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TimerState {
    /// No timer running
    #[default]
    Idle,
    /// Counting down for one exercise
    Active {
        /// Index of the exercise the timer belongs to
        exercise_index: usize,
        /// Seconds elapsed so far
        elapsed: u32,
        /// Total seconds to count
        total: u32,
    },
    /// Countdown suspended, position retained
    Paused {
        /// Index of the exercise the timer belongs to
        exercise_index: usize,
        /// Seconds elapsed so far
        elapsed: u32,
        /// Total seconds to count
        total: u32,
    },
}

/// Event emitted by [`RestTimer::tick`] when the countdown finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// The countdown reached its total and the timer returned to idle
    Completed {
        /// Exercise the completed timer belonged to
        exercise_index: usize,
    },
}

/// The session's single rest timer
#[derive(Debug, Clone, Default)]
pub struct RestTimer {
    state: TimerState,
}

impl RestTimer {
    /// Create a new idle timer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: TimerState::Idle,
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> TimerState {
        self.state
    }

    /// Start counting for `exercise_index`, replacing any running timer
    ///
    /// Starting with a zero total is a no-op; there is nothing to count.
    pub fn start(&mut self, exercise_index: usize, total_seconds: u32) {
        if total_seconds == 0 {
            return;
        }
        self.state = TimerState::Active {
            exercise_index,
            elapsed: 0,
            total: total_seconds,
        };
    }

    /// Suspend a running countdown; no-op unless active
    pub fn pause(&mut self) {
        if let TimerState::Active {
            exercise_index,
            elapsed,
            total,
        } = self.state
        {
            self.state = TimerState::Paused {
                exercise_index,
                elapsed,
                total,
            };
        }
    }

    /// Resume a paused countdown; no-op unless paused
    pub fn resume(&mut self) {
        if let TimerState::Paused {
            exercise_index,
            elapsed,
            total,
        } = self.state
        {
            self.state = TimerState::Active {
                exercise_index,
                elapsed,
                total,
            };
        }
    }

    /// Stop the timer unconditionally
    pub fn stop(&mut self) {
        self.state = TimerState::Idle;
    }

    /// Advance the countdown by one second
    ///
    /// Only an active timer advances; paused and idle timers ignore ticks.
    /// When elapsed reaches total the timer auto-stops and the completion
    /// event is returned exactly once.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if let TimerState::Active {
            exercise_index,
            elapsed,
            total,
        } = self.state
        {
            let elapsed = elapsed + 1;
            if elapsed >= total {
                self.state = TimerState::Idle;
                return Some(TimerEvent::Completed { exercise_index });
            }
            self.state = TimerState::Active {
                exercise_index,
                elapsed,
                total,
            };
        }
        None
    }

    /// Change the total by `delta` seconds, floored at zero
    ///
    /// Applies while active or paused and returns true. Returns false when
    /// idle; the caller then adjusts the exercise's stored rest period
    /// instead of a running timer.
    pub fn adjust(&mut self, delta: i32) -> bool {
        match &mut self.state {
            TimerState::Active { total, .. } | TimerState::Paused { total, .. } => {
                *total = total.saturating_add_signed(delta);
                true
            }
            TimerState::Idle => false,
        }
    }

    /// Whether the timer is counting for the given exercise
    #[must_use]
    pub const fn is_active_for(&self, index: usize) -> bool {
        matches!(self.state, TimerState::Active { exercise_index, .. } if exercise_index == index)
    }

    /// Whether the timer references the given exercise, running or paused
    #[must_use]
    pub const fn references(&self, index: usize) -> bool {
        matches!(
            self.state,
            TimerState::Active { exercise_index, .. } | TimerState::Paused { exercise_index, .. }
                if exercise_index == index
        )
    }

    /// Seconds remaining, zero when idle
    #[must_use]
    pub const fn remaining_seconds(&self) -> u32 {
        match self.state {
            TimerState::Active { elapsed, total, .. }
            | TimerState::Paused { elapsed, total, .. } => total.saturating_sub(elapsed),
            TimerState::Idle => 0,
        }
    }

    /// Countdown progress for an exercise as a percentage (100 = full bar)
    ///
    /// Exercises without a running timer show a full bar.
    #[must_use]
    pub fn progress_percent(&self, index: usize) -> u32 {
        if !self.is_active_for(index) {
            return 100;
        }
        match self.state {
            TimerState::Active { elapsed, total, .. } if total > 0 => {
                let remaining = total.saturating_sub(elapsed);
                (f64::from(remaining) / f64::from(total) * 100.0).round() as u32
            }
            _ => 0,
        }
    }
}
