//! Fasting session state machine.
//!
//! The session is wall-clock based. It stores the start and end instants
//! and derives elapsed/remaining from them on demand; nothing is counted
//! between ticks, so suspending the process loses no time. The caller passes
//! `now` into every operation and is responsible for calling `tick()`.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Completed -> Idle
//!            \______ end/cancel ___/
//! ```
//!
//! Reaching the end of the window only marks the session `Completed`; the
//! record is written when the user ends the fast.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::format::format_duration;
use crate::events::Event;
use crate::plan::FastingPlan;
use crate::records::FastingRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    /// Window elapsed but the user hasn't ended the fast yet.
    Completed,
}

/// One fast, in progress or not.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FastSession {
    state: SessionState,
    /// Plan the fast was started with.
    #[serde(default)]
    plan_id: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    start_at: Option<DateTime<Utc>>,
    /// Fixed at start; later plan changes do not move it.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    end_at: Option<DateTime<Utc>>,
}

impl FastSession {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Running or Completed.
    pub fn is_active(&self) -> bool {
        self.state != SessionState::Idle
    }

    pub fn plan_id(&self) -> Option<&str> {
        self.plan_id.as_deref()
    }

    pub fn start_at(&self) -> Option<DateTime<Utc>> {
        self.start_at
    }

    pub fn end_at(&self) -> Option<DateTime<Utc>> {
        self.end_at
    }

    /// Whole seconds since the start, never negative. Zero when idle.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> i64 {
        match self.start_at {
            Some(start) => (now - start).num_seconds().max(0),
            None => 0,
        }
    }

    /// Whole seconds until the end of the window, never negative.
    ///
    /// Zero when idle since no window is set. [`snapshot`](Self::snapshot)
    /// substitutes the display plan's full window for the idle screen.
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> i64 {
        match self.end_at {
            Some(end) => (end - now).num_seconds().max(0),
            None => 0,
        }
    }

    /// 0.0 ..= 1.0 of the window elapsed.
    pub fn progress(&self, now: DateTime<Utc>) -> f64 {
        let (Some(start), Some(end)) = (self.start_at, self.end_at) else {
            return 0.0;
        };
        let total = (end - start).num_milliseconds();
        if total <= 0 {
            return 1.0;
        }
        let done = (now - start).num_milliseconds().clamp(0, total);
        done as f64 / total as f64
    }

    /// Build a snapshot event for display.
    ///
    /// `display_plan` supplies the plan id and the full-window remaining time
    /// shown while idle.
    pub fn snapshot(&self, display_plan: &FastingPlan, now: DateTime<Utc>) -> Event {
        let (plan_id, remaining_secs) = if self.is_active() {
            (
                self.plan_id
                    .clone()
                    .unwrap_or_else(|| display_plan.id.to_string()),
                self.remaining_secs(now),
            )
        } else {
            (display_plan.id.to_string(), display_plan.window_secs())
        };
        let elapsed_secs = self.elapsed_secs(now);
        Event::SessionSnapshot {
            state: self.state,
            plan_id,
            start_at: self.start_at,
            end_at: self.end_at,
            elapsed_secs,
            remaining_secs,
            elapsed: format_duration(elapsed_secs),
            remaining: format_duration(remaining_secs),
            progress_pct: self.progress(now) * 100.0,
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a fast with `plan`. Returns `None` if one is already active.
    pub fn start(&mut self, plan: &FastingPlan, now: DateTime<Utc>) -> Option<Event> {
        if self.is_active() {
            return None;
        }
        let end_at = now + plan.window();
        self.state = SessionState::Running;
        self.plan_id = Some(plan.id.to_string());
        self.start_at = Some(now);
        self.end_at = Some(end_at);
        debug!(plan = plan.id, %end_at, "fast started");
        Some(Event::FastStarted {
            plan_id: plan.id.to_string(),
            window_hours: plan.window_hours,
            start_at: now,
            end_at,
        })
    }

    /// Call periodically. Returns `Some(Event::FastCompleted)` once, when the
    /// window has elapsed.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.state != SessionState::Running {
            return None;
        }
        let end_at = self.end_at?;
        if now < end_at {
            return None;
        }
        self.state = SessionState::Completed;
        debug!(%end_at, "fasting window elapsed");
        Some(Event::FastCompleted {
            plan_id: self.plan_id.clone().unwrap_or_default(),
            end_at,
            at: now,
        })
    }

    /// End the fast and return its record.
    ///
    /// The record ends at `now`, or at the end of the window if that came
    /// first. Returns `None` (and stays idle) when no fast is active.
    pub fn end<Tz: TimeZone>(&mut self, now: DateTime<Utc>, tz: &Tz) -> Option<FastingRecord> {
        if !self.is_active() {
            return None;
        }
        let bounds = self.start_at.zip(self.end_at);
        self.clear();
        let (start, end_at) = bounds?;
        let end = now.min(end_at).max(start);
        match FastingRecord::from_span(start, end, tz) {
            Ok(record) => {
                debug!(date = %record.date, hours = record.duration_hours, "fast ended");
                Some(record)
            }
            Err(e) => {
                warn!(error = %e, "discarding fast with invalid span");
                None
            }
        }
    }

    /// Discard the active fast without producing a record.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.is_active() {
            return None;
        }
        self.clear();
        debug!("fast cancelled");
        Some(Event::FastCancelled { at: now })
    }

    fn clear(&mut self) {
        self.state = SessionState::Idle;
        self.plan_id = None;
        self.start_at = None;
        self.end_at = None;
    }
}
