use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::records::FastingRecord;
use crate::session::SessionState;

/// Every session state change produces an Event.
/// The CLI prints them as JSON; the live view polls snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    FastStarted {
        plan_id: String,
        window_hours: u32,
        start_at: DateTime<Utc>,
        end_at: DateTime<Utc>,
    },
    /// The fasting window elapsed; the fast awaits an explicit end.
    FastCompleted {
        plan_id: String,
        end_at: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    FastEnded {
        record: FastingRecord,
        /// False when the fast was ended before its window elapsed.
        completed: bool,
        at: DateTime<Utc>,
    },
    FastCancelled {
        at: DateTime<Utc>,
    },
    SessionSnapshot {
        state: SessionState,
        plan_id: String,
        start_at: Option<DateTime<Utc>>,
        end_at: Option<DateTime<Utc>>,
        elapsed_secs: i64,
        remaining_secs: i64,
        /// `HH:MM:SS`
        elapsed: String,
        remaining: String,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}
