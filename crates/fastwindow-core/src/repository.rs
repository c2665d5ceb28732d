//! The single owner of every persisted slot.
//!
//! Create one [`FastingRepository`] per process and pass it by reference.
//! Display reads fail closed: a missing, unreadable or malformed slot is
//! logged and treated as empty. Mutations read through [`load_records`]
//! instead and abort on the same failures, so a bad read never becomes the
//! base of a write. Writes are logged on failure and returned as errors so
//! callers only confirm success once the write has landed.
//!
//! [`load_records`]: FastingRepository::load_records

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tracing::{debug, error, warn};

use crate::calendar::{MonthSummary, YearMonth};
use crate::error::{CoreError, DatabaseError, Result, ValidationError};
use crate::events::Event;
use crate::plan::{default_plan, find_plan, FastingPlan};
use crate::records::{sort_newest_first, FastingRecord};
use crate::session::FastSession;
use crate::storage::KvStore;

pub const RECORDS_KEY: &str = "fasting_records";
pub const SELECTED_PLAN_KEY: &str = "selected_fasting_plan";
pub const SESSION_KEY: &str = "active_fast_session";

pub struct FastingRepository<S: KvStore> {
    store: S,
    /// Plan reported when nothing has been selected.
    fallback_plan: &'static FastingPlan,
}

impl<S: KvStore> FastingRepository<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            fallback_plan: default_plan(),
        }
    }

    /// Use `plan_id` instead of 16:8 when no plan has been selected.
    pub fn with_fallback_plan(mut self, plan_id: &str) -> Result<Self> {
        self.fallback_plan =
            find_plan(plan_id).ok_or_else(|| ValidationError::UnknownPlan(plan_id.into()))?;
        Ok(self)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read_slot(&self, key: &str) -> Option<String> {
        match self.store.kv_get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "storage read failed, treating slot as empty");
                None
            }
        }
    }

    fn write_slot(&self, key: &str, value: &str) -> Result<()> {
        self.store.kv_set(key, value).map_err(|e| {
            error!(key, error = %e, "storage write failed");
            CoreError::from(e)
        })
    }

    fn remove_slot(&self, key: &str) -> Result<()> {
        self.store.kv_remove(key).map_err(|e: DatabaseError| {
            error!(key, error = %e, "storage remove failed");
            CoreError::from(e)
        })
    }
}

// ── Records ──────────────────────────────────────────────────────────

impl<S: KvStore> FastingRepository<S> {
    /// All records, newest date first.
    pub fn records(&self) -> Vec<FastingRecord> {
        let Some(raw) = self.read_slot(RECORDS_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<FastingRecord>>(&raw) {
            Ok(mut records) => {
                sort_newest_first(&mut records);
                records
            }
            Err(e) => {
                warn!(error = %e, "malformed record payload, treating store as empty");
                Vec::new()
            }
        }
    }

    /// All records for a read-modify-write. Read and parse failures are
    /// returned instead of being treated as an empty store.
    pub fn load_records(&self) -> Result<Vec<FastingRecord>> {
        let raw = self.store.kv_get(RECORDS_KEY).map_err(|e| {
            error!(key = RECORDS_KEY, error = %e, "storage read failed");
            CoreError::from(e)
        })?;
        let Some(raw) = raw else {
            return Ok(Vec::new());
        };
        let mut records: Vec<FastingRecord> = serde_json::from_str(&raw).map_err(|e| {
            error!(error = %e, "malformed record payload, refusing to overwrite");
            CoreError::from(e)
        })?;
        sort_newest_first(&mut records);
        Ok(records)
    }

    fn write_records(&self, records: &[FastingRecord]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.write_slot(RECORDS_KEY, &json)
    }

    /// Add a record. Records on an existing date are kept alongside it.
    pub fn append_record(&self, record: FastingRecord) -> Result<()> {
        let mut records = self.load_records()?;
        debug!(date = %record.date, hours = record.duration_hours, "appending record");
        records.push(record);
        sort_newest_first(&mut records);
        self.write_records(&records)
    }

    /// Remove every record on `date`. Returns how many were removed.
    pub fn remove_records(&self, date: NaiveDate) -> Result<usize> {
        let mut records = self.load_records()?;
        let before = records.len();
        records.retain(|r| r.date != date);
        let removed = before - records.len();
        if removed > 0 {
            self.write_records(&records)?;
        }
        debug!(%date, removed, "removed records");
        Ok(removed)
    }

    pub fn clear_records(&self) -> Result<()> {
        debug!("clearing all records");
        self.remove_slot(RECORDS_KEY)
    }

    /// First record on `date`.
    pub fn query(&self, date: NaiveDate) -> Option<FastingRecord> {
        self.records().into_iter().find(|r| r.date == date)
    }

    pub fn query_month(&self, year: i32, month: u32) -> Vec<FastingRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.is_in_month(year, month))
            .collect()
    }

    pub fn month_summary(&self, month: YearMonth) -> MonthSummary {
        MonthSummary::for_month(month, &self.records())
    }
}

// ── Plan selection ───────────────────────────────────────────────────

impl<S: KvStore> FastingRepository<S> {
    /// The selected plan, or the fallback when none is stored.
    pub fn selected_plan(&self) -> &'static FastingPlan {
        match self.read_slot(SELECTED_PLAN_KEY) {
            Some(id) => find_plan(&id).unwrap_or_else(|| {
                warn!(id = %id, "stored plan is unknown, using fallback");
                self.fallback_plan
            }),
            None => self.fallback_plan,
        }
    }

    pub fn select_plan(&self, plan_id: &str) -> Result<&'static FastingPlan> {
        let plan =
            find_plan(plan_id).ok_or_else(|| ValidationError::UnknownPlan(plan_id.into()))?;
        self.write_slot(SELECTED_PLAN_KEY, plan.id)?;
        debug!(plan = plan.id, "plan selected");
        Ok(plan)
    }
}

// ── Session ──────────────────────────────────────────────────────────

impl<S: KvStore> FastingRepository<S> {
    /// The persisted session, idle if none.
    pub fn session(&self) -> FastSession {
        let Some(raw) = self.read_slot(SESSION_KEY) else {
            return FastSession::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "malformed session payload, treating as idle");
            FastSession::new()
        })
    }

    pub fn save_session(&self, session: &FastSession) -> Result<()> {
        if session.is_active() {
            let json = serde_json::to_string(session)?;
            self.write_slot(SESSION_KEY, &json)
        } else {
            self.remove_slot(SESSION_KEY)
        }
    }

    /// Start a fast with the selected plan. `None` if one is already active.
    pub fn start_fast(&self, now: DateTime<Utc>) -> Result<Option<Event>> {
        let mut session = self.session();
        let Some(event) = session.start(self.selected_plan(), now) else {
            return Ok(None);
        };
        self.save_session(&session)?;
        Ok(Some(event))
    }

    /// Tick the persisted session and store any state change.
    pub fn refresh_session(&self, now: DateTime<Utc>) -> Result<(FastSession, Option<Event>)> {
        let mut session = self.session();
        let event = session.tick(now);
        if event.is_some() {
            self.save_session(&session)?;
        }
        Ok((session, event))
    }

    /// End the active fast and store its record.
    ///
    /// The session is cleared only after the record has been written, so a
    /// failed write leaves the fast in place to retry. A retry after the
    /// record landed but the session clear failed does not store the record
    /// twice: a record with the same start is treated as already written.
    pub fn end_fast<Tz: TimeZone>(&self, now: DateTime<Utc>, tz: &Tz) -> Result<Option<Event>> {
        let mut session = self.session();
        session.tick(now);
        let completed = session.state() == crate::session::SessionState::Completed;
        if !session.is_active() {
            return Ok(None);
        }
        let Some(ended) = session.end(now, tz) else {
            self.save_session(&session)?;
            return Ok(None);
        };
        let stored = self
            .load_records()?
            .into_iter()
            .find(|r| r.start_time == ended.start_time);
        let record = match stored {
            Some(record) => {
                debug!(date = %record.date, "record for this fast already stored");
                record
            }
            None => {
                self.append_record(ended.clone())?;
                ended
            }
        };
        self.save_session(&session)?;
        Ok(Some(Event::FastEnded {
            record,
            completed,
            at: now,
        }))
    }

    pub fn cancel_fast(&self, now: DateTime<Utc>) -> Result<Option<Event>> {
        let mut session = self.session();
        let event = session.cancel(now);
        if event.is_some() {
            self.save_session(&session)?;
        }
        Ok(event)
    }

    /// Build a display snapshot of the persisted session.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Event {
        self.session().snapshot(self.selected_plan(), now)
    }
}

// ── Settings ─────────────────────────────────────────────────────────

impl<S: KvStore> FastingRepository<S> {
    /// Remove records, plan selection and any active fast.
    pub fn reset_all(&self) -> Result<()> {
        debug!("resetting all data");
        self.remove_slot(RECORDS_KEY)?;
        self.remove_slot(SELECTED_PLAN_KEY)?;
        self.remove_slot(SESSION_KEY)
    }
}
