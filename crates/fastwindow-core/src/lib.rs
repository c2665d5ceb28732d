//! # Fastwindow Core Library
//!
//! This library provides the core logic for the Fastwindow intermittent
//! fasting tracker. All operations are available through the standalone
//! `fastwindow` CLI, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Session**: A wall-clock-based state machine for one fast; the caller
//!   invokes `tick()` periodically and passes the current time in
//! - **Records**: Completed fasts keyed by local calendar date
//! - **Plans**: The fixed table of fasting windows and the selected plan
//! - **Calendar**: Month grid and monthly summary derived from records
//! - **Storage**: SQLite-backed key-value slots and TOML configuration
//!
//! ## Key Components
//!
//! - [`FastSession`]: Session state machine
//! - [`FastingRepository`]: Owner of every persisted slot
//! - [`Database`]: SQLite slot storage
//! - [`Config`]: Application configuration management

pub mod calendar;
pub mod error;
pub mod events;
pub mod plan;
pub mod records;
pub mod repository;
pub mod session;
pub mod storage;

pub use calendar::{build_month_grid, DayCell, MonthGrid, MonthSummary, YearMonth};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use plan::{default_plan, find_plan, plans, FastingPlan, DEFAULT_PLAN_ID};
pub use records::{duration_from_hours, FastingRecord, MAX_RECORD_HOURS};
pub use repository::FastingRepository;
pub use session::{format_clock, format_duration, format_duration_short, FastSession, SessionState};
pub use storage::{Config, Database, KvStore, MemoryStore};
