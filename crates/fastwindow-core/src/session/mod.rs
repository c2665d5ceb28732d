mod engine;
mod format;

pub use engine::{FastSession, SessionState};
pub use format::{format_clock, format_duration, format_duration_short};
