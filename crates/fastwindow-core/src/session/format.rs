//! Display formatting for durations and clock times.

use chrono::{DateTime, TimeZone, Utc};

/// `HH:MM:SS`, each field zero-padded to two digits. Hours grow past two
/// digits if needed. Negative input is treated as zero.
pub fn format_duration(total_secs: i64) -> String {
    let total = total_secs.max(0);
    let hrs = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hrs:02}:{mins:02}:{secs:02}")
}

/// `HH:MM`, dropping seconds.
pub fn format_duration_short(total_secs: i64) -> String {
    let total = total_secs.max(0);
    format!("{:02}:{:02}", total / 3600, (total % 3600) / 60)
}

/// Local `HH:MM` for a timestamp, `--:--` when absent.
pub fn format_clock<Tz: TimeZone>(ts: Option<DateTime<Utc>>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match ts {
        Some(ts) => ts.with_timezone(tz).format("%H:%M").to_string(),
        None => "--:--".to_string(),
    }
}
