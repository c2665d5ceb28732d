//! Completed fast records.
//!
//! The JSON shape (`date`, `startTime`, `endTime` in epoch milliseconds,
//! `durationHours`) is the format of the `fasting_records` slot.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Longest fast accepted when entered by hand.
pub const MAX_RECORD_HOURS: f64 = 7.0 * 24.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FastingRecord {
    /// Local calendar date the fast started on.
    pub date: NaiveDate,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub end_time: DateTime<Utc>,
    /// Rounded to one decimal.
    pub duration_hours: f64,
}

impl FastingRecord {
    /// Build a record for the span `start..end`, dated in `tz`.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidTimeRange`] if `end` is before `start`.
    pub fn from_span<Tz: TimeZone>(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        tz: &Tz,
    ) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        let duration_ms = (end - start).num_milliseconds();
        Ok(Self {
            date: start.with_timezone(tz).date_naive(),
            start_time: start,
            end_time: end,
            duration_hours: round_hours(duration_ms as f64 / 3_600_000.0),
        })
    }

    /// Build a record from a local wall-clock start on `date`.
    ///
    /// Used for fasts entered by hand. A start time that falls in a DST gap
    /// is rejected; an ambiguous one resolves to the earlier instant.
    pub fn from_local<Tz: TimeZone>(
        date: NaiveDate,
        start: NaiveTime,
        duration: Duration,
        tz: &Tz,
    ) -> Result<Self, ValidationError> {
        if duration < Duration::zero() {
            return Err(ValidationError::InvalidValue {
                field: "duration".into(),
                message: "must not be negative".into(),
            });
        }
        let start_at = tz
            .from_local_datetime(&date.and_time(start))
            .earliest()
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "start".into(),
                message: format!("{date} {start} does not exist in the local time zone"),
            })?
            .with_timezone(&Utc);
        let end_at = start_at.checked_add_signed(duration).ok_or_else(|| {
            ValidationError::InvalidValue {
                field: "duration".into(),
                message: "end time is out of range".into(),
            }
        })?;
        Self::from_span(start_at, end_at, tz)
    }

    pub fn is_in_month(&self, year: i32, month: u32) -> bool {
        self.date.year() == year && self.date.month() == month
    }
}

/// Convert an hour count entered by hand into a duration.
///
/// # Errors
/// Returns [`ValidationError::InvalidValue`] unless `0 < hours <=`
/// [`MAX_RECORD_HOURS`].
pub fn duration_from_hours(hours: f64) -> Result<Duration, ValidationError> {
    if !hours.is_finite() || hours <= 0.0 || hours > MAX_RECORD_HOURS {
        return Err(ValidationError::InvalidValue {
            field: "hours".into(),
            message: format!("must be greater than 0 and at most {MAX_RECORD_HOURS}"),
        });
    }
    Ok(Duration::milliseconds((hours * 3_600_000.0).round() as i64))
}

/// Round to one decimal place.
pub fn round_hours(hours: f64) -> f64 {
    (hours * 10.0).round() / 10.0
}

/// Order newest date first. Records sharing a date keep their insertion order.
pub fn sort_newest_first(records: &mut [FastingRecord]) {
    records.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn t(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    #[test]
    fn five_hour_span_is_five_hours() {
        let start = t(1_706_000_000_000);
        let record = FastingRecord::from_span(start, start + Duration::hours(5), &Utc).unwrap();
        assert_eq!(record.duration_hours, 5.0);
    }

    #[test]
    fn duration_rounds_to_one_decimal() {
        let start = t(0);
        // 16h 20m = 16.333..h
        let record =
            FastingRecord::from_span(start, start + Duration::minutes(980), &Utc).unwrap();
        assert_eq!(record.duration_hours, 16.3);
        // 15h 58m = 15.966..h
        let record =
            FastingRecord::from_span(start, start + Duration::minutes(958), &Utc).unwrap();
        assert_eq!(record.duration_hours, 16.0);
    }

    #[test]
    fn date_follows_local_zone_of_start() {
        // 2024-03-01T23:30Z is already March 2nd at UTC+9.
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 23, 30, 0).unwrap();
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let record = FastingRecord::from_span(start, start + Duration::hours(16), &tokyo).unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());

        let record = FastingRecord::from_span(start, start + Duration::hours(16), &Utc).unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn reversed_span_is_rejected() {
        let start = t(10_000);
        assert!(matches!(
            FastingRecord::from_span(start, t(0), &Utc),
            Err(ValidationError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn from_local_uses_wall_clock_start() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        let start = NaiveTime::from_hms_opt(20, 0, 0).unwrap();
        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
        let record =
            FastingRecord::from_local(date, start, Duration::hours(18), &minus_five).unwrap();
        assert_eq!(record.date, date);
        assert_eq!(
            record.start_time,
            Utc.with_ymd_and_hms(2024, 2, 11, 1, 0, 0).unwrap()
        );
        assert_eq!(record.duration_hours, 18.0);
    }

    #[test]
    fn hand_entered_hours_are_bounded() {
        assert_eq!(duration_from_hours(16.5).unwrap(), Duration::minutes(990));
        assert_eq!(
            duration_from_hours(MAX_RECORD_HOURS).unwrap(),
            Duration::hours(168)
        );
        for bad in [0.0, -1.0, 168.1, 1e12, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                duration_from_hours(bad),
                Err(ValidationError::InvalidValue { .. })
            ));
        }
    }

    #[test]
    fn from_local_rejects_end_out_of_range() {
        let date = NaiveDate::MAX;
        let start = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
        assert!(matches!(
            FastingRecord::from_local(date, start, Duration::days(2), &Utc),
            Err(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn json_uses_slot_field_names() {
        let record = FastingRecord::from_span(t(0), t(3_600_000), &Utc).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["date"], "1970-01-01");
        assert_eq!(json["startTime"], 0);
        assert_eq!(json["endTime"], 3_600_000);
        assert_eq!(json["durationHours"], 1.0);
    }

    #[test]
    fn parses_existing_slot_payload() {
        let raw = r#"[{"date":"2025-01-05","startTime":1736060400000,"endTime":1736118000000,"durationHours":16}]"#;
        let records: Vec<FastingRecord> = serde_json::from_str(raw).unwrap();
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
        assert_eq!(records[0].duration_hours, 16.0);
    }

    #[test]
    fn sort_is_newest_first_and_stable() {
        let day = |d: u32, h: i64| {
            let start = Utc.with_ymd_and_hms(2024, 5, d, 8, 0, 0).unwrap();
            FastingRecord::from_span(start, start + Duration::hours(h), &Utc).unwrap()
        };
        let mut records = vec![day(3, 1), day(9, 2), day(3, 3), day(1, 4)];
        sort_newest_first(&mut records);
        let order: Vec<(u32, f64)> = records
            .iter()
            .map(|r| (r.date.day(), r.duration_hours))
            .collect();
        assert_eq!(order, vec![(9, 2.0), (3, 1.0), (3, 3.0), (1, 4.0)]);
    }
}
