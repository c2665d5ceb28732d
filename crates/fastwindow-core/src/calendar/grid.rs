//! Month grid derivation for the record calendar.
//!
//! The grid is recomputed from the record list on every month change; it
//! holds only borrowed records and no derived state.

use chrono::NaiveDate;
use serde::Serialize;

use super::month::YearMonth;
use crate::records::{round_hours, FastingRecord};

/// One cell of a Sunday-first month grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DayCell<'a> {
    /// Padding before the 1st or after the last day.
    Blank,
    Day {
        date: NaiveDate,
        /// First record dated on this day, if any.
        record: Option<&'a FastingRecord>,
    },
}

impl<'a> DayCell<'a> {
    pub fn record(&self) -> Option<&'a FastingRecord> {
        match self {
            DayCell::Day { record, .. } => *record,
            DayCell::Blank => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, DayCell::Blank)
    }
}

/// A month laid out as day cells.
#[derive(Debug, Clone, Copy)]
pub struct MonthGrid<'a> {
    month: YearMonth,
    records: &'a [FastingRecord],
}

/// Build the grid for `month` over `records`.
pub fn build_month_grid(month: YearMonth, records: &[FastingRecord]) -> MonthGrid<'_> {
    MonthGrid { month, records }
}

impl<'a> MonthGrid<'a> {
    pub fn month(&self) -> YearMonth {
        self.month
    }

    /// Leading blanks followed by one cell per day. Each call starts over.
    pub fn cells(&self) -> impl Iterator<Item = DayCell<'a>> + Clone + 'a {
        let month = self.month;
        let records = self.records;
        let blanks = month.leading_blanks() as usize;
        std::iter::repeat(DayCell::Blank)
            .take(blanks)
            .chain((1..=month.days_in_month()).filter_map(move |day| {
                let date = month.date(day)?;
                Some(DayCell::Day {
                    date,
                    record: records.iter().find(|r| r.date == date),
                })
            }))
    }

    /// Cells grouped into weeks of seven, the last week padded with blanks.
    pub fn weeks(&self) -> Vec<Vec<DayCell<'a>>> {
        let mut weeks: Vec<Vec<DayCell<'a>>> = Vec::new();
        for (i, cell) in self.cells().enumerate() {
            if i % 7 == 0 {
                weeks.push(Vec::with_capacity(7));
            }
            if let Some(week) = weeks.last_mut() {
                week.push(cell);
            }
        }
        if let Some(last) = weeks.last_mut() {
            last.resize(7, DayCell::Blank);
        }
        weeks
    }

    pub fn summary(&self) -> MonthSummary {
        MonthSummary::for_month(self.month, self.records)
    }
}

/// Per-month totals shown under the calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub month: String,
    pub fasts: usize,
    /// Mean duration rounded to one decimal, absent for an empty month.
    pub average_hours: Option<f64>,
    pub total_hours: f64,
}

impl MonthSummary {
    pub fn for_month(month: YearMonth, records: &[FastingRecord]) -> Self {
        let in_month: Vec<&FastingRecord> =
            records.iter().filter(|r| month.contains(r.date)).collect();
        let total: f64 = in_month.iter().map(|r| r.duration_hours).sum();
        let average_hours = if in_month.is_empty() {
            None
        } else {
            Some(round_hours(total / in_month.len() as f64))
        };
        Self {
            month: month.to_string(),
            fasts: in_month.len(),
            average_hours,
            total_hours: round_hours(total),
        }
    }
}
