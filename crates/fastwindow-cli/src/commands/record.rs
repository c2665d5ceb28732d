use chrono::{Datelike, Local, NaiveDate, NaiveTime};
use clap::Subcommand;
use fastwindow_core::{
    build_month_grid, duration_from_hours, format_clock, Config, DayCell, FastingRecord, MonthGrid,
    YearMonth,
};
use serde_json::json;

use super::{open_repository, print_json, CliResult};

#[derive(Subcommand)]
pub enum RecordAction {
    /// List all records, newest first
    List,
    /// Show the record for a date
    Show {
        /// Date (YYYY-MM-DD)
        date: NaiveDate,
    },
    /// Show a month calendar with recorded days marked
    Month {
        /// Month (YYYY-MM), defaults to the current month
        month: Option<YearMonth>,
        /// Print the grid as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete the records for a date
    Delete {
        /// Date (YYYY-MM-DD)
        date: NaiveDate,
    },
    /// Add a fast by hand
    Add {
        /// Date the fast started (YYYY-MM-DD)
        date: NaiveDate,
        /// Local start time (HH:MM)
        #[arg(long, value_parser = parse_clock)]
        start: NaiveTime,
        /// Fast length in hours
        #[arg(long)]
        hours: f64,
    },
}

fn parse_clock(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| format!("expected HH:MM: {e}"))
}

pub fn run(action: RecordAction) -> CliResult {
    let config = Config::load()?;
    let repo = open_repository(&config)?;

    match action {
        RecordAction::List => print_json(&repo.records())?,
        RecordAction::Show { date } => match repo.query(date) {
            Some(record) => print_json(&record)?,
            None => return Err(format!("no record on {date}").into()),
        },
        RecordAction::Month { month, json } => {
            let month = month.unwrap_or_else(|| YearMonth::from_date(Local::now().date_naive()));
            let records = repo.records();
            let grid = build_month_grid(month, &records);
            if json {
                let cells: Vec<DayCell<'_>> = grid.cells().collect();
                print_json(&json!({
                    "month": month.to_string(),
                    "label": month.label(),
                    "leading_blanks": month.leading_blanks(),
                    "days": month.days_in_month(),
                    "cells": cells,
                    "summary": grid.summary(),
                }))?;
            } else {
                print!("{}", render_calendar(&grid));
            }
        }
        RecordAction::Delete { date } => {
            let removed = repo.remove_records(date)?;
            if removed == 0 {
                return Err(format!("no record on {date}").into());
            }
            println!("deleted {removed} record(s) on {date}");
        }
        RecordAction::Add { date, start, hours } => {
            let duration = duration_from_hours(hours)?;
            let record = FastingRecord::from_local(date, start, duration, &Local)?;
            repo.append_record(record.clone())?;
            println!(
                "saved {} {} -> {} ({}h)",
                record.date,
                format_clock(Some(record.start_time), &Local),
                format_clock(Some(record.end_time), &Local),
                record.duration_hours
            );
        }
    }
    Ok(())
}

/// Sunday-first text calendar. Recorded days are marked with `*`.
fn render_calendar(grid: &MonthGrid<'_>) -> String {
    let mut out = String::new();
    let month = grid.month();
    out.push_str(&format!("{:^28}\n", month.label()));
    out.push_str(" Sun Mon Tue Wed Thu Fri Sat\n");
    for week in grid.weeks() {
        for cell in week {
            match cell {
                DayCell::Blank => out.push_str("    "),
                DayCell::Day { date, record } => {
                    let mark = if record.is_some() { '*' } else { ' ' };
                    out.push_str(&format!(" {:>2}{mark}", date.day()));
                }
            }
        }
        out.push('\n');
    }

    let summary = grid.summary();
    out.push_str(&format!("\nFasts this month: {}\n", summary.fasts));
    if let Some(avg) = summary.average_hours {
        out.push_str(&format!("Avg duration: {avg:.1}h\n"));
    }
    out
}
