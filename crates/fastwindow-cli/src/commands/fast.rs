use std::io::Write;
use std::time::Duration;

use chrono::{Local, Utc};
use clap::Subcommand;
use fastwindow_core::{
    format_clock, format_duration, format_duration_short, Config, Database, Event, FastSession,
    FastingRepository, SessionState,
};
use tokio::time::MissedTickBehavior;

use super::{open_repository, print_json, CliResult};

#[derive(Subcommand)]
pub enum FastAction {
    /// Start a fast with the selected plan
    Start,
    /// Print current fast state as JSON
    Status,
    /// End the fast and save its record
    End,
    /// Discard the fast without saving a record
    Cancel,
    /// Show a live countdown until Ctrl-C
    Watch,
}

pub fn run(action: FastAction) -> CliResult {
    let config = Config::load()?;
    let repo = open_repository(&config)?;

    match action {
        FastAction::Start => match repo.start_fast(Utc::now())? {
            Some(event) => print_json(&event)?,
            None => return Err("a fast is already in progress".into()),
        },
        FastAction::Status => {
            let now = Utc::now();
            let (_, completed) = repo.refresh_session(now)?;
            print_json(&repo.snapshot(now))?;
            if let Some(event) = completed {
                print_json(&event)?;
            }
        }
        FastAction::End => match repo.end_fast(Utc::now(), &Local)? {
            Some(event) => print_json(&event)?,
            None => return Err("no fast in progress".into()),
        },
        FastAction::Cancel => match repo.cancel_fast(Utc::now())? {
            Some(event) => print_json(&event)?,
            None => return Err("no fast in progress".into()),
        },
        FastAction::Watch => watch(&repo, &config)?,
    }
    Ok(())
}

/// Redraw from the stored timestamps on every tick.
fn watch(repo: &FastingRepository<Database>, config: &Config) -> CliResult {
    if !repo.session().is_active() {
        let plan = repo.selected_plan();
        println!(
            "No fast in progress. Next fast: {} ({})",
            plan.id,
            format_duration(plan.window_secs())
        );
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let mut interval = tokio::time::interval(Duration::from_secs(config.timer.tick_secs.max(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => {
                    println!();
                    break;
                }
                _ = interval.tick() => {
                    let now = Utc::now();
                    let (session, event) = repo.refresh_session(now)?;
                    print!("\r{}", render_line(&session, now, config.display.show_seconds));
                    std::io::stdout().flush()?;

                    if let Some(Event::FastCompleted { plan_id, .. }) = event {
                        println!();
                        let bell = if config.notifications.completion_alert { "\x07" } else { "" };
                        println!("{bell}{plan_id} fast complete. Run `fastwindow fast end` to save it.");
                    }
                    if !session.is_active() {
                        println!();
                        break;
                    }
                }
            }
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

fn render_line(session: &FastSession, now: chrono::DateTime<Utc>, show_seconds: bool) -> String {
    let fmt: fn(i64) -> String = if show_seconds {
        format_duration
    } else {
        format_duration_short
    };
    let state = match session.state() {
        SessionState::Idle => "idle",
        SessionState::Running => "fasting",
        SessionState::Completed => "complete",
    };
    format!(
        "[{state}] {} {} -> {}  elapsed {}  remaining {}  {:>5.1}%",
        session.plan_id().unwrap_or("-"),
        format_clock(session.start_at(), &Local),
        format_clock(session.end_at(), &Local),
        fmt(session.elapsed_secs(now)),
        fmt(session.remaining_secs(now)),
        session.progress(now) * 100.0,
    )
}
