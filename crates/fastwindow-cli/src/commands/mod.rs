pub mod config;
pub mod fast;
pub mod plan;
pub mod record;
pub mod settings;

use std::error::Error;

use fastwindow_core::{find_plan, Config, Database, FastingRepository};
use serde::Serialize;

pub type CliResult<T = ()> = Result<T, Box<dyn Error>>;

/// Open the database and wrap it in the repository.
pub fn open_repository(config: &Config) -> CliResult<FastingRepository<Database>> {
    let repo = FastingRepository::new(Database::open()?);
    let fallback = &config.plans.default_plan;
    if find_plan(fallback).is_none() {
        tracing::warn!(plan = %fallback, "ignoring unknown plans.default_plan");
        return Ok(repo);
    }
    Ok(repo.with_fallback_plan(fallback)?)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
