use clap::Subcommand;
use fastwindow_core::Config;

use super::{open_repository, CliResult};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Delete every fasting record
    ClearRecords {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Delete records, plan selection and any fast in progress
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: SettingsAction) -> CliResult {
    let config = Config::load()?;
    let repo = open_repository(&config)?;

    match action {
        SettingsAction::ClearRecords { yes } => {
            if !yes {
                return Err("this deletes all fasting records; pass --yes to confirm".into());
            }
            repo.clear_records()?;
            println!("all records have been cleared");
        }
        SettingsAction::Reset { yes } => {
            if !yes {
                return Err(
                    "this deletes all records and the plan selection; pass --yes to confirm"
                        .into(),
                );
            }
            repo.reset_all()?;
            println!("all data has been reset");
        }
    }
    Ok(())
}
