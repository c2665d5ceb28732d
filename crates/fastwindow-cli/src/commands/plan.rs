use clap::Subcommand;
use fastwindow_core::{plans, Config, FastingPlan};
use serde::Serialize;

use super::{open_repository, print_json, CliResult};

#[derive(Subcommand)]
pub enum PlanAction {
    /// List available plans
    List,
    /// Show the selected plan
    Show,
    /// Select the plan used for the next fast
    Select {
        /// Plan id (e.g. "16:8", "18:6", "20:4")
        id: String,
    },
}

#[derive(Serialize)]
struct PlanEntry {
    #[serde(flatten)]
    plan: FastingPlan,
    selected: bool,
}

pub fn run(action: PlanAction) -> CliResult {
    let config = Config::load()?;
    let repo = open_repository(&config)?;

    match action {
        PlanAction::List => {
            let selected = repo.selected_plan().id;
            let entries: Vec<PlanEntry> = plans()
                .iter()
                .map(|plan| PlanEntry {
                    plan: *plan,
                    selected: plan.id == selected,
                })
                .collect();
            print_json(&entries)?;
        }
        PlanAction::Show => print_json(repo.selected_plan())?,
        PlanAction::Select { id } => {
            let plan = repo.select_plan(&id)?;
            println!("selected {} ({})", plan.id, plan.label);
            let session = repo.session();
            if session.is_active() && session.plan_id() != Some(plan.id) {
                eprintln!(
                    "note: the fast in progress keeps its {} window",
                    session.plan_id().unwrap_or("original")
                );
            }
        }
    }
    Ok(())
}
