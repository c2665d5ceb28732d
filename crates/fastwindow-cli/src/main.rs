use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "fastwindow", version, about = "Intermittent fasting tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start, follow and end a fast
    Fast {
        #[command(subcommand)]
        action: commands::fast::FastAction,
    },
    /// Fasting plan selection
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Completed fast records and calendar
    Record {
        #[command(subcommand)]
        action: commands::record::RecordAction,
    },
    /// Clear stored data
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fastwindow=warn,fastwindow_core=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Fast { action } => commands::fast::run(action),
        Commands::Plan { action } => commands::plan::run(action),
        Commands::Record { action } => commands::record::run(action),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
