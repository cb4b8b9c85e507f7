use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

const DEFAULT_LOG_DIRECTIVES: &str = "warn";

#[derive(Parser)]
#[command(name = "studyplan-cli", version, about = "Studyplan CLI")]
struct Cli {
    /// Use this config file instead of ~/.config/studyplan/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest study sessions around the class timetable
    Plan(commands::plan::PlanArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Plan(args) => commands::plan::run(args, config_path),
        Commands::Config { action } => commands::config::run(action, config_path),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
