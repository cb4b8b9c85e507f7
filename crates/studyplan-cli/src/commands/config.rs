use std::path::Path;

use clap::Subcommand;
use studyplan_core::Config;

use super::{load_config, save_config};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "scheduler.days_to_schedule")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(action: ConfigAction, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = load_config(path)?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = load_config(path)?;
            config.set(&key, &value)?;
            save_config(&config, path)?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = load_config(path)?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            save_config(&Config::default(), path)?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
