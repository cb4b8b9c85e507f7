pub mod config;
pub mod plan;

use std::path::Path;

use studyplan_core::Config;

/// Load the config from an explicit path (defaults if missing) or the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) if path.exists() => Config::load_from(path)?,
        Some(_) => Config::default(),
        None => Config::load()?,
    };
    Ok(config)
}

/// Persist the config to an explicit path or the default location.
pub fn save_config(config: &Config, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(path) => config.save_to(path)?,
        None => config.save()?,
    }
    Ok(())
}
