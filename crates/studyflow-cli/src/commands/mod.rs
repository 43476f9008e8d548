pub mod config;
pub mod optimize;
pub mod schedule;

use std::path::Path;

use studyflow_core::{RoutineConfig, TimeBlock};

/// Load a routine config from a TOML file, or defaults when no path given.
pub fn load_routine_config(path: Option<&Path>) -> Result<RoutineConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&text)?)
        }
        None => Ok(RoutineConfig::default()),
    }
}

/// Load class blocks from a JSON file (array of time blocks), empty when no
/// path given.
pub fn load_class_blocks(path: Option<&Path>) -> Result<Vec<TimeBlock>, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(Vec::new()),
    }
}
