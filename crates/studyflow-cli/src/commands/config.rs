use std::path::PathBuf;

use clap::Subcommand;
use studyflow_core::RoutineConfig;

use super::load_routine_config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective routine config
    Show {
        /// Routine config TOML file; defaults are shown when omitted
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the default routine config as TOML
    Defaults,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show { config } => {
            let routine = load_routine_config(config.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&routine)?);
        }
        ConfigAction::Defaults => {
            print!("{}", toml::to_string_pretty(&RoutineConfig::default())?);
        }
    }
    Ok(())
}
