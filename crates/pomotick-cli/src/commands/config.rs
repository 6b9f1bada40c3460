use clap::Subcommand;
use pomotick_core::{FileStore, Persistence, Settings};

use super::write_settings;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a settings value
    Get {
        /// Settings key (e.g. "workDuration", "autoStartBreaks")
        key: String,
    },
    /// Set a settings value
    Set {
        /// Settings key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
}

pub fn run(action: ConfigAction, store: FileStore) -> Result<(), Box<dyn std::error::Error>> {
    let mut persistence = Persistence::new(store);
    match action {
        ConfigAction::Get { key } => {
            let settings = persistence.load_settings();
            match settings.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut settings = persistence.load_settings();
            settings.set(&key, &value)?;
            write_settings(persistence.store_mut(), &settings)?;
            // Echo the stored value; numeric input may have been coerced.
            println!("{key} = {}", settings.get(&key).unwrap_or_default());
        }
        ConfigAction::List => {
            let settings = persistence.load_settings();
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        ConfigAction::Reset => {
            write_settings(persistence.store_mut(), &Settings::default())?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
