pub mod config;
pub mod history;
pub mod run;
pub mod stats;

use std::path::PathBuf;

use pomotick_core::storage::SETTINGS_KEY;
use pomotick_core::{FileStore, KeyValueStore, Settings};

/// Store rooted at `data_dir`, or at the default data directory.
pub fn open_store(data_dir: Option<PathBuf>) -> Result<FileStore, Box<dyn std::error::Error>> {
    match data_dir {
        Some(dir) => Ok(FileStore::new(dir)),
        None => Ok(FileStore::open_default()?),
    }
}

/// Write settings directly, surfacing failures to the user.
pub fn write_settings(
    store: &mut FileStore,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(settings)?;
    store.set(SETTINGS_KEY, &json)?;
    Ok(())
}
