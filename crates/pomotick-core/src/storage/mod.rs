mod history;
mod persistence;
mod settings;

pub use history::{History, Session, MAX_HISTORY};
pub use persistence::{
    Persistence, PersistedState, COMPLETED_KEY, SESSIONS_KEY, SETTINGS_KEY,
};
pub use settings::{
    parse_duration_input, parse_flag_input, parse_interval_input, Settings, MAX_LONG_BREAK_INTERVAL,
    MAX_LONG_BREAK_MINUTES, MAX_SHORT_BREAK_MINUTES, MAX_WORK_MINUTES,
};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Durable string key-value store (the browser's local storage, a
/// directory of files, or a map in tests).
///
/// There are no transactions across keys; each key is read and written
/// on its own.
pub trait KeyValueStore {
    /// Stored text for `key`, or `None` when absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Replace the text stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the default data directory.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn open_default() -> Result<Self, StorageError> {
        Ok(Self::new(data_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| StorageError::DirUnavailable {
            path: self.dir.clone(),
            source,
        })?;
        std::fs::write(self.path_for(key), value).map_err(|source| StorageError::WriteFailed {
            key: key.to_string(),
            source,
        })
    }
}

/// Returns `~/.config/pomotick[-dev]/` based on POMOTICK_ENV.
///
/// Set POMOTICK_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMOTICK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomotick-dev")
    } else {
        base_dir.join("pomotick")
    };

    std::fs::create_dir_all(&dir).map_err(|source| StorageError::DirUnavailable {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_get_set() {
        let mut store = MemoryStore::new();
        assert!(store.get("a").is_none());
        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").as_deref(), Some("2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn file_store_writes_one_file_per_key() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested");
        let mut store = FileStore::new(&dir);

        assert!(store.get(SETTINGS_KEY).is_none());
        store.set(SETTINGS_KEY, "{}").unwrap();
        store.set(COMPLETED_KEY, "3").unwrap();

        assert!(dir.join("pomodoro_settings.json").exists());
        assert_eq!(store.get(COMPLETED_KEY).as_deref(), Some("3"));
        assert_eq!(FileStore::new(&dir).get(SETTINGS_KEY).as_deref(), Some("{}"));
    }

    #[test]
    fn file_store_reports_unwritable_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let mut store = FileStore::new(blocker.join("sub"));
        assert!(store.set("k", "v").is_err());
    }
}
