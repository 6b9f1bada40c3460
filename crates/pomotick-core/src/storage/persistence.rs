//! Write-through mirror of settings, history and the completed count.
//!
//! Three independent keys are used so a failed or interrupted write only
//! ever affects one of them. Reads degrade per key: an absent or corrupt
//! entry loads as that key's default and leaves the others alone. Writes
//! are best-effort; failures are logged and the in-memory state stays
//! authoritative.

use tracing::{debug, warn};

use super::{History, KeyValueStore, Session, Settings};

pub const SETTINGS_KEY: &str = "pomodoro_settings";
pub const SESSIONS_KEY: &str = "pomodoro_sessions";
pub const COMPLETED_KEY: &str = "pomodoro_completed";

/// Everything read back from the store at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    pub settings: Settings,
    pub history: History,
    pub completed: u32,
}

#[derive(Debug)]
pub struct Persistence<K> {
    store: K,
}

impl<K: KeyValueStore> Persistence<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut K {
        &mut self.store
    }

    /// Read all three keys, defaulting each one independently.
    pub fn load(&self) -> PersistedState {
        PersistedState {
            settings: self.load_settings(),
            history: self.load_history(),
            completed: self.load_completed(),
        }
    }

    pub fn load_settings(&self) -> Settings {
        match self.store.get(SETTINGS_KEY) {
            None => Settings::default(),
            Some(text) => Settings::from_json_lenient(&text).unwrap_or_else(|| {
                warn!(key = SETTINGS_KEY, "stored settings unreadable, using defaults");
                Settings::default()
            }),
        }
    }

    pub fn load_history(&self) -> History {
        match self.store.get(SESSIONS_KEY) {
            None => History::new(),
            Some(text) => match serde_json::from_str::<Vec<Session>>(&text) {
                Ok(sessions) => History::from_sessions(sessions),
                Err(e) => {
                    warn!(key = SESSIONS_KEY, error = %e, "stored sessions unreadable, starting empty");
                    History::new()
                }
            },
        }
    }

    pub fn load_completed(&self) -> u32 {
        let Some(text) = self.store.get(COMPLETED_KEY) else {
            return 0;
        };
        let parsed = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|v| v.as_u64())
            .and_then(|n| u32::try_from(n).ok());
        parsed.unwrap_or_else(|| {
            warn!(key = COMPLETED_KEY, "stored completed count unreadable, using 0");
            0
        })
    }

    pub fn save_settings(&mut self, settings: &Settings) {
        self.write_json(SETTINGS_KEY, settings);
    }

    pub fn save_history(&mut self, history: &History) {
        self.write_json(SESSIONS_KEY, history);
    }

    pub fn save_completed(&mut self, completed: u32) {
        self.write_json(COMPLETED_KEY, &completed);
    }

    fn write_json<T: serde::Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let text = match serde_json::to_string(value) {
            Ok(text) => text,
            Err(e) => {
                warn!(key, error = %e, "failed to encode value, skipping write");
                return;
            }
        };
        match self.store.set(key, &text) {
            Ok(()) => debug!(key, bytes = text.len(), "persisted"),
            Err(e) => warn!(key, error = %e, "persist failed, keeping in-memory state"),
        }
    }
}
