//! Completed-session log, newest first.

use serde::{Deserialize, Serialize};

use crate::timer::Mode;

/// Most sessions kept; older ones are dropped on append.
pub const MAX_HISTORY: usize = 100;

/// One finished countdown, work or break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub mode: Mode,
    /// Configured length of the mode when it completed, in seconds.
    #[serde(rename = "duration")]
    pub duration_secs: u64,
    /// Completion time, epoch milliseconds.
    pub completed_at: i64,
}

impl Session {
    pub fn duration_min(&self) -> u64 {
        self.duration_secs / 60
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    sessions: Vec<Session>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored sessions (already newest first), keeping the most
    /// recent [`MAX_HISTORY`].
    pub fn from_sessions(mut sessions: Vec<Session>) -> Self {
        sessions.truncate(MAX_HISTORY);
        Self { sessions }
    }

    /// Prepend `session`, dropping the oldest entry past the cap.
    pub fn push(&mut self, session: Session) {
        self.sessions.insert(0, session);
        self.sessions.truncate(MAX_HISTORY);
    }

    pub fn clear(&mut self) {
        self.sessions.clear();
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn latest(&self) -> Option<&Session> {
        self.sessions.first()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Session> {
        self.sessions.iter()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Session;
    type IntoIter = std::slice::Iter<'a, Session>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
