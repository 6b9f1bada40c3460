use serde::{Deserialize, Serialize};

/// Interval type the timer is counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    Work,
    ShortBreak,
    LongBreak,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Work, Mode::ShortBreak, Mode::LongBreak];

    pub fn is_break(self) -> bool {
        !matches!(self, Mode::Work)
    }

    /// Label shown under the clock face.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Work => "Focus Time",
            Mode::ShortBreak => "Short Break",
            Mode::LongBreak => "Long Break",
        }
    }

    /// Label used for entries in the session history.
    pub fn history_label(self) -> &'static str {
        match self {
            Mode::Work => "Focus Session",
            Mode::ShortBreak => "Short Break",
            Mode::LongBreak => "Long Break",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_storage_names() {
        assert_eq!(serde_json::to_string(&Mode::Work).unwrap(), "\"work\"");
        assert_eq!(
            serde_json::to_string(&Mode::ShortBreak).unwrap(),
            "\"shortBreak\""
        );
        assert_eq!(
            serde_json::from_str::<Mode>("\"longBreak\"").unwrap(),
            Mode::LongBreak
        );
    }

    #[test]
    fn only_work_is_not_a_break() {
        assert!(!Mode::Work.is_break());
        assert!(Mode::ShortBreak.is_break());
        assert!(Mode::LongBreak.is_break());
    }
}
