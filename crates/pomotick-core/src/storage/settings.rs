//! User timer settings.
//!
//! Stored as a JSON object under the `pomodoro_settings` key with camelCase
//! field names. Every field has its own default so a partially written or
//! older entry still loads; a field with the wrong type falls back to its
//! default without discarding the rest of the object.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};
use crate::timer::Mode;

/// Largest accepted work duration from text input, in minutes.
pub const MAX_WORK_MINUTES: u32 = 60;
/// Largest accepted short break from text input, in minutes.
pub const MAX_SHORT_BREAK_MINUTES: u32 = 30;
/// Largest accepted long break from text input, in minutes.
pub const MAX_LONG_BREAK_MINUTES: u32 = 60;
/// Largest accepted long break interval from text input.
pub const MAX_LONG_BREAK_INTERVAL: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_work_duration")]
    pub work_duration: u32,
    #[serde(default = "default_short_break")]
    pub short_break_duration: u32,
    #[serde(default = "default_long_break")]
    pub long_break_duration: u32,
    /// Work sessions between long breaks.
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
    #[serde(default)]
    pub auto_start_breaks: bool,
    #[serde(default)]
    pub auto_start_work: bool,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
}

fn default_work_duration() -> u32 {
    25
}
fn default_short_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    15
}
fn default_long_break_interval() -> u32 {
    4
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_duration: default_work_duration(),
            short_break_duration: default_short_break(),
            long_break_duration: default_long_break(),
            long_break_interval: default_long_break_interval(),
            auto_start_breaks: false,
            auto_start_work: false,
            sound_enabled: true,
        }
    }
}

impl Settings {
    /// Configured minutes for `mode`, never less than 1.
    pub fn duration_minutes(&self, mode: Mode) -> u32 {
        let minutes = match mode {
            Mode::Work => self.work_duration,
            Mode::ShortBreak => self.short_break_duration,
            Mode::LongBreak => self.long_break_duration,
        };
        minutes.max(1)
    }

    /// Full countdown length for `mode` in seconds.
    pub fn duration_secs(&self, mode: Mode) -> u64 {
        u64::from(self.duration_minutes(mode)).saturating_mul(60)
    }

    /// Long break interval, never less than 1.
    pub fn long_break_interval(&self) -> u32 {
        self.long_break_interval.max(1)
    }

    pub fn set_duration_minutes(&mut self, mode: Mode, minutes: u32) {
        let minutes = minutes.max(1);
        match mode {
            Mode::Work => self.work_duration = minutes,
            Mode::ShortBreak => self.short_break_duration = minutes,
            Mode::LongBreak => self.long_break_duration = minutes,
        }
    }

    /// Copy with every duration and the interval floored at 1.
    pub fn normalized(mut self) -> Self {
        for mode in Mode::ALL {
            let minutes = self.duration_minutes(mode);
            self.set_duration_minutes(mode, minutes);
        }
        self.long_break_interval = self.long_break_interval();
        self
    }

    /// Parse a stored settings entry.
    ///
    /// Returns `None` when the text is not a JSON object. Individual fields
    /// that are missing or mistyped take their defaults.
    pub fn from_json_lenient(text: &str) -> Option<Self> {
        let json: Value = serde_json::from_str(text).ok()?;
        let obj = json.as_object()?;
        let defaults = Self::default();

        let number = |key: &str, fallback: u32| -> u32 {
            obj.get(key).and_then(json_to_u32).unwrap_or(fallback)
        };
        let flag = |key: &str, fallback: bool| -> bool {
            obj.get(key).and_then(Value::as_bool).unwrap_or(fallback)
        };

        let settings = Self {
            work_duration: number("workDuration", defaults.work_duration),
            short_break_duration: number("shortBreakDuration", defaults.short_break_duration),
            long_break_duration: number("longBreakDuration", defaults.long_break_duration),
            long_break_interval: number("longBreakInterval", defaults.long_break_interval),
            auto_start_breaks: flag("autoStartBreaks", defaults.auto_start_breaks),
            auto_start_work: flag("autoStartWork", defaults.auto_start_work),
            sound_enabled: flag("soundEnabled", defaults.sound_enabled),
        };
        Some(settings.normalized())
    }

    /// Get a settings value as string by its storage key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        json.get(key).map(|v| v.to_string())
    }

    /// Set a settings value by its storage key.
    ///
    /// Numeric fields accept free text and are coerced the same way the
    /// duration inputs are; boolean fields go through [`parse_flag_input`].
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or a boolean does not parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        let obj = json.as_object_mut().ok_or_else(|| CoreError::InvalidSetting {
            key: key.to_string(),
            message: "settings are not an object".into(),
        })?;
        let existing = obj.get(key).ok_or_else(|| CoreError::InvalidSetting {
            key: key.to_string(),
            message: "unknown key".into(),
        })?;

        let new_value = match existing {
            Value::Bool(_) => {
                let flag = parse_flag_input(value).ok_or_else(|| CoreError::InvalidSetting {
                    key: key.to_string(),
                    message: format!("expected true or false, got '{}'", value.trim()),
                })?;
                Value::Bool(flag)
            }
            Value::Number(_) => {
                let (fallback, max) = numeric_bounds(key).ok_or_else(|| CoreError::InvalidSetting {
                    key: key.to_string(),
                    message: "unknown key".into(),
                })?;
                Value::from(coerce_input(value, fallback, max))
            }
            _ => {
                return Err(CoreError::InvalidSetting {
                    key: key.to_string(),
                    message: "unsupported value type".into(),
                })
            }
        };

        obj.insert(key.to_string(), new_value);
        *self = serde_json::from_value::<Settings>(json)?.normalized();
        Ok(())
    }
}

/// Coerce a duration typed by the user into minutes for `mode`.
///
/// Text without a leading integer (or a zero) becomes the mode's default;
/// anything else is clamped to `1..=max` for that mode.
pub fn parse_duration_input(mode: Mode, raw: &str) -> u32 {
    let (fallback, max) = match mode {
        Mode::Work => (default_work_duration(), MAX_WORK_MINUTES),
        Mode::ShortBreak => (default_short_break(), MAX_SHORT_BREAK_MINUTES),
        Mode::LongBreak => (default_long_break(), MAX_LONG_BREAK_MINUTES),
    };
    coerce_input(raw, fallback, max)
}

/// Coerce a long break interval typed by the user.
pub fn parse_interval_input(raw: &str) -> u32 {
    coerce_input(raw, default_long_break_interval(), MAX_LONG_BREAK_INTERVAL)
}

/// Parse a checkbox-style flag: true/false, on/off, yes/no, 1/0.
pub fn parse_flag_input(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn numeric_bounds(key: &str) -> Option<(u32, u32)> {
    match key {
        "workDuration" => Some((default_work_duration(), MAX_WORK_MINUTES)),
        "shortBreakDuration" => Some((default_short_break(), MAX_SHORT_BREAK_MINUTES)),
        "longBreakDuration" => Some((default_long_break(), MAX_LONG_BREAK_MINUTES)),
        "longBreakInterval" => Some((default_long_break_interval(), MAX_LONG_BREAK_INTERVAL)),
        _ => None,
    }
}

fn coerce_input(raw: &str, fallback: u32, max: u32) -> u32 {
    match leading_int(raw) {
        Some(0) | None => fallback,
        Some(n) => n.clamp(1, i64::from(max)) as u32,
    }
}

/// Integer prefix of `raw` ("12abc" -> 12, "-3" -> -3, "abc" -> None).
fn leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    // Saturate absurdly long inputs instead of failing.
    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(sign * magnitude)
}

fn json_to_u32(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return Some(u32::try_from(n).unwrap_or(u32::MAX));
    }
    let f = value.as_f64()?;
    if f.is_finite() && f >= 0.0 {
        Some(f.min(f64::from(u32::MAX)) as u32)
    } else {
        None
    }
}
