//! What comes after a finished countdown.

use serde::{Deserialize, Serialize};

use super::Mode;
use crate::storage::Settings;

/// Outcome of the cycle policy for one completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextStep {
    pub mode: Mode,
    /// Whether the next countdown starts without user action.
    pub running: bool,
    pub completed_count: u32,
}

/// Decide the next mode after `completed` finishes.
///
/// A finished work session bumps the count and leads to a break; every
/// `long_break_interval`-th one is a long break. Any break leads back to
/// work and leaves the count alone.
pub fn next_step(completed: Mode, completed_count: u32, settings: &Settings) -> NextStep {
    match completed {
        Mode::Work => {
            let count = completed_count.saturating_add(1);
            let mode = if count % settings.long_break_interval() == 0 {
                Mode::LongBreak
            } else {
                Mode::ShortBreak
            };
            NextStep {
                mode,
                running: settings.auto_start_breaks,
                completed_count: count,
            }
        }
        Mode::ShortBreak | Mode::LongBreak => NextStep {
            mode: Mode::Work,
            running: settings.auto_start_work,
            completed_count,
        },
    }
}
