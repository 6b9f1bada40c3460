use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Session;
use crate::timer::Mode;

/// Every state change in the engine produces an Event.
/// Hosts render them; commands that change nothing produce none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Mode changed by the user; progress in `from` was discarded.
    ModeSwitched {
        from: Mode,
        to: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A countdown reached zero and the cycle advanced.
    SessionCompleted {
        session: Session,
        next_mode: Mode,
        auto_started: bool,
        completed_count: u32,
        at: DateTime<Utc>,
    },
    DurationChanged {
        mode: Mode,
        minutes: u32,
        /// Whether the visible countdown was resynced to the new length.
        applied_now: bool,
        at: DateTime<Utc>,
    },
    HistoryCleared {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: Mode,
        running: bool,
        remaining_secs: u64,
        total_secs: u64,
        progress_pct: f64,
        completed_count: u32,
        at: DateTime<Utc>,
    },
}
