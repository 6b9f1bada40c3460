//! Read-only projections of timer state and history for display.
//!
//! Nothing here is stored; every value is recomputed from the engine's
//! state, settings and history when needed.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::storage::{History, Session};

/// Totals for sessions completed on the current calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayStats {
    pub pomodoros: u32,
    pub focus_minutes: u64,
    pub breaks: u32,
}

/// `MM:SS`, zero padded. Minutes are not wrapped into hours.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Elapsed share of a countdown, 0.0 ..= 100.0.
pub fn progress_pct(total_secs: u64, remaining_secs: u64) -> f64 {
    if total_secs == 0 {
        return 0.0;
    }
    let elapsed = total_secs.saturating_sub(remaining_secs);
    (elapsed as f64 / total_secs as f64 * 100.0).min(100.0)
}

/// Pomodoros finished in the current long-break cycle.
pub fn cycle_position(completed: u32, long_break_interval: u32) -> u32 {
    completed % long_break_interval.max(1)
}

/// The `n` most recent sessions.
pub fn recent(history: &History, n: usize) -> &[Session] {
    let sessions = history.sessions();
    &sessions[..n.min(sessions.len())]
}

/// Count today's sessions, comparing calendar dates in `now`'s time zone.
pub fn today_stats<Tz: TimeZone>(history: &History, now: &DateTime<Tz>) -> TodayStats {
    let today = now.date_naive();
    let tz = now.timezone();
    let mut stats = TodayStats::default();
    let mut focus_secs = 0u64;

    for session in history {
        let Some(at) = tz.timestamp_millis_opt(session.completed_at).single() else {
            continue;
        };
        if at.date_naive() != today {
            continue;
        }
        if session.mode.is_break() {
            stats.breaks += 1;
        } else {
            stats.pomodoros += 1;
            focus_secs += session.duration_secs;
        }
    }

    stats.focus_minutes = (focus_secs as f64 / 60.0).round() as u64;
    stats
}
