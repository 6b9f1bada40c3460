//! Timer engine implementation.
//!
//! The engine owns the countdown, the user's settings, the session history
//! and the completed-pomodoro count, and mirrors the durable parts into a
//! [`KeyValueStore`] on every change. It does not use internal threads: it
//! arms a [`TickSource`] while running and the caller feeds each delivered
//! tick into `tick()`.
//!
//! ## State Transitions
//!
//! ```text
//! Paused --start--> Running --pause--> Paused
//! Running --tick to 0--> (cycle policy) --> Paused | Running (next mode)
//! any --reset | switch_mode--> Paused
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::load(store, ticker, cue);
//! engine.start();
//! // For each tick the source delivers:
//! engine.tick(); // Returns Some(Event::SessionCompleted) at zero
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::policy;
use super::ticker::TickSource;
use super::Mode;
use crate::events::Event;
use crate::sound::SoundCue;
use crate::stats;
use crate::storage::{History, KeyValueStore, Persistence, Session, Settings};

/// In-memory countdown state. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: Mode,
    pub remaining_secs: u64,
    /// Length the current countdown started from.
    pub total_secs: u64,
    pub running: bool,
}

impl TimerState {
    fn fresh(mode: Mode, settings: &Settings) -> Self {
        let total_secs = settings.duration_secs(mode);
        Self {
            mode,
            remaining_secs: total_secs,
            total_secs,
            running: false,
        }
    }
}

/// Core timer engine.
///
/// The single owner of all timer state; hosts hold one instance and call
/// its methods rather than touching settings or history directly.
#[derive(Debug)]
pub struct TimerEngine<K, T, C> {
    settings: Settings,
    state: TimerState,
    history: History,
    completed: u32,
    persistence: Persistence<K>,
    ticker: T,
    cue: C,
}

impl<K, T, C> TimerEngine<K, T, C>
where
    K: KeyValueStore,
    T: TickSource,
    C: SoundCue,
{
    /// Restore settings, history and the completed count from `store` and
    /// seed a paused Work countdown from the loaded settings.
    pub fn load(store: K, ticker: T, cue: C) -> Self {
        let persistence = Persistence::new(store);
        let restored = persistence.load();
        let state = TimerState::fresh(Mode::Work, &restored.settings);
        debug!(
            sessions = restored.history.len(),
            completed = restored.completed,
            remaining_secs = state.remaining_secs,
            "timer engine loaded"
        );
        Self {
            settings: restored.settings,
            state,
            history: restored.history,
            completed: restored.completed,
            persistence,
            ticker,
            cue,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn remaining_secs(&self) -> u64 {
        self.state.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.state.total_secs
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn completed_count(&self) -> u32 {
        self.completed
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn store(&self) -> &K {
        self.persistence.store()
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.state.mode,
            running: self.state.running,
            remaining_secs: self.state.remaining_secs,
            total_secs: self.state.total_secs,
            progress_pct: stats::progress_pct(self.state.total_secs, self.state.remaining_secs),
            completed_count: self.completed,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.state.running || self.state.remaining_secs == 0 {
            return None;
        }
        self.set_running(true);
        debug!(mode = ?self.state.mode, remaining = self.state.remaining_secs, "timer started");
        Some(Event::TimerStarted {
            mode: self.state.mode,
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.running {
            return None;
        }
        self.set_running(false);
        debug!(mode = ?self.state.mode, remaining = self.state.remaining_secs, "timer paused");
        Some(Event::TimerPaused {
            mode: self.state.mode,
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Start when paused, pause when running.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.state.running {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.set_running(false);
        self.state = TimerState::fresh(self.state.mode, &self.settings);
        debug!(mode = ?self.state.mode, "timer reset");
        Some(Event::TimerReset {
            mode: self.state.mode,
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Jump to `mode`, discarding progress in the current one without
    /// recording a session.
    pub fn switch_mode(&mut self, mode: Mode) -> Option<Event> {
        let from = self.state.mode;
        self.set_running(false);
        self.state = TimerState::fresh(mode, &self.settings);
        debug!(?from, to = ?mode, "mode switched");
        Some(Event::ModeSwitched {
            from,
            to: mode,
            remaining_secs: self.state.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Advance the countdown by one second.
    ///
    /// Ticks while paused are ignored, so ticks still in flight when a
    /// countdown completes cannot complete it a second time. Returns
    /// `Some(Event::SessionCompleted)` on the tick that reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.running {
            return None;
        }
        self.state.remaining_secs = self.state.remaining_secs.saturating_sub(1);
        if self.state.remaining_secs == 0 {
            return Some(self.complete());
        }
        None
    }

    /// Change the configured length of `mode`, floored at one minute.
    ///
    /// A paused countdown in `mode` is resynced immediately; a running one
    /// keeps going and picks the new length up on its next reset, switch or
    /// completion.
    pub fn set_duration(&mut self, mode: Mode, minutes: u32) -> Option<Event> {
        let minutes = minutes.max(1);
        self.settings.set_duration_minutes(mode, minutes);
        self.persistence.save_settings(&self.settings);

        let applied_now = self.resync_if_idle(mode);
        Some(Event::DurationChanged {
            mode,
            minutes,
            applied_now,
            at: Utc::now(),
        })
    }

    pub fn set_long_break_interval(&mut self, interval: u32) {
        self.settings.long_break_interval = interval.max(1);
        self.persistence.save_settings(&self.settings);
    }

    pub fn set_auto_start_breaks(&mut self, enabled: bool) {
        self.settings.auto_start_breaks = enabled;
        self.persistence.save_settings(&self.settings);
    }

    pub fn set_auto_start_work(&mut self, enabled: bool) {
        self.settings.auto_start_work = enabled;
        self.persistence.save_settings(&self.settings);
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.settings.sound_enabled = enabled;
        self.persistence.save_settings(&self.settings);
    }

    /// Replace all settings at once.
    ///
    /// Returns `Some(Event::DurationChanged)` when the current mode's length
    /// changed, with the same live-edit rule as [`set_duration`](Self::set_duration).
    pub fn apply_settings(&mut self, settings: Settings) -> Option<Event> {
        let settings = settings.normalized();
        let mode = self.state.mode;
        let changed = settings.duration_minutes(mode) != self.settings.duration_minutes(mode);
        self.settings = settings;
        self.persistence.save_settings(&self.settings);

        if !changed {
            return None;
        }
        let applied_now = self.resync_if_idle(mode);
        Some(Event::DurationChanged {
            mode,
            minutes: self.settings.duration_minutes(mode),
            applied_now,
            at: Utc::now(),
        })
    }

    /// Empty the history and zero the completed count, persisting both.
    pub fn clear_history(&mut self) -> Option<Event> {
        self.history.clear();
        self.completed = 0;
        self.persistence.save_history(&self.history);
        self.persistence.save_completed(self.completed);
        info!("session history cleared");
        Some(Event::HistoryCleared { at: Utc::now() })
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Single place the tick subscription is armed or disarmed.
    fn set_running(&mut self, running: bool) {
        if running && !self.state.running {
            self.ticker.arm();
        } else if !running && self.state.running {
            self.ticker.disarm();
        }
        self.state.running = running;
    }

    fn resync_if_idle(&mut self, mode: Mode) -> bool {
        if mode != self.state.mode || self.state.running {
            return false;
        }
        self.state = TimerState::fresh(mode, &self.settings);
        true
    }

    fn complete(&mut self) -> Event {
        let finished = self.state.mode;

        if self.settings.sound_enabled {
            if let Err(e) = self.cue.play_completion_cue() {
                warn!(error = %e, "completion cue failed");
            }
        }

        let session = Session {
            mode: finished,
            duration_secs: self.settings.duration_secs(finished),
            completed_at: now_ms(),
        };
        self.history.push(session);
        self.persistence.save_history(&self.history);

        let next = policy::next_step(finished, self.completed, &self.settings);
        if next.completed_count != self.completed {
            self.completed = next.completed_count;
            self.persistence.save_completed(self.completed);
        }

        let running_before = self.state.running;
        self.state = TimerState::fresh(next.mode, &self.settings);
        self.state.running = running_before;
        self.set_running(next.running);

        info!(
            finished = ?finished,
            next = ?next.mode,
            auto_started = next.running,
            completed = self.completed,
            "session completed"
        );
        Event::SessionCompleted {
            session,
            next_mode: next.mode,
            auto_started: next.running,
            completed_count: self.completed,
            at: Utc::now(),
        }
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
