//! # Pomotick Core Library
//!
//! Core logic for the Pomotick Pomodoro timer: the countdown state machine,
//! the work/break cycle policy, and the local persistence of settings and
//! session history. Hosts (the CLI, or any embedding UI) supply a tick
//! source, a key-value store and a sound cue, and drive a single
//! [`TimerEngine`] instance.
//!
//! ## Architecture
//!
//! - **Timer Engine**: owns mode, remaining time and run/pause state; the
//!   caller feeds it one `tick()` per second while its tick source is armed
//! - **Cycle Policy**: pure decision of the next mode after a completion
//! - **Storage**: settings, history and completed count written through to
//!   three independent JSON entries
//! - **Stats**: read-only projections for display (clock face, progress,
//!   today's totals)

pub mod error;
pub mod events;
pub mod sound;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{CoreError, CueError, StorageError};
pub use events::Event;
pub use sound::{SilentCue, SoundCue};
pub use stats::TodayStats;
pub use storage::{FileStore, History, KeyValueStore, MemoryStore, Persistence, Session, Settings};
pub use timer::{IntervalTicker, ManualTicker, Mode, TickSource, TimerEngine, TimerState};
