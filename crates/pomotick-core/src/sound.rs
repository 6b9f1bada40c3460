//! Completion cue seam.

use crate::error::CueError;

/// Plays a short audible cue when a countdown finishes.
///
/// Only called when `soundEnabled` is set. Errors are logged by the engine
/// and never change timer or persistence state.
pub trait SoundCue {
    fn play_completion_cue(&mut self) -> Result<(), CueError>;
}

/// Cue that makes no sound.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCue;

impl SoundCue for SilentCue {
    fn play_completion_cue(&mut self) -> Result<(), CueError> {
        Ok(())
    }
}
