//! Terminal bell completion cue.

use std::io::{Stdout, Write};

use pomotick_core::{CueError, SoundCue};

/// Rings the terminal bell by writing BEL to its output.
#[derive(Debug)]
pub struct TerminalBell<W = Stdout> {
    out: W,
}

impl TerminalBell<Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> SoundCue for TerminalBell<W> {
    fn play_completion_cue(&mut self) -> Result<(), CueError> {
        self.out.write_all(b"\x07")?;
        self.out.flush()?;
        Ok(())
    }
}
