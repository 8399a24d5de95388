//! Terminal bell cue player.

use std::io::Write;
use wordmatch_core::{Cue, CueError, CuePlayer};

const BELL: &[u8] = b"\x07";

/// Rings the terminal bell: once for a match, twice for a miss.
///
/// A bell has no loudness, so any volume above zero rings.
pub struct BellCues<W> {
    out: W,
    volume: f32,
    muted: bool,
}

impl BellCues<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write> BellCues<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            volume: 1.0,
            muted: false,
        }
    }

    fn audible(&self) -> bool {
        !self.muted && self.volume > 0.0
    }
}

impl<W: Write> CuePlayer for BellCues<W> {
    fn play(&mut self, cue: Cue) -> Result<(), CueError> {
        if !self.audible() {
            return Ok(());
        }
        let rings = match cue {
            Cue::Success => 1,
            Cue::Failure => 2,
        };
        for _ in 0..rings {
            self.out.write_all(BELL)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}
