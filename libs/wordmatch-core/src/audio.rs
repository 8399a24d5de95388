//! Audio cue contract.

use crate::error::CueError;
use crate::types::AudioSettings;
use serde::Serialize;

/// Short sounds played on evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Success,
    Failure,
}

/// Something that can play cues.
///
/// `play` restarts the cue from the beginning if it is already playing.
/// Errors are reported, but the game never lets them interrupt play.
pub trait CuePlayer {
    fn play(&mut self, cue: Cue) -> Result<(), CueError>;
    fn set_volume(&mut self, volume: f32);
    fn set_muted(&mut self, muted: bool);

    fn apply(&mut self, settings: AudioSettings) {
        let settings = settings.clamped();
        self.set_volume(settings.volume);
        self.set_muted(settings.muted);
    }
}

/// Player that makes no sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCues;

impl CuePlayer for SilentCues {
    fn play(&mut self, _cue: Cue) -> Result<(), CueError> {
        Ok(())
    }

    fn set_volume(&mut self, _volume: f32) {}

    fn set_muted(&mut self, _muted: bool) {}
}
