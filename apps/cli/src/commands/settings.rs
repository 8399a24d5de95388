//! Audio settings commands.

use super::CommandError;
use crate::db::SettingsRepository;
use crate::state::AppState;
use wordmatch_core::AudioSettings;

/// Get the stored audio settings.
pub fn get_audio_settings(state: &AppState) -> Result<AudioSettings, CommandError> {
    state.repository().get_audio_settings().map_err(Into::into)
}

/// Update mute and/or volume, keeping whatever is not given.
pub fn save_audio_settings(
    state: &AppState,
    muted: Option<bool>,
    volume: Option<f32>,
) -> Result<AudioSettings, CommandError> {
    let repo = state.repository();
    let current = repo.get_audio_settings()?;
    let updated = AudioSettings {
        muted: muted.unwrap_or(current.muted),
        volume: volume.unwrap_or(current.volume),
    }
    .clamped();
    repo.save_audio_settings(&updated)?;
    Ok(updated)
}
