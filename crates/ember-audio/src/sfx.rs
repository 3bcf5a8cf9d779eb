use kira::manager::AudioManager;
use kira::manager::backend::DefaultBackend;
use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings};
use kira::sound::PlaybackState;

use crate::error::AudioError;

/// Fire-and-forget sound effects.
pub struct SfxPlayer {
    active: Vec<StaticSoundHandle>,
    sfx_volume: f64,
}

impl SfxPlayer {
    pub fn new(sfx_volume: f64) -> Self {
        Self {
            active: Vec::new(),
            sfx_volume,
        }
    }

    /// Play a one-shot sound effect at the current effects volume.
    pub fn play(
        &mut self,
        manager: &mut AudioManager<DefaultBackend>,
        data: StaticSoundData,
    ) -> Result<(), AudioError> {
        let settings = StaticSoundSettings::new().volume(self.sfx_volume);
        let handle = manager
            .play(data.with_settings(settings))
            .map_err(|e| AudioError::PlaybackFailed(e.to_string()))?;
        self.active.push(handle);
        Ok(())
    }

    /// Remove handles for sounds that have stopped playing.
    pub fn cleanup(&mut self) {
        self.active.retain(|h| h.state() != PlaybackState::Stopped);
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}
