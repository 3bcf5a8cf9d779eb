use std::path::Path;

use kira::manager::{AudioManager, AudioManagerSettings};
use kira::manager::backend::DefaultBackend;
use tracing::{debug, info, warn};

use crate::bank::{SoundBank, SoundKind};
use crate::config::AudioConfig;
use crate::error::AudioError;
use crate::music::MusicPlayer;
use crate::sfx::SfxPlayer;

/// The main audio engine. Wraps kira's AudioManager and plays cached sounds
/// by id.
///
/// An engine without a backend is "disabled": loads are skipped and every
/// playback call does nothing.
pub struct AudioEngine {
    manager: Option<AudioManager<DefaultBackend>>,
    bank: SoundBank,
    music: MusicPlayer,
    sfx: SfxPlayer,
    config: AudioConfig,
}

impl AudioEngine {
    /// Create a new AudioEngine with the given config.
    pub fn new(config: AudioConfig) -> Result<Self, AudioError> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| AudioError::InitFailed(e.to_string()))?;

        info!("Audio engine initialized");
        Ok(Self::with_manager(Some(manager), config))
    }

    /// An engine that never opens a device.
    pub fn disabled(config: AudioConfig) -> Self {
        Self::with_manager(None, config)
    }

    /// Open the audio device if enabled in `config`, falling back to a
    /// disabled engine when that fails.
    pub fn new_or_disabled(config: AudioConfig) -> Self {
        if !config.enabled {
            info!("Audio disabled by configuration");
            return Self::disabled(config);
        }
        match Self::new(config.clone()) {
            Ok(engine) => engine,
            Err(e) => {
                warn!("{e}; continuing without audio");
                Self::disabled(config)
            }
        }
    }

    fn with_manager(manager: Option<AudioManager<DefaultBackend>>, config: AudioConfig) -> Self {
        Self {
            manager,
            bank: SoundBank::new(),
            music: MusicPlayer::new(config.effective_music_volume()),
            sfx: SfxPlayer::new(config.effective_sfx_volume()),
            config,
        }
    }

    /// Whether an output device is open.
    pub fn is_enabled(&self) -> bool {
        self.manager.is_some()
    }

    // ---- Loading ----

    /// Decode a one-shot effect and cache it as `id`.
    pub fn load_sound(&mut self, id: &str, path: &Path) -> Result<(), AudioError> {
        self.load(id, path, SoundKind::Effect)
    }

    /// Decode a music track and cache it as `id`.
    pub fn load_music(&mut self, id: &str, path: &Path) -> Result<(), AudioError> {
        self.load(id, path, SoundKind::Music)
    }

    fn load(&mut self, id: &str, path: &Path, kind: SoundKind) -> Result<(), AudioError> {
        if !self.is_enabled() {
            debug!(id, "audio disabled, skipping load");
            return Ok(());
        }
        self.bank.load(id, path, kind)
    }

    /// Whether a sound is cached under `id`.
    pub fn has_sound(&self, id: &str) -> bool {
        self.bank.contains(id)
    }

    // ---- Playback ----

    /// Play a cached sound once. Unknown ids and playback failures are
    /// logged and otherwise ignored.
    pub fn play_sound(&mut self, id: &str) {
        let Some(manager) = self.manager.as_mut() else {
            return;
        };
        let Some((_, data)) = self.bank.get(id) else {
            debug!(id, "no such sound");
            return;
        };
        if let Err(e) = self.sfx.play(manager, data) {
            warn!(id, "{e}");
        }
    }

    /// Start looping a cached track, replacing the current one.
    pub fn play_music(&mut self, id: &str) {
        let Some(manager) = self.manager.as_mut() else {
            return;
        };
        let Some((_, data)) = self.bank.get(id) else {
            debug!(id, "no such music track");
            return;
        };
        if let Err(e) = self.music.play(manager, id, data, self.config.music_fade()) {
            warn!(id, "{e}");
        }
    }

    /// Fade out the current music track, if any.
    pub fn stop_music(&mut self) {
        self.music.stop(self.config.music_fade());
    }

    /// Id of the music track currently playing.
    pub fn current_music(&self) -> Option<&str> {
        self.music.current()
    }

    // ---- Per-frame ----

    /// Call each frame to clean up finished sounds.
    pub fn update(&mut self) {
        self.sfx.cleanup();
    }

    /// Number of effects still playing.
    pub fn active_sounds(&self) -> usize {
        self.sfx.active_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_engine_is_silent() {
        let mut audio = AudioEngine::disabled(AudioConfig::default());
        assert!(!audio.is_enabled());
        assert!(audio.load_sound("jump", Path::new("/nonexistent/jump.wav")).is_ok());
        assert!(!audio.has_sound("jump"));
        audio.play_sound("jump");
        audio.play_music("bg");
        audio.stop_music();
        audio.update();
        assert_eq!(audio.current_music(), None);
        assert_eq!(audio.active_sounds(), 0);
    }

    #[test]
    fn disabled_by_configuration() {
        let audio = AudioEngine::new_or_disabled(AudioConfig {
            enabled: false,
            ..Default::default()
        });
        assert!(!audio.is_enabled());
    }
}
