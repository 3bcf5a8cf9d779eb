use std::time::Duration;

use kira::manager::AudioManager;
use kira::manager::backend::DefaultBackend;
use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings};
use kira::tween::Tween;

use crate::error::AudioError;

/// Plays at most one looping music track at a time.
pub struct MusicPlayer {
    current: Option<(String, StaticSoundHandle)>,
    music_volume: f64,
}

impl MusicPlayer {
    pub fn new(music_volume: f64) -> Self {
        Self {
            current: None,
            music_volume,
        }
    }

    /// Start looping a track, fading in over the given duration. Any track
    /// already playing fades out over the same duration.
    pub fn play(
        &mut self,
        manager: &mut AudioManager<DefaultBackend>,
        id: &str,
        data: StaticSoundData,
        fade_in: Duration,
    ) -> Result<(), AudioError> {
        self.stop(fade_in);

        let settings = StaticSoundSettings::new().volume(0.0).loop_region(..);
        let mut handle = manager
            .play(data.with_settings(settings))
            .map_err(|e| AudioError::PlaybackFailed(e.to_string()))?;

        handle.set_volume(
            self.music_volume,
            Tween {
                duration: fade_in,
                ..Default::default()
            },
        );

        self.current = Some((id.to_owned(), handle));
        Ok(())
    }

    /// Stop the current music track with a fade-out.
    pub fn stop(&mut self, fade_out: Duration) {
        if let Some((_, mut handle)) = self.current.take() {
            handle.stop(Tween {
                duration: fade_out,
                ..Default::default()
            });
        }
    }

    /// Id of the track currently playing.
    pub fn current(&self) -> Option<&str> {
        self.current.as_ref().map(|(id, _)| id.as_str())
    }
}
