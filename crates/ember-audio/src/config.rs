use serde::{Deserialize, Serialize};

/// Audio configuration. Maps to the `[audio]` table of the engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Open an output device at startup. When false the engine is silent.
    pub enabled: bool,
    /// Master volume multiplier (0.0–1.0).
    pub master_volume: f64,
    /// Music volume multiplier (0.0–1.0).
    pub music_volume: f64,
    /// Sound effects volume multiplier (0.0–1.0).
    pub sfx_volume: f64,
    /// Fade applied when music starts or stops, in milliseconds.
    pub music_fade_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            master_volume: 1.0,
            music_volume: 0.8,
            sfx_volume: 1.0,
            music_fade_ms: 500,
        }
    }
}

impl AudioConfig {
    /// Effective music volume (master * music).
    pub fn effective_music_volume(&self) -> f64 {
        self.master_volume * self.music_volume
    }

    /// Effective SFX volume (master * sfx).
    pub fn effective_sfx_volume(&self) -> f64 {
        self.master_volume * self.sfx_volume
    }

    pub fn music_fade(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.music_fade_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_volumes() {
        let config = AudioConfig::default();
        assert!(config.enabled);
        assert_eq!(config.master_volume, 1.0);
        assert_eq!(config.music_volume, 0.8);
        assert_eq!(config.sfx_volume, 1.0);
    }

    #[test]
    fn effective_volumes() {
        let config = AudioConfig {
            master_volume: 0.5,
            music_volume: 0.8,
            sfx_volume: 1.0,
            ..Default::default()
        };
        assert!((config.effective_music_volume() - 0.4).abs() < f64::EPSILON);
        assert!((config.effective_sfx_volume() - 0.5).abs() < f64::EPSILON);
    }
}
