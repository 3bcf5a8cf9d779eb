//! Engine settings with persistence
//!
//! Settings are read from `ember.toml` in the working directory, falling
//! back to `~/.config/ember/settings.toml`. A legacy `engine.cfg` of
//! `key=value` lines may override the window and seed.

use std::fs;
use std::path::{Path, PathBuf};

use ember_assets::Config;
use ember_audio::AudioConfig;
use ember_core::TimeConfig;
use ember_game::{CameraConfig, EngineConfig, ParticleConfig};
use ember_physics::PhysicsConfig;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// All engine settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub window: WindowSettings,
    pub time: TimeSettings,
    pub audio: AudioConfig,
    pub physics: PhysicsConfig,
    pub particles: ParticleConfig,
    pub camera: CameraConfig,
    pub assets: AssetSettings,
}

impl EngineSettings {
    const LOCAL_FILE: &'static str = "ember.toml";
    const LEGACY_FILE: &'static str = "engine.cfg";

    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ember"))
    }

    /// Get the settings file path: the local file if present, else the user one
    fn settings_path() -> Option<PathBuf> {
        let local = PathBuf::from(Self::LOCAL_FILE);
        if local.exists() {
            return Some(local);
        }
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found. The legacy
    /// config file is applied on top either way.
    pub fn load() -> Self {
        let mut settings = match Self::settings_path() {
            Some(path) => Self::load_from(&path),
            None => {
                warn!("Could not determine config directory");
                Self::default()
            }
        };

        if let Ok(legacy) = Config::load(Path::new(Self::LEGACY_FILE)) {
            info!("Applying overrides from {}", Self::LEGACY_FILE);
            settings.apply_legacy(&legacy);
        }
        settings.time.validate();
        settings
    }

    fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match Self::parse(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply `width`, `height`, `title`, `vsync` and `seed` from a legacy
    /// key=value config. Malformed values are logged and ignored.
    pub fn apply_legacy(&mut self, config: &Config) {
        self.window.width = config.get_parsed("width", self.window.width);
        self.window.height = config.get_parsed("height", self.window.height);
        if let Some(title) = config.get("title") {
            self.window.title = title.to_owned();
        }
        self.window.vsync = config.get_bool("vsync", self.window.vsync);
        self.particles.seed = config.get_parsed("seed", self.particles.seed);
    }

    /// The simulation part of the settings
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            physics: self.physics.clone(),
            particles: self.particles.clone(),
            camera: self.camera.clone(),
        }
    }
}

/// Window settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Present in step with the display refresh
    pub vsync: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Ember".to_owned(),
            vsync: true,
        }
    }
}

/// Frame timing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSettings {
    /// Simulation tick length in seconds
    pub fixed_timestep: f64,
    /// Most real time carried into a single frame, in seconds
    pub max_accumulator: f64,
    /// Frame rate to pace to when presenting without vsync
    pub target_fps: f64,
}

impl Default for TimeSettings {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_accumulator: 0.25,
            target_fps: 60.0,
        }
    }
}

impl TimeSettings {
    /// Reset every value that is not a positive finite number to its default,
    /// logging each one.
    pub fn validate(&mut self) {
        let defaults = Self::default();
        let fields = [
            ("fixed_timestep", &mut self.fixed_timestep, defaults.fixed_timestep),
            ("max_accumulator", &mut self.max_accumulator, defaults.max_accumulator),
            ("target_fps", &mut self.target_fps, defaults.target_fps),
        ];
        for (name, value, default) in fields {
            if !(value.is_finite() && *value > 0.0) {
                warn!("Invalid time.{} = {}, using {}", name, value, default);
                *value = default;
            }
        }
    }

    pub fn time_config(&self) -> TimeConfig {
        TimeConfig {
            fixed_timestep: self.fixed_timestep,
            max_accumulator: self.max_accumulator,
            target_frame_time: 1.0 / self.target_fps.max(1.0),
        }
    }
}

/// Asset location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// Directory asset paths are resolved against
    pub base_path: PathBuf,
}

impl Default for AssetSettings {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("assets"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = EngineSettings::parse(
            r#"
            [window]
            width = 800
            title = "Test"

            [time]
            target_fps = 30.0

            [particles]
            capacity = 16
            "#,
        )
        .unwrap();

        assert_eq!(settings.window.width, 800);
        assert_eq!(settings.window.height, 720);
        assert_eq!(settings.window.title, "Test");
        assert!(settings.window.vsync);
        assert!((settings.time.time_config().target_frame_time - 1.0 / 30.0).abs() < 1e-12);
        assert_eq!(settings.particles.capacity, 16);
        assert_eq!(settings.camera.smoothing, 0.12);
        assert_eq!(settings.assets.base_path, PathBuf::from("assets"));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        assert!(EngineSettings::parse("[window]\nwidth = \"wide\"").is_err());
    }

    #[test]
    fn test_legacy_overrides() {
        let mut settings = EngineSettings::default();
        let legacy = Config::parse("width=640\nheight = oops\ntitle=Old Engine\nvsync=false\nseed=99\n");
        settings.apply_legacy(&legacy);

        assert_eq!(settings.window.width, 640);
        assert_eq!(settings.window.height, 720);
        assert_eq!(settings.window.title, "Old Engine");
        assert!(!settings.window.vsync);
        assert_eq!(settings.particles.seed, 99);
    }

    #[test]
    fn test_non_positive_timestep_falls_back() {
        let mut settings = EngineSettings::parse(
            "[time]\nfixed_timestep = 0.0\nmax_accumulator = -1.0\ntarget_fps = 30.0\n",
        )
        .unwrap();
        settings.time.validate();

        let config = settings.time.time_config();
        assert!((config.fixed_timestep - 1.0 / 60.0).abs() < 1e-12);
        assert_eq!(config.max_accumulator, 0.25);
        assert!((config.target_frame_time - 1.0 / 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let settings = EngineSettings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        let back = EngineSettings::parse(&text).unwrap();
        assert_eq!(back.window.title, "Ember");
        assert_eq!(back.time.max_accumulator, 0.25);
    }
}
