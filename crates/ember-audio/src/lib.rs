//! Ember Audio - Audio playback and management using kira
//!
//! Sounds and music tracks are decoded once, cached by string id, and played
//! fire-and-forget. When no output device can be opened the engine runs in a
//! disabled mode where every call is a no-op.

mod bank;
mod config;
mod error;
mod manager;
mod music;
mod sfx;

pub use bank::{SoundBank, SoundKind};
pub use config::AudioConfig;
pub use error::AudioError;
pub use manager::AudioEngine;
