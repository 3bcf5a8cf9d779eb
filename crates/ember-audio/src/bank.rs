use std::collections::HashMap;
use std::path::Path;

use kira::sound::static_sound::StaticSoundData;
use tracing::{debug, warn};

use crate::error::AudioError;

/// Whether a cached sound is a one-shot effect or a looping music track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundKind {
    Effect,
    Music,
}

/// Decoded sounds cached by string id.
#[derive(Default)]
pub struct SoundBank {
    sounds: HashMap<String, (SoundKind, StaticSoundData)>,
}

impl SoundBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `path` and cache it under `id`, replacing any previous entry.
    /// On failure the previous entry, if any, is kept.
    pub fn load(&mut self, id: &str, path: &Path, kind: SoundKind) -> Result<(), AudioError> {
        let data = StaticSoundData::from_file(path).map_err(|e| {
            warn!(id, path = %path.display(), error = %e, "failed to load sound");
            AudioError::LoadFailed(path.to_path_buf(), e.to_string())
        })?;
        debug!(id, ?kind, "loaded sound");
        self.sounds.insert(id.to_owned(), (kind, data));
        Ok(())
    }

    /// A cheap clone of the cached data, ready to be played.
    pub fn get(&self, id: &str) -> Option<(SoundKind, StaticSoundData)> {
        self.sounds.get(id).map(|(kind, data)| (*kind, data.clone()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sounds.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_reported() {
        let mut bank = SoundBank::new();
        let err = bank
            .load("jump", Path::new("/nonexistent/jump.wav"), SoundKind::Effect)
            .unwrap_err();
        assert!(matches!(err, AudioError::LoadFailed(..)));
        assert!(!bank.contains("jump"));
        assert!(bank.get("jump").is_none());
        assert!(bank.is_empty());
    }
}
