//! Camera configuration

use serde::{Deserialize, Serialize};

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Fraction of the remaining distance covered per rendered frame (0-1,
    /// lower = smoother). Used when the scene has no camera entity.
    pub smoothing: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { smoothing: 0.12 }
    }
}
