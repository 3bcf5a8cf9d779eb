//! Debug overlay statistics

use ember_core::FrameStats;
use tracing::debug;

use crate::engine::Engine;

/// One measurement of the running game
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OverlayReadout {
    pub fps: f64,
    pub entities: usize,
    pub textures: usize,
    pub particles: usize,
}

impl OverlayReadout {
    /// Text lines for the HUD panel
    pub fn lines(&self) -> [String; 3] {
        [
            format!("FPS: {:.1}", self.fps),
            format!("Entities: {}", self.entities),
            format!("Textures: {}", self.textures),
        ]
    }
}

/// Counts rendered frames and publishes a readout every measurement window.
#[derive(Debug, Default)]
pub struct DebugOverlay {
    stats: FrameStats,
    latest: OverlayReadout,
}

impl DebugOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame rendered at `now_ms`. Returns a fresh readout when a
    /// window has just closed.
    pub fn record_frame(&mut self, now_ms: f64, engine: &Engine) -> Option<OverlayReadout> {
        let fps = self.stats.record_frame(now_ms)?;
        self.latest = OverlayReadout {
            fps,
            entities: engine.world.entity_count(),
            textures: engine.assets.texture_count(),
            particles: engine.particles.live_count(),
        };
        debug!(
            fps = format_args!("{fps:.1}"),
            entities = self.latest.entities,
            textures = self.latest.textures,
            particles = self.latest.particles,
            "frame stats"
        );
        Some(self.latest)
    }

    /// Most recent readout
    pub fn latest(&self) -> OverlayReadout {
        self.latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use ember_assets::{AssetServer, TextureAsset};
    use ember_audio::{AudioConfig, AudioEngine};

    #[test]
    fn readout_every_half_second() {
        let mut assets = AssetServer::new(".");
        assets.insert_texture("tiles", TextureAsset::solid(1, 1, [0; 4]));
        let mut engine = Engine::new(
            EngineConfig::default(),
            assets,
            AudioEngine::disabled(AudioConfig::default()),
        );
        engine.world.spawn();
        engine.world.spawn();

        let mut overlay = DebugOverlay::new();
        assert!(overlay.record_frame(0.0, &engine).is_none());
        assert!(overlay.record_frame(250.0, &engine).is_none());
        let readout = overlay.record_frame(500.0, &engine).unwrap();

        assert!((readout.fps - 6.0).abs() < 1e-9);
        assert_eq!(readout.entities, 2);
        assert_eq!(readout.textures, 1);
        assert_eq!(overlay.latest(), readout);
        assert_eq!(readout.lines()[0], "FPS: 6.0");
    }
}
