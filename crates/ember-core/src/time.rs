//! Time system for the Ember engine
//!
//! Accumulates real elapsed time and hands it out in fixed-size simulation
//! ticks, independent of how often frames are rendered.

use serde::{Deserialize, Serialize};

/// Configuration for game time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Fixed timestep for simulation ticks (in seconds)
    pub fixed_timestep: f64,
    /// Maximum accumulated time to prevent spiral of death (in seconds)
    pub max_accumulator: f64,
    /// Target frame interval used for pacing when the display has no vsync
    pub target_frame_time: f64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_accumulator: 0.25,
            target_frame_time: 1.0 / 60.0,
        }
    }
}

/// Game time tracking
#[derive(Debug, Clone, Default)]
pub struct GameTime {
    /// Configuration
    pub config: TimeConfig,
    /// Simulated time since game start in seconds
    pub total_time: f64,
    /// Frame counter
    pub frame_count: u64,
    /// Number of simulation ticks run so far
    pub tick_count: u64,
    /// Accumulated time not yet consumed by ticks
    accumulator: f64,
}

impl GameTime {
    /// Create a new game time with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Add the real time elapsed since the previous frame.
    ///
    /// The accumulator is clamped to `max_accumulator`; any excess is
    /// discarded rather than caught up on.
    pub fn update(&mut self, elapsed: f64) {
        self.frame_count += 1;
        self.accumulator += elapsed.max(0.0);
        if self.accumulator > self.config.max_accumulator {
            self.accumulator = self.config.max_accumulator;
        }
    }

    /// Consume one fixed tick from the accumulator if enough time is banked.
    /// A non-positive timestep never yields a tick.
    pub fn consume_tick(&mut self) -> bool {
        if self.config.fixed_timestep > 0.0 && self.accumulator >= self.config.fixed_timestep {
            self.accumulator -= self.config.fixed_timestep;
            self.total_time += self.config.fixed_timestep;
            self.tick_count += 1;
            true
        } else {
            false
        }
    }

    /// The fixed timestep as handed to systems
    pub fn fixed_dt(&self) -> f32 {
        self.config.fixed_timestep as f32
    }

    /// Time banked but not yet simulated
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }
}

/// Rolling frames-per-second counter
#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    /// Most recent measurement
    pub fps: f64,
    frames: u32,
    window_start_ms: Option<f64>,
}

impl FrameStats {
    /// Length of a measurement window in milliseconds
    pub const WINDOW_MS: f64 = 500.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Count one rendered frame at `now_ms`. Returns the new fps value when a
    /// measurement window has just closed.
    pub fn record_frame(&mut self, now_ms: f64) -> Option<f64> {
        let start = *self.window_start_ms.get_or_insert(now_ms);
        self.frames += 1;
        let elapsed = now_ms - start;
        if elapsed >= Self::WINDOW_MS {
            self.fps = self.frames as f64 * 1000.0 / elapsed;
            self.frames = 0;
            self.window_start_ms = Some(now_ms);
            Some(self.fps)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(time: &mut GameTime) -> u32 {
        let mut ticks = 0;
        while time.consume_tick() {
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn test_game_time() {
        let mut time = GameTime::default();
        time.update(0.016);
        assert_eq!(time.frame_count, 1);
        assert_eq!(drain(&mut time), 0);

        time.update(0.001);
        assert_eq!(drain(&mut time), 1);
        assert_eq!(time.tick_count, 1);
        assert!(time.accumulator() < time.config.fixed_timestep);
    }

    #[test]
    fn test_spiral_of_death_clamp() {
        let mut time = GameTime::default();
        time.update(0.5);
        assert_eq!(drain(&mut time), 15);
    }

    #[test]
    fn test_leftover_carries_to_next_frame() {
        let mut time = GameTime::default();
        time.update(0.025);
        assert_eq!(drain(&mut time), 1);
        time.update(0.010);
        assert_eq!(drain(&mut time), 1);
    }

    #[test]
    fn test_zero_timestep_never_ticks() {
        let mut time = GameTime::new(TimeConfig {
            fixed_timestep: 0.0,
            ..Default::default()
        });
        time.update(0.1);
        assert_eq!(drain(&mut time), 0);
        assert!((time.accumulator() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_negative_elapsed_ignored() {
        let mut time = GameTime::default();
        time.update(-1.0);
        assert_eq!(time.accumulator(), 0.0);
    }

    #[test]
    fn test_frame_stats_window() {
        let mut stats = FrameStats::new();
        assert_eq!(stats.record_frame(0.0), None);
        for i in 1..30 {
            assert_eq!(stats.record_frame(i as f64 * 10.0), None);
        }
        let fps = stats.record_frame(500.0).unwrap();
        assert!((fps - 62.0).abs() < 1e-9);
    }
}
