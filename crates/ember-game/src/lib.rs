//! Ember Game - Engine loop and gameplay systems
//!
//! Ties the lower crates together: input bindings, particles, the camera
//! tracker, the per-tick engine pipeline, the frame scheduler and the demo
//! scene.

pub mod animation;
pub mod camera;
pub mod engine;
pub mod input;
pub mod overlay;
pub mod particles;
pub mod scene;
pub mod scheduler;

pub use animation::{advance_animations, AnimationSystem};
pub use camera::{CameraConfig, CameraTracker};
pub use engine::{Engine, EngineConfig};
pub use input::{InputBinding, InputBindings, InputHandler, InputSource, ScriptedInput};
pub use overlay::{DebugOverlay, OverlayReadout};
pub use particles::{Particle, ParticleConfig, ParticlePool};
pub use scene::{build_demo_scene, load_demo_assets, start_demo, DemoScene, PlayerController};
pub use scheduler::{
    Clock, FrameOutcome, FrameScheduler, ManualClock, RunSummary, SchedulerState, SystemClock,
};
