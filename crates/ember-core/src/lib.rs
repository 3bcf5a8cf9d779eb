//! Ember Core - Core types and utilities for the Ember engine
//!
//! This crate provides the foundational types used throughout the engine:
//! - Mathematical primitives (re-exported from glam)
//! - Entity identifiers, transforms, colors and rectangles
//! - Input actions and per-frame action state
//! - The fixed-timestep accumulator that drives simulation ticks

pub mod input;
pub mod time;
pub mod types;

pub use glam::Vec2;
pub use input::{InputAction, InputState};
pub use time::{FrameStats, GameTime, TimeConfig};
pub use types::{Color, EntityId, Rect, Transform};
