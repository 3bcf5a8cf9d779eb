//! Camera system module
//!
//! Keeps a 2D view offset trailing the tracked body.

mod config;
mod controller;

pub use config::CameraConfig;
pub use controller::CameraTracker;
