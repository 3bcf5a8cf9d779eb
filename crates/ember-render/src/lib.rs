//! Ember Render - 2D sprite rendering
//!
//! Frames are composed on the CPU into a [`Framebuffer`] through the
//! [`RenderSurface`] trait; a platform presenter copies the finished image to
//! the screen. [`SceneRenderer`] walks the world once per rendered frame and
//! issues the draw calls.

mod framebuffer;
mod pass;
mod recording;
mod surface;

pub use framebuffer::Framebuffer;
pub use pass::{sprite_placement, FrameReport, ParticleQuad, RenderConfig, SceneRenderer};
pub use recording::{DrawCall, RecordingSurface};
pub use surface::{RenderError, RenderSurface};
