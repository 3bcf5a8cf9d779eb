//! Component records attached to entities

use ember_core::{Transform, Vec2};

use crate::behavior::Behavior;
use crate::component::{Component, SparseSet};
use crate::world::Components;

/// Sub-rectangle of a texture in pixels. A zero width or height means
/// "use the full texture extent" on that axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl SourceRect {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// A rect starting at the texture origin with the given size
    pub const fn sized(w: u32, h: u32) -> Self {
        Self::new(0, 0, w, h)
    }
}

/// Frame-strip animation state
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub frame_count: u32,
    /// Seconds each frame is shown
    pub frame_time: f32,
    pub looping: bool,
    pub current: u32,
    pub timer: f32,
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            frame_count: 1,
            frame_time: 0.1,
            looping: true,
            current: 0,
            timer: 0.0,
        }
    }
}

impl Animation {
    pub fn new(frame_count: u32, frame_time: f32) -> Self {
        Self {
            frame_count,
            frame_time,
            ..Default::default()
        }
    }

    /// Advance the animation clock by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.timer += dt;
        if self.timer >= self.frame_time {
            self.timer = 0.0;
            let count = self.frame_count.max(1);
            if self.looping {
                self.current = (self.current + 1) % count;
            } else {
                self.current = (self.current + 1).min(count - 1);
            }
        }
    }
}

/// A textured quad, optionally animated along a horizontal frame strip
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Asset identifier of the texture
    pub texture: String,
    pub source: SourceRect,
    /// Draw centered on the transform instead of from its top-left
    pub centered: bool,
    pub layer: f32,
    pub animation: Option<Animation>,
}

impl Sprite {
    pub fn new(texture: impl Into<String>, source: SourceRect) -> Self {
        Self {
            texture: texture.into(),
            source,
            centered: true,
            layer: 0.0,
            animation: None,
        }
    }

    /// Attach a frame-strip animation to this sprite
    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = Some(animation);
        self
    }

    /// Source rect for the current animation frame
    pub fn frame_source(&self) -> SourceRect {
        match &self.animation {
            Some(anim) => SourceRect {
                x: self.source.x + anim.current * self.source.w,
                ..self.source
            },
            None => self.source,
        }
    }
}

/// Point-mass dynamics state
#[derive(Debug, Clone, PartialEq)]
pub struct Physics {
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub mass: f32,
    /// Downward acceleration applied to this entity only
    pub gravity: f32,
    /// Set when a collision pushes this body up out of another; sticky
    pub on_ground: bool,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            mass: 1.0,
            gravity: 900.0,
            on_ground: false,
        }
    }
}

impl Physics {
    /// A body that ignores gravity
    pub fn weightless() -> Self {
        Self {
            gravity: 0.0,
            ..Default::default()
        }
    }
}

/// Axis-aligned box collider, centered on the transform plus `offset`
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    /// Full width and height
    pub size: Vec2,
    pub offset: Vec2,
    /// Static colliders are never moved by collision resolution
    pub is_static: bool,
}

impl Default for Collider {
    fn default() -> Self {
        Self {
            size: Vec2::new(16.0, 16.0),
            offset: Vec2::ZERO,
            is_static: false,
        }
    }
}

impl Collider {
    pub fn dynamic(w: f32, h: f32) -> Self {
        Self {
            size: Vec2::new(w, h),
            ..Default::default()
        }
    }

    pub fn fixed(w: f32, h: f32) -> Self {
        Self {
            size: Vec2::new(w, h),
            is_static: true,
            ..Default::default()
        }
    }
}

/// Camera settings; the camera tracker reads the first one it finds
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Fraction of the remaining distance covered per rendered frame
    pub smoothing: f32,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            smoothing: 0.12,
            zoom: 1.0,
        }
    }
}

macro_rules! impl_component {
    ($ty:ty, $field:ident, $name:literal) => {
        impl Component for $ty {
            const NAME: &'static str = $name;

            fn storage(components: &Components) -> &SparseSet<Self> {
                &components.$field
            }

            fn storage_mut(components: &mut Components) -> &mut SparseSet<Self> {
                &mut components.$field
            }
        }
    };
}

impl_component!(Transform, transforms, "transform");
impl_component!(Sprite, sprites, "sprite");
impl_component!(Physics, physics, "physics");
impl_component!(Collider, colliders, "collider");
impl_component!(Behavior, behaviors, "behavior");
impl_component!(Camera, cameras, "camera");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looping_animation_wraps() {
        let mut anim = Animation::new(3, 0.1);
        for _ in 0..3 {
            anim.advance(0.1);
        }
        assert_eq!(anim.current, 0);
        assert_eq!(anim.timer, 0.0);
    }

    #[test]
    fn animation_waits_for_frame_time() {
        let mut anim = Animation::new(4, 0.12);
        anim.advance(0.05);
        assert_eq!(anim.current, 0);
        anim.advance(0.05);
        assert_eq!(anim.current, 0);
        anim.advance(0.05);
        assert_eq!(anim.current, 1);
    }

    #[test]
    fn one_shot_animation_holds_last_frame() {
        let mut anim = Animation {
            looping: false,
            ..Animation::new(2, 0.1)
        };
        for _ in 0..5 {
            anim.advance(0.1);
        }
        assert_eq!(anim.current, 1);
    }

    #[test]
    fn zero_frame_count_stays_on_first_frame() {
        let mut anim = Animation::new(0, 0.1);
        anim.advance(0.2);
        assert_eq!(anim.current, 0);
    }

    #[test]
    fn frame_source_steps_along_strip() {
        let mut sprite = Sprite::new("player", SourceRect::sized(48, 48))
            .with_animation(Animation::new(4, 0.1));
        sprite.animation.as_mut().unwrap().current = 2;
        assert_eq!(sprite.frame_source(), SourceRect::new(96, 0, 48, 48));
    }
}
