//! Camera tracker that trails the first physics body

use ember_core::{Transform, Vec2};
use ember_ecs::{Physics, World};

use super::CameraConfig;

/// Smoothed view offset (world position of the screen's top-left corner)
#[derive(Debug, Clone)]
pub struct CameraTracker {
    /// Configuration
    pub config: CameraConfig,
    offset: Vec2,
}

impl CameraTracker {
    /// Create a new camera tracker
    pub fn new() -> Self {
        Self::with_config(CameraConfig::default())
    }

    /// Create a camera tracker with custom config
    pub fn with_config(config: CameraConfig) -> Self {
        Self {
            config,
            offset: Vec2::ZERO,
        }
    }

    /// Get the current view offset
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Jump straight to an offset
    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    /// Smoothing factor in effect: the first camera record's, else the
    /// configured one.
    pub fn smoothing(&self, world: &World) -> f32 {
        let (entities, components) = world.split();
        entities
            .iter()
            .find_map(|e| components.cameras.get(e.index()))
            .map_or(self.config.smoothing, |camera| camera.smoothing)
    }

    /// Move one step toward centering the first entity with a transform and
    /// physics in a viewport of `viewport` pixels. Returns false, leaving the
    /// offset alone, when there is nothing to follow.
    pub fn update(&mut self, world: &World, viewport: Vec2) -> bool {
        let Some(target) = world
            .find_with::<Transform, Physics>()
            .and_then(|id| world.get::<Transform>(id))
        else {
            return false;
        };

        let goal = target.position - viewport * 0.5;
        let factor = self.smoothing(world);
        self.offset += (goal - self.offset) * factor;
        true
    }
}

impl Default for CameraTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_ecs::Camera;

    const VIEWPORT: Vec2 = Vec2::new(640.0, 480.0);

    #[test]
    fn test_no_target_keeps_offset() {
        let mut world = World::new();
        let e = world.spawn();
        world.insert(e, Transform::from_xy(500.0, 500.0));

        let mut camera = CameraTracker::new();
        camera.set_offset(Vec2::new(3.0, 4.0));
        assert!(!camera.update(&world, VIEWPORT));
        assert_eq!(camera.offset(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_lerps_toward_target() {
        let mut world = World::new();
        let player = world.spawn();
        world.insert(player, Transform::from_xy(420.0, 340.0));
        world.insert(player, Physics::default());

        let mut camera = CameraTracker::new();
        assert!(camera.update(&world, VIEWPORT));
        // goal (100, 100) * 0.12
        assert!((camera.offset() - Vec2::new(12.0, 12.0)).length() < 1e-4);

        for _ in 0..200 {
            camera.update(&world, VIEWPORT);
        }
        assert!((camera.offset() - Vec2::new(100.0, 100.0)).length() < 1e-2);
    }

    #[test]
    fn test_first_camera_record_sets_factor() {
        let mut world = World::new();
        let player = world.spawn();
        world.insert(player, Transform::from_xy(320.0 + 50.0, 240.0));
        world.insert(player, Physics::default());
        for smoothing in [0.5, 0.9] {
            let cam = world.spawn();
            world.insert(cam, Camera { smoothing, zoom: 1.0 });
        }

        let mut camera = CameraTracker::with_config(CameraConfig { smoothing: 0.01 });
        assert_eq!(camera.smoothing(&world), 0.5);
        camera.update(&world, VIEWPORT);
        assert!((camera.offset().x - 25.0).abs() < 1e-4);
        assert_eq!(camera.offset().y, 0.0);
    }

    #[test]
    fn test_tracks_first_body_in_creation_order() {
        let mut world = World::new();
        let first = world.spawn();
        world.insert(first, Transform::from_xy(320.0, 240.0));
        world.insert(first, Physics::default());
        let second = world.spawn();
        world.insert(second, Transform::from_xy(1000.0, 1000.0));
        world.insert(second, Physics::default());

        let mut camera = CameraTracker::with_config(CameraConfig { smoothing: 1.0 });
        camera.update(&world, VIEWPORT);
        assert_eq!(camera.offset(), Vec2::ZERO);

        world.despawn(first);
        camera.update(&world, VIEWPORT);
        assert_eq!(camera.offset(), Vec2::new(680.0, 760.0));
    }
}
