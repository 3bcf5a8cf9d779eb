//! Ember Physics - Point-mass integration and AABB collision resolution
//!
//! Both passes run once per fixed simulation tick, integration first:
//! - [`integrate`] advances velocity then position (semi-implicit Euler)
//! - [`resolve_collisions`] pushes overlapping boxes apart along the axis
//!   of least penetration, testing every pair of colliders once

mod collision;
mod integrator;

pub use collision::{collider_box, resolve_collisions, resolve_pair, Aabb, Axis, Contact};
pub use integrator::integrate;

use ember_ecs::World;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Physics pass configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity given to newly created physics records (pixels/s², +Y is down)
    pub default_gravity: f32,
    /// Run the pairwise collision pass after integration
    pub collisions: bool,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            default_gravity: 900.0,
            collisions: true,
        }
    }
}

/// Runs the integrator and collision resolver as one tick stage
pub struct PhysicsWorld {
    /// Configuration
    pub config: PhysicsConfig,
    /// Contacts resolved during the last step
    last_contacts: usize,
}

impl PhysicsWorld {
    /// Create a physics stage with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a physics stage with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            config,
            last_contacts: 0,
        }
    }

    /// Step the simulation by one fixed tick
    pub fn step(&mut self, world: &mut World, dt: f32) {
        let moved = integrate(world, dt);
        self.last_contacts = if self.config.collisions {
            resolve_collisions(world)
        } else {
            0
        };
        trace!(moved, contacts = self.last_contacts, "physics step");
    }

    /// Number of overlapping pairs resolved during the last step
    pub fn last_contacts(&self) -> usize {
        self.last_contacts
    }

    /// A fresh physics record carrying the configured gravity
    pub fn body(&self) -> ember_ecs::Physics {
        ember_ecs::Physics {
            gravity: self.config.default_gravity,
            ..Default::default()
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::Transform;
    use ember_ecs::{Collider, Physics};

    #[test]
    fn physics_world_creation() {
        let physics = PhysicsWorld::new();
        assert_eq!(physics.config.default_gravity, 900.0);
        assert_eq!(physics.body().gravity, 900.0);
    }

    #[test]
    fn falling_body_lands_on_static_floor() {
        let mut world = World::new();
        let floor = world.spawn();
        world.insert(floor, Transform::from_xy(0.0, 100.0));
        world.insert(floor, Collider::fixed(200.0, 20.0));

        let body = world.spawn();
        world.insert(body, Transform::from_xy(0.0, 0.0));
        world.insert(body, Physics::default());
        world.insert(body, Collider::dynamic(20.0, 20.0));

        let mut physics = PhysicsWorld::new();
        for _ in 0..120 {
            physics.step(&mut world, 1.0 / 60.0);
        }

        let p = world.get::<Physics>(body).unwrap();
        assert!(p.on_ground);
        let y = world.get::<Transform>(body).unwrap().position.y;
        // Resting on top of the floor: floor top 90, body half-height 10.
        assert!((y - 80.0).abs() < 5.0, "y = {y}");
        assert_eq!(world.get::<Transform>(floor).unwrap().position.y, 100.0);
    }

    #[test]
    fn collisions_can_be_disabled() {
        let mut world = World::new();
        for _ in 0..2 {
            let e = world.spawn();
            world.insert(e, Transform::from_xy(0.0, 0.0));
            world.insert(e, Collider::dynamic(10.0, 10.0));
        }
        let mut physics = PhysicsWorld::with_config(PhysicsConfig {
            collisions: false,
            ..Default::default()
        });
        physics.step(&mut world, 1.0 / 60.0);
        assert_eq!(physics.last_contacts(), 0);
    }
}
