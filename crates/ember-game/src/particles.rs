//! Fixed-capacity particle pool

use std::f32::consts::TAU;

use ember_core::Vec2;
use ember_render::ParticleQuad;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Downward acceleration applied to every particle, in pixels/s²
const PARTICLE_GRAVITY: f32 = 300.0;

/// Particle pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Number of slots, fixed for the lifetime of the pool
    pub capacity: usize,
    /// Seed for the emitter's random source
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            capacity: 2048,
            seed: 0x5eed,
        }
    }
}

/// A single particle. Ages are in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub life: f32,
    pub age: f32,
}

impl Particle {
    /// A slot that holds no live particle
    const DEAD: Self = Self {
        position: Vec2::ZERO,
        velocity: Vec2::ZERO,
        life: 0.0,
        age: 1e9,
    };

    pub fn is_alive(&self) -> bool {
        self.age < self.life
    }

    /// Remaining life as a fraction, 1 at birth
    pub fn fade(&self) -> f32 {
        if self.life <= 0.0 {
            0.0
        } else {
            1.0 - self.age / self.life
        }
    }
}

pub struct ParticlePool {
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticlePool {
    pub fn new(capacity: usize, seed: u64) -> Self {
        Self {
            particles: vec![Particle::DEAD; capacity],
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn with_config(config: &ParticleConfig) -> Self {
        Self::new(config.capacity, config.seed)
    }

    /// Spawn up to `count` particles bursting out of `position`, each in the
    /// first free slot. Requests beyond the free capacity are dropped.
    /// Returns how many were spawned.
    pub fn emit(&mut self, position: Vec2, count: usize) -> usize {
        let mut spawned = 0;
        let mut cursor = 0;
        while spawned < count {
            let Some(offset) = self.particles[cursor..].iter().position(|p| !p.is_alive()) else {
                break;
            };
            cursor += offset;

            let angle = self.rng.gen_range(0.0..TAU);
            let speed = self.rng.gen_range(50.0..250.0);
            let life = self.rng.gen_range(300..1100) as f32;
            self.particles[cursor] = Particle {
                position,
                velocity: Vec2::from_angle(angle) * speed,
                life,
                age: 0.0,
            };
            spawned += 1;
            cursor += 1;
        }
        spawned
    }

    /// Age and move every live particle by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        for p in self.particles.iter_mut().filter(|p| p.is_alive()) {
            p.age += dt * 1000.0;
            p.velocity.y += PARTICLE_GRAVITY * dt;
            p.position += p.velocity * dt;
        }
    }

    pub fn live(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.is_alive())
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    /// Live particles in the form the render pass draws
    pub fn quads(&self) -> impl Iterator<Item = ParticleQuad> + '_ {
        self.live().map(|p| ParticleQuad {
            position: p.position,
            fade: p.fade(),
        })
    }
}
