//! The engine: world state plus the per-tick and per-frame pipelines

use ember_assets::AssetServer;
use ember_audio::AudioEngine;
use ember_core::{InputState, Vec2};
use ember_ecs::{run_behaviors, Command, CommandQueue, SystemSchedule, World};
use ember_physics::{PhysicsConfig, PhysicsWorld};
use ember_render::{FrameReport, RenderError, RenderSurface, SceneRenderer};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::animation::AnimationSystem;
use crate::camera::{CameraConfig, CameraTracker};
use crate::particles::{ParticleConfig, ParticlePool};

/// Simulation settings gathered in one place
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub physics: PhysicsConfig,
    pub particles: ParticleConfig,
    pub camera: CameraConfig,
}

/// Owns every piece of game state. Fields drop in declaration order, so the
/// world goes before the asset and audio caches it refers to by id.
pub struct Engine {
    pub world: World,
    pub physics: PhysicsWorld,
    /// Systems run after physics each tick
    pub systems: SystemSchedule,
    pub particles: ParticlePool,
    pub camera: CameraTracker,
    pub renderer: SceneRenderer,
    commands: CommandQueue,
    pub assets: AssetServer,
    pub audio: AudioEngine,
}

impl Engine {
    pub fn new(config: EngineConfig, assets: AssetServer, audio: AudioEngine) -> Self {
        let mut systems = SystemSchedule::new();
        systems.add_system(AnimationSystem);

        Self {
            world: World::new(),
            physics: PhysicsWorld::with_config(config.physics),
            systems,
            particles: ParticlePool::with_config(&config.particles),
            camera: CameraTracker::with_config(config.camera),
            renderer: SceneRenderer::default(),
            commands: CommandQueue::new(),
            assets,
            audio,
        }
    }

    /// Run one fixed simulation tick: behaviors, physics, the system
    /// schedule, particles, then the commands behaviors queued.
    pub fn tick(&mut self, input: &InputState, dt: f32) {
        run_behaviors(&mut self.world, input, &mut self.commands, dt);
        self.physics.step(&mut self.world, dt);
        self.systems.run_all(&mut self.world, dt);
        self.particles.update(dt);
        self.apply_commands();
        self.audio.update();
    }

    /// Queue a command as if a behavior had issued it
    pub fn push_command(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Commands waiting for the end of the tick
    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    fn apply_commands(&mut self) {
        for command in self.commands.drain() {
            trace!(?command, "applying command");
            match command {
                Command::PlaySound(id) => self.audio.play_sound(&id),
                Command::PlayMusic(id) => self.audio.play_music(&id),
                Command::StopMusic => self.audio.stop_music(),
                Command::EmitParticles { position, count } => {
                    self.particles.emit(position, count);
                }
            }
        }
    }

    /// Move the camera one step, then draw and present a frame.
    pub fn render<S>(&mut self, surface: &mut S) -> Result<FrameReport, RenderError>
    where
        S: RenderSurface + ?Sized,
    {
        let (w, h) = surface.size();
        self.camera.update(&self.world, Vec2::new(w as f32, h as f32));
        self.renderer.render(
            surface,
            &self.world,
            &self.assets,
            self.particles.quads(),
            self.camera.offset(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_audio::AudioConfig;
    use ember_core::{EntityId, InputAction, Transform};
    use ember_ecs::{Animation, Behavior, Collider, Physics, ScriptContext, SourceRect, Sprite};
    use ember_render::RecordingSurface;

    fn engine() -> Engine {
        Engine::new(
            EngineConfig::default(),
            AssetServer::new("."),
            AudioEngine::disabled(AudioConfig::default()),
        )
    }

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn gravity_only_body_over_ticks() {
        let mut engine = engine();
        let e = engine.world.spawn();
        engine.world.insert(e, Transform::default());
        engine.world.insert(e, Physics::default());

        let input = InputState::new();
        for _ in 0..10 {
            engine.tick(&input, DT);
        }
        let vy = engine.world.get::<Physics>(e).unwrap().velocity.y;
        assert!((vy - 900.0 * DT * 10.0).abs() < 1e-3);
    }

    #[test]
    fn behaviors_run_before_physics() {
        let mut engine = engine();
        let e = engine.world.spawn();
        engine.world.insert(e, Transform::default());
        engine.world.insert(e, Physics::weightless());
        engine.world.insert(
            e,
            Behavior::new(|ctx: &mut ScriptContext<'_>, id: EntityId, _dt: f32| {
                if ctx.input.is_held(InputAction::Right) {
                    if let Some(p) = ctx.world.get_mut::<Physics>(id) {
                        p.velocity.x = 60.0;
                    }
                }
            }),
        );

        let mut input = InputState::new();
        input.press(InputAction::Right);
        engine.tick(&input, DT);
        let x = engine.world.get::<Transform>(e).unwrap().position.x;
        assert!((x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn commands_apply_at_end_of_tick() {
        let mut engine = engine();
        let e = engine.world.spawn();
        engine.world.insert(
            e,
            Behavior::new(|ctx: &mut ScriptContext<'_>, _id: EntityId, _dt: f32| {
                ctx.commands.emit_particles(Vec2::new(5.0, 5.0), 3);
                ctx.commands.play_sound("jump");
            }),
        );

        engine.tick(&InputState::new(), DT);
        assert_eq!(engine.pending_commands(), 0);
        assert_eq!(engine.particles.live_count(), 3);
        // Emitted after the particle update, so not yet moved
        assert!(engine.particles.live().all(|p| p.age == 0.0));
    }

    #[test]
    fn animation_runs_each_tick() {
        let mut engine = engine();
        let e = engine.world.spawn();
        engine.world.insert(
            e,
            Sprite::new("player", SourceRect::sized(48, 48)).with_animation(Animation::new(4, 0.25)),
        );
        for _ in 0..4 {
            engine.tick(&InputState::new(), 0.25);
        }
        let current = engine.world.get::<Sprite>(e).unwrap().animation.as_ref().unwrap().current;
        assert_eq!(current, 0);
    }

    #[test]
    fn render_moves_camera_and_presents() {
        let mut engine = engine();
        let e = engine.world.spawn();
        engine.world.insert(e, Transform::from_xy(420.0, 340.0));
        engine.world.insert(e, Physics::default());
        engine.world.insert(e, Collider::dynamic(40.0, 40.0));
        engine.push_command(Command::EmitParticles {
            position: Vec2::ZERO,
            count: 2,
        });
        engine.tick(&InputState::new(), 0.0);

        let mut surface = RecordingSurface::new(640, 480);
        let report = engine.render(&mut surface).unwrap();
        assert_eq!(report.particles, 2);
        assert_eq!(surface.presented, 1);
        assert!((engine.camera.offset() - Vec2::new(12.0, 12.0)).length() < 1e-4);
    }
}
