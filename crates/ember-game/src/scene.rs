//! Demo scene: a tiled ground, a controllable player, and a few crates

use std::path::Path;

use ember_assets::Tilemap;
use ember_core::{EntityId, InputAction, Transform};
use ember_ecs::{
    Animation, Behavior, Camera, Collider, Physics, Script, ScriptContext, SourceRect, Sprite, World,
};
use tracing::{debug, info};

use crate::engine::Engine;

const TILE_SIZE: f32 = 64.0;

/// Side-scroller controls: run left/right, jump off the ground.
#[derive(Debug, Clone)]
pub struct PlayerController {
    /// Horizontal speed in pixels per second
    pub speed: f32,
    /// Vertical velocity set by a jump (negative is up)
    pub jump_velocity: f32,
    /// Frame time while running
    pub run_frame_time: f32,
    /// Frame time while standing
    pub idle_frame_time: f32,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self {
            speed: 240.0,
            jump_velocity: -420.0,
            run_frame_time: 0.12,
            idle_frame_time: 0.4,
        }
    }
}

impl Script for PlayerController {
    fn update(&mut self, ctx: &mut ScriptContext<'_>, entity: EntityId, _dt: f32) {
        let input = ctx.input;
        let Some(physics) = ctx.world.get_mut::<Physics>(entity) else {
            return;
        };

        physics.velocity.x = if input.is_held(InputAction::Left) {
            -self.speed
        } else if input.is_held(InputAction::Right) {
            self.speed
        } else {
            0.0
        };

        let jumped = input.any_held(&[InputAction::Jump, InputAction::Up]) && physics.on_ground;
        if jumped {
            physics.velocity.y = self.jump_velocity;
            physics.on_ground = false;
        }
        let running = physics.velocity.x.abs() > 1.0;

        if jumped {
            ctx.commands.play_sound("jump");
        }
        if let Some(anim) = ctx
            .world
            .get_mut::<Sprite>(entity)
            .and_then(|s| s.animation.as_mut())
        {
            anim.frame_time = if running {
                self.run_frame_time
            } else {
                self.idle_frame_time
            };
        }
    }
}

/// Entities of interest created by [`build_demo_scene`]
#[derive(Debug, Clone)]
pub struct DemoScene {
    pub player: EntityId,
    pub camera: EntityId,
    pub collectibles: Vec<EntityId>,
    pub tiles: usize,
}

fn spawn_tile(world: &mut World, col: usize, row: usize) -> EntityId {
    let id = world.spawn();
    world.insert(
        id,
        Transform::from_xy(
            col as f32 * TILE_SIZE + TILE_SIZE / 2.0,
            row as f32 * TILE_SIZE + TILE_SIZE / 2.0,
        ),
    );
    world.insert(
        id,
        Sprite::new("tiles", SourceRect::sized(TILE_SIZE as u32, TILE_SIZE as u32)),
    );
    world.insert(id, Collider::fixed(TILE_SIZE, TILE_SIZE));
    id
}

/// Populate `world`. Non-zero tilemap cells become ground tiles; without a
/// tilemap a 20x4 strip is laid from row 8 down.
pub fn build_demo_scene(world: &mut World, tilemap: Option<&Tilemap>) -> DemoScene {
    let mut tiles = 0;
    match tilemap {
        Some(map) => {
            for (row, col, _) in map.occupied() {
                spawn_tile(world, col, row);
                tiles += 1;
            }
        }
        None => {
            for col in 0..20 {
                for row in 8..12 {
                    spawn_tile(world, col, row);
                    tiles += 1;
                }
            }
        }
    }

    let player = world.spawn();
    world.insert(player, Transform::from_xy(100.0, 100.0));
    world.insert(
        player,
        Sprite::new("player", SourceRect::sized(48, 48)).with_animation(Animation::new(4, 0.12)),
    );
    world.insert(player, Physics::default());
    world.insert(player, Collider::dynamic(40.0, 40.0));
    world.insert(player, Behavior::new(PlayerController::default()));

    let camera = world.spawn();
    world.insert(camera, Transform::default());
    world.insert(camera, Camera::default());

    let collectibles = (0..5)
        .map(|i| {
            let id = world.spawn();
            world.insert(id, Transform::from_xy(400.0 + i as f32 * 80.0, 200.0));
            world.insert(id, Sprite::new("tiles", SourceRect::sized(32, 32)));
            world.insert(id, Collider::dynamic(32.0, 32.0));
            world.insert(id, Behavior::idle());
            id
        })
        .collect();

    debug!(tiles, entities = world.entity_count(), "demo scene built");
    DemoScene {
        player,
        camera,
        collectibles,
        tiles,
    }
}

/// Load the demo's optional assets. Anything missing is logged by the
/// loaders and skipped.
pub fn load_demo_assets(engine: &mut Engine) {
    for (id, path) in [
        ("player", "player.png"),
        ("tiles", "tiles.png"),
        ("font", "font.png"),
    ] {
        // Failures are already logged by the loader
        engine.assets.load_texture(id, path).ok();
    }

    let bg = engine.assets.resolve(Path::new("bg.ogg"));
    engine.audio.load_music("bg", &bg).ok();
    let jump = engine.assets.resolve(Path::new("jump.wav"));
    engine.audio.load_sound("jump", &jump).ok();

    info!(
        textures = engine.assets.texture_count(),
        audio = engine.audio.is_enabled(),
        "demo assets loaded"
    );
}

/// Load assets, build the scene (from `level.csv` when present) and start
/// the background music.
pub fn start_demo(engine: &mut Engine) -> DemoScene {
    load_demo_assets(engine);
    let tilemap = Tilemap::load(&engine.assets.resolve(Path::new("level.csv"))).ok();
    let scene = build_demo_scene(&mut engine.world, tilemap.as_ref());
    engine.audio.play_music("bg");
    scene
}
