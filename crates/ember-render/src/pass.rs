use ember_assets::{AssetServer, TextureAsset};
use ember_core::{Color, Rect, Transform, Vec2};
use ember_ecs::{SourceRect, Sprite, World};
use tracing::trace;

use crate::surface::{RenderError, RenderSurface};

/// Look of the fixed parts of every frame
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub clear_color: Color,
    /// Side length of a particle square in pixels
    pub particle_size: f32,
    pub show_hud: bool,
    /// Translucent panel behind the debug readout
    pub hud_rect: Rect,
    pub hud_color: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: Color::from_rgba8(18, 20, 24, 255),
            particle_size: 2.0,
            show_hud: true,
            hud_rect: Rect::new(8.0, 8.0, 220.0, 80.0),
            hud_color: Color::from_rgba8(0, 0, 0, 160),
        }
    }
}

/// A live particle as the renderer sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleQuad {
    pub position: Vec2,
    /// 1 when freshly emitted, approaching 0 as the particle ages
    pub fade: f32,
}

/// What went into the last frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub sprites: usize,
    /// Sprites skipped because their texture is not loaded
    pub missing_textures: usize,
    pub particles: usize,
}

/// Draws the world, particles and HUD panel onto a surface, then presents.
#[derive(Debug, Clone, Default)]
pub struct SceneRenderer {
    pub config: RenderConfig,
}

impl SceneRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render one frame as seen from `camera` (the world position of the
    /// top-left corner of the screen).
    pub fn render<S, P>(
        &self,
        surface: &mut S,
        world: &World,
        assets: &AssetServer,
        particles: P,
        camera: Vec2,
    ) -> Result<FrameReport, RenderError>
    where
        S: RenderSurface + ?Sized,
        P: IntoIterator<Item = ParticleQuad>,
    {
        let mut report = FrameReport::default();
        surface.clear(self.config.clear_color);

        let (entities, components) = world.split();
        let mut sprites: Vec<(&Transform, &Sprite)> = entities
            .iter()
            .filter_map(|e| {
                Some((
                    components.transforms.get(e.index())?,
                    components.sprites.get(e.index())?,
                ))
            })
            .collect();
        // Stable, so equal layers keep creation order
        sprites.sort_by(|a, b| a.1.layer.total_cmp(&b.1.layer));

        for (transform, sprite) in sprites {
            let Some(texture) = assets.texture(&sprite.texture) else {
                trace!(texture = %sprite.texture, "skipping sprite with missing texture");
                report.missing_textures += 1;
                continue;
            };
            let (src, dst) = sprite_placement(transform, sprite, texture, camera);
            surface.draw_textured_rect(&sprite.texture, texture, src, dst, transform.rotation);
            report.sprites += 1;
        }

        let size = self.config.particle_size;
        for p in particles {
            let a = p.fade.clamp(0.0, 1.0);
            let color = Color::from_rgba8((255.0 * a) as u8, (180.0 * a) as u8, (80.0 * a) as u8, 255);
            let x = ((p.position.x - camera.x) as i32) as f32;
            let y = ((p.position.y - camera.y) as i32) as f32;
            surface.fill_rect(Rect::new(x, y, size, size), color);
            report.particles += 1;
        }

        if self.config.show_hud {
            surface.fill_rect(self.config.hud_rect, self.config.hud_color);
        }

        surface.present()?;
        Ok(report)
    }
}

/// Source and destination rectangles for a sprite.
///
/// A zero source width or height takes the texture's. The destination size
/// is the source size times the transform scale, truncated to whole pixels;
/// its corner is rounded to the nearest pixel.
pub fn sprite_placement(
    transform: &Transform,
    sprite: &Sprite,
    texture: &TextureAsset,
    camera: Vec2,
) -> (SourceRect, Rect) {
    let mut src = sprite.frame_source();
    if src.w == 0 {
        src.w = texture.width;
    }
    if src.h == 0 {
        src.h = texture.height;
    }

    let dw = (src.w as f32 * transform.scale.x) as i32;
    let dh = (src.h as f32 * transform.scale.y) as i32;
    let (ox, oy) = if sprite.centered {
        (dw as f32 / 2.0, dh as f32 / 2.0)
    } else {
        (0.0, 0.0)
    };
    let x = (transform.position.x - camera.x - ox).round();
    let y = (transform.position.y - camera.y - oy).round();
    (src, Rect::new(x, y, dw as f32, dh as f32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCall, RecordingSurface};
    use ember_ecs::Animation;

    fn assets() -> AssetServer {
        let mut assets = AssetServer::new(".");
        assets.insert_texture("player", TextureAsset::solid(192, 48, [255; 4]));
        assets.insert_texture("tiles", TextureAsset::solid(64, 64, [128; 4]));
        assets
    }

    #[test]
    fn centered_scaled_sprite() {
        let tex = TextureAsset::solid(16, 16, [0; 4]);
        let transform = Transform {
            scale: Vec2::splat(2.0),
            ..Transform::from_xy(100.0, 100.0)
        };
        let sprite = Sprite::new("t", SourceRect::sized(16, 16));
        let (src, dst) = sprite_placement(&transform, &sprite, &tex, Vec2::new(10.0, 20.0));
        assert_eq!(src, SourceRect::sized(16, 16));
        assert_eq!(dst, Rect::new(74.0, 64.0, 32.0, 32.0));
    }

    #[test]
    fn uncentered_sprite_uses_whole_texture() {
        let tex = TextureAsset::solid(21, 10, [0; 4]);
        let sprite = Sprite {
            centered: false,
            ..Sprite::new("t", SourceRect::default())
        };
        let transform = Transform {
            scale: Vec2::new(0.5, 1.0),
            ..Transform::from_xy(3.4, 7.6)
        };
        let (src, dst) = sprite_placement(&transform, &sprite, &tex, Vec2::ZERO);
        assert_eq!(src, SourceRect::sized(21, 10));
        assert_eq!(dst, Rect::new(3.0, 8.0, 10.0, 10.0));
    }

    #[test]
    fn frame_order_and_contents() {
        let mut world = World::new();
        let player = world.spawn();
        world.insert(player, Transform::from_xy(100.0, 100.0));
        let mut anim = Animation::new(4, 0.12);
        anim.current = 1;
        world.insert(
            player,
            Sprite::new("player", SourceRect::sized(48, 48)).with_animation(anim),
        );
        let ghost = world.spawn();
        world.insert(ghost, Transform::default());
        world.insert(ghost, Sprite::new("missing", SourceRect::sized(8, 8)));

        let mut surface = RecordingSurface::new(640, 480);
        let particles = [ParticleQuad {
            position: Vec2::new(50.7, 60.2),
            fade: 0.5,
        }];
        let report = SceneRenderer::default()
            .render(&mut surface, &world, &assets(), particles, Vec2::new(10.0, 10.0))
            .unwrap();

        assert_eq!(
            report,
            FrameReport {
                sprites: 1,
                missing_textures: 1,
                particles: 1
            }
        );
        assert_eq!(
            surface.calls,
            vec![
                DrawCall::Clear(Color::from_rgba8(18, 20, 24, 255)),
                DrawCall::Texture {
                    id: "player".into(),
                    src: SourceRect::new(48, 0, 48, 48),
                    dst: Rect::new(66.0, 66.0, 48.0, 48.0),
                    rotation: 0.0,
                },
                DrawCall::Fill(
                    Rect::new(40.0, 50.0, 2.0, 2.0),
                    Color::from_rgba8(127, 90, 40, 255)
                ),
                DrawCall::Fill(
                    Rect::new(8.0, 8.0, 220.0, 80.0),
                    Color::from_rgba8(0, 0, 0, 160)
                ),
                DrawCall::Present,
            ]
        );
        assert_eq!(surface.presented, 1);
    }

    #[test]
    fn layers_sort_stably() {
        let mut world = World::new();
        for (layer, tex) in [(1.0, "tiles"), (0.0, "player"), (1.0, "player")] {
            let e = world.spawn();
            world.insert(e, Transform::default());
            world.insert(
                e,
                Sprite {
                    layer,
                    ..Sprite::new(tex, SourceRect::sized(4, 4))
                },
            );
        }
        let mut surface = RecordingSurface::new(64, 64);
        SceneRenderer::default()
            .render(&mut surface, &world, &assets(), [], Vec2::ZERO)
            .unwrap();

        let ids: Vec<_> = surface
            .textures_drawn()
            .into_iter()
            .filter_map(|c| match c {
                DrawCall::Texture { id, .. } => Some(id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec!["player", "tiles", "player"]);
    }

    #[test]
    fn hud_can_be_hidden() {
        let world = World::new();
        let mut surface = RecordingSurface::new(64, 64);
        let renderer = SceneRenderer::new(RenderConfig {
            show_hud: false,
            ..Default::default()
        });
        renderer
            .render(&mut surface, &world, &assets(), [], Vec2::ZERO)
            .unwrap();
        assert_eq!(surface.calls.len(), 2);
    }
}
