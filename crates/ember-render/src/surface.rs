use ember_assets::TextureAsset;
use ember_core::{Color, Rect};
use ember_ecs::SourceRect;

/// Errors raised while presenting a frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to present frame: {0}")]
    Present(String),

    #[error("surface lost: {0}")]
    SurfaceLost(String),
}

/// Something the renderer can draw into and present.
///
/// Coordinates are in pixels with the origin at the top-left corner and +Y
/// pointing down.
pub trait RenderSurface {
    /// Fill the whole surface with an opaque color.
    fn clear(&mut self, color: Color);

    /// Draw the `src` sub-rectangle of `texture` stretched over `dst`,
    /// rotated clockwise by `rotation` degrees around the center of `dst`.
    fn draw_textured_rect(
        &mut self,
        id: &str,
        texture: &TextureAsset,
        src: SourceRect,
        dst: Rect,
        rotation: f32,
    );

    /// Fill a rectangle, blending by the color's alpha.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Show the finished frame.
    fn present(&mut self) -> Result<(), RenderError>;

    /// Width and height in pixels.
    fn size(&self) -> (u32, u32);

    /// Whether `present` blocks on the display refresh.
    fn has_vsync(&self) -> bool;
}
