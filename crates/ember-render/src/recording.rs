use ember_assets::TextureAsset;
use ember_core::{Color, Rect};
use ember_ecs::SourceRect;

use crate::surface::{RenderError, RenderSurface};

/// One call received by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Color),
    Texture {
        id: String,
        src: SourceRect,
        dst: Rect,
        rotation: f32,
    },
    Fill(Rect, Color),
    Present,
}

/// A headless surface that records draw calls instead of rasterizing them.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Number of frames presented so far
    pub presented: u64,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            calls: Vec::new(),
            width,
            height,
            vsync: false,
            presented: 0,
        }
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Calls recorded since the last `Clear`.
    pub fn last_frame(&self) -> &[DrawCall] {
        let start = self
            .calls
            .iter()
            .rposition(|c| matches!(c, DrawCall::Clear(_)))
            .unwrap_or(0);
        &self.calls[start..]
    }

    pub fn textures_drawn(&self) -> Vec<&DrawCall> {
        self.last_frame()
            .iter()
            .filter(|c| matches!(c, DrawCall::Texture { .. }))
            .collect()
    }
}

impl RenderSurface for RecordingSurface {
    fn clear(&mut self, color: Color) {
        self.calls.push(DrawCall::Clear(color));
    }

    fn draw_textured_rect(
        &mut self,
        id: &str,
        _texture: &TextureAsset,
        src: SourceRect,
        dst: Rect,
        rotation: f32,
    ) {
        self.calls.push(DrawCall::Texture {
            id: id.to_owned(),
            src,
            dst,
            rotation,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.calls.push(DrawCall::Fill(rect, color));
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.presented += 1;
        self.calls.push(DrawCall::Present);
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn has_vsync(&self) -> bool {
        self.vsync
    }
}
