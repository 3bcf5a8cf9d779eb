//! CPU framebuffer and rasterization of rectangles and textured quads

use ember_assets::TextureAsset;
use ember_core::{Color, Rect};
use ember_ecs::SourceRect;

use crate::surface::{RenderError, RenderSurface};

/// Framebuffer for software rendering
pub struct Framebuffer {
    pixels: Vec<u8>, // RGBA, 4 bytes per pixel
    width: u32,
    height: u32,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; width as usize * height as usize * 4];
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]])
    }

    /// Copy the frame into `out` in BGRA order, the layout most swapchains use.
    pub fn copy_bgra_into(&self, out: &mut [u8]) {
        let src: &[[u8; 4]] = bytemuck::cast_slice(&self.pixels);
        for (dst, &[r, g, b, a]) in out.chunks_exact_mut(4).zip(src) {
            dst.copy_from_slice(&[b, g, r, a]);
        }
    }

    pub fn fill(&mut self, color: Color) {
        let [r, g, b, _] = color.to_rgba8();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&[r, g, b, 255]);
        }
    }

    /// Set a pixel with alpha blending (0 = transparent, 255 = opaque).
    /// Out-of-bounds coordinates are ignored.
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, rgba: [u8; 4]) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let [r, g, b, a] = rgba;
        match a {
            0 => {}
            255 => self.pixels[idx..idx + 4].copy_from_slice(&[r, g, b, 255]),
            _ => {
                // result = front * alpha + back * (1 - alpha)
                let a = a as u16;
                let inv_a = 255 - a;
                let px = &mut self.pixels[idx..idx + 4];
                px[0] = ((r as u16 * a + px[0] as u16 * inv_a) / 255) as u8;
                px[1] = ((g as u16 * a + px[1] as u16 * inv_a) / 255) as u8;
                px[2] = ((b as u16 * a + px[2] as u16 * inv_a) / 255) as u8;
                px[3] = 255;
            }
        }
    }

    /// Fill a rectangle given in pixels, clipped to the framebuffer.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let rgba = color.to_rgba8();
        let x0 = rect.x.round() as i32;
        let y0 = rect.y.round() as i32;
        let x1 = x0 + rect.w.round() as i32;
        let y1 = y0 + rect.h.round() as i32;

        let (x0, y0) = (x0.max(0), y0.max(0));
        let (x1, y1) = (x1.min(self.width as i32), y1.min(self.height as i32));
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend_pixel(x, y, rgba);
            }
        }
    }

    /// Nearest-neighbor blit of a texture region, rotated clockwise by
    /// `rotation` degrees around the center of `dst`. Texel alpha is blended.
    pub fn draw_textured_rect(
        &mut self,
        texture: &TextureAsset,
        src: SourceRect,
        dst: Rect,
        rotation: f32,
    ) {
        let sw = if src.w == 0 { texture.width } else { src.w };
        let sh = if src.h == 0 { texture.height } else { src.h };
        if dst.w <= 0.0 || dst.h <= 0.0 || sw == 0 || sh == 0 {
            return;
        }

        let (sin, cos) = rotation.to_radians().sin_cos();
        let (hw, hh) = (dst.w * 0.5, dst.h * 0.5);
        let (cx, cy) = (dst.x + hw, dst.y + hh);

        // Screen-space bounds of the rotated quad
        let ex = hw * cos.abs() + hh * sin.abs();
        let ey = hw * sin.abs() + hh * cos.abs();
        let min_x = ((cx - ex).floor() as i32).max(0);
        let max_x = ((cx + ex).ceil() as i32).min(self.width as i32);
        let min_y = ((cy - ey).floor() as i32).max(0);
        let max_y = ((cy + ey).ceil() as i32).min(self.height as i32);

        for py in min_y..max_y {
            for px in min_x..max_x {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                // Undo the rotation to land in the unrotated destination rect
                let lx = dx * cos + dy * sin + hw;
                let ly = -dx * sin + dy * cos + hh;
                if lx < 0.0 || ly < 0.0 || lx >= dst.w || ly >= dst.h {
                    continue;
                }
                let u = ((lx / dst.w * sw as f32) as u32).min(sw - 1);
                let v = ((ly / dst.h * sh as f32) as u32).min(sh - 1);
                if let Some(texel) = texture.pixel(src.x + u, src.y + v) {
                    self.blend_pixel(px, py, texel);
                }
            }
        }
    }
}

impl RenderSurface for Framebuffer {
    fn clear(&mut self, color: Color) {
        self.fill(color);
    }

    fn draw_textured_rect(
        &mut self,
        _id: &str,
        texture: &TextureAsset,
        src: SourceRect,
        dst: Rect,
        rotation: f32,
    ) {
        Framebuffer::draw_textured_rect(self, texture, src, dst, rotation);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        Framebuffer::fill_rect(self, rect, color);
    }

    fn present(&mut self) -> Result<(), RenderError> {
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn has_vsync(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const GREEN: [u8; 4] = [0, 255, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];
    const WHITE: [u8; 4] = [255, 255, 255, 255];

    fn checker() -> TextureAsset {
        let data = [RED, GREEN, BLUE, WHITE].concat();
        TextureAsset::from_rgba8(2, 2, data).unwrap()
    }

    #[test]
    fn clear_is_opaque() {
        let mut fb = Framebuffer::new(4, 4);
        fb.fill(Color::from_rgba8(18, 20, 24, 0));
        assert_eq!(fb.pixel(3, 3), Some([18, 20, 24, 255]));
    }

    #[test]
    fn fill_rect_blends_and_clips() {
        let mut fb = Framebuffer::new(8, 8);
        fb.fill(Color::from_rgba8(100, 100, 100, 255));
        fb.fill_rect(Rect::new(-2.0, 6.0, 4.0, 10.0), Color::from_rgba8(0, 0, 0, 128));

        // 100 * 127 / 255
        assert_eq!(fb.pixel(0, 7), Some([49, 49, 49, 255]));
        assert_eq!(fb.pixel(1, 6), Some([49, 49, 49, 255]));
        assert_eq!(fb.pixel(2, 6), Some([100, 100, 100, 255]));
        assert_eq!(fb.pixel(0, 5), Some([100, 100, 100, 255]));
    }

    #[test]
    fn scaled_blit() {
        let mut fb = Framebuffer::new(6, 6);
        fb.draw_textured_rect(&checker(), SourceRect::default(), Rect::new(1.0, 1.0, 4.0, 4.0), 0.0);
        assert_eq!(fb.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(fb.pixel(1, 1), Some(RED));
        assert_eq!(fb.pixel(2, 2), Some(RED));
        assert_eq!(fb.pixel(3, 1), Some(GREEN));
        assert_eq!(fb.pixel(1, 4), Some(BLUE));
        assert_eq!(fb.pixel(4, 4), Some(WHITE));
        assert_eq!(fb.pixel(5, 5), Some([0, 0, 0, 0]));
    }

    #[test]
    fn source_region_selects_texels() {
        let mut fb = Framebuffer::new(2, 2);
        fb.draw_textured_rect(&checker(), SourceRect::new(1, 1, 1, 1), Rect::new(0.0, 0.0, 2.0, 2.0), 0.0);
        assert_eq!(fb.pixel(0, 0), Some(WHITE));
        assert_eq!(fb.pixel(1, 1), Some(WHITE));
    }

    #[test]
    fn quarter_turn_is_clockwise() {
        let strip = TextureAsset::from_rgba8(2, 1, [RED, BLUE].concat()).unwrap();
        let mut fb = Framebuffer::new(2, 2);
        fb.draw_textured_rect(&strip, SourceRect::default(), Rect::new(0.0, 0.0, 2.0, 2.0), 90.0);
        assert_eq!(fb.pixel(0, 0), Some(RED));
        assert_eq!(fb.pixel(1, 0), Some(RED));
        assert_eq!(fb.pixel(0, 1), Some(BLUE));
        assert_eq!(fb.pixel(1, 1), Some(BLUE));
    }

    #[test]
    fn transparent_texels_are_skipped() {
        let tex = TextureAsset::solid(1, 1, [9, 9, 9, 0]);
        let mut fb = Framebuffer::new(2, 2);
        fb.fill(Color::from_rgba8(1, 2, 3, 255));
        fb.draw_textured_rect(&tex, SourceRect::default(), Rect::new(0.0, 0.0, 2.0, 2.0), 0.0);
        assert_eq!(fb.pixel(0, 0), Some([1, 2, 3, 255]));
    }

    #[test]
    fn bgra_copy() {
        let mut fb = Framebuffer::new(1, 1);
        fb.blend_pixel(0, 0, [1, 2, 3, 255]);
        let mut out = [0u8; 4];
        fb.copy_bgra_into(&mut out);
        assert_eq!(out, [3, 2, 1, 255]);
    }

    #[test]
    fn resize_reallocates() {
        let mut fb = Framebuffer::new(2, 2);
        fb.resize(3, 5);
        assert_eq!(fb.size(), (3, 5));
        assert_eq!(fb.pixels().len(), 60);
    }
}
