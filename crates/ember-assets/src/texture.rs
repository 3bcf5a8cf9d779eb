use std::path::Path;

use crate::error::AssetError;

/// A decoded texture: tightly packed RGBA8 rows, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureAsset {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl TextureAsset {
    /// Wrap raw RGBA8 pixels, checking that the buffer matches the extent.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Result<Self, AssetError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(AssetError::InvalidTexture(format!(
                "{width}x{height} needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A texture filled with a single color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    /// RGBA of the texel at (x, y), or `None` outside the texture.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }
}

/// Load an image file and return it as an RGBA8 texture.
pub fn load_texture(path: &Path) -> Result<TextureAsset, AssetError> {
    let bytes = std::fs::read(path).map_err(|e| AssetError::Io(path.to_path_buf(), e))?;
    decode_texture(&bytes, path)
}

/// Decode an in-memory image (PNG, JPEG, BMP, ...) to RGBA8. `origin` is only
/// used for error messages.
pub fn decode_texture(bytes: &[u8], origin: &Path) -> Result<TextureAsset, AssetError> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| AssetError::ImageLoadFailed(origin.to_path_buf(), e.to_string()))?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(TextureAsset {
        width,
        height,
        data: rgba.into_raw(),
    })
}
