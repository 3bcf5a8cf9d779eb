use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::AssetError;
use crate::handle::{AssetHandle, AssetId};
use crate::texture::{self, TextureAsset};

/// Central texture registry. Loads, caches, and hands out textures by name.
///
/// Game code refers to textures by string id (`"player"`, `"tiles"`); the
/// server owns the pixel data and resolves ids to handles.
pub struct AssetServer {
    base_path: PathBuf,
    textures: Vec<TextureAsset>,
    names: HashMap<String, AssetHandle<TextureAsset>>,
    path_to_texture: HashMap<PathBuf, AssetHandle<TextureAsset>>,
}

impl AssetServer {
    /// Create a new AssetServer rooted at the given base path.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        info!("AssetServer created with base path: {}", base_path.display());
        Self {
            base_path,
            textures: Vec::new(),
            names: HashMap::new(),
            path_to_texture: HashMap::new(),
        }
    }

    /// Resolve a relative asset path against the base path.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    /// Load an image file (PNG, JPEG, etc.) as the texture named `id`.
    ///
    /// Loading a path that is already cached binds `id` to the cached texture.
    /// Loading a new path under an existing id rebinds the id. Failures are
    /// logged and leave any previous binding of `id` untouched.
    pub fn load_texture(
        &mut self,
        id: &str,
        path: impl AsRef<Path>,
    ) -> Result<AssetHandle<TextureAsset>, AssetError> {
        let full_path = self.resolve(path.as_ref());

        if let Some(&handle) = self.path_to_texture.get(&full_path) {
            self.names.insert(id.to_owned(), handle);
            return Ok(handle);
        }

        if !full_path.exists() {
            warn!(id, path = %full_path.display(), "texture not found");
            return Err(AssetError::NotFound(full_path));
        }

        let tex = texture::load_texture(&full_path).inspect_err(|e| {
            warn!(id, error = %e, "failed to load texture");
        })?;
        debug!(id, width = tex.width, height = tex.height, "loaded texture");

        let handle = self.push(id, tex);
        self.path_to_texture.insert(full_path, handle);
        Ok(handle)
    }

    /// Register an already decoded texture under `id`.
    pub fn insert_texture(&mut self, id: &str, tex: TextureAsset) -> AssetHandle<TextureAsset> {
        self.push(id, tex)
    }

    fn push(&mut self, id: &str, tex: TextureAsset) -> AssetHandle<TextureAsset> {
        let handle = AssetHandle::new(self.textures.len() as AssetId);
        self.textures.push(tex);
        self.names.insert(id.to_owned(), handle);
        handle
    }

    /// Handle of the texture currently bound to `id`.
    pub fn handle(&self, id: &str) -> Option<AssetHandle<TextureAsset>> {
        self.names.get(id).copied()
    }

    /// The texture bound to `id`, if it loaded.
    pub fn texture(&self, id: &str) -> Option<&TextureAsset> {
        self.handle(id).and_then(|h| self.get_texture(h))
    }

    /// Get a reference to a loaded texture by its handle.
    pub fn get_texture(&self, handle: AssetHandle<TextureAsset>) -> Option<&TextureAsset> {
        self.textures.get(handle.id() as usize)
    }

    /// Number of texture ids with a loaded texture.
    pub fn texture_count(&self) -> usize {
        self.names.len()
    }

    /// The base path this server resolves relative paths against.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}
