//! Ember Assets - Asset loading and management
//!
//! Provides texture decoding and caching by name, plus the small text
//! formats the engine reads at startup: flat `key = value` configuration
//! and CSV tilemaps.

mod config;
mod error;
mod handle;
mod server;
mod texture;
mod tilemap;

pub use config::Config;
pub use error::{AssetError, ConfigError};
pub use handle::{AssetHandle, AssetId};
pub use server::AssetServer;
pub use texture::{decode_texture, load_texture, TextureAsset};
pub use tilemap::Tilemap;
