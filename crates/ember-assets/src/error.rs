use std::path::PathBuf;

/// Errors that can occur during asset loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to decode image '{0}': {1}")]
    ImageLoadFailed(PathBuf, String),

    #[error("I/O error loading '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("'{0}' is empty")]
    Empty(PathBuf),

    #[error("invalid texture data: {0}")]
    InvalidTexture(String),
}

/// Errors raised while reading a configuration value.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("invalid value for '{key}': '{value}'")]
    InvalidValue { key: String, value: String },
}
