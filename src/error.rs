use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading configuration or level data.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid level file: {0}")]
    LevelParse(#[from] serde_json::Error),

    #[error("level set contains no levels")]
    NoLevels,

    #[error("level '{name}' is invalid: {reason}")]
    InvalidLevel { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, GameError>;
