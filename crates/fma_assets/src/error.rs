use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures during bootstrap or synthesis. All of them are fatal at
/// startup: the game cannot reach a playable state without its asset
/// surface, so callers propagate these straight out of `main`.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("filesystem operation failed at '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode image '{path}'")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl AssetError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn image(path: &Path, source: image::ImageError) -> Self {
        Self::Image {
            path: path.to_path_buf(),
            source,
        }
    }
}
