use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure to turn a file on disk into a stimulus asset.
#[derive(Debug, Error)]
#[error("failed to load asset {path}: {source}")]
pub struct AssetError {
    pub path: PathBuf,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl AssetError {
    pub fn new(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }
}

/// Decodes stimulus files into whatever handle the presentation layer draws.
///
/// The experiment logic treats `Asset` as an opaque token.
pub trait AssetLoader {
    type Asset;

    fn load(&mut self, path: &Path) -> Result<Self::Asset, AssetError>;
}

/// Loader that keeps only the path, for headless runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathLoader;

impl AssetLoader for PathLoader {
    type Asset = PathBuf;

    fn load(&mut self, path: &Path) -> Result<PathBuf, AssetError> {
        let meta = std::fs::metadata(path).map_err(|e| AssetError::new(path, e))?;
        if !meta.is_file() {
            return Err(AssetError::new(path, "not a regular file"));
        }
        Ok(path.to_path_buf())
    }
}
