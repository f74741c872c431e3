//! Static asset propagation.
//!
//! Copies auxiliary directories and root files verbatim into the output root.

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use crate::plan::AssetCopy;

/// Asset copy errors.
#[derive(Debug, Error)]
pub enum AssetError {
    /// IO error.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid asset path.
    #[error("invalid asset path: {0}")]
    InvalidPath(PathBuf),
}

/// Result type for asset operations.
pub type Result<T> = std::result::Result<T, AssetError>;

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> AssetError + '_ {
    move |source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Copies asset candidates from a source root into an output root.
#[derive(Debug)]
pub struct AssetCopier {
    source_root: PathBuf,
    dest_root: PathBuf,
}

impl AssetCopier {
    /// Create a new copier.
    #[must_use]
    pub fn new(source_root: impl Into<PathBuf>, dest_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            dest_root: dest_root.into(),
        }
    }

    /// Copy one candidate. Returns `false` if it does not exist at the source.
    pub fn copy(&self, asset: &AssetCopy) -> Result<bool> {
        let source = self.source_root.join(&asset.name);
        if !source.exists() {
            debug!(asset = %asset.name, "asset not present, skipping");
            return Ok(false);
        }

        let dest = self.dest_root.join(&asset.name);
        if source.is_dir() {
            copy_dir(&source, &dest)?;
        } else {
            copy_file(&source, &dest)?;
        }

        debug!(src = %source.display(), dest = %dest.display(), "copied asset");
        Ok(true)
    }
}

/// Recursively copy a directory, overwriting existing files.
pub fn copy_dir(source: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(source).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            AssetError::Io {
                path,
                source: e.into(),
            }
        })?;

        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| AssetError::InvalidPath(entry.path().to_path_buf()))?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(io_err(&target))?;
        } else {
            copy_file(entry.path(), &target)?;
        }
    }

    Ok(())
}

/// Copy a single file, creating parent directories.
pub fn copy_file(source: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }
    fs::copy(source, dest).map_err(io_err(source))?;
    Ok(())
}
