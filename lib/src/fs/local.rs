//! # Arcdown Local Filesystem (`fs::local`)
//!
//! File: lib/src/fs/local.rs
//!
//! ## Overview
//!
//! Disk-backed [`Filesystem`] implementation sandboxed to a single root
//! directory. Every source path is resolved relative to that root; absolute
//! paths and `..` traversal are refused, so a builder wired to
//! `LocalFilesystem::new("/srv/exports")?` can never be asked to pack
//! `/etc/passwd`.
//!
//! The root is a required constructor argument. Exposing the entire local
//! filesystem is possible (`LocalFilesystem::new("/")`), but it has to be
//! written down by the caller rather than happening as a fallback.
//!
use super::Filesystem;
use crate::core::error::{ArcdownError, Result};
use std::{
    fs,
    io::Read,
    path::{Component, Path, PathBuf},
    time::UNIX_EPOCH,
};
use tracing::debug;

/// Sandboxed local-disk filesystem.
#[derive(Debug)]
pub struct LocalFilesystem {
    root: PathBuf,
}

impl LocalFilesystem {
    /// Creates a filesystem rooted at `root`, which must be an existing
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns `ArcdownError::Config` when `root` does not exist or is not
    /// a directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            anyhow::bail!(ArcdownError::Config(format!(
                "Filesystem root is not an existing directory: {}",
                root.display()
            )));
        }
        debug!("Local filesystem sandboxed to {}", root.display());
        Ok(LocalFilesystem { root })
    }

    /// Resolves a textual path inside the sandbox.
    ///
    /// Rejects absolute paths and any `..` component, then requires the
    /// resolved file to exist. Symlinks inside the root are followed as-is.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, Component::ParentDir));
        if escapes {
            anyhow::bail!(ArcdownError::PathNotFound { path: path.into() });
        }
        let resolved = self.root.join(relative);
        if !resolved.is_file() {
            anyhow::bail!(ArcdownError::PathNotFound { path: path.into() });
        }
        Ok(resolved)
    }
}

impl Filesystem for LocalFilesystem {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let resolved = self.resolve(path)?;
        fs::read(&resolved)
            .map_err(|e| ArcdownError::SourceRead(format!("{}: {}", resolved.display(), e)).into())
    }

    fn read_stream(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        let resolved = self.resolve(path)?;
        let file = fs::File::open(&resolved)
            .map_err(|e| ArcdownError::SourceRead(format!("{}: {}", resolved.display(), e)))?;
        Ok(Box::new(file))
    }

    fn last_modified(&self, path: &str) -> Result<i64> {
        let resolved = self.resolve(path)?;
        let modified = fs::metadata(&resolved)
            .and_then(|m| m.modified())
            .map_err(|e| ArcdownError::SourceRead(format!("{}: {}", resolved.display(), e)))?;
        let secs = modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0); // Pre-epoch mtimes collapse to 0.
        Ok(secs)
    }
}
