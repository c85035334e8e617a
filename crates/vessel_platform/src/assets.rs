//! Bundled asset paths and host-owned buffers
//!
//! A resource path is relative to the root of the application's bundled
//! resources and always starts with `/`:
//!
//! ```text
//! "/gfx/test.tga"
//!   Android: assets/gfx/test.tga
//!   iOS:     gfx/test.tga inside the main bundle's resource directory
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{PlatformError, Result};

/// A validated resource path
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AssetPath(String);

impl AssetPath {
    /// Validate a caller-supplied resource path
    ///
    /// Fails unless the path begins with exactly one `/` followed by a
    /// non-empty remainder that stays inside the bundle root: no `..`
    /// component and no `\` separator.
    pub fn parse(path: &str) -> Result<Self> {
        let invalid = || PlatformError::InvalidPath(path.to_string());
        let relative = path.strip_prefix('/').ok_or_else(invalid)?;
        if relative.is_empty() || relative.starts_with('/') || relative.contains('\\') {
            return Err(invalid());
        }
        if relative.split('/').any(|component| component == "..") {
            return Err(invalid());
        }
        Ok(Self(path.to_string()))
    }

    /// The path as the application wrote it, leading `/` included
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The path relative to the bundle root, without the leading `/`
    pub fn relative(&self) -> &str {
        &self.0[1..]
    }

    /// Resolve against a directory on disk
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(self.relative())
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A read-only byte buffer owned by the host
///
/// The memory behind [`bytes`](HostAsset::bytes) belongs to the host and is
/// valid until the asset is released. Releasing hands the buffer back to the
/// host so it can unmap or close whatever backs it.
pub trait HostAsset: Send + Sync {
    /// The asset contents
    fn bytes(&self) -> &[u8];

    /// Give the asset back to the host
    fn release(self: Box<Self>) -> Result<()>;
}

/// Asset backed by a heap buffer the host read up front
#[derive(Debug)]
pub struct OwnedAsset {
    bytes: Vec<u8>,
}

impl OwnedAsset {
    /// Wrap an already-read buffer
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl HostAsset for OwnedAsset {
    fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn release(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

/// Loads assets from a directory on disk
///
/// Used by hosts whose bundled resources live in a plain directory (desktop
/// simulator, the iOS bundle resource path).
#[derive(Clone, Debug)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    /// Create a loader rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The bundle root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read an asset fully into memory
    pub fn load(&self, path: &AssetPath) -> Result<OwnedAsset> {
        let full_path = path.resolve(&self.root);
        tracing::debug!("Loading asset from {:?}", full_path);

        std::fs::read(&full_path).map(OwnedAsset::new).map_err(|e| {
            PlatformError::AssetLoad(format!("Failed to load '{}': {}", full_path.display(), e))
        })
    }

    /// Check if an asset exists
    pub fn exists(&self, path: &AssetPath) -> bool {
        path.resolve(&self.root).is_file()
    }
}
