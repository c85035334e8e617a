//! Bundled resource handles
//!
//! A [`ResourceHandle`] names a host-owned byte buffer. The buffer stays valid
//! until the handle is passed to [`ResourceHandleManager::unload`], which
//! consumes it, so a handle cannot be read after unload or unloaded twice.

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};
use thiserror::Error;
use vessel_platform::{AssetPath, HostAsset, HostRuntime, PlatformError};

new_key_type! {
    /// Table key behind a resource handle
    pub struct ResourceId;
}

/// Resource loading errors
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("invalid resource path '{0}': must be non-empty and start with '/'")]
    InvalidPath(String),

    #[error("host failed to load resource: {0}")]
    Host(#[source] PlatformError),
}

/// Result type for resource operations
pub type Result<T> = std::result::Result<T, ResourceError>;

/// A loaded resource
///
/// Not `Clone`: exactly one owner may unload it.
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use = "a loaded resource stays resident until it is unloaded"]
pub struct ResourceHandle {
    id: ResourceId,
}

impl ResourceHandle {
    /// Table key of this handle
    pub fn id(&self) -> ResourceId {
        self.id
    }
}

/// Loads and releases bundled resources through the host
pub struct ResourceHandleManager {
    host: Arc<dyn HostRuntime>,
    table: Mutex<SlotMap<ResourceId, Box<dyn HostAsset>>>,
}

impl ResourceHandleManager {
    /// Create an empty manager backed by `host`
    pub fn new(host: Arc<dyn HostRuntime>) -> Self {
        Self {
            host,
            table: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Load a resource by its bundle path
    ///
    /// A malformed path is rejected before the host is contacted.
    pub fn load(&self, path: &str) -> Result<ResourceHandle> {
        let path =
            AssetPath::parse(path).map_err(|_| ResourceError::InvalidPath(path.to_string()))?;

        let asset = self.host.load_asset(&path).map_err(|e| {
            tracing::warn!("Failed to load resource {}: {}", path, e);
            ResourceError::Host(e)
        })?;

        let len = asset.bytes().len();
        let id = self.table.lock().insert(asset);
        tracing::debug!("Loaded resource {} ({} bytes) as {:?}", path, len, id);
        Ok(ResourceHandle { id })
    }

    /// Release a resource
    ///
    /// Always succeeds from the caller's point of view. A host-side release
    /// failure is logged and the entry is dropped regardless.
    pub fn unload(&self, handle: ResourceHandle) {
        let asset = self.table.lock().remove(handle.id);
        match asset {
            Some(asset) => {
                if let Err(e) = self.host.release_asset(asset) {
                    tracing::warn!("Host failed to release resource {:?}: {}", handle.id, e);
                }
            }
            None => tracing::debug!("Resource {:?} was already released", handle.id),
        }
    }

    /// Byte length of a loaded resource
    pub fn len(&self, handle: &ResourceHandle) -> Option<usize> {
        self.with_bytes(handle, <[u8]>::len)
    }

    /// Borrow the bytes of a loaded resource
    ///
    /// The table lock is held while `f` runs; `f` must not load or unload.
    pub fn with_bytes<R>(&self, handle: &ResourceHandle, f: impl FnOnce(&[u8]) -> R) -> Option<R> {
        let table = self.table.lock();
        table.get(handle.id).map(|asset| f(asset.bytes()))
    }

    /// Number of resources currently loaded
    pub fn live_count(&self) -> usize {
        self.table.lock().len()
    }

    /// Check if no resources are loaded
    pub fn is_empty(&self) -> bool {
        self.live_count() == 0
    }

    /// Release every resource still loaded
    ///
    /// Used at teardown for handles the application dropped without
    /// unloading.
    pub fn release_all(&self) {
        let drained: Vec<_> = self.table.lock().drain().collect();
        if !drained.is_empty() {
            tracing::debug!("Releasing {} leaked resources", drained.len());
        }
        for (id, asset) in drained {
            if let Err(e) = self.host.release_asset(asset) {
                tracing::warn!("Host failed to release resource {:?}: {}", id, e);
            }
        }
    }
}
