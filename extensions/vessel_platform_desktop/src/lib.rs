//! Vessel Desktop Host
//!
//! A [`HostRuntime`] for running an application body on a development
//! machine. Bundled resources come from a plain directory, the storage and
//! cache directories are configured paths, and the log sink is `tracing`.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use vessel_platform_desktop::{DesktopHost, DesktopHostConfig};
//!
//! let host = Arc::new(DesktopHost::new(DesktopHostConfig::default()));
//! let runtime = Runtime::new(host, MyApp::default(), RuntimeConfig::default());
//! ```

pub mod audio;

pub use audio::DesktopPlayer;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use vessel_platform::{
    AssetPath, DirectoryAssets, HostAsset, HostPlayer, HostRuntime, KeyboardMode, LogLevel,
    MonotonicClock, PlatformError, Result,
};

/// Where the desktop host finds and keeps its files
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopHostConfig {
    /// Directory standing in for the application bundle
    pub asset_root: PathBuf,
    /// Persistent storage directory
    pub storage_dir: PathBuf,
    /// Cache directory
    pub cache_dir: PathBuf,
}

impl Default for DesktopHostConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            storage_dir: PathBuf::from(".vessel/storage"),
            cache_dir: PathBuf::from(".vessel/cache"),
        }
    }
}

impl DesktopHostConfig {
    /// Put every directory under one root
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            asset_root: root.join("assets"),
            storage_dir: root.join("storage"),
            cache_dir: root.join("cache"),
        }
    }
}

/// Desktop host runtime
pub struct DesktopHost {
    assets: DirectoryAssets,
    storage_dir: PathBuf,
    cache_dir: PathBuf,
    clock: MonotonicClock,
    keyboard_visible: AtomicBool,
    accelerometer_enabled: AtomicBool,
}

impl DesktopHost {
    /// Create a host from its configuration
    pub fn new(config: DesktopHostConfig) -> Self {
        tracing::debug!("Desktop host assets at {}", config.asset_root.display());
        Self {
            assets: DirectoryAssets::new(config.asset_root),
            storage_dir: config.storage_dir,
            cache_dir: config.cache_dir,
            clock: MonotonicClock::new(),
            keyboard_visible: AtomicBool::new(false),
            accelerometer_enabled: AtomicBool::new(false),
        }
    }

    /// The directory assets are read from
    pub fn asset_root(&self) -> &Path {
        self.assets.root()
    }

    /// Whether the application last asked for the virtual keyboard
    pub fn keyboard_visible(&self) -> bool {
        self.keyboard_visible.load(Ordering::Relaxed)
    }

    /// Whether the application currently wants accelerometer samples
    pub fn accelerometer_enabled(&self) -> bool {
        self.accelerometer_enabled.load(Ordering::Relaxed)
    }
}

fn ensure_dir(path: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(path)?;
    Ok(path.to_path_buf())
}

impl HostRuntime for DesktopHost {
    fn name(&self) -> &'static str {
        "desktop"
    }

    fn load_asset(&self, path: &AssetPath) -> Result<Box<dyn HostAsset>> {
        Ok(Box::new(self.assets.load(path)?))
    }

    fn create_player(&self, path: &AssetPath) -> Result<Box<dyn HostPlayer>> {
        if !self.assets.exists(path) {
            return Err(PlatformError::Audio(format!(
                "No audio asset at {}",
                path.resolve(self.assets.root()).display()
            )));
        }
        Ok(Box::new(DesktopPlayer::new(path.clone())))
    }

    fn open_url(&self, url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(PlatformError::Bridge("empty URL".to_string()));
        }
        tracing::info!("open url: {}", url);
        Ok(())
    }

    fn time_ns(&self) -> u64 {
        self.clock.now_ns()
    }

    fn storage_directory(&self) -> Result<PathBuf> {
        ensure_dir(&self.storage_dir)
    }

    fn cache_directory(&self) -> Result<PathBuf> {
        ensure_dir(&self.cache_dir)
    }

    fn set_virtual_keyboard(&self, mode: KeyboardMode) {
        tracing::debug!("virtual keyboard: {:?}", mode);
        self.keyboard_visible
            .store(mode == KeyboardMode::Visible, Ordering::Relaxed);
    }

    fn set_accelerometer_enabled(&self, enabled: bool) {
        tracing::debug!("accelerometer enabled: {}", enabled);
        self.accelerometer_enabled.store(enabled, Ordering::Relaxed);
    }

    fn log(&self, level: LogLevel, tag: &str, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!(tag = %tag, "{}", message),
            LogLevel::Normal => tracing::info!(tag = %tag, "{}", message),
            LogLevel::Warning => tracing::warn!(tag = %tag, "{}", message),
            LogLevel::Error => tracing::error!(tag = %tag, "{}", message),
        }
    }
}
