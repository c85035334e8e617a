//! iOS host runtime over the main bundle
//!
//! Assets are read from the bundle's resource directory. Storage lives in
//! `~/Documents` and the cache in `~/Library/Caches` of the app sandbox.

use std::path::PathBuf;

use vessel_platform::{
    AssetPath, DirectoryAssets, HostAsset, HostPlayer, HostRuntime, KeyboardMode, LogLevel,
    MonotonicClock, PlatformError, Result,
};

#[cfg(target_os = "ios")]
use objc2::rc::Retained;
#[cfg(target_os = "ios")]
use objc2_foundation::{NSBundle, NSHomeDirectory, NSString};

/// Host runtime backed by the application bundle
pub struct BundleHost {
    assets: DirectoryAssets,
    storage_dir: PathBuf,
    cache_dir: PathBuf,
    clock: MonotonicClock,
}

impl BundleHost {
    /// Create a host with explicit directories
    pub fn with_dirs(
        resource_root: impl Into<PathBuf>,
        storage_dir: impl Into<PathBuf>,
        cache_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            assets: DirectoryAssets::new(resource_root),
            storage_dir: storage_dir.into(),
            cache_dir: cache_dir.into(),
            clock: MonotonicClock::new(),
        }
    }

    /// Create a host for the running application
    ///
    /// Fails when the main bundle has no resource directory.
    #[cfg(target_os = "ios")]
    pub fn main() -> Result<Self> {
        let (resource_path, home): (Option<Retained<NSString>>, Retained<NSString>) = unsafe {
            let bundle = NSBundle::mainBundle();
            (bundle.resourcePath(), NSHomeDirectory())
        };

        let Some(resource_path) = resource_path else {
            return Err(PlatformError::InitFailed(
                "main bundle has no resource path".to_string(),
            ));
        };
        let resource_root = PathBuf::from(resource_path.to_string());
        let home = PathBuf::from(home.to_string());
        tracing::debug!("iOS bundle resources at {:?}", resource_root);

        Ok(Self::with_dirs(
            resource_root,
            home.join("Documents"),
            home.join("Library").join("Caches"),
        ))
    }

    #[cfg(not(target_os = "ios"))]
    pub fn main() -> Result<Self> {
        Err(PlatformError::Unsupported(
            "the main bundle is only available on iOS".to_string(),
        ))
    }
}

impl HostRuntime for BundleHost {
    fn name(&self) -> &'static str {
        crate::PLATFORM_NAME
    }

    fn load_asset(&self, path: &AssetPath) -> Result<Box<dyn HostAsset>> {
        Ok(Box::new(self.assets.load(path)?))
    }

    fn create_player(&self, path: &AssetPath) -> Result<Box<dyn HostPlayer>> {
        Err(PlatformError::Unsupported(format!(
            "audio playback is not available on iOS ({})",
            path
        )))
    }

    fn open_url(&self, url: &str) -> Result<()> {
        Err(PlatformError::Unsupported(format!(
            "opening URLs is not available on iOS ({})",
            url
        )))
    }

    fn time_ns(&self) -> u64 {
        self.clock.now_ns()
    }

    fn storage_directory(&self) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.storage_dir)?;
        Ok(self.storage_dir.clone())
    }

    fn cache_directory(&self) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.cache_dir)?;
        Ok(self.cache_dir.clone())
    }

    fn set_virtual_keyboard(&self, mode: KeyboardMode) {
        tracing::debug!("virtual keyboard {:?} ignored on iOS", mode);
    }

    fn gc_hint(&self) {}

    fn log(&self, level: LogLevel, tag: &str, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!(tag = %tag, "{}", message),
            LogLevel::Normal => tracing::info!(tag = %tag, "{}", message),
            LogLevel::Warning => tracing::warn!(tag = %tag, "{}", message),
            LogLevel::Error => tracing::error!(tag = %tag, "{}", message),
        }
    }
}
