//! Vessel Platform Boundary
//!
//! This crate defines everything that crosses the line between a host
//! runtime (a mobile OS application framework) and the platform-agnostic
//! core: the services a host must provide, the events it injects, and the
//! lifecycle requests it drives.
//!
//! # Architecture
//!
//! - [`HostRuntime`] - Outbound requests from the core to the host
//! - [`HostAsset`] / [`HostPlayer`] - Host-owned objects behind opaque handles
//! - [`LifecycleRequest`] - Transitions a host driver asks for
//! - [`RawTouch`], [`TextInput`], [`AccelerometerSample`] - Injected events
//!
//! # Host Implementations
//!
//! - `vessel_platform_android` - Android activity via JNI
//! - `vessel_platform_ios` - iOS application delegate and main bundle
//! - `vessel_platform_desktop` - Directory-backed simulator host
//!
//! # Example
//!
//! ```ignore
//! use vessel_platform::prelude::*;
//!
//! let path = AssetPath::parse("/gfx/test.tga")?;
//! let asset = host.load_asset(&path)?;
//! println!("{} bytes", asset.bytes().len());
//! host.release_asset(asset)?;
//! ```

pub mod assets;
mod config;
mod error;
mod event;
mod host;
mod input;

// Re-export all public types
pub use assets::{AssetPath, DirectoryAssets, HostAsset, OwnedAsset};
pub use config::{RuntimeConfig, SaveStatePolicy};
pub use error::{PlatformError, Result};
pub use event::{LifecycleRequest, SurfaceSize};
pub use host::{ExitCode, HostPlayer, HostRuntime, LogLevel, MonotonicClock};
pub use input::{
    AccelerometerSample, CoordinateOrigin, KeyboardMode, RawTouch, TextInput, TouchEvent,
    TouchPhase,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::assets::{AssetPath, HostAsset};
    pub use crate::config::{RuntimeConfig, SaveStatePolicy};
    pub use crate::error::{PlatformError, Result};
    pub use crate::event::{LifecycleRequest, SurfaceSize};
    pub use crate::host::{ExitCode, HostPlayer, HostRuntime, LogLevel};
    pub use crate::input::{
        AccelerometerSample, CoordinateOrigin, KeyboardMode, RawTouch, TextInput, TouchEvent,
        TouchPhase,
    };
}
