//! Vessel iOS Host
//!
//! Maps `UIApplicationDelegate` callbacks onto the runtime lifecycle and
//! serves assets from the main bundle. iOS hands out its state-save
//! opportunity after the app has gone to the background, so runtimes built
//! for this host use [`ios_runtime_config`].
//!
//! # Example
//!
//! ```ignore
//! use vessel_platform_ios::{AppDelegateDriver, BundleHost, ios_runtime_config};
//!
//! let host = Arc::new(BundleHost::main()?);
//! let runtime = Runtime::new(host, MyGame::default(), ios_runtime_config());
//! let mut driver = AppDelegateDriver::new();
//!
//! for request in driver.did_finish_launching() {
//!     runtime.apply(request);
//! }
//! ```

pub mod app;
pub mod bundle;

pub use app::{ios_runtime_config, AppDelegateDriver};
pub use bundle::BundleHost;

/// Name reported by the iOS host
pub const PLATFORM_NAME: &str = "ios";
