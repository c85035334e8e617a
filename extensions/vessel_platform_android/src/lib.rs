//! Vessel Android Host
//!
//! Runs a vessel application inside an Android activity. The Java side
//! forwards activity and GL surface callbacks through JNI; this crate turns
//! them into lifecycle transitions and serves the runtime's outbound
//! requests (assets, audio, URLs, the soft keyboard, sensors) by calling
//! back into Java.
//!
//! # Example
//!
//! ```ignore
//! use vessel_platform_android::jni_bridge;
//!
//! #[no_mangle]
//! pub extern "system" fn JNI_OnLoad(_vm: JavaVM, _: *mut c_void) -> jint {
//!     jni_bridge::install(MyGame::default(), RuntimeConfig::default());
//!     JNI_VERSION_1_6
//! }
//! ```
//!
//! Only [`activity`] and [`convert`] are available on other targets; they
//! carry no JNI state and are tested on the host.

pub mod activity;
pub mod convert;
pub mod jni_bridge;

#[cfg(target_os = "android")]
pub mod host;

pub use activity::ActivityDriver;
pub use jni_bridge::{install, runtime};

#[cfg(target_os = "android")]
pub use host::AndroidHost;

use vessel_platform::PlatformError;

/// Name reported by the Android host
pub const PLATFORM_NAME: &str = "android";

/// Check that the JNI host is available on this target
pub fn ensure_supported() -> Result<(), PlatformError> {
    if cfg!(target_os = "android") {
        Ok(())
    } else {
        Err(PlatformError::Unsupported(
            "Android host only available on Android".to_string(),
        ))
    }
}
