//! Host runtime trait and abstraction
//!
//! Everything the core needs from the platform goes through [`HostRuntime`].
//! Each platform adapter (Android via JNI, iOS via the main bundle, the
//! desktop simulator) implements it once and hands an `Arc<dyn HostRuntime>`
//! to the runtime at process start.

use std::path::PathBuf;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::assets::{AssetPath, HostAsset};
use crate::error::Result;
use crate::input::KeyboardMode;

/// Log severity, ordered from least to most severe
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Diagnostic detail
    Debug,
    /// Normal operation
    #[default]
    Normal,
    /// Something unexpected but recoverable
    Warning,
    /// A failure
    Error,
}

impl LogLevel {
    /// Lowercase level name
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Normal => "normal",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}

/// Process exit status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExitCode {
    /// Normal termination
    Success,
    /// Termination after a failure
    Fail,
}

impl ExitCode {
    /// Numeric process exit code
    pub fn code(self) -> i32 {
        match self {
            ExitCode::Success => 0,
            ExitCode::Fail => 1,
        }
    }
}

/// A host-side audio playback object
///
/// Once any method returns an error the object must not be used again.
pub trait HostPlayer: Send {
    /// Start playback
    fn play(&mut self) -> Result<()>;

    /// Release the host object
    fn release(self: Box<Self>) -> Result<()>;
}

/// Services a host platform provides to the core
///
/// Implementations must be callable from any thread.
pub trait HostRuntime: Send + Sync {
    /// Host name, e.g. "android", "ios", or "desktop"
    fn name(&self) -> &'static str;

    /// Open a bundled asset
    ///
    /// The path has already been validated; use [`AssetPath::relative`] for
    /// the bundle-relative form.
    fn load_asset(&self, path: &AssetPath) -> Result<Box<dyn HostAsset>>;

    /// Release an asset returned by [`load_asset`](HostRuntime::load_asset)
    fn release_asset(&self, asset: Box<dyn HostAsset>) -> Result<()> {
        asset.release()
    }

    /// Create a playback object for a bundled audio asset
    fn create_player(&self, path: &AssetPath) -> Result<Box<dyn HostPlayer>>;

    /// Start playback on a player
    fn play_player(&self, player: &mut dyn HostPlayer) -> Result<()> {
        player.play()
    }

    /// Destroy a player
    fn destroy_player(&self, player: Box<dyn HostPlayer>) -> Result<()> {
        player.release()
    }

    /// Open a URL in the system browser
    fn open_url(&self, url: &str) -> Result<()>;

    /// Monotonic time in nanoseconds at the highest precision available
    fn time_ns(&self) -> u64;

    /// Persistent storage directory reserved for the application
    fn storage_directory(&self) -> Result<PathBuf>;

    /// Cache (non-persistent) directory reserved for the application
    fn cache_directory(&self) -> Result<PathBuf>;

    /// Show or hide the virtual keyboard
    fn set_virtual_keyboard(&self, mode: KeyboardMode);

    /// Hint that now is a good time to collect garbage
    ///
    /// No-op on hosts without a garbage collector.
    fn gc_hint(&self) {}

    /// Start or stop delivering accelerometer samples
    fn set_accelerometer_enabled(&self, _enabled: bool) {}

    /// Write one log line to the host's log sink
    fn log(&self, level: LogLevel, tag: &str, message: &str);

    /// Terminate the process immediately
    ///
    /// No lifecycle hooks run after this call.
    fn exit(&self, code: ExitCode) -> ! {
        std::process::exit(code.code())
    }
}

/// Monotonic nanosecond clock anchored at construction
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    /// Start a new clock
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Nanoseconds since the clock started
    pub fn now_ns(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}
