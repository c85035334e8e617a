//! In-memory host for tests
//!
//! [`MockHost`] serves assets from a map, records every outbound call, and
//! turns [`HostRuntime::exit`] into a panic carrying [`ExitRequested`] so a
//! fatal path can be observed with [`expect_exit`].

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use vessel_platform::{
    AssetPath, ExitCode, HostAsset, HostPlayer, HostRuntime, KeyboardMode, LogLevel, OwnedAsset,
    PlatformError, Result,
};

/// One recorded outbound request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostCall {
    LoadAsset(String),
    ReleaseAsset,
    CreatePlayer(String),
    PlayPlayer,
    DestroyPlayer,
    OpenUrl(String),
    SetKeyboard(KeyboardMode),
    GcHint,
    SetAccelerometer(bool),
    Exit(ExitCode),
}

/// One line written to the host log sink
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    pub level: LogLevel,
    pub tag: String,
    pub message: String,
}

/// Panic payload raised by [`MockHost`]'s `exit`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExitRequested(pub ExitCode);

/// Recording host runtime
#[derive(Default)]
pub struct MockHost {
    assets: HashMap<String, Vec<u8>>,
    failing_audio: bool,
    fail_next_play: AtomicBool,
    clock_ns: AtomicU64,
    released_assets: AtomicUsize,
    destroyed_players: AtomicUsize,
    accelerometer: AtomicBool,
    calls: Mutex<Vec<HostCall>>,
    logs: Mutex<Vec<LogLine>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `bytes` at `path`
    pub fn with_asset(mut self, path: &str, bytes: Vec<u8>) -> Self {
        self.assets.insert(path.to_string(), bytes);
        self
    }

    /// Make every player creation fail
    pub fn with_failing_audio(mut self) -> Self {
        self.failing_audio = true;
        self
    }

    /// Make the next play request fail
    pub fn fail_next_play(&self) {
        self.fail_next_play.store(true, Ordering::SeqCst);
    }

    /// Outbound calls so far, oldest first
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Lines written to the log sink so far
    pub fn logs(&self) -> Vec<LogLine> {
        self.logs.lock().clone()
    }

    pub fn released_assets(&self) -> usize {
        self.released_assets.load(Ordering::SeqCst)
    }

    pub fn destroyed_players(&self) -> usize {
        self.destroyed_players.load(Ordering::SeqCst)
    }

    /// Number of play requests recorded
    pub fn plays(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| **call == HostCall::PlayPlayer)
            .count()
    }

    /// Whether the sensor is currently switched on
    pub fn accelerometer_enabled(&self) -> bool {
        self.accelerometer.load(Ordering::SeqCst)
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().push(call);
    }
}

struct MockPlayer;

impl HostPlayer for MockPlayer {
    fn play(&mut self) -> Result<()> {
        Ok(())
    }

    fn release(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

impl HostRuntime for MockHost {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn load_asset(&self, path: &AssetPath) -> Result<Box<dyn HostAsset>> {
        self.record(HostCall::LoadAsset(path.to_string()));
        match self.assets.get(path.as_str()) {
            Some(bytes) => Ok(Box::new(OwnedAsset::new(bytes.clone()))),
            None => Err(PlatformError::AssetLoad(format!("no such asset: {}", path))),
        }
    }

    fn release_asset(&self, asset: Box<dyn HostAsset>) -> Result<()> {
        self.record(HostCall::ReleaseAsset);
        self.released_assets.fetch_add(1, Ordering::SeqCst);
        asset.release()
    }

    fn create_player(&self, path: &AssetPath) -> Result<Box<dyn HostPlayer>> {
        self.record(HostCall::CreatePlayer(path.to_string()));
        if self.failing_audio {
            return Err(PlatformError::Audio("audio backend unavailable".to_string()));
        }
        if !self.assets.contains_key(path.as_str()) {
            return Err(PlatformError::Audio(format!("no such asset: {}", path)));
        }
        Ok(Box::new(MockPlayer))
    }

    fn play_player(&self, player: &mut dyn HostPlayer) -> Result<()> {
        self.record(HostCall::PlayPlayer);
        if self.fail_next_play.swap(false, Ordering::SeqCst) {
            return Err(PlatformError::Audio("playback failed".to_string()));
        }
        player.play()
    }

    fn destroy_player(&self, player: Box<dyn HostPlayer>) -> Result<()> {
        self.record(HostCall::DestroyPlayer);
        self.destroyed_players.fetch_add(1, Ordering::SeqCst);
        player.release()
    }

    fn open_url(&self, url: &str) -> Result<()> {
        self.record(HostCall::OpenUrl(url.to_string()));
        Ok(())
    }

    fn time_ns(&self) -> u64 {
        self.clock_ns.fetch_add(1_000, Ordering::SeqCst)
    }

    fn storage_directory(&self) -> Result<PathBuf> {
        Ok(std::env::temp_dir().join("vessel-mock").join("storage"))
    }

    fn cache_directory(&self) -> Result<PathBuf> {
        Ok(std::env::temp_dir().join("vessel-mock").join("cache"))
    }

    fn set_virtual_keyboard(&self, mode: KeyboardMode) {
        self.record(HostCall::SetKeyboard(mode));
    }

    fn gc_hint(&self) {
        self.record(HostCall::GcHint);
    }

    fn set_accelerometer_enabled(&self, enabled: bool) {
        self.record(HostCall::SetAccelerometer(enabled));
        self.accelerometer.store(enabled, Ordering::SeqCst);
    }

    fn log(&self, level: LogLevel, tag: &str, message: &str) {
        self.logs.lock().push(LogLine {
            level,
            tag: tag.to_string(),
            message: message.to_string(),
        });
    }

    fn exit(&self, code: ExitCode) -> ! {
        self.record(HostCall::Exit(code));
        std::panic::panic_any(ExitRequested(code))
    }
}

/// Run `f` and return the exit code it requested from a [`MockHost`]
///
/// Panics if `f` returns normally or panics for another reason.
pub fn expect_exit<R>(f: impl FnOnce() -> R) -> ExitCode {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(_) => panic!("expected the host to be asked to exit"),
        Err(payload) => match payload.downcast::<ExitRequested>() {
            Ok(exit) => exit.0,
            Err(other) => std::panic::resume_unwind(other),
        },
    }
}

/// Shared handle to a fresh mock host
pub fn mock_host() -> Arc<MockHost> {
    Arc::new(MockHost::new())
}
