//! JNI-backed host runtime
//!
//! Every outbound request is a static method call on the Java `vessel.Native`
//! class:
//!
//! ```text
//! openAsset(String) -> Object[] { ByteBuffer (mapped), FileChannel }
//! cleanAsset(Object) -> boolean
//! playerCreate(String) -> MediaPlayer or null
//! playerPlay(MediaPlayer) -> boolean
//! playerDestroy(MediaPlayer)
//! openUrl(String)
//! setKbdMode(int)
//! gcCollect()
//! eventSubscribe(int, boolean)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use jni::objects::{GlobalRef, JByteBuffer, JClass, JObjectArray, JValue};
use jni::{JNIEnv, JavaVM};

use vessel_platform::{
    AssetPath, HostAsset, HostPlayer, HostRuntime, KeyboardMode, LogLevel, MonotonicClock,
    PlatformError, Result,
};

use crate::convert::{keyboard_mode_code, log_level, ACCELEROMETER_EVENT_ID};

/// Java class holding the static bridge methods
pub const NATIVE_CLASS: &str = "vessel/Native";

fn bridge_error(e: jni::errors::Error) -> PlatformError {
    PlatformError::Bridge(e.to_string())
}

/// The VM plus a global reference to the bridge class
pub struct JniContext {
    vm: JavaVM,
    class: GlobalRef,
}

impl JniContext {
    /// Capture the VM and the bridge class from a JNI call
    pub fn new(env: &mut JNIEnv) -> Result<Self> {
        let vm = env.get_java_vm().map_err(bridge_error)?;
        let class = env.find_class(NATIVE_CLASS).map_err(bridge_error)?;
        let class = env.new_global_ref(class).map_err(bridge_error)?;
        Ok(Self { vm, class })
    }

    /// Run `f` with an attached env and the bridge class
    ///
    /// A pending Java exception is cleared before the error is returned.
    fn with_env<R>(
        &self,
        f: impl FnOnce(&mut JNIEnv<'_>, &JClass<'_>) -> jni::errors::Result<R>,
    ) -> Result<R> {
        let mut env = self.vm.attach_current_thread().map_err(bridge_error)?;
        let class: &JClass = self.class.as_obj().into();
        let result = f(&mut env, class);
        if result.is_err() && env.exception_check().unwrap_or(false) {
            env.exception_clear().ok();
        }
        result.map_err(bridge_error)
    }
}

// ============================================================================
// Assets
// ============================================================================

/// A memory-mapped asset owned by the Java side
struct AndroidAsset {
    ptr: *const u8,
    len: usize,
    /// The `Object[]` returned by `openAsset`, handed back to `cleanAsset`
    handle: GlobalRef,
    jni: Arc<JniContext>,
}

// The mapping is read-only and lives until cleanAsset closes the channel.
unsafe impl Send for AndroidAsset {}
unsafe impl Sync for AndroidAsset {}

impl HostAsset for AndroidAsset {
    fn bytes(&self) -> &[u8] {
        if self.len == 0 {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
    }

    fn release(self: Box<Self>) -> Result<()> {
        let closed = self.jni.with_env(|env, class| {
            env.call_static_method(
                class,
                "cleanAsset",
                "(Ljava/lang/Object;)Z",
                &[JValue::Object(self.handle.as_obj())],
            )?
            .z()
        })?;
        if closed {
            Ok(())
        } else {
            Err(PlatformError::AssetRelease(
                "cleanAsset reported failure".to_string(),
            ))
        }
    }
}

// ============================================================================
// Audio
// ============================================================================

struct AndroidPlayer {
    player: GlobalRef,
    jni: Arc<JniContext>,
}

impl HostPlayer for AndroidPlayer {
    fn play(&mut self) -> Result<()> {
        let started = self.jni.with_env(|env, class| {
            env.call_static_method(
                class,
                "playerPlay",
                "(Landroid/media/MediaPlayer;)Z",
                &[JValue::Object(self.player.as_obj())],
            )?
            .z()
        })?;
        if started {
            Ok(())
        } else {
            Err(PlatformError::Audio("MediaPlayer.start failed".to_string()))
        }
    }

    fn release(self: Box<Self>) -> Result<()> {
        self.jni.with_env(|env, class| {
            env.call_static_method(
                class,
                "playerDestroy",
                "(Landroid/media/MediaPlayer;)V",
                &[JValue::Object(self.player.as_obj())],
            )?
            .v()
        })
    }
}

// ============================================================================
// Host runtime
// ============================================================================

/// Host runtime talking to the Java activity over JNI
pub struct AndroidHost {
    jni: Arc<JniContext>,
    cache_dir: PathBuf,
    storage_dir: PathBuf,
    clock: MonotonicClock,
}

impl AndroidHost {
    /// Create a host from the directories the activity reported
    pub fn new(jni: JniContext, cache_dir: PathBuf, storage_dir: PathBuf) -> Self {
        Self {
            jni: Arc::new(jni),
            cache_dir,
            storage_dir,
            clock: MonotonicClock::new(),
        }
    }

    fn map_asset(&self, path: &AssetPath) -> Result<AndroidAsset> {
        let jni = Arc::clone(&self.jni);
        let mapped = self.jni.with_env(|env, class| {
            let name = env.new_string(path.relative())?;
            let array = env
                .call_static_method(
                    class,
                    "openAsset",
                    "(Ljava/lang/String;)[Ljava/lang/Object;",
                    &[JValue::Object(&name)],
                )?
                .l()?;
            if array.is_null() {
                return Ok(None);
            }

            let array = JObjectArray::from(array);
            let buffer = JByteBuffer::from(env.get_object_array_element(&array, 0)?);
            let ptr = env.get_direct_buffer_address(&buffer)?;
            let len = env.get_direct_buffer_capacity(&buffer)?;
            let handle = env.new_global_ref(&array)?;
            Ok(Some((ptr as *const u8, len, handle)))
        })?;

        match mapped {
            Some((ptr, len, handle)) => Ok(AndroidAsset {
                ptr,
                len,
                handle,
                jni,
            }),
            None => Err(PlatformError::AssetLoad(format!(
                "openAsset returned null for {}",
                path
            ))),
        }
    }
}

impl HostRuntime for AndroidHost {
    fn name(&self) -> &'static str {
        crate::PLATFORM_NAME
    }

    fn load_asset(&self, path: &AssetPath) -> Result<Box<dyn HostAsset>> {
        Ok(Box::new(self.map_asset(path)?))
    }

    fn create_player(&self, path: &AssetPath) -> Result<Box<dyn HostPlayer>> {
        let player = self.jni.with_env(|env, class| {
            let name = env.new_string(path.relative())?;
            let player = env
                .call_static_method(
                    class,
                    "playerCreate",
                    "(Ljava/lang/String;)Ljava/lang/Object;",
                    &[JValue::Object(&name)],
                )?
                .l()?;
            if player.is_null() {
                Ok(None)
            } else {
                env.new_global_ref(player).map(Some)
            }
        })?;

        match player {
            Some(player) => Ok(Box::new(AndroidPlayer {
                player,
                jni: Arc::clone(&self.jni),
            })),
            None => Err(PlatformError::Audio(format!(
                "playerCreate returned null for {}",
                path
            ))),
        }
    }

    fn open_url(&self, url: &str) -> Result<()> {
        self.jni.with_env(|env, class| {
            let url = env.new_string(url)?;
            env.call_static_method(
                class,
                "openUrl",
                "(Ljava/lang/String;)V",
                &[JValue::Object(&url)],
            )?
            .v()
        })
    }

    fn time_ns(&self) -> u64 {
        self.clock.now_ns()
    }

    fn storage_directory(&self) -> Result<PathBuf> {
        Ok(self.storage_dir.clone())
    }

    fn cache_directory(&self) -> Result<PathBuf> {
        Ok(self.cache_dir.clone())
    }

    fn set_virtual_keyboard(&self, mode: KeyboardMode) {
        let result = self.jni.with_env(|env, class| {
            env.call_static_method(
                class,
                "setKbdMode",
                "(I)V",
                &[JValue::Int(keyboard_mode_code(mode))],
            )?
            .v()
        });
        if let Err(e) = result {
            tracing::warn!("setKbdMode failed: {}", e);
        }
    }

    fn gc_hint(&self) {
        let result = self.jni.with_env(|env, class| {
            env.call_static_method(class, "gcCollect", "()V", &[])?.v()
        });
        if let Err(e) = result {
            tracing::debug!("gcCollect failed: {}", e);
        }
    }

    fn set_accelerometer_enabled(&self, enabled: bool) {
        let result = self.jni.with_env(|env, class| {
            env.call_static_method(
                class,
                "eventSubscribe",
                "(IZ)V",
                &[
                    JValue::Int(ACCELEROMETER_EVENT_ID),
                    JValue::Bool(enabled.into()),
                ],
            )?
            .v()
        });
        if let Err(e) = result {
            tracing::warn!("eventSubscribe failed: {}", e);
        }
    }

    fn log(&self, level: LogLevel, tag: &str, message: &str) {
        log::log!(target: tag, log_level(level), "{}", message);
    }
}
