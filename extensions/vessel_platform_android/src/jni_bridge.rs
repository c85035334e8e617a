//! JNI entry points called by the Java activity
//!
//! # Usage from Java
//!
//! ```java
//! package vessel;
//!
//! final class Native {
//!     static { System.loadLibrary("native"); }
//!
//!     static native void initialize(String cacheDir, String storageDir);
//!     static native void visible(boolean newSurface, int width, int height);
//!     static native void active();
//!     static native void inactive();
//!     static native void hidden();
//!     static native void render();
//!     static native void eventTouch(int action, float x, float y);
//!     static native void eventAccelerometer(double t, float x, float y, float z);
//!     static native void eventText(String text, boolean backspace);
//! }
//! ```
//!
//! The activity forwards `onCreate`, the GL surface callbacks, `onResume`,
//! `onPause`, `onStop` and `onDrawFrame` unfiltered; the [`ActivityDriver`]
//! turns them into legal transitions.
//!
//! The application registers itself once, before the activity starts, with
//! [`install`].

use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use vessel_core::{Application, Runtime};
use vessel_platform::RuntimeConfig;

use crate::activity::ActivityDriver;

#[cfg(target_os = "android")]
use jni::objects::{JClass, JString};
#[cfg(target_os = "android")]
use jni::sys::{jboolean, jdouble, jfloat, jint, JNI_TRUE};
#[cfg(target_os = "android")]
use jni::JNIEnv;
#[cfg(target_os = "android")]
use vessel_platform::{AccelerometerSample, RawTouch, SurfaceSize, TextInput};

/// Application waiting for `Native.initialize`
struct PendingApp {
    app: Box<dyn Application>,
    config: RuntimeConfig,
}

/// Process-wide bridge state
struct Bridge {
    pending: Mutex<Option<PendingApp>>,
    runtime: OnceLock<Arc<Runtime>>,
    /// Held while its requests are applied so they reach the runtime in order
    driver: Mutex<ActivityDriver>,
}

static BRIDGE: OnceLock<Bridge> = OnceLock::new();

fn bridge() -> &'static Bridge {
    BRIDGE.get_or_init(|| Bridge {
        pending: Mutex::new(None),
        runtime: OnceLock::new(),
        driver: Mutex::new(ActivityDriver::new()),
    })
}

/// Register the application body
///
/// Must run before the activity calls `Native.initialize`, typically from
/// `JNI_OnLoad`. Later calls replace a pending application but have no
/// effect once the runtime exists.
pub fn install(app: impl Application + 'static, config: RuntimeConfig) {
    let bridge = bridge();
    if bridge.runtime.get().is_some() {
        tracing::warn!("install called after the runtime started, ignored");
        return;
    }
    *bridge.pending.lock() = Some(PendingApp {
        app: Box::new(app),
        config,
    });
}

/// The running runtime, once `Native.initialize` has created it
pub fn runtime() -> Option<Arc<Runtime>> {
    bridge().runtime.get().cloned()
}

/// Apply the requests a driver callback produced
#[cfg_attr(not(target_os = "android"), allow(dead_code))]
fn drive(callback: impl FnOnce(&mut ActivityDriver) -> Vec<vessel_platform::LifecycleRequest>) {
    let bridge = bridge();
    let Some(runtime) = bridge.runtime.get() else {
        tracing::warn!("lifecycle callback before initialize, ignored");
        return;
    };
    let mut driver = bridge.driver.lock();
    for request in callback(&mut *driver) {
        tracing::debug!("applying {}", request.name());
        runtime.apply(request);
    }
}

// ============================================================================
// Lifecycle entry points
// ============================================================================

/// `Native.initialize(String cacheDir, String storageDir)`
///
/// # JNI Signature
/// `(Ljava/lang/String;Ljava/lang/String;)V`
#[cfg(target_os = "android")]
#[no_mangle]
pub extern "system" fn Java_vessel_Native_initialize(
    mut env: JNIEnv,
    _class: JClass,
    cache_dir: JString,
    storage_dir: JString,
) {
    use crate::host::{AndroidHost, JniContext};
    use vessel_core::RUNTIME_TAG;

    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(log::LevelFilter::Debug)
            .with_tag(RUNTIME_TAG),
    );

    let bridge = bridge();
    if bridge.runtime.get().is_none() {
        let Some(pending) = bridge.pending.lock().take() else {
            tracing::error!("Native.initialize called without an installed application");
            return;
        };

        let cache_dir: String = match env.get_string(&cache_dir) {
            Ok(s) => s.into(),
            Err(e) => {
                tracing::error!("Failed to read cache dir: {}", e);
                return;
            }
        };
        let storage_dir: String = match env.get_string(&storage_dir) {
            Ok(s) => s.into(),
            Err(e) => {
                tracing::error!("Failed to read storage dir: {}", e);
                return;
            }
        };
        let jni = match JniContext::new(&mut env) {
            Ok(jni) => jni,
            Err(e) => {
                tracing::error!("Failed to capture JNI context: {}", e);
                return;
            }
        };

        let host = Arc::new(AndroidHost::new(jni, cache_dir.into(), storage_dir.into()));
        let runtime = Runtime::with_boxed(host, pending.app, pending.config);
        if bridge.runtime.set(Arc::new(runtime)).is_err() {
            tracing::warn!("runtime already created");
        }
    }

    drive(ActivityDriver::on_create);
}

/// `Native.visible(boolean newSurface, int width, int height)`
///
/// # JNI Signature
/// `(ZII)V`
#[cfg(target_os = "android")]
#[no_mangle]
pub extern "system" fn Java_vessel_Native_visible(
    _env: JNIEnv,
    _class: JClass,
    new_surface: jboolean,
    width: jint,
    height: jint,
) {
    if width <= 0 || height <= 0 {
        tracing::error!("Invalid surface dimensions: {}x{}", width, height);
        return;
    }
    let size = SurfaceSize::new(width as u32, height as u32);
    drive(|driver| driver.on_surface(new_surface == JNI_TRUE, size));
}

/// `Native.active()`
#[cfg(target_os = "android")]
#[no_mangle]
pub extern "system" fn Java_vessel_Native_active(_env: JNIEnv, _class: JClass) {
    drive(ActivityDriver::on_resume);
}

/// `Native.inactive()`
#[cfg(target_os = "android")]
#[no_mangle]
pub extern "system" fn Java_vessel_Native_inactive(_env: JNIEnv, _class: JClass) {
    drive(ActivityDriver::on_pause);
}

/// `Native.hidden()`
#[cfg(target_os = "android")]
#[no_mangle]
pub extern "system" fn Java_vessel_Native_hidden(_env: JNIEnv, _class: JClass) {
    drive(ActivityDriver::on_stop);
}

/// `Native.render()`
#[cfg(target_os = "android")]
#[no_mangle]
pub extern "system" fn Java_vessel_Native_render(_env: JNIEnv, _class: JClass) {
    drive(ActivityDriver::on_draw_frame);
}

// ============================================================================
// Event entry points
// ============================================================================

/// `Native.eventTouch(int action, float x, float y)`
///
/// # JNI Signature
/// `(IFF)V`
#[cfg(target_os = "android")]
#[no_mangle]
pub extern "system" fn Java_vessel_Native_eventTouch(
    _env: JNIEnv,
    _class: JClass,
    action: jint,
    x: jfloat,
    y: jfloat,
) {
    let Some(phase) = crate::convert::touch_phase_from_action(action) else {
        return;
    };
    if let Some(runtime) = runtime() {
        runtime.inject_touch(RawTouch::new(phase, x, y));
    }
}

/// `Native.eventAccelerometer(double t, float x, float y, float z)`
///
/// # JNI Signature
/// `(DFFF)V`
#[cfg(target_os = "android")]
#[no_mangle]
pub extern "system" fn Java_vessel_Native_eventAccelerometer(
    _env: JNIEnv,
    _class: JClass,
    timestamp: jdouble,
    x: jfloat,
    y: jfloat,
    z: jfloat,
) {
    if let Some(runtime) = runtime() {
        runtime.inject_accelerometer(AccelerometerSample { x, y, z, timestamp });
    }
}

/// `Native.eventText(String text, boolean backspace)`
///
/// # JNI Signature
/// `(Ljava/lang/String;Z)V`
#[cfg(target_os = "android")]
#[no_mangle]
pub extern "system" fn Java_vessel_Native_eventText(
    mut env: JNIEnv,
    _class: JClass,
    text: JString,
    backspace: jboolean,
) {
    let Some(runtime) = runtime() else {
        return;
    };
    let input = if backspace == JNI_TRUE {
        TextInput::Backspace
    } else {
        match env.get_string(&text) {
            Ok(s) => TextInput::from_host(String::from(s), false),
            Err(e) => {
                tracing::warn!("Failed to read text input: {}", e);
                return;
            }
        }
    };
    runtime.inject_text(input);
}
