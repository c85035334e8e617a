//! Runtime tests against the recording mock host

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use vessel_platform::{
    AccelerometerSample, CoordinateOrigin, ExitCode, LifecycleRequest, LogLevel, RawTouch,
    RuntimeConfig, SaveStatePolicy, SurfaceSize, TextInput, TouchEvent, TouchPhase,
};

use crate::prelude::*;
use crate::testing::{expect_exit, mock_host, HostCall, MockHost};

/// Shared record of which hooks ran, in order
#[derive(Clone, Default)]
struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    fn push(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

struct Recorder {
    journal: Journal,
}

impl Application for Recorder {
    fn on_initialize(&mut self, _ctx: &mut HookContext<'_>) {
        self.journal.push("initialize");
    }

    fn on_visible(&mut self, _ctx: &mut HookContext<'_>, new_context: bool) {
        self.journal.push(format!("visible({})", new_context));
    }

    fn on_active(&mut self, _ctx: &mut HookContext<'_>) {
        self.journal.push("active");
    }

    fn on_inactive(&mut self, _ctx: &mut HookContext<'_>) {
        self.journal.push("inactive");
    }

    fn on_save_state(&mut self, _ctx: &mut HookContext<'_>) {
        self.journal.push("save_state");
    }

    fn on_hidden(&mut self, _ctx: &mut HookContext<'_>) {
        self.journal.push("hidden");
    }

    fn on_render(&mut self, _ctx: &mut HookContext<'_>) {
        self.journal.push("render");
    }
}

fn recorder(host: &Arc<MockHost>, config: RuntimeConfig) -> (Arc<Runtime>, Journal) {
    let journal = Journal::default();
    let app = Recorder {
        journal: journal.clone(),
    };
    let runtime = Runtime::new(host.clone(), app, config);
    (Arc::new(runtime), journal)
}

fn surface() -> SurfaceSize {
    SurfaceSize::new(320, 480)
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_startup_runs_hooks_in_order_once_each() {
    let host = mock_host();
    let (runtime, journal) = recorder(&host, RuntimeConfig::default());

    runtime.initialize();
    runtime.become_visible(true, surface());
    runtime.become_active();

    assert_eq!(runtime.state(), LifecycleState::VisibleActive);
    assert_eq!(journal.entries(), vec!["initialize", "visible(true)", "active"]);
}

#[test]
fn test_active_before_initialize_is_fatal() {
    let host = mock_host();
    let (runtime, journal) = recorder(&host, RuntimeConfig::default());

    let code = expect_exit(|| runtime.become_active());
    assert_eq!(code, ExitCode::Fail);
    assert!(journal.entries().is_empty());
    assert_eq!(runtime.state(), LifecycleState::NotInitialized);

    let logs = host.logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].level, LogLevel::Error);
    assert!(logs[0].message.contains("become_active"));
    assert!(logs[0].message.contains("NotInitialized"));
}

#[test]
fn test_hidden_from_active_is_fatal() {
    let host = mock_host();
    let (runtime, journal) = recorder(&host, RuntimeConfig::default());
    runtime.initialize();
    runtime.become_visible(true, surface());
    runtime.become_active();

    assert_eq!(expect_exit(|| runtime.become_hidden()), ExitCode::Fail);
    assert!(!journal.entries().contains(&"hidden".to_string()));
}

#[test]
fn test_full_android_style_cycle() {
    let host = mock_host();
    let (runtime, journal) = recorder(&host, RuntimeConfig::default());

    for request in [
        LifecycleRequest::Initialize,
        LifecycleRequest::BecomeVisible {
            new_context: true,
            surface: surface(),
        },
        LifecycleRequest::BecomeActive,
        LifecycleRequest::Render,
        LifecycleRequest::BecomeInactive,
        LifecycleRequest::SaveState,
        LifecycleRequest::BecomeHidden,
    ] {
        runtime.apply(request);
    }

    assert_eq!(runtime.state(), LifecycleState::InitializedNotVisible);
    assert_eq!(
        journal.entries(),
        vec![
            "initialize",
            "visible(true)",
            "active",
            "render",
            "inactive",
            "save_state",
            "hidden"
        ]
    );
}

#[test]
fn test_save_state_after_hidden_policy() {
    let host = mock_host();
    let config = RuntimeConfig::default().with_save_state(SaveStatePolicy::AfterHidden);
    let (runtime, journal) = recorder(&host, config);

    runtime.initialize();
    runtime.become_visible(true, surface());
    runtime.become_hidden();
    runtime.save_state();
    assert_eq!(journal.entries().last().map(String::as_str), Some("save_state"));

    // while visible is illegal under this policy
    runtime.become_visible(false, surface());
    assert_eq!(expect_exit(|| runtime.save_state()), ExitCode::Fail);
}

#[test]
fn test_render_while_hidden_is_fatal() {
    let host = mock_host();
    let (runtime, _) = recorder(&host, RuntimeConfig::default());
    runtime.initialize();
    assert_eq!(expect_exit(|| runtime.render()), ExitCode::Fail);
}

// ============================================================================
// Events
// ============================================================================

#[test]
fn test_touch_without_subscriber_is_noop() {
    let host = mock_host();
    let (runtime, journal) = recorder(&host, RuntimeConfig::default());
    runtime.initialize();

    runtime.inject_touch(RawTouch::new(TouchPhase::Down, 1.0, 2.0));
    assert_eq!(journal.entries(), vec!["initialize"]);
    assert!(host.calls().is_empty());
}

#[test]
fn test_second_touch_subscriber_replaces_first() {
    let host = mock_host();
    let (runtime, _) = recorder(&host, RuntimeConfig::default());
    let journal = Journal::default();

    let a = journal.clone();
    runtime.set_touch_handler(Some(Box::new(move |_: TouchEvent| a.push("a"))));
    let b = journal.clone();
    runtime.set_touch_handler(Some(Box::new(move |_: TouchEvent| b.push("b"))));

    runtime.inject_touch(RawTouch::new(TouchPhase::Up, 0.0, 0.0));
    assert_eq!(journal.entries(), vec!["b"]);
}

#[test]
fn test_bottom_left_touches_are_flipped() {
    let host = mock_host();
    let config = RuntimeConfig::default().with_coordinate_origin(CoordinateOrigin::BottomLeft);
    let (runtime, _) = recorder(&host, config);
    runtime.initialize();
    runtime.become_visible(true, surface());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    runtime.set_touch_handler(Some(Box::new(move |touch: TouchEvent| {
        sink.lock().push(touch)
    })));
    runtime.inject_touch(RawTouch::new(TouchPhase::Move, 10.0, 80.0));

    assert_eq!(
        *seen.lock(),
        vec![TouchEvent {
            phase: TouchPhase::Move,
            x: 10,
            y: 400
        }]
    );
}

#[test]
fn test_bottom_left_touch_before_any_surface_is_dropped() {
    let host = mock_host();
    let config = RuntimeConfig::default().with_coordinate_origin(CoordinateOrigin::BottomLeft);
    let (runtime, _) = recorder(&host, config);
    runtime.initialize();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    runtime.set_touch_handler(Some(Box::new(move |touch: TouchEvent| {
        sink.lock().push(touch)
    })));

    runtime.inject_touch(RawTouch::new(TouchPhase::Down, 10.0, 80.0));
    assert!(seen.lock().is_empty());

    runtime.become_visible(true, surface());
    runtime.inject_touch(RawTouch::new(TouchPhase::Down, 10.0, 80.0));
    assert_eq!(seen.lock().len(), 1);
    assert!(seen.lock().iter().all(|touch| touch.y >= 0));
}

#[test]
fn test_top_left_touch_before_any_surface_is_delivered() {
    let host = mock_host();
    let (runtime, _) = recorder(&host, RuntimeConfig::default());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    runtime.set_touch_handler(Some(Box::new(move |touch: TouchEvent| {
        sink.lock().push(touch)
    })));

    runtime.inject_touch(RawTouch::new(TouchPhase::Down, 3.0, 4.0));
    assert_eq!(seen.lock().first().map(TouchEvent::position), Some((3, 4)));
}

#[test]
fn test_text_and_backspace_reach_subscriber() {
    let host = mock_host();
    let (runtime, _) = recorder(&host, RuntimeConfig::default());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    runtime.set_text_handler(Some(Box::new(move |input: &TextInput| {
        sink.lock().push(input.clone())
    })));

    runtime.inject_text(TextInput::from("hi"));
    runtime.inject_text(runtime.services().backspace());

    assert_eq!(*seen.lock(), vec![TextInput::from("hi"), TextInput::Backspace]);
}

#[test]
fn test_unsubscribe_drops_events() {
    let host = mock_host();
    let (runtime, _) = recorder(&host, RuntimeConfig::default());
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    runtime.set_accelerometer_handler(Some(Box::new(move |_: AccelerometerSample| {
        counter.fetch_add(1, Ordering::SeqCst);
    })));

    runtime.inject_accelerometer(AccelerometerSample::default());
    runtime.set_accelerometer_handler(None);
    runtime.inject_accelerometer(AccelerometerSample::default());

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(!runtime.is_subscribed(EventCategory::Accelerometer));
}

struct SensorApp;

impl Application for SensorApp {
    fn on_initialize(&mut self, ctx: &mut HookContext<'_>) {
        ctx.set_accelerometer_handler(Some(Box::new(|_: AccelerometerSample| {})));
    }
}

#[test]
fn test_sensor_follows_subscription_and_visibility() {
    let host = mock_host();
    let runtime = Runtime::new(host.clone(), SensorApp, RuntimeConfig::default());

    runtime.initialize();
    assert!(host.accelerometer_enabled());

    runtime.become_visible(true, surface());
    runtime.become_hidden();
    assert!(!host.accelerometer_enabled());

    runtime.become_visible(false, surface());
    assert!(host.accelerometer_enabled());

    runtime.set_accelerometer_handler(None);
    assert!(!host.accelerometer_enabled());

    let toggles: Vec<_> = host
        .calls()
        .into_iter()
        .filter(|call| matches!(call, HostCall::SetAccelerometer(_)))
        .collect();
    assert_eq!(
        toggles,
        vec![
            HostCall::SetAccelerometer(true),
            HostCall::SetAccelerometer(false),
            HostCall::SetAccelerometer(true),
            HostCall::SetAccelerometer(false),
        ]
    );
}

#[test]
fn test_surface_changes_only_with_new_context() {
    let host = mock_host();
    let (runtime, _) = recorder(&host, RuntimeConfig::default());
    runtime.initialize();
    runtime.become_visible(true, surface());
    runtime.become_hidden();

    runtime.become_visible(false, SurfaceSize::new(640, 960));
    assert_eq!(runtime.surface_size(), surface());
    runtime.become_hidden();

    runtime.become_visible(true, SurfaceSize::new(640, 960));
    assert_eq!(runtime.surface_size(), SurfaceSize::new(640, 960));
}

#[test]
fn test_reentry_from_handler_is_fatal() {
    let host = mock_host();
    let (runtime, _) = recorder(&host, RuntimeConfig::default());
    runtime.initialize();
    runtime.become_visible(true, surface());

    let inner = Arc::clone(&runtime);
    runtime.set_touch_handler(Some(Box::new(move |_: TouchEvent| inner.render())));

    let code = expect_exit(|| runtime.inject_touch(RawTouch::new(TouchPhase::Down, 0.0, 0.0)));
    assert_eq!(code, ExitCode::Fail);
    assert!(host.logs()[0].message.contains("reentrant"));

    // break the handler -> runtime cycle
    runtime.set_touch_handler(None);
}

// ============================================================================
// Resources and audio
// ============================================================================

struct Loader {
    loaded: Arc<Mutex<Vec<Option<usize>>>>,
}

impl Application for Loader {
    fn on_initialize(&mut self, ctx: &mut HookContext<'_>) {
        let resources = ctx.resources();
        let handle = resources.load("/gfx/test.tga").ok();
        let len = handle.as_ref().and_then(|h| resources.len(h));
        self.loaded.lock().push(len);
        if let Some(handle) = handle {
            resources.unload(handle);
        }

        let unrooted = resources.load("gfx/test.tga");
        assert!(matches!(unrooted, Err(ResourceError::InvalidPath(_))));
    }
}

#[test]
fn test_load_from_hook_reports_length() {
    let host = Arc::new(MockHost::new().with_asset("/gfx/test.tga", vec![0u8; 1024]));
    let loaded = Arc::new(Mutex::new(Vec::new()));
    let app = Loader {
        loaded: Arc::clone(&loaded),
    };
    let runtime = Runtime::new(host.clone(), app, RuntimeConfig::default());

    runtime.initialize();

    assert_eq!(*loaded.lock(), vec![Some(1024)]);
    assert_eq!(
        host.calls(),
        vec![
            HostCall::LoadAsset("/gfx/test.tga".into()),
            HostCall::ReleaseAsset
        ]
    );
}

#[test]
fn test_audio_create_on_failing_backend() {
    let host = Arc::new(MockHost::new().with_failing_audio());
    let (runtime, _) = recorder(&host, RuntimeConfig::default());
    assert!(matches!(
        runtime.audio().create("/sfx/boom.ogg"),
        Err(AudioError::Host(_))
    ));
}

#[test]
fn test_teardown_releases_leaked_handles() {
    let host = Arc::new(
        MockHost::new()
            .with_asset("/gfx/test.tga", vec![1, 2, 3])
            .with_asset("/sfx/boom.ogg", vec![4]),
    );
    let runtime = Runtime::new(host.clone(), SensorApp, RuntimeConfig::default());
    runtime.initialize();

    let resource = runtime.resources().load("/gfx/test.tga").unwrap();
    let player = runtime.audio().create("/sfx/boom.ogg").unwrap();
    std::mem::forget(resource);
    std::mem::forget(player);

    runtime.teardown();
    assert_eq!(host.released_assets(), 1);
    assert_eq!(host.destroyed_players(), 1);
    assert!(!host.accelerometer_enabled());
}

// ============================================================================
// Logging and host services
// ============================================================================

#[test]
fn test_log_threshold_drops_quiet_messages() {
    let host = mock_host();
    let config = RuntimeConfig::default().with_log_threshold(LogLevel::Warning);
    let (runtime, _) = recorder(&host, config);

    runtime.log(LogLevel::Debug, "test", "dropped");
    runtime.log(LogLevel::Normal, "test", "dropped");
    runtime.log(LogLevel::Warning, "test", "kept");
    runtime.log(LogLevel::Error, "test", "kept too");

    let messages: Vec<_> = host.logs().into_iter().map(|l| l.message).collect();
    assert_eq!(messages, vec!["kept", "kept too"]);
}

#[test]
fn test_host_services_pass_through() {
    let host = mock_host();
    let (runtime, _) = recorder(&host, RuntimeConfig::default());
    let services = runtime.services();

    services.open_url("https://example.org").unwrap();
    services.set_virtual_keyboard(KeyboardMode::Visible);
    services.gc_hint();
    let before = services.time_ns();
    assert!(services.time_ns() > before);
    assert!(services.storage_directory().is_ok());

    assert_eq!(
        host.calls(),
        vec![
            HostCall::OpenUrl("https://example.org".into()),
            HostCall::SetKeyboard(KeyboardMode::Visible),
            HostCall::GcHint,
        ]
    );
}

// ============================================================================
// Concurrency
// ============================================================================

/// Tracks how many callers are inside the domain at once
#[derive(Clone, Default)]
struct Occupancy {
    inside: Arc<AtomicUsize>,
    max: Arc<AtomicUsize>,
}

impl Occupancy {
    fn visit(&self) {
        let now = self.inside.fetch_add(1, Ordering::SeqCst) + 1;
        self.max.fetch_max(now, Ordering::SeqCst);
        thread::sleep(Duration::from_micros(200));
        self.inside.fetch_sub(1, Ordering::SeqCst);
    }
}

struct Busy {
    occupancy: Occupancy,
}

impl Application for Busy {
    fn on_visible(&mut self, _ctx: &mut HookContext<'_>, _new_context: bool) {
        self.occupancy.visit();
    }

    fn on_render(&mut self, _ctx: &mut HookContext<'_>) {
        self.occupancy.visit();
    }
}

#[test]
fn test_hooks_and_dispatch_never_overlap() {
    let host = mock_host();
    let occupancy = Occupancy::default();
    let app = Busy {
        occupancy: occupancy.clone(),
    };
    let runtime = Arc::new(Runtime::new(host, app, RuntimeConfig::default()));
    runtime.initialize();

    let in_handler = occupancy.clone();
    runtime.set_touch_handler(Some(Box::new(move |_: TouchEvent| in_handler.visit())));

    let lifecycle = {
        let runtime = Arc::clone(&runtime);
        thread::spawn(move || {
            runtime.become_visible(true, SurfaceSize::new(100, 100));
            for _ in 0..50 {
                runtime.render();
            }
        })
    };
    let touches = {
        let runtime = Arc::clone(&runtime);
        thread::spawn(move || {
            for i in 0..50 {
                runtime.inject_touch(RawTouch::new(TouchPhase::Move, i as f32, 0.0));
            }
        })
    };

    lifecycle.join().unwrap();
    touches.join().unwrap();

    assert_eq!(occupancy.max.load(Ordering::SeqCst), 1);
    assert_eq!(runtime.state(), LifecycleState::VisibleNotActive);
}
