//! The runtime a host adapter drives
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              Host adapter                    │
//! │  activity / app delegate / simulator loop    │
//! └───────────────┬─────────────────────────────┘
//!                 │ lifecycle calls, injected events
//!                 ▼
//! ┌─────────────────────────────────────────────┐
//! │   Runtime                                    │
//! │   EventSynchronizer<Domain>                  │
//! │     LifecycleMachine, callbacks, surface,    │
//! │     Application hooks                        │
//! │   Services (outside the domain)              │
//! │     HostRuntime, resources, audio            │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Every lifecycle entry point and every event injection enters the single
//! exclusion domain, so hooks and handlers never overlap. Handle tables live
//! in [`Services`] behind their own leaf locks and can be used from inside a
//! hook, from inside a handler, or from any other thread.
//!
//! Contract violations (an illegal transition, re-entering the domain from a
//! hook) are fatal: they are logged at error level and the host is asked to
//! exit with [`ExitCode::Fail`]. No hook runs after that.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use vessel_platform::{
    AccelerometerSample, CoordinateOrigin, ExitCode, HostRuntime, KeyboardMode,
    LifecycleRequest, LogLevel, RawTouch, RuntimeConfig, SurfaceSize, TextInput, TouchEvent,
};

use crate::audio::AudioPlayerHandleManager;
use crate::callbacks::{
    AccelerometerHandler, CallbackRegistry, EventCategory, TextHandler, TouchHandler,
};
use crate::lifecycle::{LifecycleMachine, LifecycleState, Transition};
use crate::resources::ResourceHandleManager;
use crate::sync::EventSynchronizer;

/// Log tag used for the runtime's own messages
pub const RUNTIME_TAG: &str = "vessel";

// ============================================================================
// Application hooks
// ============================================================================

/// The application body driven by the runtime
///
/// Each hook runs inside the exclusion domain. Use the [`HookContext`] to
/// change subscriptions or reach host services; calling back into the
/// [`Runtime`] from a hook is a fatal reentrant entry.
pub trait Application: Send {
    /// One-time setup after process start
    fn on_initialize(&mut self, _ctx: &mut HookContext<'_>) {}

    /// A surface became visible
    ///
    /// `new_context` is true when the graphics context was freshly created
    /// and GPU-side state must be rebuilt.
    fn on_visible(&mut self, _ctx: &mut HookContext<'_>, _new_context: bool) {}

    /// Input focus gained
    fn on_active(&mut self, _ctx: &mut HookContext<'_>) {}

    /// Input focus lost
    fn on_inactive(&mut self, _ctx: &mut HookContext<'_>) {}

    /// Persist anything that must survive process death
    fn on_save_state(&mut self, _ctx: &mut HookContext<'_>) {}

    /// The surface is gone
    fn on_hidden(&mut self, _ctx: &mut HookContext<'_>) {}

    /// Draw one frame
    fn on_render(&mut self, _ctx: &mut HookContext<'_>) {}
}

// ============================================================================
// Services
// ============================================================================

/// Host-backed services usable from any thread, inside or outside the domain
pub struct Services {
    host: Arc<dyn HostRuntime>,
    config: RuntimeConfig,
    resources: ResourceHandleManager,
    audio: AudioPlayerHandleManager,
}

impl Services {
    fn new(host: Arc<dyn HostRuntime>, config: RuntimeConfig) -> Self {
        Self {
            resources: ResourceHandleManager::new(Arc::clone(&host)),
            audio: AudioPlayerHandleManager::new(Arc::clone(&host)),
            host,
            config,
        }
    }

    /// The host runtime
    pub fn host(&self) -> &Arc<dyn HostRuntime> {
        &self.host
    }

    /// Runtime configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Bundled resource handles
    pub fn resources(&self) -> &ResourceHandleManager {
        &self.resources
    }

    /// Audio player handles
    pub fn audio(&self) -> &AudioPlayerHandleManager {
        &self.audio
    }

    /// Monotonic host time in nanoseconds
    pub fn time_ns(&self) -> u64 {
        self.host.time_ns()
    }

    /// Open a URL in the system browser
    pub fn open_url(&self, url: &str) -> vessel_platform::Result<()> {
        self.host.open_url(url)
    }

    /// Persistent storage directory
    pub fn storage_directory(&self) -> vessel_platform::Result<PathBuf> {
        self.host.storage_directory()
    }

    /// Cache directory
    pub fn cache_directory(&self) -> vessel_platform::Result<PathBuf> {
        self.host.cache_directory()
    }

    /// Show or hide the virtual keyboard
    pub fn set_virtual_keyboard(&self, mode: KeyboardMode) {
        self.host.set_virtual_keyboard(mode);
    }

    /// Hint the host to collect garbage
    pub fn gc_hint(&self) {
        self.host.gc_hint();
    }

    /// The text input that stands for a backspace keystroke
    pub fn backspace(&self) -> TextInput {
        TextInput::backspace()
    }

    /// Write to the host log sink
    ///
    /// Messages below the configured threshold are dropped.
    pub fn log(&self, level: LogLevel, tag: &str, message: &str) {
        if level >= self.config.log_threshold {
            self.host.log(level, tag, message);
        }
    }

    /// Log at error level and ask the host to exit with failure
    ///
    /// Never filtered by the log threshold.
    pub fn fatal(&self, message: impl fmt::Display) -> ! {
        let message = message.to_string();
        tracing::error!("fatal: {}", message);
        self.host.log(LogLevel::Error, RUNTIME_TAG, &message);
        self.host.exit(ExitCode::Fail)
    }
}

// ============================================================================
// Domain state
// ============================================================================

/// Accelerometer subscription bookkeeping
#[derive(Debug, Default)]
struct SensorState {
    /// Suspended while no surface is visible after `become_hidden`
    suspended: bool,
    /// Last state requested from the host
    enabled: bool,
}

/// Callback slots plus the sensor state they drive
#[derive(Default)]
struct EventHub {
    callbacks: CallbackRegistry,
    sensor: SensorState,
}

impl EventHub {
    fn set_touch(&mut self, handler: Option<Box<dyn TouchHandler>>) {
        self.callbacks.set_touch(handler);
    }

    fn set_text(&mut self, handler: Option<Box<dyn TextHandler>>) {
        self.callbacks.set_text(handler);
    }

    fn set_accelerometer(
        &mut self,
        host: &dyn HostRuntime,
        handler: Option<Box<dyn AccelerometerHandler>>,
    ) {
        self.callbacks.set_accelerometer(handler);
        self.sync_sensor(host);
    }

    fn suspend_sensor(&mut self, host: &dyn HostRuntime, suspended: bool) {
        self.sensor.suspended = suspended;
        self.sync_sensor(host);
    }

    /// Enable the sensor exactly when someone listens and it is not suspended
    fn sync_sensor(&mut self, host: &dyn HostRuntime) {
        let wanted = self.callbacks.is_subscribed(EventCategory::Accelerometer)
            && !self.sensor.suspended;
        if wanted != self.sensor.enabled {
            tracing::debug!("accelerometer {}", if wanted { "on" } else { "off" });
            host.set_accelerometer_enabled(wanted);
            self.sensor.enabled = wanted;
        }
    }
}

/// Everything guarded by the exclusion domain
struct Domain {
    machine: LifecycleMachine,
    hub: EventHub,
    surface: SurfaceSize,
    app: Box<dyn Application>,
}

impl Domain {
    fn run_hook(
        &mut self,
        services: &Services,
        hook: impl FnOnce(&mut dyn Application, &mut HookContext<'_>),
    ) {
        let mut ctx = HookContext {
            services,
            hub: &mut self.hub,
            surface: self.surface,
            state: self.machine.state(),
        };
        hook(self.app.as_mut(), &mut ctx);
    }
}

// ============================================================================
// Hook context
// ============================================================================

/// What a hook can reach while it runs inside the domain
pub struct HookContext<'a> {
    services: &'a Services,
    hub: &'a mut EventHub,
    surface: SurfaceSize,
    state: LifecycleState,
}

impl HookContext<'_> {
    /// Lifecycle state the hook was entered from
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Current surface size
    pub fn surface_size(&self) -> SurfaceSize {
        self.surface
    }

    /// Host services
    pub fn services(&self) -> &Services {
        self.services
    }

    /// Bundled resource handles
    pub fn resources(&self) -> &ResourceHandleManager {
        self.services.resources()
    }

    /// Audio player handles
    pub fn audio(&self) -> &AudioPlayerHandleManager {
        self.services.audio()
    }

    /// Replace the touch subscriber (`None` unsubscribes)
    pub fn set_touch_handler(&mut self, handler: Option<Box<dyn TouchHandler>>) {
        self.hub.set_touch(handler);
    }

    /// Replace the text subscriber (`None` unsubscribes)
    pub fn set_text_handler(&mut self, handler: Option<Box<dyn TextHandler>>) {
        self.hub.set_text(handler);
    }

    /// Replace the accelerometer subscriber (`None` unsubscribes)
    ///
    /// Switches the host sensor on or off to match.
    pub fn set_accelerometer_handler(&mut self, handler: Option<Box<dyn AccelerometerHandler>>) {
        self.hub.set_accelerometer(self.services.host.as_ref(), handler);
    }

    /// Check if a category has a subscriber
    pub fn is_subscribed(&self, category: EventCategory) -> bool {
        self.hub.callbacks.is_subscribed(category)
    }

    /// Write to the host log sink, subject to the threshold
    pub fn log(&self, level: LogLevel, tag: &str, message: &str) {
        self.services.log(level, tag, message);
    }

    /// Abort the process with an error
    pub fn fatal(&self, message: impl fmt::Display) -> ! {
        self.services.fatal(message)
    }
}

// ============================================================================
// Runtime
// ============================================================================

/// One application instance bound to one host
///
/// Construct it once at process start and share it as `Arc<Runtime>` with
/// every host thread that calls in.
pub struct Runtime {
    services: Services,
    domain: EventSynchronizer<Domain>,
}

impl Runtime {
    /// Create a runtime in `NotInitialized`
    pub fn new(
        host: Arc<dyn HostRuntime>,
        app: impl Application + 'static,
        config: RuntimeConfig,
    ) -> Self {
        Self::with_boxed(host, Box::new(app), config)
    }

    /// Create a runtime from an already boxed application
    pub fn with_boxed(
        host: Arc<dyn HostRuntime>,
        app: Box<dyn Application>,
        config: RuntimeConfig,
    ) -> Self {
        tracing::debug!(
            "Creating runtime on host '{}' (save state {:?}, origin {:?})",
            host.name(),
            config.save_state,
            config.coordinate_origin
        );
        let machine = LifecycleMachine::new(config.save_state);
        Self {
            services: Services::new(host, config),
            domain: EventSynchronizer::new(Domain {
                machine,
                hub: EventHub::default(),
                surface: SurfaceSize::default(),
                app,
            }),
        }
    }

    // ------------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------------

    /// Run `on_initialize`
    pub fn initialize(&self) {
        self.transition(Transition::Initialize, |domain, services| {
            domain.run_hook(services, |app, ctx| app.on_initialize(ctx));
        });
    }

    /// Run `on_visible`
    ///
    /// The surface size is taken only together with a new graphics context;
    /// a size change without one is ignored.
    pub fn become_visible(&self, new_context: bool, surface: SurfaceSize) {
        self.transition(Transition::BecomeVisible, |domain, services| {
            if new_context || domain.surface.is_empty() {
                domain.surface = surface;
            } else if surface != domain.surface {
                tracing::warn!(
                    "Ignoring surface size {}x{} without a new context (keeping {}x{})",
                    surface.width,
                    surface.height,
                    domain.surface.width,
                    domain.surface.height
                );
            }
            domain.hub.suspend_sensor(services.host.as_ref(), false);
            domain.run_hook(services, |app, ctx| app.on_visible(ctx, new_context));
        });
    }

    /// Run `on_active`
    pub fn become_active(&self) {
        self.transition(Transition::BecomeActive, |domain, services| {
            domain.run_hook(services, |app, ctx| app.on_active(ctx));
        });
    }

    /// Run `on_inactive`
    pub fn become_inactive(&self) {
        self.transition(Transition::BecomeInactive, |domain, services| {
            domain.run_hook(services, |app, ctx| app.on_inactive(ctx));
        });
    }

    /// Run `on_save_state`
    pub fn save_state(&self) {
        self.transition(Transition::SaveState, |domain, services| {
            domain.run_hook(services, |app, ctx| app.on_save_state(ctx));
        });
    }

    /// Run `on_hidden`
    pub fn become_hidden(&self) {
        self.transition(Transition::BecomeHidden, |domain, services| {
            domain.run_hook(services, |app, ctx| app.on_hidden(ctx));
            domain.hub.suspend_sensor(services.host.as_ref(), true);
        });
    }

    /// Run `on_render`
    pub fn render(&self) {
        self.transition(Transition::Render, |domain, services| {
            domain.run_hook(services, |app, ctx| app.on_render(ctx));
        });
    }

    /// Run the entry point matching a host request
    pub fn apply(&self, request: LifecycleRequest) {
        match request {
            LifecycleRequest::Initialize => self.initialize(),
            LifecycleRequest::BecomeVisible {
                new_context,
                surface,
            } => self.become_visible(new_context, surface),
            LifecycleRequest::BecomeActive => self.become_active(),
            LifecycleRequest::BecomeInactive => self.become_inactive(),
            LifecycleRequest::SaveState => self.save_state(),
            LifecycleRequest::BecomeHidden => self.become_hidden(),
            LifecycleRequest::Render => self.render(),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> LifecycleState {
        self.enter(|domain| domain.machine.state())
    }

    /// Current surface size
    pub fn surface_size(&self) -> SurfaceSize {
        self.enter(|domain| domain.surface)
    }

    // ------------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------------

    /// Deliver a touch to the subscriber, if any
    ///
    /// Coordinates are converted to top-left origin first. A bottom-left
    /// touch that arrives before any surface size is known cannot be
    /// flipped and is dropped.
    pub fn inject_touch(&self, raw: RawTouch) {
        let origin = self.services.config.coordinate_origin;
        self.enter(|domain| {
            if origin == CoordinateOrigin::BottomLeft && domain.surface.is_empty() {
                tracing::trace!("touch {:?} dropped: no surface to flip against", raw.phase);
                return;
            }
            let (x, y) = origin.normalize(raw.x, raw.y, domain.surface.height);
            let event = TouchEvent {
                phase: raw.phase,
                x,
                y,
            };
            if !domain.hub.callbacks.dispatch_touch(event) {
                tracing::trace!("touch {:?} dropped: no subscriber", event);
            }
        });
    }

    /// Deliver text input to the subscriber, if any
    pub fn inject_text(&self, input: TextInput) {
        self.enter(|domain| {
            if !domain.hub.callbacks.dispatch_text(&input) {
                tracing::trace!("text input dropped: no subscriber");
            }
        });
    }

    /// Deliver an accelerometer sample to the subscriber, if any
    pub fn inject_accelerometer(&self, sample: AccelerometerSample) {
        self.enter(|domain| {
            domain.hub.callbacks.dispatch_accelerometer(sample);
        });
    }

    // ------------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------------

    /// Replace the touch subscriber from outside a hook
    pub fn set_touch_handler(&self, handler: Option<Box<dyn TouchHandler>>) {
        self.enter(|domain| domain.hub.set_touch(handler));
    }

    /// Replace the text subscriber from outside a hook
    pub fn set_text_handler(&self, handler: Option<Box<dyn TextHandler>>) {
        self.enter(|domain| domain.hub.set_text(handler));
    }

    /// Replace the accelerometer subscriber from outside a hook
    pub fn set_accelerometer_handler(&self, handler: Option<Box<dyn AccelerometerHandler>>) {
        let host = self.services.host.as_ref();
        self.enter(|domain| domain.hub.set_accelerometer(host, handler));
    }

    /// Check if a category has a subscriber
    pub fn is_subscribed(&self, category: EventCategory) -> bool {
        self.enter(|domain| domain.hub.callbacks.is_subscribed(category))
    }

    // ------------------------------------------------------------------------
    // Services
    // ------------------------------------------------------------------------

    /// Host-backed services
    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Bundled resource handles
    pub fn resources(&self) -> &ResourceHandleManager {
        self.services.resources()
    }

    /// Audio player handles
    pub fn audio(&self) -> &AudioPlayerHandleManager {
        self.services.audio()
    }

    /// The host runtime
    pub fn host(&self) -> &Arc<dyn HostRuntime> {
        self.services.host()
    }

    /// Write to the host log sink, subject to the threshold
    pub fn log(&self, level: LogLevel, tag: &str, message: &str) {
        self.services.log(level, tag, message);
    }

    /// Abort the process with an error
    pub fn fatal(&self, message: impl fmt::Display) -> ! {
        self.services.fatal(message)
    }

    /// Release every host object still held and switch the sensor off
    pub fn teardown(self) {
        let Runtime { services, domain } = self;
        let mut domain = domain.into_inner();
        for category in [
            EventCategory::Touch,
            EventCategory::Text,
            EventCategory::Accelerometer,
        ] {
            domain.hub.callbacks.clear(category);
        }
        domain.hub.sync_sensor(services.host.as_ref());
        services.audio.release_all();
        services.resources.release_all();
        tracing::debug!("Runtime torn down in state {}", domain.machine.state());
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    /// Enter the domain, taking the fatal path on reentry
    fn enter<R>(&self, f: impl FnOnce(&mut Domain) -> R) -> R {
        match self.domain.enter(f) {
            Ok(result) => result,
            Err(e) => self.services.fatal(e),
        }
    }

    /// Validate, run the hook, then advance the state
    fn transition(&self, transition: Transition, run: impl FnOnce(&mut Domain, &Services)) {
        let services = &self.services;
        self.enter(|domain| {
            let next = match domain.machine.check(transition) {
                Ok(next) => next,
                Err(e) => services.fatal(e),
            };
            tracing::debug!("{} from {}", transition.name(), domain.machine.state());
            run(domain, services);
            domain.machine.commit(next);
        });
    }
}
