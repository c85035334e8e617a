//! UIApplication delegate lifecycle mapping
//!
//! iOS delivers the state-save opportunity after the app has left the
//! screen, so runtimes driven from here use
//! [`SaveStatePolicy::AfterHidden`]:
//!
//! ```text
//! didFinishLaunching        -> initialize
//! view ready (w, h)         -> become_visible(new_context, w x h)
//! didBecomeActive           -> become_active        (delayed until visible)
//! willResignActive          -> become_inactive
//! didEnterBackground        -> become_hidden, save_state
//! willEnterForeground       -> become_visible(false, last size)
//! drawInMTKView / CADisplayLink -> render           (only while visible)
//! ```

use vessel_platform::{LifecycleRequest, RuntimeConfig, SaveStatePolicy, SurfaceSize};

/// Runtime configuration matching iOS delegate ordering
pub fn ios_runtime_config() -> RuntimeConfig {
    RuntimeConfig::default().with_save_state(SaveStatePolicy::AfterHidden)
}

/// Shadow of the runtime lifecycle driven by delegate callbacks
#[derive(Debug, Default)]
pub struct AppDelegateDriver {
    launched: bool,
    surface: Option<SurfaceSize>,
    new_context: bool,
    visible: bool,
    active: bool,
    delayed_active: bool,
}

impl AppDelegateDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the runtime is visible
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// `application:didFinishLaunchingWithOptions:`
    pub fn did_finish_launching(&mut self) -> Vec<LifecycleRequest> {
        if self.launched {
            return Vec::new();
        }
        self.launched = true;
        vec![LifecycleRequest::Initialize]
    }

    /// The root view has a drawable of `size`
    ///
    /// `new_context` is set when the Metal layer or GL context was rebuilt.
    pub fn view_ready(&mut self, new_context: bool, size: SurfaceSize) -> Vec<LifecycleRequest> {
        self.new_context |= new_context;
        if !self.launched {
            tracing::warn!("view ready before launch, ignored");
            return Vec::new();
        }
        if self.visible {
            if self.surface != Some(size) {
                tracing::warn!(
                    "drawable resized to {}x{} while visible, ignored",
                    size.width,
                    size.height
                );
            }
            return Vec::new();
        }
        self.surface = Some(size);
        self.show()
    }

    /// `applicationDidBecomeActive:`
    pub fn did_become_active(&mut self) -> Vec<LifecycleRequest> {
        if self.active {
            return Vec::new();
        }
        if self.visible {
            self.active = true;
            vec![LifecycleRequest::BecomeActive]
        } else {
            self.delayed_active = true;
            Vec::new()
        }
    }

    /// `applicationWillResignActive:`
    pub fn will_resign_active(&mut self) -> Vec<LifecycleRequest> {
        self.delayed_active = false;
        if self.active {
            self.active = false;
            vec![LifecycleRequest::BecomeInactive]
        } else {
            Vec::new()
        }
    }

    /// `applicationDidEnterBackground:`
    pub fn did_enter_background(&mut self) -> Vec<LifecycleRequest> {
        let mut requests = self.will_resign_active();
        if self.visible {
            self.visible = false;
            requests.push(LifecycleRequest::BecomeHidden);
            requests.push(LifecycleRequest::SaveState);
        }
        requests
    }

    /// `applicationWillEnterForeground:`
    ///
    /// The view keeps its drawable across backgrounding, so the last size is
    /// reused without a new context.
    pub fn will_enter_foreground(&mut self) -> Vec<LifecycleRequest> {
        if self.visible || !self.launched {
            return Vec::new();
        }
        self.show()
    }

    /// Display link tick
    pub fn draw(&mut self) -> Vec<LifecycleRequest> {
        if self.visible {
            vec![LifecycleRequest::Render]
        } else {
            Vec::new()
        }
    }

    fn show(&mut self) -> Vec<LifecycleRequest> {
        let Some(surface) = self.surface else {
            return Vec::new();
        };
        let mut requests = vec![LifecycleRequest::BecomeVisible {
            new_context: self.new_context,
            surface,
        }];
        self.new_context = false;
        self.visible = true;
        if self.delayed_active {
            self.delayed_active = false;
            self.active = true;
            requests.push(LifecycleRequest::BecomeActive);
        }
        requests
    }
}
