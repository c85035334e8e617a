//! Android activity lifecycle mapping
//!
//! Android reports focus and surface changes independently and in no fixed
//! order: `onResume` often arrives before the GL surface exists. The
//! [`ActivityDriver`] tracks both and emits only legal runtime transitions:
//!
//! ```text
//! onCreate                 -> initialize
//! surface ready (w, h)     -> become_visible(new_context, w x h)
//! onResume                 -> become_active     (delayed until visible)
//! onPause                  -> become_inactive, save_state
//! onStop                   -> become_hidden
//! onDrawFrame              -> render            (only while visible)
//! ```
//!
//! The driver holds no JNI state, so it runs on the host in tests.

use vessel_platform::{LifecycleRequest, SurfaceSize};

/// Shadow of the runtime lifecycle driven by activity callbacks
#[derive(Debug, Default)]
pub struct ActivityDriver {
    initialized: bool,
    /// Size of the live surface, cleared when the activity stops
    surface: Option<SurfaceSize>,
    /// A fresh GL context was created and not yet reported
    new_context: bool,
    visible: bool,
    active: bool,
    /// `onResume` arrived before the surface
    delayed_active: bool,
}

impl ActivityDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the runtime is visible
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Check if the runtime is active
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// `Activity.onCreate`
    pub fn on_create(&mut self) -> Vec<LifecycleRequest> {
        if self.initialized {
            tracing::debug!("onCreate after initialization ignored");
            return Vec::new();
        }
        self.initialized = true;
        vec![LifecycleRequest::Initialize]
    }

    /// The GL surface exists with the given size
    ///
    /// `new_context` is set when `onSurfaceCreated` ran since the last
    /// report.
    pub fn on_surface(&mut self, new_context: bool, size: SurfaceSize) -> Vec<LifecycleRequest> {
        self.new_context |= new_context;

        if !self.initialized {
            tracing::warn!("surface reported before onCreate, ignored");
            return Vec::new();
        }
        if self.visible {
            if self.surface != Some(size) {
                tracing::warn!(
                    "surface resized to {}x{} while visible, ignored",
                    size.width,
                    size.height
                );
            }
            return Vec::new();
        }

        self.surface = Some(size);
        self.show()
    }

    /// `Activity.onResume`
    pub fn on_resume(&mut self) -> Vec<LifecycleRequest> {
        if self.active {
            return Vec::new();
        }
        if self.visible {
            self.activate()
        } else {
            self.delayed_active = true;
            Vec::new()
        }
    }

    /// `Activity.onPause`
    pub fn on_pause(&mut self) -> Vec<LifecycleRequest> {
        self.delayed_active = false;
        let mut requests = Vec::new();
        if self.active {
            self.active = false;
            requests.push(LifecycleRequest::BecomeInactive);
        }
        if self.visible {
            requests.push(LifecycleRequest::SaveState);
        }
        requests
    }

    /// `Activity.onStop`
    pub fn on_stop(&mut self) -> Vec<LifecycleRequest> {
        // onPause always precedes onStop; cover a missing one anyway
        let mut requests = if self.active {
            self.on_pause()
        } else {
            Vec::new()
        };
        self.surface = None;
        if self.visible {
            self.visible = false;
            requests.push(LifecycleRequest::BecomeHidden);
        }
        requests
    }

    /// `GLSurfaceView.Renderer.onDrawFrame`
    pub fn on_draw_frame(&mut self) -> Vec<LifecycleRequest> {
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
            requests.extend(self.activate());
        }
        requests
    }

    fn activate(&mut self) -> Vec<LifecycleRequest> {
        self.delayed_active = false;
        self.active = true;
        vec![LifecycleRequest::BecomeActive]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LifecycleRequest::*;

    fn size() -> SurfaceSize {
        SurfaceSize::new(720, 1280)
    }

    #[test]
    fn test_resume_before_surface_delays_activation() {
        let mut driver = ActivityDriver::new();
        assert_eq!(driver.on_create(), vec![Initialize]);
        assert!(driver.on_resume().is_empty());
        assert!(driver.on_draw_frame().is_empty());

        assert_eq!(
            driver.on_surface(true, size()),
            vec![
                BecomeVisible {
                    new_context: true,
                    surface: size()
                },
                BecomeActive
            ]
        );
        assert!(driver.is_active());
        assert_eq!(driver.on_draw_frame(), vec![Render]);
    }

    #[test]
    fn test_surface_before_resume() {
        let mut driver = ActivityDriver::new();
        driver.on_create();
        assert_eq!(
            driver.on_surface(true, size()),
            vec![BecomeVisible {
                new_context: true,
                surface: size()
            }]
        );
        assert_eq!(driver.on_resume(), vec![BecomeActive]);
    }

    #[test]
    fn test_pause_saves_state_after_inactive() {
        let mut driver = ActivityDriver::new();
        driver.on_create();
        driver.on_surface(true, size());
        driver.on_resume();

        assert_eq!(driver.on_pause(), vec![BecomeInactive, SaveState]);
        assert_eq!(driver.on_stop(), vec![BecomeHidden]);
        assert!(!driver.is_visible());
    }

    #[test]
    fn test_restart_waits_for_new_surface() {
        let mut driver = ActivityDriver::new();
        driver.on_create();
        driver.on_surface(true, size());
        driver.on_resume();
        driver.on_pause();
        driver.on_stop();

        assert!(driver.on_create().is_empty());
        assert!(driver.on_resume().is_empty());
        assert_eq!(
            driver.on_surface(true, size()),
            vec![
                BecomeVisible {
                    new_context: true,
                    surface: size()
                },
                BecomeActive
            ]
        );
    }

    #[test]
    fn test_resize_while_visible_is_ignored() {
        let mut driver = ActivityDriver::new();
        driver.on_create();
        driver.on_surface(true, size());
        assert!(driver
            .on_surface(false, SurfaceSize::new(1280, 720))
            .is_empty());
    }

    #[test]
    fn test_stop_without_pause_stays_legal() {
        let mut driver = ActivityDriver::new();
        driver.on_create();
        driver.on_surface(true, size());
        driver.on_resume();
        assert_eq!(
            driver.on_stop(),
            vec![BecomeInactive, SaveState, BecomeHidden]
        );
    }

    #[test]
    fn test_emitted_sequences_are_legal_for_the_runtime() {
        use vessel_core::{LifecycleMachine, Transition};
        use vessel_platform::SaveStatePolicy;

        let mut driver = ActivityDriver::new();
        let mut machine = LifecycleMachine::new(SaveStatePolicy::WhileVisible);
        let callbacks: Vec<Box<dyn Fn(&mut ActivityDriver) -> Vec<LifecycleRequest>>> = vec![
            Box::new(|d| d.on_create()),
            Box::new(|d| d.on_resume()),
            Box::new(|d| d.on_surface(true, size())),
            Box::new(|d| d.on_draw_frame()),
            Box::new(|d| d.on_pause()),
            Box::new(|d| d.on_draw_frame()),
            Box::new(|d| d.on_stop()),
            Box::new(|d| d.on_draw_frame()),
            Box::new(|d| d.on_resume()),
            Box::new(|d| d.on_surface(true, size())),
            Box::new(|d| d.on_stop()),
        ];

        for callback in callbacks {
            for request in callback(&mut driver) {
                let next = machine.check(Transition::from(&request)).unwrap();
                machine.commit(next);
            }
        }
    }
}
