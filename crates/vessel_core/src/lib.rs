//! Vessel Core Runtime
//!
//! The platform-agnostic half of a mobile application: a lifecycle state
//! machine, a single exclusion domain that serializes every hook and event
//! dispatch, single-slot event subscriptions, and handle tables for
//! host-owned resources and audio players.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use vessel_core::prelude::*;
//!
//! struct Game;
//!
//! impl Application for Game {
//!     fn on_initialize(&mut self, ctx: &mut HookContext<'_>) {
//!         ctx.set_touch_handler(Some(Box::new(|touch: TouchEvent| {
//!             tracing::info!("touch at {:?}", touch.position());
//!         })));
//!     }
//! }
//!
//! let runtime = Arc::new(Runtime::new(host, Game, RuntimeConfig::default()));
//! runtime.initialize();
//! runtime.become_visible(true, SurfaceSize::new(1080, 1920));
//! runtime.become_active();
//! ```

pub mod audio;
pub mod callbacks;
pub mod lifecycle;
pub mod resources;
pub mod runtime;
pub mod sync;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

#[cfg(test)]
mod tests;

pub use audio::{AudioError, AudioPlayerHandle, AudioPlayerHandleManager};
pub use callbacks::{
    AccelerometerHandler, CallbackRegistry, EventCategory, TextHandler, TouchHandler,
};
pub use lifecycle::{IllegalTransition, LifecycleMachine, LifecycleState, Transition};
pub use resources::{ResourceError, ResourceHandle, ResourceHandleManager};
pub use runtime::{Application, HookContext, Runtime, Services, RUNTIME_TAG};
pub use sync::{EventSynchronizer, ReentrantEntry};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::audio::{AudioError, AudioPlayerHandle};
    pub use crate::callbacks::EventCategory;
    pub use crate::lifecycle::LifecycleState;
    pub use crate::resources::{ResourceError, ResourceHandle};
    pub use crate::runtime::{Application, HookContext, Runtime};

    pub use vessel_platform::prelude::*;
}
