//! Host-driven lifecycle requests
//!
//! Platform drivers translate their native callbacks (activity callbacks,
//! application delegate messages) into a sequence of [`LifecycleRequest`]s
//! which the runtime applies one at a time.

/// Drawable surface dimensions in physical pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SurfaceSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl SurfaceSize {
    /// Create a new surface size
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Check if either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A transition request coming from the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleRequest {
    /// Application process started
    Initialize,
    /// A drawing surface is ready
    BecomeVisible {
        /// Whether the graphics context was freshly created
        new_context: bool,
        /// Current surface dimensions
        surface: SurfaceSize,
    },
    /// Application gained focus
    BecomeActive,
    /// Application lost focus
    BecomeInactive,
    /// Application may be killed soon
    SaveState,
    /// Surface is gone or hidden
    BecomeHidden,
    /// Time to draw a frame
    Render,
}

impl LifecycleRequest {
    /// Short name used in log messages
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleRequest::Initialize => "initialize",
            LifecycleRequest::BecomeVisible { .. } => "become_visible",
            LifecycleRequest::BecomeActive => "become_active",
            LifecycleRequest::BecomeInactive => "become_inactive",
            LifecycleRequest::SaveState => "save_state",
            LifecycleRequest::BecomeHidden => "become_hidden",
            LifecycleRequest::Render => "render",
        }
    }
}
