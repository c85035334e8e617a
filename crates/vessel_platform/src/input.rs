//! Input event types for touch, text, and the accelerometer
//!
//! Hosts inject [`RawTouch`] values in their native coordinate space. The
//! runtime converts them to [`TouchEvent`]s in top-left origin, Y-down screen
//! space before any handler sees them.

use serde::{Deserialize, Serialize};

// ============================================================================
// Touch Events
// ============================================================================

/// Touch phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// A finger touched the surface
    Down,
    /// A finger left the surface
    Up,
    /// A finger moved while touching
    Move,
}

/// Where a host places the origin of its touch coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateOrigin {
    /// Origin at the top-left corner, Y grows downward
    #[default]
    TopLeft,
    /// Origin at the bottom-left corner, Y grows upward (GL-style surfaces)
    BottomLeft,
}

impl CoordinateOrigin {
    /// Convert a host-native point into top-left, Y-down integer coordinates
    pub fn normalize(self, x: f32, y: f32, surface_height: u32) -> (i32, i32) {
        let x = x as i32;
        let y = y as i32;
        match self {
            CoordinateOrigin::TopLeft => (x, y),
            CoordinateOrigin::BottomLeft => (x, surface_height as i32 - y),
        }
    }
}

/// Touch sample as delivered by the host, before normalization
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawTouch {
    /// Touch phase
    pub phase: TouchPhase,
    /// X position in host-native coordinates
    pub x: f32,
    /// Y position in host-native coordinates
    pub y: f32,
}

impl RawTouch {
    /// Create a raw touch sample
    pub fn new(phase: TouchPhase, x: f32, y: f32) -> Self {
        Self { phase, x, y }
    }
}

/// Touch event delivered to handlers
///
/// Coordinates are always top-left origin with Y growing downward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TouchEvent {
    /// Touch phase
    pub phase: TouchPhase,
    /// X position in screen pixels
    pub x: i32,
    /// Y position in screen pixels
    pub y: i32,
}

impl TouchEvent {
    /// Get the position as a tuple
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

// ============================================================================
// Text Events
// ============================================================================

/// Text input from the virtual keyboard
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TextInput {
    /// Ordinary text entered by the user
    Text(String),
    /// A logical backspace keystroke
    ///
    /// This is a distinct variant rather than a control character so that a
    /// literal `"\u{8}"` typed by the user is never mistaken for it.
    Backspace,
}

impl TextInput {
    /// The backspace sentinel
    pub fn backspace() -> Self {
        TextInput::Backspace
    }

    /// Check whether this is the backspace sentinel
    pub fn is_backspace(&self) -> bool {
        matches!(self, TextInput::Backspace)
    }

    /// Build from a host keyboard event that flags backspace separately
    ///
    /// When `backspace` is set the text payload is ignored.
    pub fn from_host(text: impl Into<String>, backspace: bool) -> Self {
        if backspace {
            TextInput::Backspace
        } else {
            TextInput::Text(text.into())
        }
    }

    /// Get the entered text (returns None for Backspace)
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TextInput::Text(s) => Some(s),
            TextInput::Backspace => None,
        }
    }
}

impl From<&str> for TextInput {
    fn from(s: &str) -> Self {
        TextInput::Text(s.to_string())
    }
}

impl From<String> for TextInput {
    fn from(s: String) -> Self {
        TextInput::Text(s)
    }
}

// ============================================================================
// Sensor Events
// ============================================================================

/// One accelerometer reading
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AccelerometerSample {
    /// Acceleration along the X axis
    pub x: f32,
    /// Acceleration along the Y axis
    pub y: f32,
    /// Acceleration along the Z axis
    pub z: f32,
    /// Monotonic timestamp in seconds
    pub timestamp: f64,
}

/// Virtual keyboard visibility
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyboardMode {
    /// Keyboard hidden
    #[default]
    Hidden,
    /// Keyboard shown
    Visible,
}
