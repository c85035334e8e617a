//! Conversions between Android constants and platform types

use vessel_platform::{KeyboardMode, LogLevel, TouchPhase};

/// `MotionEvent.ACTION_DOWN`
pub const ACTION_DOWN: i32 = 0;
/// `MotionEvent.ACTION_UP`
pub const ACTION_UP: i32 = 1;
/// `MotionEvent.ACTION_MOVE`
pub const ACTION_MOVE: i32 = 2;

/// Event id the Java side uses for the accelerometer in `eventSubscribe`
pub const ACCELEROMETER_EVENT_ID: i32 = 0;

/// Map a `MotionEvent` action to a touch phase
///
/// Cancel, pointer and hover actions have no counterpart and are dropped.
pub fn touch_phase_from_action(action: i32) -> Option<TouchPhase> {
    match action {
        ACTION_DOWN => Some(TouchPhase::Down),
        ACTION_UP => Some(TouchPhase::Up),
        ACTION_MOVE => Some(TouchPhase::Move),
        _ => None,
    }
}

/// Android log priority for a log level
pub fn log_level(level: LogLevel) -> log::Level {
    match level {
        LogLevel::Debug => log::Level::Debug,
        LogLevel::Normal => log::Level::Info,
        LogLevel::Warning => log::Level::Warn,
        LogLevel::Error => log::Level::Error,
    }
}

/// Argument for `Native.setKbdMode`
pub fn keyboard_mode_code(mode: KeyboardMode) -> i32 {
    match mode {
        KeyboardMode::Hidden => 0,
        KeyboardMode::Visible => 1,
    }
}
