//! Runtime configuration shared by every host

use serde::{Deserialize, Serialize};

use crate::host::LogLevel;
use crate::input::CoordinateOrigin;

/// When a host delivers its save-state request
///
/// Platforms disagree on this, so the lifecycle state machine takes it as a
/// parameter instead of hard-coding one rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveStatePolicy {
    /// Save right after losing focus, while still visible (Android)
    #[default]
    WhileVisible,
    /// Save right after being hidden (iOS)
    AfterHidden,
}

/// Per-runtime settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Messages below this level never reach the host log sink
    pub log_threshold: LogLevel,
    /// Legal source state for save-state requests
    pub save_state: SaveStatePolicy,
    /// Native coordinate convention of the host's touch events
    pub coordinate_origin: CoordinateOrigin,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_threshold: LogLevel::Debug,
            save_state: SaveStatePolicy::default(),
            coordinate_origin: CoordinateOrigin::default(),
        }
    }
}

impl RuntimeConfig {
    /// Set the log threshold
    pub fn with_log_threshold(mut self, level: LogLevel) -> Self {
        self.log_threshold = level;
        self
    }

    /// Set the save-state policy
    pub fn with_save_state(mut self, policy: SaveStatePolicy) -> Self {
        self.save_state = policy;
        self
    }

    /// Set the host coordinate origin
    pub fn with_coordinate_origin(mut self, origin: CoordinateOrigin) -> Self {
        self.coordinate_origin = origin;
        self
    }
}
