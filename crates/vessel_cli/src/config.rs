//! Simulator configuration file handling
//!
//! `vessel.toml` has three tables, all optional:
//!
//! ```toml
//! [runtime]
//! log_threshold = "normal"
//! save_state = "while_visible"
//! coordinate_origin = "bottom_left"
//!
//! [host]
//! asset_root = "assets"
//! storage_dir = ".vessel/storage"
//! cache_dir = ".vessel/cache"
//!
//! [demo]
//! resource = "/gfx/logo.tga"
//! frames = 3
//! width = 480
//! height = 800
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use vessel_platform::{RuntimeConfig, SurfaceSize};
use vessel_platform_desktop::DesktopHostConfig;

/// Name looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "vessel.toml";

/// Everything the simulator reads from `vessel.toml`
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VesselConfig {
    pub runtime: RuntimeConfig,
    pub host: DesktopHostConfig,
    pub demo: DemoConfig,
}

/// What the scripted run does
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Resource loaded by the demo application, if any
    pub resource: Option<String>,
    /// Frames rendered while active
    pub frames: u32,
    /// Simulated surface width
    pub width: u32,
    /// Simulated surface height
    pub height: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            resource: None,
            frames: 3,
            width: 480,
            height: 800,
        }
    }
}

impl DemoConfig {
    pub fn surface(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }
}

impl VesselConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse vessel configuration")
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Load `path`, or `vessel.toml` from the working directory if present
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Render the configuration back to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize vessel configuration")
    }
}
