//! App configuration
//!
//! Loaded from TOML; every field is optional.
//!
//! ```toml
//! platform = "ios"
//! appearance = "dark"
//! follow_system = false
//! ripple_duration_ms = 300
//! interactive_animation = "background"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tgui_platform::Platform;
use tgui_theme::Appearance;
use tgui_widgets::{InteractiveAnimation, TappableConfig, WAVE_LIFETIME};

use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppRootConfig {
    pub platform: Platform,
    /// Manual appearance; `None` lets the host or system decide
    pub appearance: Option<Appearance>,
    pub follow_system: bool,
    pub ripple_duration_ms: u64,
    pub interactive_animation: InteractiveAnimation,
}

impl Default for AppRootConfig {
    fn default() -> Self {
        Self {
            platform: Platform::Base,
            appearance: None,
            follow_system: false,
            ripple_duration_ms: WAVE_LIFETIME.as_millis() as u64,
            interactive_animation: InteractiveAnimation::Background,
        }
    }
}

impl AppRootConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn ripple_lifetime(&self) -> Duration {
        Duration::from_millis(self.ripple_duration_ms)
    }

    /// Tappable defaults derived from this configuration
    pub fn tappable_config(&self) -> TappableConfig {
        TappableConfig::new()
            .interactive_animation(self.interactive_animation)
            .ripple_lifetime(self.ripple_lifetime())
    }
}
