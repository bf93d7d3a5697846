//! Configuration types.
//!
//! Read once when a button is built and immutable afterwards. Values come from
//! `button.toml` in the user config directory or from code.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Default duration of the resize animation.
pub const DEFAULT_TRANSITION_DURATION_MS: u64 = 500;

/// Whether a click starts loading on its own by default.
pub const DEFAULT_AUTO_TRANSITION: bool = true;

/// Per-button configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonConfig {
    /// Duration of the resize animation, in milliseconds.
    pub transition_duration_ms: u64,

    /// Duration of each cross-fade, in milliseconds. Half the transition
    /// duration when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fade_duration_ms: Option<u64>,

    /// Fire the state's auto-transition before forwarding a click.
    pub auto_transition: bool,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            transition_duration_ms: DEFAULT_TRANSITION_DURATION_MS,
            fade_duration_ms: None,
            auto_transition: DEFAULT_AUTO_TRANSITION,
        }
    }
}

impl ButtonConfig {
    /// Set both durations explicitly.
    ///
    /// Durations beyond `u64::MAX` milliseconds saturate.
    pub fn with_durations(mut self, transition: Duration, fade: Duration) -> Self {
        self.transition_duration_ms = saturating_millis(transition);
        self.fade_duration_ms = Some(saturating_millis(fade));
        self
    }

    /// Enable or disable the click auto-transition.
    pub fn with_auto_transition(mut self, enabled: bool) -> Self {
        self.auto_transition = enabled;
        self
    }

    /// Duration of the resize animation.
    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }

    /// Duration of each cross-fade.
    pub fn fade_duration(&self) -> Duration {
        let ms = self
            .fade_duration_ms
            .unwrap_or(self.transition_duration_ms / 2);
        Duration::from_millis(ms)
    }

    /// Parse a configuration from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&source)
    }

    /// Load `button.toml` from the config directory, or defaults if absent.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let path = config_path().ok_or(ConfigError::NoConfigDir)?;
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(&path)
    }
}

fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Get the config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("animbutton"))
}

/// Get the path to button.toml.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("button.toml"))
}
