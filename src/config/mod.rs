use crate::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default leading-edge throttle window for pointer moves and progress events in milliseconds
pub const DEFAULT_THROTTLE_MS: u64 = 250;

/// Default delay before the controls hide after the last user activity in milliseconds
pub const DEFAULT_CONTROLS_AUTO_HIDE_MS: u64 = 3000;

/// Default delay before the bezel hides after a shortcut operation in milliseconds
pub const DEFAULT_BEZEL_HIDE_MS: u64 = 500;

/// Default sort position for widgets that carry no explicit order
pub const DEFAULT_WIDGET_ORDER: f64 = 1.0;

/// Default seek step for sliders and shortcuts in seconds
pub const DEFAULT_SEEK_STEP_SECS: f64 = 5.0;

/// Default volume step for the volume slider
pub const DEFAULT_VOLUME_STEP: f64 = 0.1;

/// Default volume step for keyboard shortcuts
pub const DEFAULT_SHORTCUT_VOLUME_STEP: f64 = 0.05;

/// Player configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerConfig {
    /// Throttle window for pointer moves and progress events in milliseconds
    pub throttle_ms: u64,

    /// Delay before the controls hide after user activity in milliseconds
    pub controls_auto_hide_ms: u64,

    /// Delay before the bezel hides in milliseconds
    pub bezel_hide_ms: u64,

    /// Sort position for widgets without an explicit order
    pub default_order: f64,

    /// Seek step used by the seek bar in seconds
    pub seek_step_secs: f64,

    /// Volume step used by the volume bar
    pub volume_step: f64,

    /// Volume step used by keyboard shortcuts
    pub shortcut_volume_step: f64,

    /// Position applied once metadata has loaded, in seconds
    pub start_time: Option<f64>,

    /// Whether playback restarts from the beginning when it ends
    #[serde(rename = "loop")]
    pub loop_playback: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            throttle_ms: DEFAULT_THROTTLE_MS,
            controls_auto_hide_ms: DEFAULT_CONTROLS_AUTO_HIDE_MS,
            bezel_hide_ms: DEFAULT_BEZEL_HIDE_MS,
            default_order: DEFAULT_WIDGET_ORDER,
            seek_step_secs: DEFAULT_SEEK_STEP_SECS,
            volume_step: DEFAULT_VOLUME_STEP,
            shortcut_volume_step: DEFAULT_SHORTCUT_VOLUME_STEP,
            start_time: None,
            loop_playback: false,
        }
    }
}

impl PlayerConfig {
    /// Creates a configuration that starts playback at the given position
    pub fn with_start_time(start_time: f64) -> Self {
        Self {
            start_time: Some(start_time),
            ..Self::default()
        }
    }

    /// Creates a configuration that loops playback
    pub fn looping() -> Self {
        Self {
            loop_playback: true,
            ..Self::default()
        }
    }

    /// Parses a configuration from JSON. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()
    }

    /// Loads a configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading player configuration from {}", path.display());
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn throttle_window(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    pub fn controls_auto_hide(&self) -> Duration {
        Duration::from_millis(self.controls_auto_hide_ms)
    }

    pub fn bezel_hide(&self) -> Duration {
        Duration::from_millis(self.bezel_hide_ms)
    }

    fn validate(self) -> Result<Self> {
        if !self.default_order.is_finite() {
            return Err(Error::ConfigError(format!(
                "defaultOrder must be finite, got {}",
                self.default_order
            )));
        }
        if self.seek_step_secs < 0.0 || self.volume_step < 0.0 || self.shortcut_volume_step < 0.0 {
            return Err(Error::ConfigError("step sizes must not be negative".to_string()));
        }
        if let Some(start) = self.start_time {
            if !start.is_finite() {
                return Err(Error::ConfigError(format!("startTime must be finite, got {}", start)));
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = PlayerConfig::from_json_str(r#"{ "bezelHideMs": 800, "loop": true }"#).unwrap();
        assert_eq!(config.bezel_hide_ms, 800);
        assert!(config.loop_playback);
        assert_eq!(config.throttle_ms, DEFAULT_THROTTLE_MS);
        assert_eq!(config.controls_auto_hide(), Duration::from_millis(3000));
    }

    #[test]
    fn negative_steps_are_rejected() {
        let err = PlayerConfig::from_json_str(r#"{ "volumeStep": -0.1 }"#).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn malformed_json_surfaces_as_json_error() {
        let err = PlayerConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, Error::JsonError(_)));
    }

    #[test]
    fn missing_file_surfaces_as_io_error() {
        let err = PlayerConfig::from_file("/nonexistent/neatflix-controls.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn named_constructors() {
        assert_eq!(PlayerConfig::with_start_time(12.5).start_time, Some(12.5));
        assert!(PlayerConfig::looping().loop_playback);
    }
}
