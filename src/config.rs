// SPDX-License-Identifier: GPL-3.0-only

//! User configuration for the input core.
//!
//! Every field has a default from [`crate::app_settings`], so a configuration
//! file only needs to name the thresholds it changes:
//!
//! ```json
//! { "long_press_ms": 450, "measure_fps": true }
//! ```

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app_settings::{
    DISMISS_RATIO, FPS_SAMPLE_SIZE, GESTURE_WINDOW_MS, LONG_PRESS_THRESHOLD_MS, SWIPE_RATIO,
    SWIPE_TOLERANCE_RATIO,
};

/// Tunable thresholds of the input core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlassConfig {
    /// Window after a press in which swipes and dismiss are recognized.
    pub gesture_window_ms: u64,
    /// Long press timer interval.
    pub long_press_ms: u64,
    /// Horizontal travel for a swipe, as a fraction of the active panel width.
    /// Also the lateral tolerance of the dismiss gesture.
    pub swipe_ratio: f32,
    /// Vertical tolerance of a swipe, as a fraction of the active panel height.
    pub swipe_tolerance_ratio: f32,
    /// Downward travel for dismiss, as a fraction of the active panel height.
    pub dismiss_ratio: f32,
    /// Install the FPS meter on the router.
    pub measure_fps: bool,
    /// Pointer events per FPS sample.
    pub fps_sample_size: u32,
}

impl Default for GlassConfig {
    fn default() -> Self {
        Self {
            gesture_window_ms: GESTURE_WINDOW_MS,
            long_press_ms: LONG_PRESS_THRESHOLD_MS,
            swipe_ratio: SWIPE_RATIO,
            swipe_tolerance_ratio: SWIPE_TOLERANCE_RATIO,
            dismiss_ratio: DISMISS_RATIO,
            measure_fps: false,
            fps_sample_size: FPS_SAMPLE_SIZE,
        }
    }
}

impl GlassConfig {
    /// Parses and validates a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GlassConfig = serde_json::from_str(json).map_err(ConfigError::json_error)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::io_error_with_path(e, &path_str))?;

        let config: GlassConfig = serde_json::from_str(&content)
            .map_err(|e| ConfigError::json_error_with_path(e, &path_str))?;
        config.validate()?;

        tracing::debug!("Loaded configuration from {}", path_str);
        Ok(config)
    }

    /// Loads a configuration file, falling back to the defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default configuration: {}", e);
                Self::default()
            }
        }
    }

    /// Checks that every threshold is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ratios = [
            ("swipe_ratio", self.swipe_ratio),
            ("swipe_tolerance_ratio", self.swipe_tolerance_ratio),
            ("dismiss_ratio", self.dismiss_ratio),
        ];
        for (field, value) in ratios {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::invalid_value(
                    field,
                    format!("must be in (0, 1], got {}", value),
                ));
            }
        }

        if self.gesture_window_ms == 0 {
            return Err(ConfigError::invalid_value("gesture_window_ms", "must be non-zero"));
        }
        if self.long_press_ms == 0 {
            return Err(ConfigError::invalid_value("long_press_ms", "must be non-zero"));
        }
        if self.fps_sample_size == 0 {
            return Err(ConfigError::invalid_value("fps_sample_size", "must be non-zero"));
        }

        Ok(())
    }

    /// Returns the gesture window.
    pub fn gesture_window(&self) -> Duration {
        Duration::from_millis(self.gesture_window_ms)
    }

    /// Returns the long press interval.
    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Errors that can occur while loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read.
    IoError {
        source: std::io::Error,
        file_path: Option<String>,
    },

    /// The JSON is malformed or has wrongly typed fields.
    JsonError {
        source: serde_json::Error,
        file_path: Option<String>,
        /// Line number reported by serde_json.
        line_number: Option<usize>,
    },

    /// A field holds an unusable value.
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub fn io_error_with_path(source: std::io::Error, file_path: impl Into<String>) -> Self {
        Self::IoError {
            source,
            file_path: Some(file_path.into()),
        }
    }

    pub fn json_error(source: serde_json::Error) -> Self {
        let line_number = Some(source.line());
        Self::JsonError {
            source,
            file_path: None,
            line_number,
        }
    }

    pub fn json_error_with_path(source: serde_json::Error, file_path: impl Into<String>) -> Self {
        let line_number = Some(source.line());
        Self::JsonError {
            source,
            file_path: Some(file_path.into()),
            line_number,
        }
    }

    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError { source, file_path } => {
                write!(f, "I/O error")?;
                if let Some(path) = file_path {
                    write!(f, " reading file '{}'", path)?;
                }
                write!(f, ": {}", source)
            }
            ConfigError::JsonError {
                source,
                file_path,
                line_number,
            } => {
                write!(f, "JSON parsing error")?;
                if let Some(path) = file_path {
                    write!(f, " in file '{}'", path)?;
                }
                if let Some(line) = line_number {
                    write!(f, " at line {}", line)?;
                }
                write!(f, ": {}", source)
            }
            ConfigError::InvalidValue { field, message } => {
                write!(f, "Invalid value for '{}': {}", field, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::JsonError { source, .. } => Some(source),
            ConfigError::InvalidValue { .. } => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_settings() {
        let config = GlassConfig::default();
        assert_eq!(config.gesture_window(), Duration::from_millis(250));
        assert_eq!(config.long_press(), Duration::from_millis(300));
        assert_eq!(config.swipe_ratio, 0.33);
        assert_eq!(config.dismiss_ratio, 0.5);
        assert!(!config.measure_fps);
        assert!(config.validate().is_ok(), "Defaults must validate");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GlassConfig::from_json_str(r#"{ "long_press_ms": 450 }"#).unwrap();
        assert_eq!(config.long_press_ms, 450);
        assert_eq!(config.gesture_window_ms, 250, "Unnamed fields use defaults");
    }

    #[test]
    fn test_invalid_ratio_rejected() {
        let err = GlassConfig::from_json_str(r#"{ "swipe_ratio": 1.5 }"#).unwrap_err();
        match err {
            ConfigError::InvalidValue { field, .. } => assert_eq!(field, "swipe_ratio"),
            other => panic!("Expected InvalidValue, got {:?}", other),
        }

        let err = GlassConfig::from_json_str(r#"{ "dismiss_ratio": 0.0 }"#).unwrap_err();
        assert!(err.to_string().contains("dismiss_ratio"));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let err = GlassConfig::from_json_str(r#"{ "long_press_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_malformed_json_reports_line() {
        let err = GlassConfig::from_json_str("{\n  \"long_press_ms\": ,\n}").unwrap_err();
        match &err {
            ConfigError::JsonError { line_number, .. } => assert_eq!(*line_number, Some(2)),
            other => panic!("Expected JsonError, got {:?}", other),
        }
        assert!(err.source().is_some(), "JSON errors chain their source");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "measure_fps": true, "fps_sample_size": 30 }}"#).unwrap();

        let config = GlassConfig::load(file.path()).unwrap();
        assert!(config.measure_fps);
        assert_eq!(config.fps_sample_size, 30);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let err = GlassConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
        assert!(err.to_string().contains("missing.json"));

        assert_eq!(GlassConfig::load_or_default(&path), GlassConfig::default());
    }
}
