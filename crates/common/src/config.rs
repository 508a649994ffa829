//! Viewer configuration, loadable from YAML.
//!
//! Every section has defaults, so a config file only needs the keys it
//! overrides:
//!
//! ```yaml
//! camera:
//!   position: [0.0, 3.0, 9.0]
//! controls:
//!   orbit_sensitivity: 0.25
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a [`ViewerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {field} ({reason})")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Top-level viewer configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "cubeview".into(),
        }
    }
}

/// Initial camera placement and projection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Rough up direction; re-orthogonalized against the view direction.
    pub up_hint: [f32; 3],
    pub fovy_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [5.0, 4.0, 7.0],
            target: [0.0, 0.0, 0.0],
            up_hint: [0.0, 1.0, 0.0],
            fovy_degrees: 60.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Pointer control tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Orbit rotation in degrees per pixel of drag.
    pub orbit_sensitivity: f32,
    /// Drag distance in pixels before a grabbed face turns its layer.
    pub turn_threshold: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            orbit_sensitivity: 0.5,
            turn_threshold: 12.0,
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a config from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, or the defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_yaml(&std::fs::read_to_string(path)?),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });

        if self.window.width == 0 || self.window.height == 0 {
            return invalid("window", "width and height must be non-zero");
        }
        let cam = &self.camera;
        if !(cam.fovy_degrees > 0.0 && cam.fovy_degrees < 180.0) {
            return invalid("camera.fovy_degrees", "must be in (0, 180)");
        }
        if !(cam.near > 0.0) {
            return invalid("camera.near", "must be positive");
        }
        if !(cam.far > cam.near) {
            return invalid("camera.far", "must be greater than near");
        }
        if cam.position == cam.target {
            return invalid("camera.target", "must differ from position");
        }
        if !(self.controls.orbit_sensitivity > 0.0) {
            return invalid("controls.orbit_sensitivity", "must be positive");
        }
        if !(self.controls.turn_threshold >= 0.0) {
            return invalid("controls.turn_threshold", "must not be negative");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ViewerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.camera.fovy_degrees, 60.0);
        assert_eq!(config.window.width, 800);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = ViewerConfig::from_yaml(
            "camera:\n  position: [0.0, 0.0, 9.0]\ncontrols:\n  orbit_sensitivity: 0.25\n",
        )
        .unwrap();
        assert_eq!(config.camera.position, [0.0, 0.0, 9.0]);
        assert_eq!(config.camera.far, 100.0);
        assert_eq!(config.controls.orbit_sensitivity, 0.25);
        assert_eq!(config.controls.turn_threshold, 12.0);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn rejects_inverted_clip_planes() {
        let err = ViewerConfig::from_yaml("camera:\n  near: 10.0\n  far: 1.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "camera.far",
                ..
            }
        ));
    }

    #[test]
    fn rejects_nan_fields() {
        let err = ViewerConfig::from_yaml("camera:\n  near: .nan\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "camera.near",
                ..
            }
        ));

        let mut config = ViewerConfig::default();
        config.camera.far = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        config.controls.orbit_sensitivity = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        config.controls.turn_threshold = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_malformed_yaml() {
        let err = ViewerConfig::from_yaml("camera: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn missing_path_uses_defaults() {
        assert_eq!(ViewerConfig::load(None).unwrap(), ViewerConfig::default());
    }
}
