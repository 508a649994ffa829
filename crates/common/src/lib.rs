//! Shared types and configuration for the cubeview workspace.

pub mod config;
pub mod types;

pub use config::{CameraConfig, ConfigError, ControlsConfig, ViewerConfig, WindowConfig};
pub use types::{Axis, Viewport};
