//! Shared types and configuration used across the terrain modeler crates.

pub mod config;
pub mod types;

pub use config::{CameraConfig, ConfigError, EditorConfig, MeshConfig, PickingConfig};
pub use types::{CameraPreset, Color, DisplayMode, GridIndex};
