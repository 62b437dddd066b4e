//! Editor configuration loaded from JSON.
//!
//! Every field has a default, so a partial file only overrides what it names.

use crate::types::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parameters of the mesh created at startup and by "new mesh".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshConfig {
    pub rows: usize,
    pub cols: usize,
    pub width: f64,
    pub depth: f64,
    pub color: Color,
    pub snow_cap_height: f64,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            rows: 4,
            cols: 4,
            width: 10.0,
            depth: 10.0,
            color: Color::BLUE,
            snow_cap_height: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Distance from the eye to the origin for new and aligned cameras.
    pub radius: f64,
    /// Degrees per yaw/pitch/roll key press.
    pub angle_step: f64,
    /// World units per zoom key press.
    pub radius_step: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            radius: 15.0,
            angle_step: 5.0,
            radius_step: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickingConfig {
    /// Maximum ray-to-vertex distance for a vertex to be selectable.
    pub selection_radius: f64,
    /// Overrides the screen-plane tangent used to build pick rays.
    pub tan_half_fov: Option<f64>,
}

impl Default for PickingConfig {
    fn default() -> Self {
        Self {
            selection_radius: 0.5,
            tan_half_fov: None,
        }
    }
}

/// Top-level editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub mesh: MeshConfig,
    pub camera: CameraConfig,
    pub picking: PickingConfig,
    /// Height range used by "randomize heights".
    pub randomize_range: f64,
    /// Iterations applied by one fractalize/smooth request.
    pub refine_iterations: u32,
    /// RNG seed; `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            mesh: MeshConfig::default(),
            camera: CameraConfig::default(),
            picking: PickingConfig::default(),
            randomize_range: 4.0,
            refine_iterations: 1,
            seed: None,
        }
    }
}

impl EditorConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    /// Write configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
