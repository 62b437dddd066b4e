use std::path::PathBuf;

use terrain_common::{CameraPreset, Color, DisplayMode, GridIndex, MeshConfig};

/// A high-level editing request.
///
/// Keyboard shortcuts, side-panel widgets and mouse clicks all produce these;
/// the editor session is the only consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Turn the camera about the vertical axis by this many degrees.
    Yaw(f64),
    /// Tilt the camera about its horizontal axis.
    Pitch(f64),
    /// Spin the camera about its line of sight.
    Roll(f64),
    /// Move the eye away from (positive) or towards the origin.
    Zoom(f64),
    /// Replace the camera with a preset placement.
    AlignCamera(CameraPreset),
    /// Build a fresh mesh, discarding the current one.
    NewMesh(MeshConfig),
    SetColor(Color),
    SetSnowCapHeight(f64),
    /// Pick the vertex under a normalized screen point.
    Pick { sx: f64, sy: f64, aspect: f64 },
    /// Select a vertex by index.
    Select(GridIndex),
    Deselect,
    /// Set the height of the selected vertex.
    SetHeight(f64),
    /// Give every vertex a random height within `[-range/2, range/2]`.
    Randomize(f64),
    Flatten,
    /// Run the midpoint-displacement refinement this many times.
    Fractalize(u32),
    /// Run the Catmull-Clark refinement this many times.
    Smooth(u32),
    SetDisplayMode(DisplayMode),
    /// Write the mesh as OBJ (plus its MTL) to this path.
    Export(PathBuf),
    /// No-op (used for input mapping that hasn't been bound yet).
    Noop,
}

impl Action {
    /// Whether applying this action replaces the mesh and so drops the selection.
    pub fn replaces_mesh(&self) -> bool {
        matches!(self, Self::NewMesh(_) | Self::Fractalize(_) | Self::Smooth(_))
    }

    pub fn moves_camera(&self) -> bool {
        matches!(
            self,
            Self::Yaw(_) | Self::Pitch(_) | Self::Roll(_) | Self::Zoom(_) | Self::AlignCamera(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refinements_replace_mesh() {
        assert!(Action::Fractalize(1).replaces_mesh());
        assert!(Action::Smooth(2).replaces_mesh());
        assert!(Action::NewMesh(MeshConfig::default()).replaces_mesh());
        assert!(!Action::Flatten.replaces_mesh());
        assert!(!Action::SetHeight(1.0).replaces_mesh());
    }

    #[test]
    fn camera_actions() {
        assert!(Action::Yaw(5.0).moves_camera());
        assert!(Action::AlignCamera(CameraPreset::Back).moves_camera());
        assert!(!Action::Deselect.moves_camera());
        assert!(!Action::Noop.moves_camera());
    }
}
