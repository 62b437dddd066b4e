use serde::{Deserialize, Serialize};
use std::fmt;

/// Row/column address of a single grid point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridIndex {
    pub row: usize,
    pub col: usize,
}

impl GridIndex {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for GridIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Linear RGB color, components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0);
    pub const ORANGE: Self = Self::new(1.0, 0.4, 0.0);

    /// Color used for vertices at or above the snow-cap height.
    pub const SNOW: Self = Self::WHITE;

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgb(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_rgba(self) -> [f32; 4] {
        [self.r, self.g, self.b, 1.0]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLUE
    }
}

impl From<[f32; 3]> for Color {
    fn from(rgb: [f32; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

/// Fixed camera placements offered by the alignment buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraPreset {
    Front,
    Right,
    Left,
    Back,
    Above,
}

impl CameraPreset {
    pub const ALL: [Self; 5] = [Self::Front, Self::Right, Self::Left, Self::Back, Self::Above];

    /// `(yaw, pitch, roll)` in degrees.
    pub fn angles(self) -> (f64, f64, f64) {
        match self {
            Self::Front => (0.0, 0.0, 0.0),
            Self::Right => (90.0, 0.0, 0.0),
            Self::Left => (-90.0, 0.0, 0.0),
            Self::Back => (180.0, 0.0, 0.0),
            Self::Above => (0.0, 90.0, 0.0),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Front => "Front",
            Self::Right => "Right",
            Self::Left => "Left",
            Self::Back => "Back",
            Self::Above => "Above",
        }
    }
}

/// Which parts of the mesh get drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    Wireframe,
    Solid,
    #[default]
    Both,
}

impl DisplayMode {
    pub fn draws_edges(self) -> bool {
        matches!(self, Self::Wireframe | Self::Both)
    }

    pub fn draws_faces(self) -> bool {
        matches!(self, Self::Solid | Self::Both)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_index_orders_row_major() {
        let mut v = vec![GridIndex::new(1, 0), GridIndex::new(0, 5), GridIndex::new(0, 1)];
        v.sort();
        assert_eq!(v, vec![GridIndex::new(0, 1), GridIndex::new(0, 5), GridIndex::new(1, 0)]);
        assert_eq!(GridIndex::new(2, 3).to_string(), "(2, 3)");
    }

    #[test]
    fn color_defaults_to_blue() {
        assert_eq!(Color::default(), Color::BLUE);
        assert_eq!(Color::from([0.5, 0.25, 1.0]).to_rgba(), [0.5, 0.25, 1.0, 1.0]);
    }

    #[test]
    fn presets_rotate_about_one_axis() {
        assert_eq!(CameraPreset::Front.angles(), (0.0, 0.0, 0.0));
        assert_eq!(CameraPreset::Left.angles().0, -90.0);
        assert_eq!(CameraPreset::Above.angles(), (0.0, 90.0, 0.0));
    }

    #[test]
    fn display_mode_flags() {
        assert!(DisplayMode::Both.draws_edges() && DisplayMode::Both.draws_faces());
        assert!(!DisplayMode::Wireframe.draws_faces());
        assert!(!DisplayMode::Solid.draws_edges());
    }
}
