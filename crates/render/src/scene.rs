use bytemuck::{Pod, Zeroable};
use terrain_common::{Color, DisplayMode, GridIndex};
use terrain_mesh::{ColoredVertex, GridMesh};

/// Half length of each drawn world axis.
pub const AXIS_EXTENT: f32 = 100.0;

/// Half side of the square drawn around the selected vertex.
pub const SELECTION_HALF_SIZE: f32 = 0.5;

/// GPU-ready vertex: position plus RGBA color.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SceneVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl SceneVertex {
    pub fn new(position: [f32; 3], color: Color) -> Self {
        Self {
            position,
            color: color.to_rgba(),
        }
    }

    fn from_colored(v: &ColoredVertex) -> Self {
        let [x, y, z] = v.position.to_array();
        Self::new([x as f32, y as f32, z as f32], v.color)
    }
}

/// Per-frame geometry: a triangle list and a line list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneGeometry {
    pub triangles: Vec<SceneVertex>,
    pub lines: Vec<SceneVertex>,
}

impl SceneGeometry {
    /// Flatten the mesh, world axes and selection marker into vertex lists.
    ///
    /// Faces are emitted only when `mode` draws faces; each triangle's outline
    /// is emitted in white when it draws edges. Axes and the selection square
    /// are always present.
    pub fn build(mesh: &GridMesh, selection: Option<GridIndex>, mode: DisplayMode) -> Self {
        let mut scene = Self::default();
        scene.push_axes();

        for tri in mesh.triangles() {
            let [a, b, c] = tri.vertices.map(|v| SceneVertex::from_colored(&v));
            if mode.draws_faces() {
                scene.triangles.extend([a, b, c]);
            }
            if mode.draws_edges() {
                for (p, q) in [(a, b), (b, c), (c, a)] {
                    scene.push_line(p.position, q.position, Color::WHITE);
                }
            }
        }

        if let Some(p) = selection.and_then(|index| mesh.point(index).ok()) {
            let (x, y, z) = (p.x() as f32, p.y() as f32, p.z() as f32);
            let s = SELECTION_HALF_SIZE;
            let corners = [
                [x - s, y, z - s],
                [x + s, y, z - s],
                [x + s, y, z + s],
                [x - s, y, z + s],
            ];
            for i in 0..4 {
                scene.push_line(corners[i], corners[(i + 1) % 4], Color::ORANGE);
            }
        }

        tracing::trace!(
            triangles = scene.triangle_count(),
            lines = scene.line_count(),
            "built scene geometry"
        );
        scene
    }

    fn push_axes(&mut self) {
        let e = AXIS_EXTENT;
        self.push_line([-e, 0.0, 0.0], [e, 0.0, 0.0], Color::GREEN);
        self.push_line([0.0, -e, 0.0], [0.0, e, 0.0], Color::BLUE);
        self.push_line([0.0, 0.0, -e], [0.0, 0.0, e], Color::RED);
    }

    fn push_line(&mut self, from: [f32; 3], to: [f32; 3], color: Color) {
        self.lines.push(SceneVertex::new(from, color));
        self.lines.push(SceneVertex::new(to, color));
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn line_count(&self) -> usize {
        self.lines.len() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn mesh() -> GridMesh {
        let mut rng = StdRng::seed_from_u64(2);
        GridMesh::new(2, 3, 4.0, 4.0, Color::BLUE, &mut rng).unwrap()
    }

    #[test]
    fn both_mode_draws_faces_and_outlines() {
        let scene = SceneGeometry::build(&mesh(), None, DisplayMode::Both);
        assert_eq!(scene.triangle_count(), 12);
        // Three axes plus three edges per triangle.
        assert_eq!(scene.line_count(), 3 + 36);
        assert!(scene.lines[6..].iter().all(|v| v.color == Color::WHITE.to_rgba()));
    }

    #[test]
    fn wireframe_has_no_faces() {
        let scene = SceneGeometry::build(&mesh(), None, DisplayMode::Wireframe);
        assert_eq!(scene.triangle_count(), 0);
        assert_eq!(scene.line_count(), 39);
    }

    #[test]
    fn solid_keeps_only_axes_as_lines() {
        let scene = SceneGeometry::build(&mesh(), None, DisplayMode::Solid);
        assert_eq!(scene.triangle_count(), 12);
        assert_eq!(scene.line_count(), 3);
        assert_eq!(scene.lines[0].position, [-AXIS_EXTENT, 0.0, 0.0]);
        assert_eq!(scene.lines[0].color, Color::GREEN.to_rgba());
        assert_eq!(scene.lines[5].color, Color::RED.to_rgba());
    }

    #[test]
    fn selection_square_surrounds_vertex() {
        let m = mesh();
        let index = GridIndex::new(1, 2);
        let p = m.point(index).unwrap();
        let scene = SceneGeometry::build(&m, Some(index), DisplayMode::Solid);
        assert_eq!(scene.line_count(), 3 + 4);

        let square = &scene.lines[6..];
        assert!(square.iter().all(|v| v.color == Color::ORANGE.to_rgba()));
        for v in square {
            assert!((v.position[1] - p.y() as f32).abs() < 1e-6);
            assert!(((v.position[0] - p.x() as f32).abs() - 0.5).abs() < 1e-6);
            assert!(((v.position[2] - p.z() as f32).abs() - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn stale_selection_is_ignored() {
        let scene = SceneGeometry::build(&mesh(), Some(GridIndex::new(9, 9)), DisplayMode::Solid);
        assert_eq!(scene.line_count(), 3);
    }
}
