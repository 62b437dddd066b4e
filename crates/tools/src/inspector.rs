use serde::Serialize;
use terrain_common::{Color, GridIndex};
use terrain_mesh::GridMesh;

/// Mesh inspector for developer tooling.
///
/// Provides read-only queries against a mesh for debugging and status display.
pub struct MeshInspector;

impl MeshInspector {
    /// Produce a summary of the mesh.
    pub fn summary(mesh: &GridMesh) -> MeshSummary {
        let (min_height, max_height) = mesh.height_range();
        let snow = mesh.snow_cap_height();
        MeshSummary {
            rows: mesh.rows(),
            cols: mesh.cols(),
            points: mesh.point_count(),
            triangles: 2 * mesh.rows() * mesh.cols(),
            width: mesh.width(),
            depth: mesh.depth(),
            min_height,
            max_height,
            snow_cap_height: snow,
            snow_points: mesh.points().filter(|(_, p)| p.y() >= snow).count(),
        }
    }

    /// Position and draw color of one point.
    pub fn inspect_point(mesh: &GridMesh, index: GridIndex) -> Option<PointInfo> {
        mesh.point(index).ok().map(|p| PointInfo {
            index,
            position: [p.x(), p.y(), p.z()],
            color: mesh.vertex_color(p.y()),
        })
    }

    /// Indices of every point drawn with the snow color, row-major.
    pub fn snow_points(mesh: &GridMesh) -> Vec<GridIndex> {
        let snow = mesh.snow_cap_height();
        mesh.points()
            .filter(|(_, p)| p.y() >= snow)
            .map(|(index, _)| index)
            .collect()
    }
}

/// Summary of mesh state for the inspector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshSummary {
    pub rows: usize,
    pub cols: usize,
    pub points: usize,
    pub triangles: usize,
    pub width: f64,
    pub depth: f64,
    pub min_height: f64,
    pub max_height: f64,
    pub snow_cap_height: f64,
    pub snow_points: usize,
}

impl std::fmt::Display for MeshSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Mesh: {}x{} cells, {} points, {} triangles, extent {:.2}x{:.2}, height {:.3}..{:.3}, snow>={:.2} ({} points)",
            self.rows,
            self.cols,
            self.points,
            self.triangles,
            self.width,
            self.depth,
            self.min_height,
            self.max_height,
            self.snow_cap_height,
            self.snow_points,
        )
    }
}

/// Detailed info about a single point.
#[derive(Debug, Clone, PartialEq)]
pub struct PointInfo {
    pub index: GridIndex,
    pub position: [f64; 3],
    pub color: Color,
}

impl std::fmt::Display for PointInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Point {} pos=({:.3}, {:.3}, {:.3})",
            self.index, self.position[0], self.position[1], self.position[2],
        )
    }
}
