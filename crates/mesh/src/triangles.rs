use terrain_common::Color;
use terrain_math::Vector3;

use crate::GridMesh;

/// Vertex position with its resolved draw color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColoredVertex {
    pub position: Vector3,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [ColoredVertex; 3],
}

/// Iterator over the two triangles of every cell, row-major by cell.
///
/// Cell `(r, c)` yields `(r,c) (r+1,c+1) (r+1,c)` then `(r,c) (r,c+1) (r+1,c+1)`.
pub struct Triangles<'a> {
    mesh: &'a GridMesh,
    cell: usize,
    second: bool,
}

impl Triangles<'_> {
    fn vertex(&self, row: usize, col: usize) -> ColoredVertex {
        let p = self.mesh.at(row, col);
        ColoredVertex {
            position: p.truncate(),
            color: self.mesh.vertex_color(p.y()),
        }
    }
}

impl Iterator for Triangles<'_> {
    type Item = Triangle;

    fn next(&mut self) -> Option<Triangle> {
        let cells = self.mesh.rows() * self.mesh.cols();
        if self.cell >= cells {
            return None;
        }
        let r = self.cell / self.mesh.cols();
        let c = self.cell % self.mesh.cols();

        let vertices = if self.second {
            [self.vertex(r, c), self.vertex(r, c + 1), self.vertex(r + 1, c + 1)]
        } else {
            [self.vertex(r, c), self.vertex(r + 1, c + 1), self.vertex(r + 1, c)]
        };

        if self.second {
            self.cell += 1;
        }
        self.second = !self.second;
        Some(Triangle { vertices })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let cells = self.mesh.rows() * self.mesh.cols();
        let remaining = cells.saturating_sub(self.cell) * 2 - usize::from(self.second);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Triangles<'_> {}

impl GridMesh {
    pub fn triangles(&self) -> Triangles<'_> {
        Triangles {
            mesh: self,
            cell: 0,
            second: false,
        }
    }
}
