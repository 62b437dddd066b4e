//! Grid-doubling refinement: midpoint fractalization and Catmull-Clark smoothing.
//!
//! Both operators map an `R x C` cell grid onto a `2R x 2C` one. Original
//! point `(i, j)` lands at `(2i, 2j)`; odd indices are filled with new points.

use rand::Rng;
use terrain_math::Vector4;

use crate::grid::{GridMesh, perturbation};

/// Row-major scratch buffer for the refined point set.
struct Lattice {
    point_cols: usize,
    points: Vec<Vector4>,
}

impl Lattice {
    /// Doubled lattice with the source points copied to even-even slots.
    fn spread(source: &GridMesh) -> Self {
        let point_rows = source.rows() * 2 + 1;
        let point_cols = source.cols() * 2 + 1;
        let mut lattice = Self {
            point_cols,
            points: vec![Vector4::ZERO; point_rows * point_cols],
        };
        for r in 0..source.point_rows() {
            for c in 0..source.point_cols() {
                lattice.set(2 * r, 2 * c, source.at(r, c));
            }
        }
        lattice
    }

    fn get(&self, row: usize, col: usize) -> Vector4 {
        self.points[row * self.point_cols + col]
    }

    fn set(&mut self, row: usize, col: usize, point: Vector4) {
        self.points[row * self.point_cols + col] = point;
    }
}

fn raised_midpoint(a: Vector4, b: Vector4, delta: f64) -> Vector4 {
    let mid = (a + b) * 0.5;
    mid.with_y(mid.y() + delta)
}

impl GridMesh {
    /// Midpoint-displacement refinement.
    ///
    /// New points are the average of their two lattice neighbors with the height
    /// nudged by a uniform delta in `[-range/2, range/2]`, where `range` is the
    /// horizontal spacing between the first two points of row 0. Even rows are
    /// filled first, then each odd row from the rows above and below it.
    pub fn fractalize<R: Rng + ?Sized>(&self, rng: &mut R) -> GridMesh {
        let a = self.at(0, 0);
        let b = self.at(0, 1);
        let range = ((b.x() - a.x()).powi(2) + (b.z() - a.z()).powi(2)).sqrt();

        let rows = self.rows() * 2;
        let cols = self.cols() * 2;
        let mut out = Lattice::spread(self);

        for r in (0..=rows).step_by(2) {
            for c in (1..cols).step_by(2) {
                let p = raised_midpoint(out.get(r, c - 1), out.get(r, c + 1), perturbation(rng, range));
                out.set(r, c, p);
            }
        }
        for r in (1..rows).step_by(2) {
            for c in 0..=cols {
                let p = raised_midpoint(out.get(r - 1, c), out.get(r + 1, c), perturbation(rng, range));
                out.set(r, c, p);
            }
        }

        tracing::debug!(rows, cols, range, "fractalized mesh");
        GridMesh::from_parts(self, rows, cols, out.points)
    }

    /// One Catmull-Clark step over the quad lattice.
    ///
    /// Face points average their four corners. Edge points average their two
    /// endpoints with the one or two adjacent face points. Each original point
    /// then moves to `(F + 2R + (n - 3)P) / n`, where `F` averages its incident
    /// face points, `R` averages the midpoints of its incident edges on the
    /// unrefined grid, and `n` counts incident faces plus incident edges.
    pub fn smooth(&self) -> GridMesh {
        let rows = self.rows() * 2;
        let cols = self.cols() * 2;
        let mut out = Lattice::spread(self);

        for r in (1..rows).step_by(2) {
            for c in (1..cols).step_by(2) {
                let sum = out.get(r - 1, c - 1)
                    + out.get(r + 1, c - 1)
                    + out.get(r + 1, c + 1)
                    + out.get(r - 1, c + 1);
                out.set(r, c, sum / 4.0);
            }
        }

        for r in (0..=rows).step_by(2) {
            for c in (1..cols).step_by(2) {
                let mut sum = out.get(r, c - 1) + out.get(r, c + 1);
                let mut n = 2.0;
                if r > 0 {
                    sum = sum + out.get(r - 1, c);
                    n += 1.0;
                }
                if r < rows {
                    sum = sum + out.get(r + 1, c);
                    n += 1.0;
                }
                out.set(r, c, sum / n);
            }
        }
        for r in (1..rows).step_by(2) {
            for c in (0..=cols).step_by(2) {
                let mut sum = out.get(r - 1, c) + out.get(r + 1, c);
                let mut n = 2.0;
                if c > 0 {
                    sum = sum + out.get(r, c - 1);
                    n += 1.0;
                }
                if c < cols {
                    sum = sum + out.get(r, c + 1);
                    n += 1.0;
                }
                out.set(r, c, sum / n);
            }
        }

        let last_row = self.rows();
        let last_col = self.cols();
        for i in 0..=last_row {
            for j in 0..=last_col {
                let (r, c) = (2 * i, 2 * j);
                let original = self.at(i, j);

                let mut faces = Vec::with_capacity(4);
                if i > 0 && j > 0 {
                    faces.push(out.get(r - 1, c - 1));
                }
                if i > 0 && j < last_col {
                    faces.push(out.get(r - 1, c + 1));
                }
                if i < last_row && j > 0 {
                    faces.push(out.get(r + 1, c - 1));
                }
                if i < last_row && j < last_col {
                    faces.push(out.get(r + 1, c + 1));
                }

                let mut neighbors = Vec::with_capacity(4);
                if i > 0 {
                    neighbors.push(self.at(i - 1, j));
                }
                if i < last_row {
                    neighbors.push(self.at(i + 1, j));
                }
                if j > 0 {
                    neighbors.push(self.at(i, j - 1));
                }
                if j < last_col {
                    neighbors.push(self.at(i, j + 1));
                }

                let face_avg = average(&faces);
                let edge_avg = average(
                    &neighbors
                        .iter()
                        .map(|&q| (original + q) * 0.5)
                        .collect::<Vec<_>>(),
                );
                let valence = (faces.len() + neighbors.len()) as f64;
                let moved = (face_avg + edge_avg * 2.0 + original * (valence - 3.0)) / valence;
                out.set(r, c, moved);
            }
        }

        tracing::debug!(rows, cols, "smoothed mesh");
        GridMesh::from_parts(self, rows, cols, out.points)
    }
}

/// Mean of a non-empty point set.
fn average(points: &[Vector4]) -> Vector4 {
    let sum = points.iter().fold(Vector4::ZERO, |acc, &p| acc + p);
    sum / points.len() as f64
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use terrain_common::{Color, GridIndex};
    use terrain_math::Vector4;

    use crate::GridMesh;

    fn flat(rows: usize, cols: usize, width: f64, depth: f64) -> GridMesh {
        let mut rng = StdRng::seed_from_u64(3);
        let mut mesh = GridMesh::new(rows, cols, width, depth, Color::GREEN, &mut rng).unwrap();
        mesh.flatten();
        mesh
    }

    fn y(mesh: &GridMesh, row: usize, col: usize) -> f64 {
        mesh.point(GridIndex::new(row, col)).unwrap().y()
    }

    #[test]
    fn fractalize_doubles_cells() {
        let mut rng = StdRng::seed_from_u64(10);
        let mesh = GridMesh::new(3, 5, 6.0, 4.0, Color::BLUE, &mut rng).unwrap();
        let fine = mesh.fractalize(&mut rng);
        assert_eq!((fine.rows(), fine.cols()), (6, 10));
        assert_eq!((fine.point_rows(), fine.point_cols()), (7, 11));
        assert_eq!(fine.width(), 6.0);
        assert_eq!(fine.color(), Color::BLUE);
        assert_eq!(fine.snow_cap_height(), mesh.snow_cap_height());
    }

    #[test]
    fn fractalize_keeps_original_points_exactly() {
        let mut rng = StdRng::seed_from_u64(11);
        let mesh = GridMesh::new(4, 3, 10.0, 8.0, Color::BLUE, &mut rng).unwrap();
        let before = mesh.clone();
        let fine = mesh.fractalize(&mut rng);

        for (index, p) in mesh.points() {
            let q = fine.point(GridIndex::new(2 * index.row, 2 * index.col)).unwrap();
            assert_eq!(p.to_array(), q.to_array());
        }
        assert_eq!(mesh, before);
    }

    #[test]
    fn fractalize_perturbation_bounds() {
        // 2x2 cells over a 2x2 extent: spacing and therefore range is 1.
        let mesh = flat(2, 2, 2.0, 2.0);
        let mut rng = StdRng::seed_from_u64(12);
        let fine = mesh.fractalize(&mut rng);

        for (index, p) in fine.points() {
            let (r, c) = (index.row, index.col);
            let limit = match (r % 2, c % 2) {
                (0, 0) => 0.0,
                (1, 1) => 1.0,
                _ => 0.5,
            };
            assert!(p.y().abs() <= limit + 1e-12, "{index} height {} over {limit}", p.y());
            assert!((p.x() - (c as f64 * 0.5 - 1.0)).abs() < 1e-12);
            assert!((p.z() - (r as f64 * 0.5 - 1.0)).abs() < 1e-12);
            assert_eq!(p.w(), 1.0);
        }
    }

    #[test]
    fn fractalize_is_reproducible_from_seed() {
        let mesh = flat(2, 3, 4.0, 4.0);
        let a = mesh.fractalize(&mut StdRng::seed_from_u64(8));
        let b = mesh.fractalize(&mut StdRng::seed_from_u64(8));
        assert_eq!(a, b);
    }

    #[test]
    fn smooth_doubles_non_square_grid() {
        let mesh = flat(1, 3, 3.0, 1.0);
        let fine = mesh.smooth();
        assert_eq!((fine.rows(), fine.cols()), (2, 6));
        assert_eq!(fine.point_count(), 3 * 7);
    }

    #[test]
    fn smooth_keeps_flat_grid_flat() {
        let mut mesh = flat(3, 2, 6.0, 6.0);
        for _ in 0..3 {
            mesh = mesh.smooth();
            let (lo, hi) = mesh.height_range();
            assert!(lo.abs() < 1e-12 && hi.abs() < 1e-12);
            assert!(mesh.points().all(|(_, p)| (p.w() - 1.0).abs() < 1e-12));
        }
        assert_eq!(mesh.rows(), 24);
    }

    #[test]
    fn smooth_face_and_edge_points() {
        let mut mesh = flat(1, 1, 2.0, 2.0);
        mesh.set_height(GridIndex::new(0, 0), 4.0).unwrap();
        mesh.set_height(GridIndex::new(1, 1), 8.0).unwrap();
        let fine = mesh.smooth();

        // Face point: mean of the four corners.
        assert!((y(&fine, 1, 1) - 3.0).abs() < 1e-12);
        // Boundary edge: two endpoints plus one face point.
        assert!((y(&fine, 0, 1) - (4.0 + 0.0 + 3.0) / 3.0).abs() < 1e-12);
        assert!((y(&fine, 1, 2) - (0.0 + 8.0 + 3.0) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn smooth_interior_vertex_rule() {
        let mut mesh = flat(2, 2, 2.0, 2.0);
        mesh.set_height(GridIndex::new(1, 1), 8.0).unwrap();
        let fine = mesh.smooth();

        // F = 2, R = 4, P = 8 with valence 8: (2 + 8 + 40) / 8.
        assert!((y(&fine, 2, 2) - 6.25).abs() < 1e-12);
        let centre = fine.point(GridIndex::new(2, 2)).unwrap();
        assert_eq!(Vector4::point(0.0, 6.25, 0.0), centre);
    }

    #[test]
    fn smooth_stays_inside_extent() {
        let mut mesh = flat(2, 4, 8.0, 4.0);
        for _ in 0..2 {
            mesh = mesh.smooth();
        }
        for (_, p) in mesh.points() {
            assert!(p.x().abs() <= 4.0 + 1e-12);
            assert!(p.z().abs() <= 2.0 + 1e-12);
        }
    }
}
