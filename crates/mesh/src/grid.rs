use rand::Rng;
use terrain_common::{Color, GridIndex};
use terrain_math::{Ray, Vector4};

/// Maximum ray-to-vertex distance for a vertex to count as picked.
pub const SELECTION_RADIUS: f64 = 0.5;

/// Snow-cap height used when none is given.
pub const DEFAULT_SNOW_CAP_HEIGHT: f64 = 100.0;

/// Errors from mesh construction and point access.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("mesh extent must be positive (width={width}, depth={depth})")]
    NonPositiveExtent { width: f64, depth: f64 },
    #[error("mesh needs at least one cell in each direction (rows={rows}, cols={cols})")]
    EmptyGrid { rows: usize, cols: usize },
    #[error("point {index} outside a {point_rows}x{point_cols} grid")]
    IndexOutOfBounds {
        index: GridIndex,
        point_rows: usize,
        point_cols: usize,
    },
}

/// Rectangular height-field lattice of homogeneous points.
///
/// `rows` and `cols` count cells; the lattice holds `(rows + 1) * (cols + 1)`
/// points stored row-major. Row index runs along Z, column index along X,
/// height is Y.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMesh {
    rows: usize,
    cols: usize,
    width: f64,
    depth: f64,
    color: Color,
    snow_cap_height: f64,
    points: Vec<Vector4>,
}

impl GridMesh {
    /// Lay out a regular lattice spanning `[-width/2, width/2] x [-depth/2, depth/2]`
    /// with a small random vertical jitter proportional to the cell size.
    pub fn new<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        width: f64,
        depth: f64,
        color: Color,
        rng: &mut R,
    ) -> Result<Self, MeshError> {
        if !(width > 0.0 && depth > 0.0) {
            return Err(MeshError::NonPositiveExtent { width, depth });
        }
        if rows == 0 || cols == 0 {
            return Err(MeshError::EmptyGrid { rows, cols });
        }

        let range = (width / rows as f64 + depth / cols as f64) / 2.0;
        let mut points = Vec::with_capacity((rows + 1) * (cols + 1));
        for r in 0..=rows {
            let z = depth * (r as f64 / rows as f64) - depth / 2.0;
            for c in 0..=cols {
                let x = width * (c as f64 / cols as f64) - width / 2.0;
                points.push(Vector4::point(x, perturbation(rng, range), z));
            }
        }

        tracing::debug!(rows, cols, width, depth, "built grid mesh");
        Ok(Self {
            rows,
            cols,
            width,
            depth,
            color,
            snow_cap_height: DEFAULT_SNOW_CAP_HEIGHT,
            points,
        })
    }

    /// Replace the snow-cap height (builder form).
    pub fn with_snow_cap_height(mut self, height: f64) -> Self {
        self.snow_cap_height = height;
        self
    }

    /// Assemble a mesh from an already laid out point buffer.
    pub(crate) fn from_parts(template: &Self, rows: usize, cols: usize, points: Vec<Vector4>) -> Self {
        debug_assert_eq!(points.len(), (rows + 1) * (cols + 1));
        Self {
            rows,
            cols,
            width: template.width,
            depth: template.depth,
            color: template.color,
            snow_cap_height: template.snow_cap_height,
            points,
        }
    }

    /// Number of cells along Z.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of cells along X.
    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn point_rows(&self) -> usize {
        self.rows + 1
    }

    pub fn point_cols(&self) -> usize {
        self.cols + 1
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn snow_cap_height(&self) -> f64 {
        self.snow_cap_height
    }

    pub fn set_snow_cap_height(&mut self, height: f64) {
        self.snow_cap_height = height;
    }

    pub fn contains(&self, index: GridIndex) -> bool {
        index.row < self.point_rows() && index.col < self.point_cols()
    }

    fn offset(&self, index: GridIndex) -> Result<usize, MeshError> {
        if !self.contains(index) {
            return Err(MeshError::IndexOutOfBounds {
                index,
                point_rows: self.point_rows(),
                point_cols: self.point_cols(),
            });
        }
        Ok(index.row * self.point_cols() + index.col)
    }

    pub fn point(&self, index: GridIndex) -> Result<Vector4, MeshError> {
        Ok(self.points[self.offset(index)?])
    }

    pub fn set_point(&mut self, index: GridIndex, point: Vector4) -> Result<(), MeshError> {
        let i = self.offset(index)?;
        self.points[i] = point;
        Ok(())
    }

    /// Set only the vertical component of one point.
    pub fn set_height(&mut self, index: GridIndex, height: f64) -> Result<(), MeshError> {
        let i = self.offset(index)?;
        self.points[i] = self.points[i].with_y(height);
        Ok(())
    }

    /// Unchecked row-major read for loops that stay inside the lattice.
    pub(crate) fn at(&self, row: usize, col: usize) -> Vector4 {
        self.points[row * self.point_cols() + col]
    }

    /// All points in row-major order with their indices.
    pub fn points(&self) -> impl Iterator<Item = (GridIndex, Vector4)> + '_ {
        let cols = self.point_cols();
        self.points
            .iter()
            .enumerate()
            .map(move |(i, p)| (GridIndex::new(i / cols, i % cols), *p))
    }

    /// Lowest and highest point heights.
    pub fn height_range(&self) -> (f64, f64) {
        self.points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y()), hi.max(p.y()))
            })
    }

    /// Color a vertex of the given height is drawn with.
    pub fn vertex_color(&self, height: f64) -> Color {
        if height >= self.snow_cap_height {
            Color::SNOW
        } else {
            self.color
        }
    }

    /// Nearest point to `ray` within [`SELECTION_RADIUS`].
    pub fn pick_nearest(&self, ray: &Ray) -> Option<GridIndex> {
        self.pick_nearest_within(ray, SELECTION_RADIUS)
    }

    /// Nearest point to the line of `ray` among those no farther than `radius`.
    ///
    /// Points are scanned row-major and only a strictly smaller distance replaces
    /// the current best, so ties keep the earlier point.
    pub fn pick_nearest_within(&self, ray: &Ray, radius: f64) -> Option<GridIndex> {
        let mut best: Option<(GridIndex, f64)> = None;
        for (index, p) in self.points() {
            let distance = ray.distance_to(p.truncate());
            if distance > radius {
                continue;
            }
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((index, distance));
            }
        }
        match best {
            Some((index, distance)) => {
                tracing::debug!(%index, distance, "picked grid point");
                Some(index)
            }
            None => {
                tracing::debug!("pick missed every grid point");
                None
            }
        }
    }

    /// Give every point a uniform random height in `[-range/2, range/2]`.
    pub fn randomize_heights<R: Rng + ?Sized>(&mut self, range: f64, rng: &mut R) {
        for p in &mut self.points {
            *p = p.with_y(perturbation(rng, range));
        }
    }

    /// Set every height to zero.
    pub fn flatten(&mut self) {
        for p in &mut self.points {
            *p = p.with_y(0.0);
        }
    }
}

/// Uniform sample in `[-range/2, range/2]`.
pub(crate) fn perturbation<R: Rng + ?Sized>(rng: &mut R, range: f64) -> f64 {
    rng.random::<f64>() * range - range / 2.0
}
