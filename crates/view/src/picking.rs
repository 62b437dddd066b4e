use terrain_common::GridIndex;
use terrain_math::{MathError, Ray};
use terrain_mesh::GridMesh;

use crate::OrbitCamera;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PickError {
    #[error("viewport must have a positive size (got {width}x{height})")]
    EmptyViewport { width: f64, height: f64 },
    #[error("cannot build a pick ray: {0}")]
    Math(#[from] MathError),
}

/// Window size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: f64,
    height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Result<Self, PickError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(PickError::EmptyViewport { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Pixel position (origin top-left, y down) to `[0, 1]` screen coordinates
    /// with y pointing up.
    pub fn normalize(&self, px: f64, py: f64) -> (f64, f64) {
        (px / self.width, 1.0 - py / self.height)
    }
}

/// How far the screen plane extends per unit of eye distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickProjection {
    tangent: f64,
}

impl Default for PickProjection {
    /// The historical constant: `tan(60)` with the argument taken in radians.
    fn default() -> Self {
        Self {
            tangent: 60f64.tan(),
        }
    }
}

impl PickProjection {
    pub fn with_tangent(tangent: f64) -> Self {
        Self { tangent }
    }

    /// Tangent that lines pick rays up with a symmetric perspective of
    /// `fov_degrees` vertical field of view.
    ///
    /// The far point of a pick ray is twice the screen-plane offset, so the
    /// half-angle tangent is halved here.
    pub fn matching_fov(fov_degrees: f64) -> Self {
        Self {
            tangent: (fov_degrees / 2.0).to_radians().tan() / 2.0,
        }
    }

    pub fn tangent(&self) -> f64 {
        self.tangent
    }

    /// Ray from the eye through normalized screen point `(sx, sy)`.
    ///
    /// `(0.5, 0.5)` is the screen centre and aims at the world origin.
    pub fn screen_ray(
        &self,
        camera: &OrbitCamera,
        sx: f64,
        sy: f64,
        aspect: f64,
    ) -> Result<Ray, MathError> {
        let eye = camera.eye();
        let up = camera.up();
        let view = -eye;
        let dist = view.length();

        let h = view.cross(up);
        let horizontal = h.normalize()? * (dist * self.tangent * aspect);
        let v = h.cross(view);
        let vertical = v.normalize()? * (dist * self.tangent);

        let mid = eye + view;
        let target = (mid + horizontal * (2.0 * sx - 1.0) + vertical * (2.0 * sy - 1.0)) * 2.0;
        Ray::new(eye, target)
    }

    /// Ray for a pixel position inside `viewport`.
    pub fn pixel_ray(
        &self,
        camera: &OrbitCamera,
        viewport: Viewport,
        px: f64,
        py: f64,
    ) -> Result<Ray, MathError> {
        let (sx, sy) = viewport.normalize(px, py);
        self.screen_ray(camera, sx, sy, viewport.aspect())
    }
}

/// Resolve a pixel click to the nearest mesh point within `radius`.
pub fn pick(
    mesh: &GridMesh,
    camera: &OrbitCamera,
    projection: PickProjection,
    viewport: Viewport,
    (px, py): (f64, f64),
    radius: f64,
) -> Result<Option<GridIndex>, PickError> {
    let ray = projection.pixel_ray(camera, viewport, px, py)?;
    tracing::trace!(px, py, origin = %ray.origin(), direction = %ray.direction(), "pick ray");
    Ok(mesh.pick_nearest_within(&ray, radius))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use terrain_common::{CameraPreset, Color};
    use terrain_math::Vector3;

    fn flat_mesh() -> GridMesh {
        let mut rng = StdRng::seed_from_u64(0);
        let mut mesh = GridMesh::new(4, 4, 10.0, 10.0, Color::BLUE, &mut rng).unwrap();
        mesh.flatten();
        mesh
    }

    fn above() -> OrbitCamera {
        OrbitCamera::from_preset(CameraPreset::Above, 15.0).unwrap()
    }

    #[test]
    fn viewport_rejects_empty_size() {
        assert!(matches!(Viewport::new(0.0, 10.0), Err(PickError::EmptyViewport { .. })));
        assert!(Viewport::new(640.0, 480.0).is_ok());
    }

    #[test]
    fn normalize_flips_y() {
        let vp = Viewport::new(200.0, 100.0).unwrap();
        assert_eq!(vp.normalize(0.0, 0.0), (0.0, 1.0));
        assert_eq!(vp.normalize(200.0, 100.0), (1.0, 0.0));
        assert_eq!(vp.normalize(50.0, 25.0), (0.25, 0.75));
        assert_eq!(vp.aspect(), 2.0);
    }

    #[test]
    fn default_tangent_is_historical_constant() {
        assert_eq!(PickProjection::default().tangent(), 60f64.tan());
        let fov = PickProjection::matching_fov(60.0).tangent();
        assert!((fov - 30f64.to_radians().tan() / 2.0).abs() < 1e-15);
    }

    #[test]
    fn centre_ray_aims_at_origin() {
        let cam = OrbitCamera::new(15.0, 40.0, 25.0, 10.0).unwrap();
        let ray = PickProjection::default().screen_ray(&cam, 0.5, 0.5, 1.0).unwrap();
        assert_eq!(ray.origin(), cam.eye());
        assert!(ray.distance_to(Vector3::ZERO) < 1e-9);
    }

    #[test]
    fn centre_click_from_above_picks_middle_vertex() {
        let mesh = flat_mesh();
        let vp = Viewport::new(300.0, 300.0).unwrap();
        let hit = pick(&mesh, &above(), PickProjection::default(), vp, (150.0, 150.0), 0.5).unwrap();
        assert_eq!(hit, Some(GridIndex::new(2, 2)));
    }

    #[test]
    fn off_centre_click_picks_neighbour() {
        // From above, screen right is +X. With tangent 0.25 at distance 15 the
        // ray meets y = 0 at x = 2 * (2 sx - 1) * 15 * 0.25, so sx = 2/3 lands on x = 2.5.
        let mesh = flat_mesh();
        let vp = Viewport::new(300.0, 300.0).unwrap();
        let projection = PickProjection::with_tangent(0.25);
        let hit = pick(&mesh, &above(), projection, vp, (200.0, 150.0), 0.5).unwrap();
        assert_eq!(hit, Some(GridIndex::new(2, 3)));

        // Screen up is -Z from above, i.e. towards row 1.
        let hit = pick(&mesh, &above(), projection, vp, (150.0, 100.0), 0.5).unwrap();
        assert_eq!(hit, Some(GridIndex::new(1, 2)));
    }

    #[test]
    fn click_between_vertices_misses() {
        let mesh = flat_mesh();
        let vp = Viewport::new(300.0, 300.0).unwrap();
        let projection = PickProjection::with_tangent(0.25);
        // Lands on x = 1.25, halfway between columns.
        let hit = pick(&mesh, &above(), projection, vp, (175.0, 150.0), 0.5).unwrap();
        assert_eq!(hit, None);
    }

    #[test]
    fn collapsed_camera_cannot_pick() {
        let mut cam = above();
        cam.increase_radius(-15.0);
        let vp = Viewport::new(10.0, 10.0).unwrap();
        let err = pick(&flat_mesh(), &cam, PickProjection::default(), vp, (1.0, 1.0), 0.5);
        assert!(matches!(err, Err(PickError::Math(_))));
    }
}
