use crate::{MathError, Vector3};

/// Parametric line through an origin and a second "far" point.
///
/// `point_at(t)` walks `t` world units from the origin towards the far point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Vector3,
    far_point: Vector3,
    direction: Vector3,
}

impl Ray {
    /// Build a ray from `origin` through `far_point`. The two points must differ.
    pub fn new(origin: Vector3, far_point: Vector3) -> Result<Self, MathError> {
        let direction = (far_point - origin)
            .normalize()
            .map_err(|_| MathError::DegenerateRay)?;
        Ok(Self {
            origin,
            far_point,
            direction,
        })
    }

    pub fn origin(&self) -> Vector3 {
        self.origin
    }

    pub fn far_point(&self) -> Vector3 {
        self.far_point
    }

    /// Unit direction from the origin towards the far point.
    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    pub fn point_at(&self, t: f64) -> Vector3 {
        self.origin + self.direction * t
    }

    /// Perpendicular distance from `point` to the infinite line carrying this ray.
    pub fn distance_to(&self, point: Vector3) -> f64 {
        self.direction.cross(point - self.origin).length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coincident_points_are_rejected() {
        let p = Vector3::new(1.0, 1.0, 1.0);
        assert_eq!(Ray::new(p, p), Err(MathError::DegenerateRay));
    }

    #[test]
    fn point_at_uses_world_units() {
        let ray = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, -10.0)).unwrap();
        assert_eq!(ray.direction(), -Vector3::Z);
        assert_eq!(ray.point_at(0.0), Vector3::ZERO);
        assert_eq!(ray.point_at(2.5), Vector3::new(0.0, 0.0, -2.5));
    }

    #[test]
    fn distance_to_points_on_and_off_the_line() {
        let ray = Ray::new(Vector3::new(0.0, 0.0, 10.0), Vector3::ZERO).unwrap();
        assert!(ray.distance_to(Vector3::new(0.0, 0.0, -3.0)) < 1e-12);
        assert!((ray.distance_to(Vector3::new(0.3, 0.4, 2.0)) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn distance_is_measured_to_the_whole_line() {
        // Points behind the origin still measure against the infinite line.
        let ray = Ray::new(Vector3::ZERO, Vector3::X).unwrap();
        assert!((ray.distance_to(Vector3::new(-5.0, 2.0, 0.0)) - 2.0).abs() < 1e-12);
    }
}
