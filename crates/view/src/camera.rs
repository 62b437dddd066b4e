use terrain_common::CameraPreset;
use terrain_math::{MathError, Matrix4, Vector3};

/// Camera orbiting the world origin.
///
/// The unrotated frame has the eye on +Z at distance `rho` and up along +Y.
/// Yaw turns about that fixed up axis, pitch about the fixed `eye x up` axis
/// captured at construction, roll about the (unrotated) eye axis. Each
/// increment is appended on the right of the accumulated rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    eye: Vector3,
    up: Vector3,
    right: Vector3,
    rotation: Matrix4,
}

impl OrbitCamera {
    /// Place the camera at radius `rho` with initial yaw `theta`, pitch `phi`
    /// and `roll`, all in degrees.
    ///
    /// Fails when `rho` is zero, since the pitch and roll axes would vanish.
    pub fn new(rho: f64, theta: f64, phi: f64, roll: f64) -> Result<Self, MathError> {
        let up = Vector3::Y;
        let eye = Vector3::new(0.0, 0.0, rho);
        let right = eye.cross(up).normalize()?;

        let rotation = Matrix4::rotation(theta, up)?
            * Matrix4::rotation(phi, right)?
            * Matrix4::rotation(roll, eye)?;

        Ok(Self {
            eye,
            up,
            right,
            rotation,
        })
    }

    pub fn from_preset(preset: CameraPreset, rho: f64) -> Result<Self, MathError> {
        let (yaw, pitch, roll) = preset.angles();
        tracing::debug!(preset = preset.label(), rho, "aligning camera");
        Self::new(rho, yaw, pitch, roll)
    }

    /// Turn about the vertical axis. Negative values turn the other way.
    pub fn increase_yaw(&mut self, degrees: f64) -> Result<(), MathError> {
        self.rotation = self.rotation * Matrix4::rotation(degrees, self.up)?;
        Ok(())
    }

    /// Tilt about the stored horizontal axis.
    pub fn increase_pitch(&mut self, degrees: f64) -> Result<(), MathError> {
        self.rotation = self.rotation * Matrix4::rotation(degrees, self.right)?;
        Ok(())
    }

    /// Spin about the line of sight. Fails once the radius has reached zero.
    pub fn increase_roll(&mut self, degrees: f64) -> Result<(), MathError> {
        self.rotation = self.rotation * Matrix4::rotation(degrees, self.eye)?;
        Ok(())
    }

    /// Move the eye along its own axis; positive moves away from the origin.
    pub fn increase_radius(&mut self, delta: f64) {
        self.eye = Vector3::new(self.eye.x(), self.eye.y(), self.eye.z() + delta);
    }

    /// Signed distance of the unrotated eye along +Z.
    pub fn radius(&self) -> f64 {
        self.eye.z()
    }

    /// Current eye position in world space.
    pub fn eye(&self) -> Vector3 {
        (self.rotation * self.eye.extend(1.0)).truncate()
    }

    /// Current up direction in world space.
    pub fn up(&self) -> Vector3 {
        (self.rotation * self.up.extend(1.0)).truncate()
    }

    /// Pitch axis as captured at construction, before rotation.
    pub fn right(&self) -> Vector3 {
        self.right
    }

    pub fn rotation(&self) -> Matrix4 {
        self.rotation
    }
}
