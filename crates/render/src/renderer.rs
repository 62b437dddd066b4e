use glam::{Mat4, Vec3};
use terrain_view::OrbitCamera;

use crate::SceneGeometry;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    pub up: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 15.0),
            up: Vec3::Y,
            target: Vec3::ZERO,
            fov_degrees: 60.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl RenderView {
    /// View looking from the camera's eye at the origin.
    pub fn from_camera(camera: &OrbitCamera) -> Self {
        let eye = camera.eye().to_array();
        let up = camera.up().to_array();
        Self {
            eye: Vec3::new(eye[0] as f32, eye[1] as f32, eye[2] as f32),
            up: Vec3::new(up[0] as f32, up[1] as f32, up[2] as f32),
            ..Self::default()
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads prepared scene geometry and a view, then produces
/// output. It never touches the mesh or the camera directly.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, scene: &SceneGeometry, view: &RenderView) -> Self::Output;
}

/// Text renderer for the CLI, logging and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Also list every triangle's vertices.
    pub verbose: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &SceneGeometry, view: &RenderView) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Scene ({} triangles, {} lines) ===\n",
            scene.triangle_count(),
            scene.line_count()
        ));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) up=({:.2}, {:.2}, {:.2}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.up.x,
            view.up.y,
            view.up.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        ));

        if self.verbose {
            for (i, tri) in scene.triangles.chunks_exact(3).enumerate() {
                out.push_str(&format!("  tri {i}:"));
                for v in tri {
                    let p = v.position;
                    out.push_str(&format!(" ({:.2}, {:.2}, {:.2})", p[0], p[1], p[2]));
                }
                out.push('\n');
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use terrain_common::{CameraPreset, Color, DisplayMode};
    use terrain_mesh::GridMesh;

    fn scene() -> SceneGeometry {
        let mut rng = StdRng::seed_from_u64(1);
        let mesh = GridMesh::new(1, 2, 2.0, 2.0, Color::BLUE, &mut rng).unwrap();
        SceneGeometry::build(&mesh, None, DisplayMode::Both)
    }

    #[test]
    fn debug_renderer_counts() {
        let output = DebugTextRenderer::new().render(&scene(), &RenderView::default());
        assert!(output.contains("4 triangles"));
        assert!(output.contains("fov=60"));
        assert!(!output.contains("tri 0"));
    }

    #[test]
    fn verbose_lists_triangles() {
        let output = DebugTextRenderer::verbose().render(&scene(), &RenderView::default());
        assert!(output.contains("tri 3:"));
    }

    #[test]
    fn view_follows_camera() {
        let cam = OrbitCamera::from_preset(CameraPreset::Right, 15.0).unwrap();
        let view = RenderView::from_camera(&cam);
        assert!((view.eye - Vec3::new(15.0, 0.0, 0.0)).length() < 1e-5);
        assert_eq!(view.target, Vec3::ZERO);
        assert_eq!((view.near, view.far), (0.1, 100.0));
    }

    #[test]
    fn origin_projects_to_screen_centre() {
        let view = RenderView::default();
        let clip = view.view_projection(1.0) * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
