use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use terrain_common::{CameraPreset, Color, DisplayMode, EditorConfig, GridIndex, MeshConfig};
use terrain_export::{ExportError, ExportedFiles};
use terrain_input::Action;
use terrain_math::MathError;
use terrain_mesh::{GridMesh, MeshError};
use terrain_view::{OrbitCamera, PickProjection};

/// Errors from edit operations.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error("camera: {0}")]
    Camera(#[from] MathError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("no vertex selected")]
    NoSelection,
}

/// Everything the editor mutates in response to user input.
pub struct EditorSession {
    config: EditorConfig,
    mesh: GridMesh,
    camera: OrbitCamera,
    selection: Option<GridIndex>,
    display_mode: DisplayMode,
    projection: PickProjection,
    rng: StdRng,
}

impl EditorSession {
    /// Start a session with the configured startup mesh and a front-facing camera.
    ///
    /// A configured seed makes every random edit reproducible.
    pub fn new(config: EditorConfig) -> Result<Self, EditError> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mesh = build_mesh(&config.mesh, &mut rng)?;
        let camera = OrbitCamera::from_preset(CameraPreset::Front, config.camera.radius)?;
        let projection = config
            .picking
            .tan_half_fov
            .map(PickProjection::with_tangent)
            .unwrap_or_default();

        tracing::info!(
            rows = mesh.rows(),
            cols = mesh.cols(),
            seed = ?config.seed,
            "editor session started"
        );
        Ok(Self {
            config,
            mesh,
            camera,
            selection: None,
            display_mode: DisplayMode::default(),
            projection,
            rng,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn mesh(&self) -> &GridMesh {
        &self.mesh
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn selection(&self) -> Option<GridIndex> {
        self.selection
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn projection(&self) -> PickProjection {
        self.projection
    }

    pub fn set_projection(&mut self, projection: PickProjection) {
        self.projection = projection;
    }

    fn replace_mesh(&mut self, mesh: GridMesh) {
        self.mesh = mesh;
        self.selection = None;
    }

    /// Discard the current mesh and build a new one.
    pub fn new_mesh(&mut self, params: &MeshConfig) -> Result<(), EditError> {
        let mesh = build_mesh(params, &mut self.rng)?;
        tracing::info!(rows = params.rows, cols = params.cols, "new mesh");
        self.replace_mesh(mesh);
        Ok(())
    }

    pub fn set_color(&mut self, color: Color) {
        self.mesh.set_color(color);
    }

    pub fn set_snow_cap_height(&mut self, height: f64) {
        self.mesh.set_snow_cap_height(height);
    }

    /// Select a vertex by index.
    pub fn select(&mut self, index: GridIndex) -> Result<(), EditError> {
        self.mesh.point(index)?;
        self.selection = Some(index);
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selection = None;
    }

    /// Select the vertex under normalized screen point `(sx, sy)`.
    ///
    /// A miss clears the current selection.
    pub fn pick(&mut self, sx: f64, sy: f64, aspect: f64) -> Result<Option<GridIndex>, EditError> {
        let ray = self.projection.screen_ray(&self.camera, sx, sy, aspect)?;
        self.selection = self
            .mesh
            .pick_nearest_within(&ray, self.config.picking.selection_radius);
        Ok(self.selection)
    }

    /// Height of the selected vertex.
    pub fn selected_height(&self) -> Option<f64> {
        let index = self.selection?;
        self.mesh.point(index).ok().map(|p| p.y())
    }

    pub fn set_selected_height(&mut self, height: f64) -> Result<(), EditError> {
        let index = self.selection.ok_or(EditError::NoSelection)?;
        self.mesh.set_height(index, height)?;
        tracing::debug!(%index, height, "set vertex height");
        Ok(())
    }

    pub fn randomize(&mut self, range: f64) {
        self.mesh.randomize_heights(range, &mut self.rng);
    }

    pub fn flatten(&mut self) {
        self.mesh.flatten();
    }

    /// Apply midpoint-displacement refinement `iterations` times.
    pub fn fractalize(&mut self, iterations: u32) {
        if iterations == 0 {
            return;
        }
        let mut mesh = self.mesh.fractalize(&mut self.rng);
        for _ in 1..iterations {
            mesh = mesh.fractalize(&mut self.rng);
        }
        tracing::info!(iterations, rows = mesh.rows(), cols = mesh.cols(), "fractalized");
        self.replace_mesh(mesh);
    }

    /// Apply Catmull-Clark smoothing `iterations` times.
    pub fn smooth(&mut self, iterations: u32) {
        if iterations == 0 {
            return;
        }
        let mut mesh = self.mesh.smooth();
        for _ in 1..iterations {
            mesh = mesh.smooth();
        }
        tracing::info!(iterations, rows = mesh.rows(), cols = mesh.cols(), "smoothed");
        self.replace_mesh(mesh);
    }

    pub fn yaw(&mut self, degrees: f64) -> Result<(), EditError> {
        Ok(self.camera.increase_yaw(degrees)?)
    }

    pub fn pitch(&mut self, degrees: f64) -> Result<(), EditError> {
        Ok(self.camera.increase_pitch(degrees)?)
    }

    pub fn roll(&mut self, degrees: f64) -> Result<(), EditError> {
        Ok(self.camera.increase_roll(degrees)?)
    }

    pub fn zoom(&mut self, delta: f64) {
        self.camera.increase_radius(delta);
    }

    /// Replace the camera with a preset at the configured radius.
    pub fn align_camera(&mut self, preset: CameraPreset) -> Result<(), EditError> {
        self.camera = OrbitCamera::from_preset(preset, self.config.camera.radius)?;
        Ok(())
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.display_mode = mode;
    }

    /// Write the mesh as OBJ plus MTL.
    pub fn export(&self, path: &Path) -> Result<ExportedFiles, EditError> {
        Ok(terrain_export::export(&self.mesh, path)?)
    }

    /// Dispatch one input action.
    pub fn apply(&mut self, action: Action) -> Result<(), EditError> {
        tracing::trace!(?action, "apply");
        match action {
            Action::Yaw(d) => self.yaw(d)?,
            Action::Pitch(d) => self.pitch(d)?,
            Action::Roll(d) => self.roll(d)?,
            Action::Zoom(d) => self.zoom(d),
            Action::AlignCamera(preset) => self.align_camera(preset)?,
            Action::NewMesh(params) => self.new_mesh(&params)?,
            Action::SetColor(color) => self.set_color(color),
            Action::SetSnowCapHeight(h) => self.set_snow_cap_height(h),
            Action::Pick { sx, sy, aspect } => {
                self.pick(sx, sy, aspect)?;
            }
            Action::Select(index) => self.select(index)?,
            Action::Deselect => self.deselect(),
            Action::SetHeight(h) => self.set_selected_height(h)?,
            Action::Randomize(range) => self.randomize(range),
            Action::Flatten => self.flatten(),
            Action::Fractalize(n) => self.fractalize(n),
            Action::Smooth(n) => self.smooth(n),
            Action::SetDisplayMode(mode) => self.set_display_mode(mode),
            Action::Export(path) => {
                self.export(&path)?;
            }
            Action::Noop => {}
        }
        Ok(())
    }
}

fn build_mesh(params: &MeshConfig, rng: &mut StdRng) -> Result<GridMesh, MeshError> {
    Ok(GridMesh::new(
        params.rows,
        params.cols,
        params.width,
        params.depth,
        params.color,
        rng,
    )?
    .with_snow_cap_height(params.snow_cap_height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrain_input::{Key, action_for_key};
    use terrain_math::Vector3;

    fn session() -> EditorSession {
        let config = EditorConfig {
            seed: Some(42),
            ..EditorConfig::default()
        };
        EditorSession::new(config).unwrap()
    }

    #[test]
    fn startup_state() {
        let s = session();
        assert_eq!((s.mesh().rows(), s.mesh().cols()), (4, 4));
        assert_eq!(s.mesh().snow_cap_height(), 1.5);
        assert_eq!(s.camera().eye(), Vector3::new(0.0, 0.0, 15.0));
        assert_eq!(s.selection(), None);
        assert_eq!(s.display_mode(), DisplayMode::Both);
    }

    #[test]
    fn seeded_sessions_agree() {
        let mut a = session();
        let mut b = session();
        assert_eq!(a.mesh(), b.mesh());
        a.fractalize(2);
        b.fractalize(2);
        assert_eq!(a.mesh(), b.mesh());
    }

    #[test]
    fn invalid_startup_mesh_fails() {
        let mut config = EditorConfig::default();
        config.mesh.width = 0.0;
        assert!(matches!(EditorSession::new(config), Err(EditError::Mesh(_))));
    }

    #[test]
    fn select_is_bounds_checked() {
        let mut s = session();
        s.select(GridIndex::new(4, 4)).unwrap();
        assert_eq!(s.selection(), Some(GridIndex::new(4, 4)));
        assert!(s.select(GridIndex::new(5, 0)).is_err());
        assert_eq!(s.selection(), Some(GridIndex::new(4, 4)));
    }

    #[test]
    fn height_edit_needs_selection() {
        let mut s = session();
        assert!(matches!(s.set_selected_height(1.0), Err(EditError::NoSelection)));

        s.select(GridIndex::new(1, 2)).unwrap();
        s.set_selected_height(2.5).unwrap();
        assert_eq!(s.selected_height(), Some(2.5));
    }

    #[test]
    fn refinement_clears_selection() {
        let mut s = session();
        s.select(GridIndex::new(0, 0)).unwrap();
        s.smooth(0);
        assert_eq!(s.selection(), Some(GridIndex::new(0, 0)));

        s.fractalize(1);
        assert_eq!(s.selection(), None);
        assert_eq!(s.mesh().rows(), 8);

        s.select(GridIndex::new(0, 0)).unwrap();
        s.smooth(2);
        assert_eq!(s.selection(), None);
        assert_eq!(s.mesh().rows(), 32);
    }

    #[test]
    fn new_mesh_clears_selection() {
        let mut s = session();
        s.select(GridIndex::new(2, 2)).unwrap();
        let params = MeshConfig {
            rows: 2,
            cols: 6,
            ..MeshConfig::default()
        };
        s.apply(Action::NewMesh(params)).unwrap();
        assert_eq!(s.selection(), None);
        assert_eq!((s.mesh().rows(), s.mesh().cols()), (2, 6));
    }

    #[test]
    fn pick_from_above_selects_and_miss_clears() {
        let mut s = session();
        s.flatten();
        s.align_camera(CameraPreset::Above).unwrap();

        assert_eq!(s.pick(0.5, 0.5, 1.0).unwrap(), Some(GridIndex::new(2, 2)));
        assert_eq!(s.selection(), Some(GridIndex::new(2, 2)));

        // Looking along +X from the right, the centre ray skims the whole row at z = 0,
        // so aim well above the mesh instead.
        s.align_camera(CameraPreset::Right).unwrap();
        assert_eq!(s.pick(0.5, 1.0, 1.0).unwrap(), None);
        assert_eq!(s.selection(), None);
    }

    #[test]
    fn key_actions_drive_camera() {
        let mut s = session();
        let cfg = s.config().camera.clone();
        for _ in 0..18 {
            s.apply(action_for_key(Key::D, &cfg)).unwrap();
        }
        assert_eq!(s.camera().eye(), Vector3::new(15.0, 0.0, 0.0));

        s.apply(action_for_key(Key::Shift, &cfg)).unwrap();
        assert_eq!(s.camera().radius(), 14.0);

        s.apply(Action::AlignCamera(CameraPreset::Front)).unwrap();
        assert_eq!(s.camera().eye(), Vector3::new(0.0, 0.0, 15.0));
    }

    #[test]
    fn mesh_edits_through_actions() {
        let mut s = session();
        s.apply(Action::Flatten).unwrap();
        assert_eq!(s.mesh().height_range(), (0.0, 0.0));

        s.apply(Action::Randomize(2.0)).unwrap();
        let (lo, hi) = s.mesh().height_range();
        assert!(lo >= -1.0 && hi <= 1.0);

        s.apply(Action::SetColor(Color::RED)).unwrap();
        s.apply(Action::SetSnowCapHeight(-3.0)).unwrap();
        assert_eq!(s.mesh().color(), Color::RED);
        assert_eq!(s.mesh().snow_cap_height(), -3.0);

        s.apply(Action::SetDisplayMode(DisplayMode::Wireframe)).unwrap();
        assert_eq!(s.display_mode(), DisplayMode::Wireframe);
    }

    #[test]
    fn export_action_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.obj");
        let mut s = session();
        let before = s.mesh().clone();
        s.apply(Action::Export(path.clone())).unwrap();
        assert!(path.exists());
        assert!(dir.path().join("session.mtl").exists());
        assert_eq!(s.mesh(), &before);
    }

    #[test]
    fn configured_tangent_is_used() {
        let mut config = EditorConfig::default();
        config.picking.tan_half_fov = Some(0.25);
        let s = EditorSession::new(config).unwrap();
        assert_eq!(s.projection().tangent(), 0.25);
    }
}
