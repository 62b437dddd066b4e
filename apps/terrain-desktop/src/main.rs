use anyhow::{Context, Result, anyhow};
use clap::Parser;
use egui::Context as EguiContext;
use std::path::PathBuf;
use std::sync::Arc;
use terrain_author::EditorSession;
use terrain_common::{CameraPreset, DisplayMode, EditorConfig, GridIndex, MeshConfig};
use terrain_input::{Action, Key, action_for_key};
use terrain_render::{RenderView, SceneGeometry};
use terrain_render_wgpu::WgpuRenderer;
use terrain_tools::MeshInspector;
use terrain_view::{PickProjection, Viewport};
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "terrain-desktop", about = "Interactive terrain modeler")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Editor configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed for reproducible meshes
    #[arg(short, long)]
    seed: Option<u64>,
}

const MAX_CELLS: usize = 99;
const MAX_ITERATIONS: u32 = 5;

/// Widget values that persist between frames.
struct PanelState {
    new_mesh: MeshConfig,
    randomize_range: f64,
    fractalize_iterations: u32,
    smooth_iterations: u32,
    target_row: usize,
    target_col: usize,
    export_path: String,
}

/// Application state.
struct AppState {
    session: EditorSession,
    panel: PanelState,
    status: String,
    cursor: Option<PhysicalPosition<f64>>,
}

impl AppState {
    fn new(config: EditorConfig) -> Result<Self> {
        let panel = PanelState {
            new_mesh: config.mesh.clone(),
            randomize_range: config.randomize_range,
            fractalize_iterations: config.refine_iterations,
            smooth_iterations: config.refine_iterations,
            target_row: 0,
            target_col: 0,
            export_path: "terrain.obj".into(),
        };
        let matching_fov = config.picking.tan_half_fov.is_none();

        let mut session = EditorSession::new(config)?;
        if matching_fov {
            // Line pick rays up with what the perspective projection draws.
            let fov = RenderView::default().fov_degrees as f64;
            session.set_projection(PickProjection::matching_fov(fov));
        }

        Ok(Self {
            session,
            panel,
            status: String::new(),
            cursor: None,
        })
    }

    fn apply(&mut self, action: Action) {
        let describe = format!("{action:?}");
        match self.session.apply(action) {
            Ok(()) => self.status.clear(),
            Err(e) => {
                tracing::warn!("{describe} failed: {e}");
                self.status = e.to_string();
            }
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        let key = match code {
            KeyCode::KeyW => Key::W,
            KeyCode::KeyS => Key::S,
            KeyCode::KeyA => Key::A,
            KeyCode::KeyD => Key::D,
            KeyCode::KeyQ => Key::Q,
            KeyCode::KeyE => Key::E,
            KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
            KeyCode::ControlLeft | KeyCode::ControlRight => Key::Ctrl,
            KeyCode::Escape => {
                self.apply(Action::Deselect);
                return;
            }
            _ => return,
        };
        let action = action_for_key(key, &self.session.config().camera);
        self.apply(action);
    }

    fn handle_click(&mut self, width: u32, height: u32) {
        let Some(cursor) = self.cursor else {
            return;
        };
        let viewport = match Viewport::new(width as f64, height as f64) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!("ignoring click: {e}");
                return;
            }
        };
        let (sx, sy) = viewport.normalize(cursor.x, cursor.y);
        self.apply(Action::Pick {
            sx,
            sy,
            aspect: viewport.aspect(),
        });
        match self.session.selection() {
            Some(index) => {
                self.panel.target_row = index.row;
                self.panel.target_col = index.col;
                tracing::info!("selected {index}");
            }
            None => tracing::debug!("click missed every vertex"),
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        let mut actions = Vec::new();
        let summary = MeshInspector::summary(self.session.mesh());

        egui::SidePanel::right("editor")
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.heading("Terrain Modeler");
                ui.label(summary.to_string());
                ui.separator();

                ui.heading("New Mesh");
                let params = &mut self.panel.new_mesh;
                ui.horizontal(|ui| {
                    ui.add(
                        egui::DragValue::new(&mut params.rows)
                            .prefix("Rows: ")
                            .range(1..=MAX_CELLS),
                    );
                    ui.add(
                        egui::DragValue::new(&mut params.cols)
                            .prefix("Cols: ")
                            .range(1..=MAX_CELLS),
                    );
                });
                ui.horizontal(|ui| {
                    ui.add(
                        egui::DragValue::new(&mut params.width)
                            .prefix("Width: ")
                            .speed(0.5)
                            .range(0.1..=1000.0),
                    );
                    ui.add(
                        egui::DragValue::new(&mut params.depth)
                            .prefix("Depth: ")
                            .speed(0.5)
                            .range(0.1..=1000.0),
                    );
                });
                if ui.button("Create").clicked() {
                    let mut params = params.clone();
                    params.color = self.session.mesh().color();
                    params.snow_cap_height = self.session.mesh().snow_cap_height();
                    actions.push(Action::NewMesh(params));
                }
                ui.separator();

                ui.heading("Appearance");
                ui.horizontal(|ui| {
                    ui.label("Color:");
                    let mut rgb = self.session.mesh().color().to_rgb();
                    if ui.color_edit_button_rgb(&mut rgb).changed() {
                        actions.push(Action::SetColor(rgb.into()));
                    }
                });
                let mut snow = self.session.mesh().snow_cap_height();
                if ui
                    .add(egui::Slider::new(&mut snow, -26.0..=26.0).text("Snow cap"))
                    .changed()
                {
                    actions.push(Action::SetSnowCapHeight(snow));
                }
                let mut mode = self.session.display_mode();
                ui.horizontal(|ui| {
                    ui.radio_value(&mut mode, DisplayMode::Wireframe, "Wireframe");
                    ui.radio_value(&mut mode, DisplayMode::Solid, "Solid");
                    ui.radio_value(&mut mode, DisplayMode::Both, "Both");
                });
                if mode != self.session.display_mode() {
                    actions.push(Action::SetDisplayMode(mode));
                }
                ui.separator();

                ui.heading("Heights");
                ui.horizontal(|ui| {
                    ui.add(
                        egui::Slider::new(&mut self.panel.randomize_range, 0.0..=50.0)
                            .text("Range"),
                    );
                    if ui.button("Randomize").clicked() {
                        actions.push(Action::Randomize(self.panel.randomize_range));
                    }
                });
                if ui.button("Flatten").clicked() {
                    actions.push(Action::Flatten);
                }
                ui.horizontal(|ui| {
                    let mesh = self.session.mesh();
                    ui.add(
                        egui::DragValue::new(&mut self.panel.target_row)
                            .prefix("Row: ")
                            .range(0..=mesh.rows()),
                    );
                    ui.add(
                        egui::DragValue::new(&mut self.panel.target_col)
                            .prefix("Col: ")
                            .range(0..=mesh.cols()),
                    );
                    if ui.button("Select").clicked() {
                        actions.push(Action::Select(GridIndex::new(
                            self.panel.target_row,
                            self.panel.target_col,
                        )));
                    }
                });
                match (self.session.selection(), self.session.selected_height()) {
                    (Some(index), Some(mut height)) => {
                        ui.horizontal(|ui| {
                            ui.label(format!("Vertex {index}"));
                            if ui
                                .add(egui::DragValue::new(&mut height).prefix("Height: ").speed(0.1))
                                .changed()
                            {
                                actions.push(Action::SetHeight(height));
                            }
                            if ui.button("Deselect").clicked() {
                                actions.push(Action::Deselect);
                            }
                        });
                    }
                    _ => {
                        ui.label("No vertex selected (click one in the view)");
                    }
                }
                ui.separator();

                ui.heading("Refine");
                ui.horizontal(|ui| {
                    ui.add(egui::Slider::new(
                        &mut self.panel.fractalize_iterations,
                        0..=MAX_ITERATIONS,
                    ));
                    if ui.button("Fractalize").clicked() {
                        actions.push(Action::Fractalize(self.panel.fractalize_iterations));
                    }
                });
                ui.horizontal(|ui| {
                    ui.add(egui::Slider::new(
                        &mut self.panel.smooth_iterations,
                        0..=MAX_ITERATIONS,
                    ));
                    if ui.button("Smooth").clicked() {
                        actions.push(Action::Smooth(self.panel.smooth_iterations));
                    }
                });
                ui.separator();

                ui.heading("Camera");
                ui.horizontal_wrapped(|ui| {
                    for preset in CameraPreset::ALL {
                        if ui.button(preset.label()).clicked() {
                            actions.push(Action::AlignCamera(preset));
                        }
                    }
                });
                let eye = self.session.camera().eye();
                ui.label(format!("Eye: ({:.1}, {:.1}, {:.1})", eye.x(), eye.y(), eye.z()));
                ui.separator();

                ui.heading("Export");
                ui.horizontal(|ui| {
                    ui.text_edit_singleline(&mut self.panel.export_path);
                    if ui.button("Save OBJ").clicked() {
                        actions.push(Action::Export(PathBuf::from(&self.panel.export_path)));
                    }
                });

                if !self.status.is_empty() {
                    ui.separator();
                    ui.colored_label(egui::Color32::LIGHT_RED, &self.status);
                }

                ui.separator();
                ui.small("LMB: Select | W/S: Pitch | A/D: Yaw | Q/E: Roll | Shift/Ctrl: Zoom");
            });

        for action in actions {
            self.apply(action);
        }
    }
}

/// Window, surface and GPU objects created once the event loop is running.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop, egui_ctx: &EguiContext) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title("Terrain Modeler")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| anyhow!("no compatible GPU adapter"))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("terrain_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("failed to create device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow!("surface reports no formats"))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, surface_format, config.width, config.height);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height.max(1) as f32
    }
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn redraw(&mut self) {
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let session = &self.state.session;
        let scene = SceneGeometry::build(session.mesh(), session.selection(), session.display_mode());
        let render_view = RenderView::from_camera(session.camera());
        let aspect = gpu.aspect();
        gpu.renderer
            .render(&gpu.device, &gpu.queue, &view, &scene, &render_view, aspect);

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            self.state.draw_ui(ctx);
        });

        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        match Gpu::new(event_loop, &self.egui_ctx) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                tracing::error!("GPU initialization failed: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.state.handle_key(key);
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.state.cursor = Some(position);
            }
            WindowEvent::CursorLeft { .. } => {
                self.state.cursor = None;
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                if let Some(gpu) = &self.gpu {
                    self.state.handle_click(gpu.config.width, gpu.config.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("terrain-desktop starting");

    let mut config = match &cli.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => EditorConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = GpuApp::new(AppState::new(config)?);
    event_loop.run_app(&mut app)?;

    Ok(())
}
