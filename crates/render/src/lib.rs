//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers never mutate the mesh or the camera.
//! - Render state derives from the mesh, the selection and the camera.
//!
//! Scene geometry is flattened into colored triangle and line vertex lists so
//! any backend (text, wgpu) consumes the same data.

mod renderer;
mod scene;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use scene::{AXIS_EXTENT, SELECTION_HALF_SIZE, SceneGeometry, SceneVertex};
