//! wgpu render backend for the terrain modeler.
//!
//! Draws prepared [`terrain_render::SceneGeometry`]: terrain faces as a
//! triangle list, wireframe, axes and the selection marker as a line list.
//!
//! # Invariants
//! - Renderer never mutates the mesh or the camera.
//! - Vertex buffers grow to fit the scene and are reused across frames.

mod gpu;
mod shaders;

pub use gpu::WgpuRenderer;
