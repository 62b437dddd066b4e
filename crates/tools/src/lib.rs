//! Developer Tooling: read-only mesh inspection for the CLI and the desktop panel.
//!
//! # Invariants
//! - Inspection never mutates the mesh.

pub mod inspector;

pub use inspector::{MeshInspector, MeshSummary, PointInfo};
