//! Grid Mesh: a rectangular lattice of 3D points forming a height-field terrain.
//!
//! # Invariants
//! - The lattice is always rectangular: `(rows + 1) x (cols + 1)` points for a
//!   grid of `rows x cols` cells.
//! - Width and depth are strictly positive.
//! - Refinement never mutates in place; `fractalize` and `smooth` return a new,
//!   denser mesh and leave the source untouched.
//! - Indices are bounds-checked, never clamped or wrapped.

mod grid;
mod refine;
mod triangles;

pub use grid::{DEFAULT_SNOW_CAP_HEIGHT, GridMesh, MeshError, SELECTION_RADIUS};
pub use triangles::{ColoredVertex, Triangle, Triangles};
