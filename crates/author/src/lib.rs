//! Authoring: the editing session that owns the mesh, camera and selection.
//!
//! # Invariants
//! - The session exclusively owns its mesh; refinement swaps in a new one.
//! - A selection always addresses a point of the current mesh. It is cleared
//!   when the mesh is replaced and when a pick misses.
//! - All randomness comes from the session's seedable generator.

pub mod editor;

pub use editor::{EditError, EditorSession};
