//! Viewing: the orbit camera and the picking pipeline built on it.
//!
//! # Invariants
//! - Camera increments post-multiply the accumulated rotation.
//! - The camera's pitch axis is fixed at construction and never recomputed.
//! - The look-at target is always the world origin.

mod camera;
mod picking;

pub use camera::OrbitCamera;
pub use picking::{PickError, PickProjection, Viewport, pick};
