//! Math Kernel: 3D/4D vectors, 3x3/4x4 matrices, rays.
//!
//! # Invariants
//! - All types are plain values with no hidden state.
//! - Equality compares every component with an absolute tolerance of [`EPSILON`].
//! - Matrices follow the row-vector storage convention: `m * v` treats `v` as a
//!   column vector, `v * m` treats `v` as a row vector.
//! - Angles passed to rotation constructors are in degrees.

mod matrix;
mod ray;
mod vector;

pub use matrix::{Matrix3, Matrix4};
pub use ray::Ray;
pub use vector::{Vector3, Vector4};

/// Absolute per-component tolerance used by every `PartialEq` impl in this crate.
pub const EPSILON: f64 = 1e-8;

/// Precondition violations raised by the kernel.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MathError {
    #[error("division by a zero scalar")]
    DivisionByZero,
    #[error("cannot normalize or rotate about a zero-length axis")]
    DegenerateAxis,
    #[error("index {index} out of range for dimension {dimension}")]
    IndexOutOfRange { index: usize, dimension: usize },
    #[error("ray origin and target point coincide")]
    DegenerateRay,
}

pub fn crate_info() -> &'static str {
    "terrain-math v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("math"));
    }

    #[test]
    fn error_messages_name_the_index() {
        let err = MathError::IndexOutOfRange {
            index: 7,
            dimension: 4,
        };
        assert!(err.to_string().contains('7'));
    }
}
