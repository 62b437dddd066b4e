use crate::{EPSILON, MathError};
use glam::{DVec3, DVec4};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};

/// Three-component vector.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector3(pub(crate) DVec3);

/// Four-component vector. The fourth component is a homogeneous coordinate:
/// `1` for points, `0` for directions.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector4(pub(crate) DVec4);

impl Vector3 {
    pub const ZERO: Self = Self(DVec3::ZERO);
    pub const X: Self = Self(DVec3::X);
    pub const Y: Self = Self(DVec3::Y);
    pub const Z: Self = Self(DVec3::Z);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self(DVec3::new(x, y, z))
    }

    pub fn x(self) -> f64 {
        self.0.x
    }

    pub fn y(self) -> f64 {
        self.0.y
    }

    pub fn z(self) -> f64 {
        self.0.z
    }

    pub fn dot(self, rhs: Self) -> f64 {
        self.0.dot(rhs.0)
    }

    pub fn cross(self, rhs: Self) -> Self {
        Self(self.0.cross(rhs.0))
    }

    pub fn length(self) -> f64 {
        self.0.length()
    }

    /// Unit vector in the same direction. Fails on a zero-length vector.
    pub fn normalize(self) -> Result<Self, MathError> {
        let len = self.length();
        if len == 0.0 {
            return Err(MathError::DegenerateAxis);
        }
        Ok(Self(self.0 / len))
    }

    /// Checked scalar division.
    pub fn try_div(self, rhs: f64) -> Result<Self, MathError> {
        if rhs == 0.0 {
            return Err(MathError::DivisionByZero);
        }
        Ok(Self(self.0 / rhs))
    }

    /// Append a fourth component.
    pub fn extend(self, w: f64) -> Vector4 {
        Vector4(self.0.extend(w))
    }

    pub fn to_array(self) -> [f64; 3] {
        self.0.to_array()
    }

    pub fn as_dvec3(self) -> DVec3 {
        self.0
    }
}

impl Vector4 {
    pub const ZERO: Self = Self(DVec4::ZERO);

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self(DVec4::new(x, y, z, w))
    }

    /// A homogeneous point (`w = 1`).
    pub const fn point(x: f64, y: f64, z: f64) -> Self {
        Self::new(x, y, z, 1.0)
    }

    pub fn x(self) -> f64 {
        self.0.x
    }

    pub fn y(self) -> f64 {
        self.0.y
    }

    pub fn z(self) -> f64 {
        self.0.z
    }

    pub fn w(self) -> f64 {
        self.0.w
    }

    /// Copy of this vector with the vertical (Y) component replaced.
    pub fn with_y(self, y: f64) -> Self {
        Self(self.0.with_y(y))
    }

    pub fn dot(self, rhs: Self) -> f64 {
        self.0.dot(rhs.0)
    }

    /// Length over all four components.
    pub fn length(self) -> f64 {
        self.0.length()
    }

    pub fn normalize(self) -> Result<Self, MathError> {
        let len = self.length();
        if len == 0.0 {
            return Err(MathError::DegenerateAxis);
        }
        Ok(Self(self.0 / len))
    }

    pub fn try_div(self, rhs: f64) -> Result<Self, MathError> {
        if rhs == 0.0 {
            return Err(MathError::DivisionByZero);
        }
        Ok(Self(self.0 / rhs))
    }

    /// Drop the homogeneous component.
    pub fn truncate(self) -> Vector3 {
        Vector3(self.0.truncate())
    }

    pub fn to_array(self) -> [f64; 4] {
        self.0.to_array()
    }

    pub fn as_dvec4(self) -> DVec4 {
        self.0
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(v: [f64; 3]) -> Self {
        Self(DVec3::from_array(v))
    }
}

impl From<[f64; 4]> for Vector4 {
    fn from(v: [f64; 4]) -> Self {
        Self(DVec4::from_array(v))
    }
}

/// Componentwise arithmetic shared by both vector widths.
macro_rules! vector_ops {
    ($name:ident, $dim:literal) => {
        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.0.abs_diff_eq(other.0, EPSILON)
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl Neg for $name {
            type Output = Self;
            fn neg(self) -> Self {
                Self(-self.0)
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self {
                Self(self.0 * rhs)
            }
        }

        impl Mul<$name> for f64 {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name(rhs.0 * self)
            }
        }

        /// Scalar division. Panics on a zero divisor; use `try_div` to get an error instead.
        impl Div<f64> for $name {
            type Output = Self;
            fn div(self, rhs: f64) -> Self {
                assert!(rhs != 0.0, "vector divided by a zero scalar");
                Self(self.0 / rhs)
            }
        }

        impl Index<usize> for $name {
            type Output = f64;
            fn index(&self, index: usize) -> &f64 {
                assert!(index < $dim, "component index {index} out of range");
                &self.0[index]
            }
        }

        impl IndexMut<usize> for $name {
            fn index_mut(&mut self, index: usize) -> &mut f64 {
                assert!(index < $dim, "component index {index} out of range");
                &mut self.0[index]
            }
        }
    };
}

vector_ops!(Vector3, 3);
vector_ops!(Vector4, 4);

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.4}, {:.4}, {:.4}]", self.0.x, self.0.y, self.0.z)
    }
}

impl fmt::Display for Vector4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.4}, {:.4}, {:.4}, {:.4}]",
            self.0.x, self.0.y, self.0.z, self.0.w
        )
    }
}
