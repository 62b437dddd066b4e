use crate::{EPSILON, MathError, Vector3, Vector4};
use glam::{DMat3, DMat4, DVec2, DVec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// 3x3 matrix addressed by rows. Used for 2D homogeneous transforms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matrix3(DMat3);

/// 4x4 matrix addressed by rows. Used for 3D homogeneous transforms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matrix4(DMat4);

impl Default for Matrix3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix3 {
    pub fn identity() -> Self {
        Self(DMat3::IDENTITY)
    }

    pub fn from_rows(r0: Vector3, r1: Vector3, r2: Vector3) -> Self {
        Self(DMat3::from_cols(r0.0, r1.0, r2.0).transpose())
    }

    /// Counter-clockwise 2D rotation, angle in degrees.
    pub fn rotation(angle_degrees: f64) -> Self {
        Self(DMat3::from_angle(angle_degrees.to_radians()))
    }

    pub fn translation(x: f64, y: f64) -> Self {
        Self(DMat3::from_translation(DVec2::new(x, y)))
    }

    pub fn scale(x: f64, y: f64) -> Self {
        Self(DMat3::from_scale(DVec2::new(x, y)))
    }

    pub fn row(&self, index: usize) -> Result<Vector3, MathError> {
        check_index(index, 3)?;
        Ok(Vector3(self.0.row(index)))
    }

    pub fn set_row(&mut self, index: usize, row: Vector3) -> Result<(), MathError> {
        check_index(index, 3)?;
        let mut t = self.0.transpose();
        *t.col_mut(index) = row.0;
        self.0 = t.transpose();
        Ok(())
    }

    pub fn column(&self, index: usize) -> Result<Vector3, MathError> {
        check_index(index, 3)?;
        Ok(Vector3(self.0.col(index)))
    }

    pub fn transpose(&self) -> Self {
        Self(self.0.transpose())
    }

    pub fn try_div(self, rhs: f64) -> Result<Self, MathError> {
        if rhs == 0.0 {
            return Err(MathError::DivisionByZero);
        }
        Ok(Self(self.0 * (1.0 / rhs)))
    }
}

impl Matrix4 {
    pub fn identity() -> Self {
        Self(DMat4::IDENTITY)
    }

    pub fn from_rows(r0: Vector4, r1: Vector4, r2: Vector4, r3: Vector4) -> Self {
        Self(DMat4::from_cols(r0.0, r1.0, r2.0, r3.0).transpose())
    }

    /// Rotation of `angle_degrees` about `axis` (Rodrigues' formula), embedded in a
    /// homogeneous matrix whose last row and column are `(0, 0, 0, 1)`.
    ///
    /// The axis is normalized here; a zero-length axis is rejected.
    pub fn rotation(angle_degrees: f64, axis: Vector3) -> Result<Self, MathError> {
        let axis = axis.normalize()?;
        let r = DMat3::from_axis_angle(axis.0, angle_degrees.to_radians());
        Ok(Self(DMat4::from_mat3(r)))
    }

    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self(DMat4::from_translation(DVec3::new(x, y, z)))
    }

    pub fn scale(x: f64, y: f64, z: f64) -> Self {
        Self(DMat4::from_scale(DVec3::new(x, y, z)))
    }

    pub fn row(&self, index: usize) -> Result<Vector4, MathError> {
        check_index(index, 4)?;
        Ok(Vector4(self.0.row(index)))
    }

    pub fn set_row(&mut self, index: usize, row: Vector4) -> Result<(), MathError> {
        check_index(index, 4)?;
        let mut t = self.0.transpose();
        *t.col_mut(index) = row.0;
        self.0 = t.transpose();
        Ok(())
    }

    pub fn column(&self, index: usize) -> Result<Vector4, MathError> {
        check_index(index, 4)?;
        Ok(Vector4(self.0.col(index)))
    }

    pub fn transpose(&self) -> Self {
        Self(self.0.transpose())
    }

    pub fn try_div(self, rhs: f64) -> Result<Self, MathError> {
        if rhs == 0.0 {
            return Err(MathError::DivisionByZero);
        }
        Ok(Self(self.0 * (1.0 / rhs)))
    }

    pub fn as_dmat4(&self) -> DMat4 {
        self.0
    }
}

fn check_index(index: usize, dimension: usize) -> Result<(), MathError> {
    if index < dimension {
        Ok(())
    } else {
        Err(MathError::IndexOutOfRange { index, dimension })
    }
}

macro_rules! matrix_ops {
    ($name:ident, $vector:ident) => {
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

        impl Mul for $name {
            type Output = Self;
            fn mul(self, rhs: Self) -> Self {
                Self(self.0 * rhs.0)
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

        impl Div<f64> for $name {
            type Output = Self;
            fn div(self, rhs: f64) -> Self {
                assert!(rhs != 0.0, "matrix divided by a zero scalar");
                Self(self.0 * (1.0 / rhs))
            }
        }

        /// `m * v`: `v` is a column vector.
        impl Mul<$vector> for $name {
            type Output = $vector;
            fn mul(self, rhs: $vector) -> $vector {
                $vector(self.0 * rhs.0)
            }
        }

        /// `v * m`: `v` is a row vector.
        impl Mul<$name> for $vector {
            type Output = $vector;
            fn mul(self, rhs: $name) -> $vector {
                $vector(rhs.0.transpose() * self.0)
            }
        }
    };
}

matrix_ops!(Matrix3, Vector3);
matrix_ops!(Matrix4, Vector4);

impl fmt::Display for Matrix3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [self.0.row(0), self.0.row(1), self.0.row(2)];
        write!(f, "[")?;
        for (i, r) in rows.iter().enumerate() {
            if i > 0 {
                write!(f, "\n ")?;
            }
            write!(f, "{}", Vector3(*r))?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for Matrix4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for i in 0..4 {
            if i > 0 {
                write!(f, "\n ")?;
            }
            write!(f, "{}", Vector4(self.0.row(i)))?;
        }
        write!(f, "]")
    }
}
