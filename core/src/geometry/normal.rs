//! 3-D normals

use crate::geometry::*;
use crate::pbrt::*;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A 3-D surface normal containing `Float` values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Normal3f {
    /// X-coordinate.
    pub x: Float,

    /// Y-coordinate.
    pub y: Float,

    /// Z-coordinate.
    pub z: Float,
}

impl Normal3f {
    /// Zero normal.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    /// Creates a new 3-D normal.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub const fn new(x: Float, y: Float, z: Float) -> Self {
        Self { x, y, z }
    }

    /// Returns true if all components are zero.
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    /// Returns the normal's length.
    pub fn length(&self) -> Float {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Returns the unit normal in the same direction.
    pub fn normalize(&self) -> Self {
        let inv = 1.0 / self.length();
        Self::new(self.x * inv, self.y * inv, self.z * inv)
    }

    /// Returns the dot product with another normal.
    ///
    /// * `n` - The other normal.
    pub fn dot(&self, n: &Self) -> Float {
        self.x * n.x + self.y * n.y + self.z * n.z
    }

    /// Returns the dot product with a vector.
    ///
    /// * `v` - The vector.
    pub fn dot_vec(&self, v: &Vector3f) -> Float {
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    /// Returns the absolute value of the dot product with a vector.
    ///
    /// * `v` - The vector.
    pub fn abs_dot_vec(&self, v: &Vector3f) -> Float {
        self.dot_vec(v).abs()
    }

    /// Flip the normal so it lies in the same hemisphere as `v`.
    ///
    /// * `v` - The reference vector.
    pub fn face_forward(&self, v: &Vector3f) -> Self {
        face_forward(self, v)
    }
}

impl Add for Normal3f {
    type Output = Self;

    fn add(self, n: Self) -> Self::Output {
        Self::new(self.x + n.x, self.y + n.y, self.z + n.z)
    }
}

impl Sub for Normal3f {
    type Output = Self;

    fn sub(self, n: Self) -> Self::Output {
        Self::new(self.x - n.x, self.y - n.y, self.z - n.z)
    }
}

impl Mul<Float> for Normal3f {
    type Output = Self;

    fn mul(self, f: Float) -> Self::Output {
        Self::new(self.x * f, self.y * f, self.z * f)
    }
}

impl Mul<Normal3f> for Float {
    type Output = Normal3f;

    fn mul(self, n: Normal3f) -> Self::Output {
        n * self
    }
}

impl Neg for Normal3f {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl From<Vector3f> for Normal3f {
    fn from(v: Vector3f) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl fmt::Display for Normal3f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}, {}>", self.x, self.y, self.z)
    }
}
