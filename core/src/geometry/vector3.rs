//! 3-D Vectors

use crate::geometry::*;
use crate::pbrt::*;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, Mul, MulAssign, Neg, Sub, SubAssign};

/// A 3-D vector containing `Float` values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vector3f {
    /// X-coordinate.
    pub x: Float,

    /// Y-coordinate.
    pub y: Float,

    /// Z-coordinate.
    pub z: Float,
}

impl Vector3f {
    /// Zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    /// Creates a new 3-D vector.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub const fn new(x: Float, y: Float, z: Float) -> Self {
        Self { x, y, z }
    }

    /// Returns true if any component is NaN.
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    /// Returns the square of the vector's length.
    pub fn length_squared(&self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Returns the vector's length.
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }

    /// Returns the unit vector in the same direction.
    pub fn normalize(&self) -> Self {
        *self / self.length()
    }

    /// Returns the dot product with another vector.
    ///
    /// * `other` - The other vector.
    pub fn dot(&self, other: &Self) -> Float {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Returns the dot product with a normal.
    ///
    /// * `n` - The normal.
    pub fn dot_normal(&self, n: &Normal3f) -> Float {
        self.x * n.x + self.y * n.y + self.z * n.z
    }

    /// Returns the absolute value of the dot product with a normal.
    ///
    /// * `n` - The normal.
    pub fn abs_dot_normal(&self, n: &Normal3f) -> Float {
        self.dot_normal(n).abs()
    }

    /// Returns the cross product with another vector. Intermediate values
    /// are computed in `f64` to limit catastrophic cancellation.
    ///
    /// * `other` - The other vector.
    pub fn cross(&self, other: &Self) -> Self {
        let (v1x, v1y, v1z) = (self.x as f64, self.y as f64, self.z as f64);
        let (v2x, v2y, v2z) = (other.x as f64, other.y as f64, other.z as f64);
        Self::new(
            (v1y * v2z - v1z * v2y) as Float,
            (v1z * v2x - v1x * v2z) as Float,
            (v1x * v2y - v1y * v2x) as Float,
        )
    }

    /// Returns a new vector containing absolute values of the components.
    pub fn abs(&self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    /// Returns the largest component value.
    pub fn max_component(&self) -> Float {
        max(self.x, max(self.y, self.z))
    }
}

impl Add for Vector3f {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Vector3f {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl Sub for Vector3f {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl SubAssign for Vector3f {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
    }
}

impl Mul<Float> for Vector3f {
    type Output = Self;

    fn mul(self, f: Float) -> Self::Output {
        Self::new(self.x * f, self.y * f, self.z * f)
    }
}

impl Mul<Vector3f> for Float {
    type Output = Vector3f;

    fn mul(self, v: Vector3f) -> Self::Output {
        v * self
    }
}

impl MulAssign<Float> for Vector3f {
    fn mul_assign(&mut self, f: Float) {
        self.x *= f;
        self.y *= f;
        self.z *= f;
    }
}

impl Div<Float> for Vector3f {
    type Output = Self;

    fn div(self, f: Float) -> Self::Output {
        debug_assert!(f != 0.0);
        let inv = 1.0 / f;
        Self::new(self.x * inv, self.y * inv, self.z * inv)
    }
}

impl DivAssign<Float> for Vector3f {
    fn div_assign(&mut self, f: Float) {
        debug_assert!(f != 0.0);
        let inv = 1.0 / f;
        self.x *= inv;
        self.y *= inv;
        self.z *= inv;
    }
}

impl Neg for Vector3f {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Index<usize> for Vector3f {
    type Output = Float;

    /// Index the vector by an axis to get the component.
    ///
    /// * `axis` - 0 for x, 1 for y, 2 for z.
    fn index(&self, axis: usize) -> &Self::Output {
        match axis {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Invalid axis for Vector3f"),
        }
    }
}

impl From<Normal3f> for Vector3f {
    fn from(n: Normal3f) -> Self {
        Self::new(n.x, n.y, n.z)
    }
}

impl From<Point3f> for Vector3f {
    fn from(p: Point3f) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

impl fmt::Display for Vector3f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn cross_of_axes_is_third_axis() {
        let x = Vector3f::new(1.0, 0.0, 0.0);
        let y = Vector3f::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Vector3f::new(0.0, 0.0, 1.0));
    }

    proptest! {
        #[test]
        fn normalize_returns_unit_length(
            x in -100.0..100.0f32, y in -100.0..100.0f32, z in 0.1..100.0f32,
        ) {
            let v = Vector3f::new(x, y, z).normalize();
            prop_assert!(approx_eq!(f32, v.length(), 1.0, epsilon = 1e-5));
        }
    }
}
