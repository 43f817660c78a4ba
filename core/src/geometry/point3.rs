//! 3-D Points

use crate::geometry::*;
use crate::pbrt::*;
use std::fmt;
use std::ops::{Add, AddAssign, Index, Mul, Sub};

/// A 3-D point containing `Float` values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point3f {
    /// X-coordinate.
    pub x: Float,

    /// Y-coordinate.
    pub y: Float,

    /// Z-coordinate.
    pub z: Float,
}

impl Point3f {
    /// Origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    /// Creates a new 3-D point.
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

    /// Returns the distance to another point.
    ///
    /// * `p` - The other point.
    pub fn distance(&self, p: &Self) -> Float {
        (*self - *p).length()
    }

    /// Returns the squared distance to another point.
    ///
    /// * `p` - The other point.
    pub fn distance_squared(&self, p: &Self) -> Float {
        (*self - *p).length_squared()
    }

    /// Return the component-wise minimum coordinate values with another point.
    ///
    /// * `other` - The other point.
    pub fn min(&self, other: &Self) -> Self {
        Self::new(min(self.x, other.x), min(self.y, other.y), min(self.z, other.z))
    }

    /// Return the component-wise maximum coordinate values with another point.
    ///
    /// * `other` - The other point.
    pub fn max(&self, other: &Self) -> Self {
        Self::new(max(self.x, other.x), max(self.y, other.y), max(self.z, other.z))
    }

    /// Linearly interpolate between two points.
    ///
    /// * `t`  - Interpolation parameter.
    /// * `p0` - Point at t = 0.
    /// * `p1` - Point at t = 1.
    pub fn lerp(t: Float, p0: &Self, p1: &Self) -> Self {
        Self::new(lerp(t, p0.x, p1.x), lerp(t, p0.y, p1.y), lerp(t, p0.z, p1.z))
    }

    /// Offset the point along the normal by `offset` so that a ray leaving
    /// it in direction `w` does not re-intersect the surface it sits on.
    ///
    /// * `n`      - Surface normal.
    /// * `w`      - Outgoing direction.
    /// * `offset` - Offset distance.
    pub fn offset_ray_origin(&self, n: &Normal3f, w: &Vector3f, offset: Float) -> Self {
        let mut d = Vector3f::from(*n) * offset;
        if w.dot_normal(n) < 0.0 {
            d = -d;
        }
        *self + d
    }
}

impl Add<Vector3f> for Point3f {
    type Output = Self;

    fn add(self, v: Vector3f) -> Self::Output {
        Self::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}

impl AddAssign<Vector3f> for Point3f {
    fn add_assign(&mut self, v: Vector3f) {
        self.x += v.x;
        self.y += v.y;
        self.z += v.z;
    }
}

impl Add for Point3f {
    type Output = Self;

    /// Adds two points; only meaningful for weighted sums.
    fn add(self, p: Self) -> Self::Output {
        Self::new(self.x + p.x, self.y + p.y, self.z + p.z)
    }
}

impl Sub for Point3f {
    type Output = Vector3f;

    fn sub(self, p: Self) -> Self::Output {
        Vector3f::new(self.x - p.x, self.y - p.y, self.z - p.z)
    }
}

impl Sub<Vector3f> for Point3f {
    type Output = Self;

    fn sub(self, v: Vector3f) -> Self::Output {
        Self::new(self.x - v.x, self.y - v.y, self.z - v.z)
    }
}

impl Mul<Float> for Point3f {
    type Output = Self;

    fn mul(self, f: Float) -> Self::Output {
        Self::new(self.x * f, self.y * f, self.z * f)
    }
}

impl Index<usize> for Point3f {
    type Output = Float;

    fn index(&self, axis: usize) -> &Self::Output {
        match axis {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Invalid axis for Point3f"),
        }
    }
}

impl From<Vector3f> for Point3f {
    fn from(v: Vector3f) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl fmt::Display for Point3f {
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

    #[test]
    fn offset_ray_origin_moves_to_side_of_outgoing_direction() {
        let p = Point3f::ZERO;
        let n = Normal3f::new(0.0, 0.0, 1.0);
        let above = p.offset_ray_origin(&n, &Vector3f::new(0.0, 0.0, 1.0), 0.5);
        let below = p.offset_ray_origin(&n, &Vector3f::new(0.0, 0.0, -1.0), 0.5);
        assert_eq!(above, Point3f::new(0.0, 0.0, 0.5));
        assert_eq!(below, Point3f::new(0.0, 0.0, -0.5));
    }
}
