//! 2-D Points

use crate::geometry::*;
use crate::pbrt::*;
use num_traits::{Num, Zero};
use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Neg, Sub};

/// A 2-D point containing numeric values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point2<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,
}

/// 2-D point containing `Float` values.
pub type Point2f = Point2<Float>;

/// 2-D point containing `Int` values.
pub type Point2i = Point2<Int>;

impl Point2f {
    /// Zero point.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
}

impl Point2i {
    /// Zero point.
    pub const ZERO: Self = Self { x: 0, y: 0 };
}

impl<T: Num> Point2<T> {
    /// Creates a new 2-D point.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Creates a new 2-D zero point.
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Self::new(T::zero(), T::zero())
    }

    /// Returns true if either coordinate is NaN.
    pub fn has_nans(&self) -> bool
    where
        T: num_traits::Float,
    {
        self.x.is_nan() || self.y.is_nan()
    }

    /// Returns a new point containing absolute values of the components.
    pub fn abs(&self) -> Self
    where
        T: Neg<Output = T> + PartialOrd + Copy,
    {
        Self::new(abs(self.x), abs(self.y))
    }

    /// Returns a new point containing floor of values of the components.
    pub fn floor(&self) -> Self
    where
        T: num_traits::Float,
    {
        Self::new(self.x.floor(), self.y.floor())
    }

    /// Returns a new point containing ceil of values of the components.
    pub fn ceil(&self) -> Self
    where
        T: num_traits::Float,
    {
        Self::new(self.x.ceil(), self.y.ceil())
    }

    /// Return the component-wise minimum coordinate values with another point.
    ///
    /// * `other` - The other point.
    pub fn min(&self, other: &Self) -> Self
    where
        T: PartialOrd + Copy,
    {
        Self::new(min(self.x, other.x), min(self.y, other.y))
    }

    /// Return the component-wise maximum coordinate values with another point.
    ///
    /// * `other` - The other point.
    pub fn max(&self, other: &Self) -> Self
    where
        T: PartialOrd + Copy,
    {
        Self::new(max(self.x, other.x), max(self.y, other.y))
    }
}

impl<T: Num> Add<Vector2<T>> for Point2<T> {
    type Output = Self;

    /// Offsets a point by the given vector.
    ///
    /// * `v` - The vector to add.
    fn add(self, v: Vector2<T>) -> Self::Output {
        Self::Output::new(self.x + v.x, self.y + v.y)
    }
}

impl<T: Num + Copy> AddAssign<Vector2<T>> for Point2<T> {
    /// Offsets a point by the given vector.
    ///
    /// * `v` - The vector to add.
    fn add_assign(&mut self, v: Vector2<T>) {
        self.x = self.x + v.x;
        self.y = self.y + v.y;
    }
}

impl<T: Num> Add for Point2<T> {
    type Output = Self;

    /// Adds the given point and returns the result.
    ///
    /// * `other` - The point to add.
    fn add(self, other: Self) -> Self::Output {
        Self::Output::new(self.x + other.x, self.y + other.y)
    }
}

impl<T: Num> Sub for Point2<T> {
    type Output = Vector2<T>;

    /// Subtracts the given point and returns the vector towards that point.
    ///
    /// * `other` - The point to subtract.
    fn sub(self, other: Self) -> Self::Output {
        Vector2::new(self.x - other.x, self.y - other.y)
    }
}

impl<T: Num> Sub<Vector2<T>> for Point2<T> {
    type Output = Self;

    /// Offsets a point by the negated vector.
    ///
    /// * `v` - The vector to subtract.
    fn sub(self, v: Vector2<T>) -> Self::Output {
        Self::Output::new(self.x - v.x, self.y - v.y)
    }
}

impl<T: Num + Copy> Mul<T> for Point2<T> {
    type Output = Self;

    /// Scale the point.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: T) -> Self::Output {
        Self::Output::new(f * self.x, f * self.y)
    }
}

impl<T> Index<usize> for Point2<T> {
    type Output = T;

    /// Index the point by an axis to get the immutable coordinate axis value.
    ///
    /// * `axis` - A 2-D coordinate axis (0 or 1).
    fn index(&self, axis: usize) -> &Self::Output {
        match axis {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("Invalid axis {axis} for Point2"),
        }
    }
}

impl<T> IndexMut<usize> for Point2<T> {
    /// Index the point by an axis to get a mutable coordinate axis value.
    ///
    /// * `axis` - A 2-D coordinate axis (0 or 1).
    fn index_mut(&mut self, axis: usize) -> &mut Self::Output {
        match axis {
            0 => &mut self.x,
            1 => &mut self.y,
            _ => panic!("Invalid axis {axis} for Point2"),
        }
    }
}

impl From<Point2i> for Point2f {
    /// Convert a 2-D point of integers to floating point values.
    ///
    /// * `p` - 2-D integer point.
    fn from(p: Point2i) -> Self {
        Self::new(p.x as Float, p.y as Float)
    }
}

impl From<Point2f> for Point2i {
    /// Convert a 2-D floating point point to integers by truncation.
    ///
    /// * `p` - 2-D floating point point.
    fn from(p: Point2f) -> Self {
        Self::new(p.x as Int, p.y as Int)
    }
}

impl<T: fmt::Display> fmt::Display for Point2<T> {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_point() {
        assert!(Point2::<i32>::zero() == Point2::new(0, 0));
        assert!(Point2f::ZERO == Point2::new(0.0, 0.0));
    }

    #[test]
    #[should_panic]
    #[allow(unused)]
    fn invalid_index_panics() {
        let p = Point2::new(0, 0);
        let c = p[2];
    }

    proptest! {
        #[test]
        fn point_minus_point_is_vector(x1 in -100..100i32, y1 in -100..100i32, x2 in -100..100i32, y2 in -100..100i32) {
            let p1 = Point2::new(x1, y1);
            let p2 = Point2::new(x2, y2);
            prop_assert_eq!(p1 - p2, Vector2::new(x1 - x2, y1 - y2));
            prop_assert_eq!(p2 + (p1 - p2), p1);
        }

        #[test]
        fn floor_and_ceil_bracket_value(x in -100.0..100.0f32, y in -100.0..100.0f32) {
            let p = Point2f::new(x, y);
            prop_assert!(p.floor().x <= x && x <= p.ceil().x);
            prop_assert!(p.floor().y <= y && y <= p.ceil().y);
        }
    }
}
