//! 2-D Vectors

use crate::pbrt::*;
use num_traits::{Num, Zero};
use std::fmt;
use std::ops::{Add, Index, Mul, Neg, Sub};

/// A 2-D vector containing numeric values.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vector2<T> {
    /// X-coordinate.
    pub x: T,

    /// Y-coordinate.
    pub y: T,
}

/// 2-D vector containing `Float` values.
pub type Vector2f = Vector2<Float>;

/// 2-D vector containing `Int` values.
pub type Vector2i = Vector2<Int>;

impl<T: Num> Vector2<T> {
    /// Creates a new 2-D vector.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Creates a new 2-D zero vector.
    pub fn zero() -> Self
    where
        T: Zero,
    {
        Self::new(T::zero(), T::zero())
    }

    /// Returns the square of the vector's length.
    pub fn length_squared(&self) -> T
    where
        T: Copy,
    {
        self.x * self.x + self.y * self.y
    }

    /// Returns the vector's length.
    pub fn length(&self) -> T
    where
        T: num_traits::Float,
    {
        self.length_squared().sqrt()
    }

    /// Returns a new vector containing absolute values of the components.
    pub fn abs(&self) -> Self
    where
        T: Neg<Output = T> + PartialOrd + Copy,
    {
        Self::new(abs(self.x), abs(self.y))
    }
}

impl<T: Num> Add for Vector2<T> {
    type Output = Self;

    /// Adds the given vector and returns the result.
    ///
    /// * `other` - The vector to add.
    fn add(self, other: Self) -> Self::Output {
        Self::Output::new(self.x + other.x, self.y + other.y)
    }
}

impl<T: Num> Sub for Vector2<T> {
    type Output = Self;

    /// Subtracts the given vector and returns the result.
    ///
    /// * `other` - The vector to subtract.
    fn sub(self, other: Self) -> Self::Output {
        Self::Output::new(self.x - other.x, self.y - other.y)
    }
}

impl<T: Num + Copy> Mul<T> for Vector2<T> {
    type Output = Self;

    /// Scale the vector.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: T) -> Self::Output {
        Self::Output::new(f * self.x, f * self.y)
    }
}

impl<T: Num + Neg<Output = T>> Neg for Vector2<T> {
    type Output = Self;

    /// Flip the vector's direction.
    fn neg(self) -> Self::Output {
        Self::Output::new(-self.x, -self.y)
    }
}

impl<T> Index<usize> for Vector2<T> {
    type Output = T;

    /// Index the vector by an axis to get the immutable coordinate axis value.
    ///
    /// * `axis` - A 2-D coordinate axis (0 or 1).
    fn index(&self, axis: usize) -> &Self::Output {
        match axis {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("Invalid axis {axis} for Vector2"),
        }
    }
}

impl From<Vector2i> for Vector2f {
    /// Convert a 2-D vector of integers to floating point values.
    ///
    /// * `v` - 2-D integer vector.
    fn from(v: Vector2i) -> Self {
        Self::new(v.x as Float, v.y as Float)
    }
}

impl<T: fmt::Display> fmt::Display for Vector2<T> {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}>", self.x, self.y)
    }
}
