//! Common

use super::clamp::*;
use num_traits::{Num, Zero};
use std::ops::{Add, Mul, Neg};

/// Use 32-bit precision for floating point numbers.
pub type Float = f32;

/// Default signed integer to 32-bit.
pub type Int = i32;

/// Infinty (∞)
pub const INFINITY: Float = Float::INFINITY;

/// PI (π)
pub const PI: Float = std::f32::consts::PI;

/// 1/PI (1/π)
pub const INV_PI: Float = 1.0 / PI;

/// PI/2 (π/2)
pub const PI_OVER_TWO: Float = PI * 0.5;

/// PI/4 (π/4)
pub const PI_OVER_FOUR: Float = PI * 0.25;

/// 2*PI (2π)
pub const TWO_PI: Float = PI * 2.0;

/// 1/2*PI (1/2π)
pub const INV_TWO_PI: Float = 1.0 / TWO_PI;

/// 4*PI (4π)
pub const FOUR_PI: Float = PI * 4.0;

/// 1/4*PI (1/4π)
pub const INV_FOUR_PI: Float = 1.0 / FOUR_PI;

/// Machine Epsilon
pub const MACHINE_EPSILON: Float = std::f32::EPSILON * 0.5;

/// Shadow Epsilon
pub const SHADOW_EPSILON: Float = 0.0001;

/// Offset applied along the surface normal when spawning rays from a surface.
pub const RAY_EPSILON: Float = 1.0e-4;

/// Returns the absolute value of a number.
///
/// * `n` - The number.
#[inline(always)]
pub fn abs<T>(n: T) -> T
where
    T: Num + Neg<Output = T> + PartialOrd + Copy,
{
    if n < T::zero() {
        -n
    } else {
        n
    }
}

/// Returns the minimum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn min<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a < b {
        a
    } else {
        b
    }
}

/// Returns the maximum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn max<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a > b {
        a
    } else {
        b
    }
}

/// Computes a mod b (the remainder of a divided by b). This version
/// ensures that modulus of a negative number is zero or positive.
///
/// * `a` - Dividend.
/// * `b` - Divisor.
#[inline(always)]
pub fn rem<T>(a: T, b: T) -> T
where
    T: Num + Zero + PartialOrd + Copy,
{
    let result = a - (a / b) * b;
    if result < T::zero() {
        result + b
    } else {
        result
    }
}

/// Returns gamma corrected values for use in 8-bit images.
///
/// * `value` - Value to correct.
#[inline(always)]
pub fn gamma_correct(value: Float) -> Float {
    if value <= 0.0031308 {
        12.92 * value
    } else {
        1.055 * value.powf(1.0 / 2.4) - 0.055
    }
}

/// Linearly interpolate between two points for parameters in [0, 1] and
/// extrapolate for parameters outside that interval.
///
/// * `t` - Parameter.
/// * `p0` - Point at t=0.
/// * `p1` - Point at t=1.
#[inline(always)]
pub fn lerp<P>(t: Float, p0: P, p1: P) -> P
where
    Float: Mul<P, Output = P>,
    P: Add<P, Output = P>,
{
    (1.0 - t) * p0 + t * p1
}

/// Emulates the behavior of `upper_bound` but uses a function object to get
/// values at various indices instead of requiring access to an actual array.
///
/// * `size` - Size of array.
/// * `pred` - Function that returns a value at a given index.
pub fn find_interval<Predicate>(size: usize, pred: Predicate) -> usize
where
    Predicate: Fn(usize) -> bool,
{
    let (mut first, mut len) = (0, size);

    while len > 0 {
        let half = len >> 1;
        let middle = first + half;

        // Bisect range based on value of `pred` at `middle`.
        if pred(middle) {
            first = middle + 1;
            len -= half + 1;
        } else {
            len = half;
        }
    }

    clamp(first as isize - 1, 0, size as isize - 2) as usize
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rem_of_negative_dividend_is_positive() {
        assert_eq!(rem(-1, 128), 127);
        assert_eq!(rem(129, 128), 1);
        assert_eq!(rem(0, 3), 0);
    }

    #[test]
    fn find_interval_returns_segment_containing_value() {
        let cdf = [0.0, 0.25, 0.5, 1.0];
        assert_eq!(find_interval(cdf.len(), |i| cdf[i] <= 0.3), 1);
        assert_eq!(find_interval(cdf.len(), |i| cdf[i] <= 0.0), 0);
        assert_eq!(find_interval(cdf.len(), |i| cdf[i] <= 1.0), 2);
    }

    #[test]
    fn gamma_correct_is_linear_near_zero() {
        assert_eq!(gamma_correct(0.0), 0.0);
        assert!((gamma_correct(1.0) - 1.0).abs() < 1e-5);
    }
}
