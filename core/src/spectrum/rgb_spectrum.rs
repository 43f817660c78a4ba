//! RGB Spectrum

use crate::pbrt::*;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

/// Number of samples in an RGB spectrum.
pub const RGB_SAMPLES: usize = 3;

/// Convert XYZ coefficients to linear sRGB.
///
/// * `xyz` - XYZ colour value.
pub fn xyz_to_rgb(xyz: &[Float; 3]) -> [Float; 3] {
    [
        3.240479 * xyz[0] - 1.537150 * xyz[1] - 0.498535 * xyz[2],
        -0.969256 * xyz[0] + 1.875991 * xyz[1] + 0.041556 * xyz[2],
        0.055648 * xyz[0] - 0.204043 * xyz[1] + 1.057311 * xyz[2],
    ]
}

/// Convert linear sRGB coefficients to XYZ.
///
/// * `rgb` - RGB colour value.
pub fn rgb_to_xyz(rgb: &[Float; 3]) -> [Float; 3] {
    [
        0.412453 * rgb[0] + 0.357580 * rgb[1] + 0.180423 * rgb[2],
        0.212671 * rgb[0] + 0.715160 * rgb[1] + 0.072169 * rgb[2],
        0.019334 * rgb[0] + 0.119193 * rgb[1] + 0.950227 * rgb[2],
    ]
}

/// Y-coefficient weights of the RGB primaries.
const Y_WEIGHT: [Float; 3] = [0.212671, 0.715160, 0.072169];

/// Spectral power distribution represented by RGB coefficients.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RGBSpectrum {
    c: [Float; RGB_SAMPLES],
}

impl RGBSpectrum {
    /// Zero energy everywhere.
    pub const ZERO: Self = Self { c: [0.0; RGB_SAMPLES] };

    /// Unit value everywhere.
    pub const ONE: Self = Self { c: [1.0; RGB_SAMPLES] };

    /// Create a spectrum with a constant value.
    ///
    /// * `v` - The value.
    pub const fn new(v: Float) -> Self {
        Self { c: [v; RGB_SAMPLES] }
    }

    /// Create a spectrum from RGB components.
    ///
    /// * `r` - Red.
    /// * `g` - Green.
    /// * `b` - Blue.
    pub const fn from_rgb_values(r: Float, g: Float, b: Float) -> Self {
        Self { c: [r, g, b] }
    }

    /// Create a spectrum from an RGB array.
    ///
    /// * `rgb` - RGB colour value.
    pub fn from_rgb(rgb: &[Float; 3]) -> Self {
        Self { c: *rgb }
    }

    /// Create a spectrum from XYZ coefficients.
    ///
    /// * `xyz` - XYZ colour value.
    pub fn from_xyz(xyz: &[Float; 3]) -> Self {
        Self { c: xyz_to_rgb(xyz) }
    }

    /// Returns the RGB coefficients.
    pub fn to_rgb(&self) -> [Float; 3] {
        self.c
    }

    /// Returns the XYZ coefficients.
    pub fn to_xyz(&self) -> [Float; 3] {
        rgb_to_xyz(&self.c)
    }

    /// Returns the y-coefficient of XYZ colour (luminance).
    pub fn y(&self) -> Float {
        Y_WEIGHT[0] * self.c[0] + Y_WEIGHT[1] * self.c[1] + Y_WEIGHT[2] * self.c[2]
    }

    /// Returns true if any coefficient is NaN.
    pub fn has_nans(&self) -> bool {
        self.c.iter().any(|v| v.is_nan())
    }

    /// Returns true if any coefficient is infinite.
    pub fn has_infs(&self) -> bool {
        self.c.iter().any(|v| v.is_infinite())
    }

    /// Returns true if any coefficient is negative.
    pub fn has_negatives(&self) -> bool {
        self.c.iter().any(|v| *v < 0.0)
    }

    /// Returns true if the values are zero everywhere.
    pub fn is_black(&self) -> bool {
        self.c.iter().all(|v| *v == 0.0)
    }

    /// Returns the maximum coefficient.
    pub fn max_component_value(&self) -> Float {
        max(self.c[0], max(self.c[1], self.c[2]))
    }

    /// Takes the square root of all coefficients.
    pub fn sqrt(&self) -> Self {
        Self::from_rgb_values(self.c[0].sqrt(), self.c[1].sqrt(), self.c[2].sqrt())
    }

    /// Takes e raised to each coefficient.
    pub fn exp(&self) -> Self {
        Self::from_rgb_values(self.c[0].exp(), self.c[1].exp(), self.c[2].exp())
    }

    /// Clamps the coefficients to a range.
    ///
    /// * `low`  - Low value.
    /// * `high` - High value.
    pub fn clamp(&self, low: Float, high: Float) -> Self {
        Self::from_rgb_values(
            clamp(self.c[0], low, high),
            clamp(self.c[1], low, high),
            clamp(self.c[2], low, high),
        )
    }
}

impl Add for RGBSpectrum {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::from_rgb_values(self.c[0] + other.c[0], self.c[1] + other.c[1], self.c[2] + other.c[2])
    }
}

impl AddAssign for RGBSpectrum {
    fn add_assign(&mut self, other: Self) {
        for (a, b) in self.c.iter_mut().zip(other.c) {
            *a += b;
        }
    }
}

impl Sub for RGBSpectrum {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::from_rgb_values(self.c[0] - other.c[0], self.c[1] - other.c[1], self.c[2] - other.c[2])
    }
}

impl SubAssign for RGBSpectrum {
    fn sub_assign(&mut self, other: Self) {
        for (a, b) in self.c.iter_mut().zip(other.c) {
            *a -= b;
        }
    }
}

impl Mul for RGBSpectrum {
    type Output = Self;

    fn mul(self, other: Self) -> Self::Output {
        Self::from_rgb_values(self.c[0] * other.c[0], self.c[1] * other.c[1], self.c[2] * other.c[2])
    }
}

impl MulAssign for RGBSpectrum {
    fn mul_assign(&mut self, other: Self) {
        for (a, b) in self.c.iter_mut().zip(other.c) {
            *a *= b;
        }
    }
}

impl Mul<Float> for RGBSpectrum {
    type Output = Self;

    fn mul(self, f: Float) -> Self::Output {
        Self::from_rgb_values(self.c[0] * f, self.c[1] * f, self.c[2] * f)
    }
}

impl Mul<RGBSpectrum> for Float {
    type Output = RGBSpectrum;

    fn mul(self, s: RGBSpectrum) -> Self::Output {
        s * self
    }
}

impl MulAssign<Float> for RGBSpectrum {
    fn mul_assign(&mut self, f: Float) {
        for a in self.c.iter_mut() {
            *a *= f;
        }
    }
}

impl Div for RGBSpectrum {
    type Output = Self;

    /// Component-wise division; zero divisors yield zero.
    fn div(self, other: Self) -> Self::Output {
        let d = |a: Float, b: Float| if b != 0.0 { a / b } else { 0.0 };
        Self::from_rgb_values(d(self.c[0], other.c[0]), d(self.c[1], other.c[1]), d(self.c[2], other.c[2]))
    }
}

impl DivAssign for RGBSpectrum {
    fn div_assign(&mut self, other: Self) {
        *self = *self / other;
    }
}

impl Div<Float> for RGBSpectrum {
    type Output = Self;

    fn div(self, f: Float) -> Self::Output {
        debug_assert!(f != 0.0);
        let inv = 1.0 / f;
        self * inv
    }
}

impl DivAssign<Float> for RGBSpectrum {
    fn div_assign(&mut self, f: Float) {
        *self = *self / f;
    }
}

impl Neg for RGBSpectrum {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::from_rgb_values(-self.c[0], -self.c[1], -self.c[2])
    }
}

impl Index<usize> for RGBSpectrum {
    type Output = Float;

    fn index(&self, i: usize) -> &Self::Output {
        &self.c[i]
    }
}

impl IndexMut<usize> for RGBSpectrum {
    fn index_mut(&mut self, i: usize) -> &mut Self::Output {
        &mut self.c[i]
    }
}

impl From<Float> for RGBSpectrum {
    fn from(v: Float) -> Self {
        Self::new(v)
    }
}

impl fmt::Display for RGBSpectrum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.c[0], self.c[1], self.c[2])
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn luminance_of_white_is_one() {
        assert!(approx_eq!(f32, RGBSpectrum::ONE.y(), 1.0, epsilon = 1e-5));
    }

    #[test]
    fn rgb_xyz_conversion_round_trips() {
        let s = RGBSpectrum::from_rgb_values(0.25, 0.5, 0.75);
        let back = RGBSpectrum::from_xyz(&s.to_xyz());
        for i in 0..RGB_SAMPLES {
            assert!(approx_eq!(f32, back[i], s[i], epsilon = 1e-4));
        }
    }

    #[test]
    fn division_by_zero_component_yields_zero() {
        let s = RGBSpectrum::ONE / RGBSpectrum::from_rgb_values(2.0, 0.0, 4.0);
        assert_eq!(s, RGBSpectrum::from_rgb_values(0.5, 0.0, 0.25));
    }

    #[test]
    fn sanity_checks_detect_bad_values() {
        assert!(RGBSpectrum::from_rgb_values(Float::NAN, 0.0, 0.0).has_nans());
        assert!(RGBSpectrum::from_rgb_values(0.0, -1.0, 0.0).has_negatives());
        assert!(RGBSpectrum::from_rgb_values(0.0, 0.0, Float::INFINITY).has_infs());
        assert!(RGBSpectrum::ZERO.is_black());
    }
}
