//! Mitchell Filter

use lumen_core::filter::*;
use lumen_core::geometry::*;
use lumen_core::pbrt::*;

/// Implements the Mitchell-Netravali filter: a separable cubic controlled by
/// `B` and `C` that trades ringing against blurring. `B + 2C = 1` is the
/// recommended family.
pub struct MitchellFilter {
    /// Filter data.
    pub data: FilterData,

    /// B parameter.
    pub b: Float,

    /// C parameter.
    pub c: Float,
}

impl MitchellFilter {
    /// Returns a new instance of `MitchellFilter`.
    ///
    /// * `radius` - Radius of the filter in x and y directions; beyond this
    ///              filter is 0.
    /// * `b`      - B parameter.
    /// * `c`      - C parameter.
    pub fn new(radius: Vector2f, b: Float, c: Float) -> Self {
        Self {
            data: FilterData::new(radius),
            b,
            c,
        }
    }

    /// Evaluates the 1D filter over [-1, 1]; `x` is the offset divided by the
    /// radius.
    ///
    /// * `x` - Normalized offset.
    pub fn mitchell_1d(&self, x: Float) -> Float {
        let (b, c) = (self.b, self.c);
        let x = abs(2.0 * x);
        if x >= 2.0 {
            0.0
        } else if x > 1.0 {
            ((-b - 6.0 * c) * x * x * x
                + (6.0 * b + 30.0 * c) * x * x
                + (-12.0 * b - 48.0 * c) * x
                + (8.0 * b + 24.0 * c))
                * (1.0 / 6.0)
        } else {
            ((12.0 - 9.0 * b - 6.0 * c) * x * x * x + (-18.0 + 12.0 * b + 6.0 * c) * x * x + (6.0 - 2.0 * b))
                * (1.0 / 6.0)
        }
    }
}

impl Default for MitchellFilter {
    fn default() -> Self {
        Self::new(Vector2f::new(2.0, 2.0), 1.0 / 3.0, 1.0 / 3.0)
    }
}

impl Filter for MitchellFilter {
    fn get_data(&self) -> &FilterData {
        &self.data
    }

    fn evaluate(&self, p: &Point2f) -> Float {
        self.mitchell_1d(p.x * self.data.inv_radius.x) * self.mitchell_1d(p.y * self.data.inv_radius.y)
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
    fn center_value() {
        let f = MitchellFilter::default();
        let v = (6.0 - 2.0 / 3.0) / 6.0;
        assert!(approx_eq!(Float, f.mitchell_1d(0.0), v, epsilon = 1e-6));
        assert!(approx_eq!(Float, f.evaluate(&Point2f::new(0.0, 0.0)), v * v, epsilon = 1e-6));
    }

    #[test]
    fn pieces_meet_at_half_radius() {
        let f = MitchellFilter::new(Vector2f::new(1.0, 1.0), 0.4, 0.3);
        let below = f.mitchell_1d(0.5 - 1e-4);
        let above = f.mitchell_1d(0.5 + 1e-4);
        assert!(approx_eq!(Float, below, above, epsilon = 1e-3));
        assert!(approx_eq!(Float, f.mitchell_1d(0.5), 0.4 / 6.0, epsilon = 1e-6));
    }

    #[test]
    fn vanishes_at_radius() {
        let f = MitchellFilter::default();
        assert!(approx_eq!(Float, f.mitchell_1d(1.0), 0.0, epsilon = 1e-6));
        assert_eq!(f.evaluate(&Point2f::new(2.5, 0.0)), 0.0);
    }

    proptest! {
        #[test]
        fn shifted_copies_sum_to_one(t in 0.0..1.0_f32, b in 0.0..1.0_f32) {
            // With radius 2 the normalized kernel has unit spacing.
            let f = MitchellFilter::new(Vector2f::new(2.0, 2.0), b, (1.0 - b) / 2.0);
            let sum: Float = (-2..=2).map(|k| f.mitchell_1d((t + k as Float) / 2.0)).sum();
            prop_assert!(approx_eq!(Float, sum, 1.0, epsilon = 1e-4));
        }

        #[test]
        fn separable_and_symmetric(x in -2.0..2.0_f32, y in -2.0..2.0_f32) {
            let f = MitchellFilter::default();
            let v = f.evaluate(&Point2f::new(x, y));
            prop_assert!(approx_eq!(Float, v, f.evaluate(&Point2f::new(-x, y)), ulps = 2));
            prop_assert!(approx_eq!(Float, v, f.mitchell_1d(x / 2.0) * f.mitchell_1d(y / 2.0), ulps = 2));
        }
    }
}
