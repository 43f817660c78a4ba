//! Henyey-Greenstein

use crate::geometry::*;
use crate::pbrt::*;
use std::fmt;

/// Henyey-Greenstein phase function.
#[derive(Copy, Clone, Debug)]
pub struct HenyeyGreenstein {
    /// The asymmetry parameter. It is the average value of the product of the
    /// phase function being approximated and the cosine of the angle between two
    /// directions. Isotropic phase functions use g = 0.
    pub g: Float,
}

impl HenyeyGreenstein {
    /// Returns a new `HenyeyGreenstein`.
    ///
    /// * `g` - The asymmetry parameter.
    pub fn new(g: Float) -> Self {
        Self { g }
    }

    /// Returns the value of the phase function for the given pair of directions.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn p(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        phase_hg(wo.dot(wi), self.g)
    }

    /// Returns the phase function value and sampled incident direction given the
    /// outgoing direction and a sample value in [0, 1)^2.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - Sample value in [0, 1)^2.
    pub fn sample_p(&self, wo: &Vector3f, u: &Point2f) -> (Float, Vector3f) {
        let g = self.g;
        let cos_theta = if abs(g) < 1e-3 {
            1.0 - 2.0 * u[0]
        } else {
            let sqr_term = (1.0 - g * g) / (1.0 + g - 2.0 * g * u[0]);
            -(1.0 + g * g - sqr_term * sqr_term) / (2.0 * g)
        };

        let sin_theta = max(0.0, 1.0 - cos_theta * cos_theta).sqrt();
        let phi = TWO_PI * u[1];

        let (v1, v2) = coordinate_system(wo);
        let wi = spherical_direction_in_coord_frame(sin_theta, cos_theta, phi, &v1, &v2, wo);
        (phase_hg(cos_theta, g), wi)
    }
}

impl fmt::Display for HenyeyGreenstein {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ HenyeyGreenstein g: {} ]", self.g)
    }
}

/// Evaluates the Henyey-Greenstein phase function.
///
/// * `cos_theta` - Cosine of the angle between the two directions.
/// * `g`         - Asymmetry parameter.
#[inline]
pub fn phase_hg(cos_theta: Float, g: Float) -> Float {
    let denom = 1.0 + g * g + 2.0 * g * cos_theta;
    INV_FOUR_PI * (1.0 - g * g) / (denom * denom.sqrt())
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn isotropic_phase_is_constant() {
        let hg = HenyeyGreenstein::new(0.0);
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(1.0, 0.0, 0.0);
        assert!(approx_eq!(Float, hg.p(&wo, &wi), INV_FOUR_PI, epsilon = 1e-6));
    }

    #[test]
    fn sampled_value_matches_evaluation() {
        let hg = HenyeyGreenstein::new(0.3);
        let wo = Vector3f::new(0.0, 1.0, 0.0);
        let (p, wi) = hg.sample_p(&wo, &Point2f::new(0.25, 0.6));
        assert!(approx_eq!(Float, wi.length(), 1.0, epsilon = 1e-4));
        assert!(approx_eq!(Float, p, hg.p(&wo, &wi), epsilon = 1e-3));
    }
}
