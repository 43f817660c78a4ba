//! Fresnel Reflectance

use super::*;
use std::mem::swap;

/// Computes Fresnel reflection coefficients.
#[derive(Copy, Clone, Debug)]
pub enum Fresnel {
    /// Reflects 100% of all incoming light.
    NoOp,

    /// Dielectric interface.
    Dielectric {
        /// Index of refraction for exterior side of the surface.
        eta_i: Float,

        /// Index of refraction for interior side of the surface.
        eta_t: Float,
    },
}

impl Fresnel {
    /// Returns the amount of light reflected by the surface.
    ///
    /// * `cos_theta_i` - Cosine of the angle made by incident direction and
    ///                   surface normal.
    pub fn evaluate(&self, cos_theta_i: Float) -> Spectrum {
        match self {
            Self::NoOp => Spectrum::ONE,
            Self::Dielectric { eta_i, eta_t } => Spectrum::new(fr_dielectric(cos_theta_i, *eta_i, *eta_t)),
        }
    }
}

impl fmt::Display for Fresnel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoOp => write!(f, "FresnelNoOp"),
            Self::Dielectric { eta_i, eta_t } => write!(f, "FresnelDielectric {{ eta_i: {}, eta_t: {} }}", eta_i, eta_t),
        }
    }
}

/// Returns the fresnel reflection for dielectric materials and unpolarized light.
///
/// * `cos_theta_i` - cos(θi) for angle between incident direction and geometric
///                   surface normal.
/// * `eta_i`       - index of refraction for medium that incident ray is in.
/// * `eta_t`       - index of refraction for medium that incident ray is entering.
pub fn fr_dielectric(cos_theta_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let mut cos_theta_i = clamp(cos_theta_i, -1.0, 1.0);
    let mut eta_i = eta_i;
    let mut eta_t = eta_t;

    // Potentially swap indices of refraction.
    let entering = cos_theta_i > 0.0;
    if !entering {
        swap(&mut eta_i, &mut eta_t);
        cos_theta_i = abs(cos_theta_i);
    }

    // Compute cos(θt) using Snell's law.
    let sin_theta_i = max(0.0, 1.0 - cos_theta_i * cos_theta_i).sqrt();
    let sin_theta_t = eta_i / eta_t * sin_theta_i;

    // Handle total internal reflection.
    if sin_theta_t >= 1.0 {
        return 1.0;
    }

    let cos_theta_t = max(0.0, 1.0 - sin_theta_t * sin_theta_t).sqrt();
    let r_parl = ((eta_t * cos_theta_i) - (eta_i * cos_theta_t)) / ((eta_t * cos_theta_i) + (eta_i * cos_theta_t));
    let r_perp = ((eta_i * cos_theta_i) - (eta_t * cos_theta_t)) / ((eta_i * cos_theta_i) + (eta_t * cos_theta_t));
    (r_parl * r_parl + r_perp * r_perp) / 2.0
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
