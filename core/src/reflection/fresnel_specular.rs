//! Fresnel-Modulated Specular Reflection and Transmission

use super::*;
use crate::material::*;
use bumpalo::Bump;

/// BSDF for a smooth dielectric that chooses between specular reflection and
/// transmission in proportion to the Fresnel reflectance.
#[derive(Clone)]
pub struct FresnelSpecular {
    /// Spectrum used to scale the reflected colour.
    r: Spectrum,

    /// Spectrum used to scale the transmitted colour.
    t: Spectrum,

    /// Index of refraction above the surface (same side as surface normal).
    eta_a: Float,

    /// Index of refraction below the surface (opposite side as surface normal).
    eta_b: Float,

    /// Indicates whether incident ray started from a light source or from camera.
    mode: TransportMode,
}

impl FresnelSpecular {
    /// Create a new instance of `FresnelSpecular`.
    ///
    /// * `r`     - Spectrum used to scale the reflected colour.
    /// * `t`     - Spectrum used to scale the transmitted colour.
    /// * `eta_a` - Index of refraction above the surface.
    /// * `eta_b` - Index of refraction below the surface.
    /// * `mode`  - Indicates whether incident ray started from a light source
    ///             or from camera.
    pub fn new(r: Spectrum, t: Spectrum, eta_a: Float, eta_b: Float, mode: TransportMode) -> Self {
        Self {
            r,
            t,
            eta_a,
            eta_b,
            mode,
        }
    }

    /// Allocate a new `FresnelSpecular` lobe in the arena.
    ///
    /// * `arena` - The arena for memory allocations.
    /// * `r`     - Spectrum used to scale the reflected colour.
    /// * `t`     - Spectrum used to scale the transmitted colour.
    /// * `eta_a` - Index of refraction above the surface.
    /// * `eta_b` - Index of refraction below the surface.
    /// * `mode`  - Transport mode.
    pub fn alloc(arena: &Bump, r: Spectrum, t: Spectrum, eta_a: Float, eta_b: Float, mode: TransportMode) -> &BxDF {
        arena.alloc(BxDF::FresnelSpecular(Self::new(r, t, eta_a, eta_b, mode)))
    }

    /// Returns the BxDF type.
    pub fn get_type(&self) -> BxDFType {
        BxDFType::BSDF_REFLECTION | BxDFType::BSDF_TRANSMISSION | BxDFType::BSDF_SPECULAR
    }

    /// A delta distribution; no scattering is returned for arbitrary
    /// direction pairs.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn f(&self, _wo: &Vector3f, _wi: &Vector3f) -> Spectrum {
        Spectrum::ZERO
    }

    /// Samples reflection with probability equal to the Fresnel reflectance
    /// and transmission otherwise.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - The 2D uniform random values.
    pub fn sample_f(&self, wo: &Vector3f, u: &Point2f) -> BxDFSample {
        let f = fr_dielectric(cos_theta(wo), self.eta_a, self.eta_b);
        if u[0] < f {
            let wi = Vector3f::new(-wo.x, -wo.y, wo.z);
            let sampled_type = BxDFType::BSDF_SPECULAR | BxDFType::BSDF_REFLECTION;
            return BxDFSample::new(f * self.r / abs_cos_theta(&wi), f, wi, sampled_type);
        }

        let entering = cos_theta(wo) > 0.0;
        let (eta_i, eta_t) = if entering {
            (self.eta_a, self.eta_b)
        } else {
            (self.eta_b, self.eta_a)
        };

        let sampled_type = BxDFType::BSDF_SPECULAR | BxDFType::BSDF_TRANSMISSION;
        match refract(wo, &Normal3f::new(0.0, 0.0, 1.0).face_forward(wo), eta_i / eta_t) {
            Some(wi) => {
                let mut ft = self.t * (1.0 - f);
                if self.mode == TransportMode::Radiance {
                    ft *= (eta_i * eta_i) / (eta_t * eta_t);
                }
                BxDFSample::new(ft / abs_cos_theta(&wi), 1.0 - f, wi, sampled_type)
            }
            None => BxDFSample::from(sampled_type),
        }
    }
}

impl fmt::Display for FresnelSpecular {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FresnelSpecular {{ r: {}, t: {}, eta_a: {}, eta_b: {}, mode: {:?} }}",
            self.r, self.t, self.eta_a, self.eta_b, self.mode
        )
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn glass() -> FresnelSpecular {
        FresnelSpecular::new(Spectrum::ONE, Spectrum::ONE, 1.0, 1.5, TransportMode::Radiance)
    }

    #[test]
    fn low_sample_reflects() {
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let s = glass().sample_f(&wo, &Point2f::new(0.01, 0.5));
        assert!(s.bxdf_type.contains(BxDFType::BSDF_REFLECTION));
        assert!(approx_eq!(Float, s.pdf, 0.04, epsilon = 1e-4));
        assert_eq!(s.wi, wo);
    }

    #[test]
    fn high_sample_transmits_into_the_surface() {
        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let s = glass().sample_f(&wo, &Point2f::new(0.9, 0.5));
        assert!(s.bxdf_type.contains(BxDFType::BSDF_TRANSMISSION));
        assert!(s.wi.z < 0.0);
        assert!(approx_eq!(Float, s.pdf, 0.96, epsilon = 1e-4));
    }
}
