//! Specular Transmission

use super::*;
use crate::material::*;
use bumpalo::Bump;

/// BTDF for physically plausible specular transmission using Fresnel interface.
#[derive(Clone)]
pub struct SpecularTransmission {
    /// Fresnel interface for dielectrics.
    fresnel: Fresnel,

    /// Spectrum used to scale the transmitted colour.
    t: Spectrum,

    /// Index of refraction above the surface (same side as surface normal).
    eta_a: Float,

    /// Index of refraction below the surface (opposite side as surface normal).
    eta_b: Float,

    /// Indicates whether incident ray started from a light source or from camera.
    mode: TransportMode,
}

impl SpecularTransmission {
    /// Creates a new instance of `SpecularTransmission`.
    ///
    /// * `t`      - Spectrum used to scale the transmitted colour.
    /// * `eta_a`  - Index of refraction above the surface (same side as surface normal).
    /// * `eta_b`  - Index of refraction below the surface (opposite side as surface normal).
    /// * `mode`   - Indicates whether incident ray started from a light source or from camera.
    pub fn new(t: Spectrum, eta_a: Float, eta_b: Float, mode: TransportMode) -> Self {
        Self {
            fresnel: Fresnel::Dielectric {
                eta_i: eta_a,
                eta_t: eta_b,
            },
            t,
            eta_a,
            eta_b,
            mode,
        }
    }

    /// Allocate a new `SpecularTransmission` lobe in the arena.
    ///
    /// * `arena` - The arena for memory allocations.
    /// * `t`     - Spectrum used to scale the transmitted colour.
    /// * `eta_a` - Index of refraction above the surface.
    /// * `eta_b` - Index of refraction below the surface.
    /// * `mode`  - Transport mode.
    pub fn alloc(arena: &Bump, t: Spectrum, eta_a: Float, eta_b: Float, mode: TransportMode) -> &BxDF {
        arena.alloc(BxDF::SpecularTransmission(Self::new(t, eta_a, eta_b, mode)))
    }

    /// Returns the BxDF type.
    pub fn get_type(&self) -> BxDFType {
        BxDFType::BSDF_TRANSMISSION | BxDFType::BSDF_SPECULAR
    }

    /// A delta distribution; no scattering is returned for arbitrary
    /// direction pairs.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn f(&self, _wo: &Vector3f, _wi: &Vector3f) -> Spectrum {
        Spectrum::ZERO
    }

    /// Samples the refracted direction.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - The 2D uniform random values.
    pub fn sample_f(&self, wo: &Vector3f, _u: &Point2f) -> BxDFSample {
        // Figure out which η is incident and which is transmitted.
        let entering = cos_theta(wo) > 0.0;
        let (eta_i, eta_t) = if entering {
            (self.eta_a, self.eta_b)
        } else {
            (self.eta_b, self.eta_a)
        };

        match refract(wo, &Normal3f::new(0.0, 0.0, 1.0).face_forward(wo), eta_i / eta_t) {
            Some(wi) => {
                let mut ft = self.t * (Spectrum::ONE - self.fresnel.evaluate(cos_theta(&wi)));

                // Account for non-symmetry with transmission to different medium.
                if self.mode == TransportMode::Radiance {
                    ft *= (eta_i * eta_i) / (eta_t * eta_t);
                }
                BxDFSample::new(ft / abs_cos_theta(&wi), 1.0, wi, self.get_type())
            }
            None => BxDFSample::from(self.get_type()),
        }
    }
}

impl fmt::Display for SpecularTransmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SpecularTransmission {{ fresnel: {}, t: {}, eta_a: {}, eta_b: {}, mode: {:?} }}",
            self.fresnel, self.t, self.eta_a, self.eta_b, self.mode
        )
    }
}
