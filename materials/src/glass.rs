//! Glass Material

use bumpalo::Bump;
use lumen_core::interaction::*;
use lumen_core::material::*;
use lumen_core::pbrt::*;
use lumen_core::reflection::*;
use lumen_core::spectrum::*;

/// Implements perfect specular reflection and transmission, weighted by
/// Fresnel terms for accurate angular-dependent variation.
#[derive(Copy, Clone, Debug)]
pub struct GlassMaterial {
    /// Reflectivity of the surface.
    kr: Spectrum,

    /// Transmissibity of the surface.
    kt: Spectrum,

    /// The index of refraction of the inside of the object. The exterior is
    /// assumed to be a vacuum with an index of 1.
    eta: Float,
}

impl GlassMaterial {
    /// Create a new `GlassMaterial`.
    ///
    /// * `kr`  - Reflectivity of the surface.
    /// * `kt`  - Transmissibity of the surface.
    /// * `eta` - The index of refraction of the inside of the object.
    pub fn new(kr: Spectrum, kt: Spectrum, eta: Float) -> Self {
        Self {
            kr: kr.clamp(0.0, INFINITY),
            kt: kt.clamp(0.0, INFINITY),
            eta,
        }
    }
}

impl Default for GlassMaterial {
    fn default() -> Self {
        Self::new(Spectrum::ONE, Spectrum::ONE, 1.5)
    }
}

impl Material for GlassMaterial {
    /// Allocates the dielectric BSDF at the intersection point on the surface.
    ///
    /// * `si`                   - The surface interaction at the intersection.
    /// * `arena`                - The arena for memory allocations.
    /// * `mode`                 - Transport mode.
    /// * `allow_multiple_lobes` - Use a single `FresnelSpecular` lobe instead
    ///                            of separate reflection and transmission
    ///                            lobes.
    fn compute_scattering_functions<'arena>(
        &self,
        si: &SurfaceInteraction,
        arena: &'arena Bump,
        mode: TransportMode,
        allow_multiple_lobes: bool,
    ) -> ScatteringFunctions<'arena> {
        let mut bsdf = BSDF::new(si, Some(self.eta));

        let (r, t) = (self.kr, self.kt);
        if !(r.is_black() && t.is_black()) {
            if allow_multiple_lobes {
                bsdf.add(FresnelSpecular::alloc(arena, r, t, 1.0, self.eta, mode));
            } else {
                if !r.is_black() {
                    let fresnel = Fresnel::Dielectric {
                        eta_i: 1.0,
                        eta_t: self.eta,
                    };
                    bsdf.add(SpecularReflection::alloc(arena, r, fresnel));
                }
                if !t.is_black() {
                    bsdf.add(SpecularTransmission::alloc(arena, t, 1.0, self.eta, mode));
                }
            }
        }

        ScatteringFunctions::from_bsdf(arena.alloc(bsdf))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
