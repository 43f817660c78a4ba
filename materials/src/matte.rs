//! Matte Material

use bumpalo::Bump;
use lumen_core::interaction::*;
use lumen_core::material::*;
use lumen_core::pbrt::*;
use lumen_core::reflection::*;
use lumen_core::spectrum::*;

/// Implements purely diffuse surfaces.
#[derive(Copy, Clone, Debug)]
pub struct MatteMaterial {
    /// Spectral diffuse reflection.
    kd: Spectrum,
}

impl MatteMaterial {
    /// Create a new `MatteMaterial`.
    ///
    /// * `kd` - Spectral diffuse reflection. Negative components are clamped
    ///          to zero.
    pub fn new(kd: Spectrum) -> Self {
        Self {
            kd: kd.clamp(0.0, INFINITY),
        }
    }
}

impl Default for MatteMaterial {
    fn default() -> Self {
        Self::new(Spectrum::new(0.5))
    }
}

impl Material for MatteMaterial {
    /// Allocates a Lambertian BSDF at the intersection point on the surface.
    ///
    /// * `si`                   - The surface interaction at the intersection.
    /// * `arena`                - The arena for memory allocations.
    /// * `mode`                 - Transport mode (ignored).
    /// * `allow_multiple_lobes` - Ignored.
    fn compute_scattering_functions<'arena>(
        &self,
        si: &SurfaceInteraction,
        arena: &'arena Bump,
        _mode: TransportMode,
        _allow_multiple_lobes: bool,
    ) -> ScatteringFunctions<'arena> {
        let mut bsdf = BSDF::new(si, None);
        if !self.kd.is_black() {
            bsdf.add(LambertianReflection::alloc(arena, self.kd));
        }
        ScatteringFunctions::from_bsdf(arena.alloc(bsdf))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use lumen_core::geometry::*;

    fn surface() -> SurfaceInteraction<'static> {
        SurfaceInteraction::new(
            Point3f::ZERO,
            Point2f::new(0.5, 0.5),
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            0.0,
            false,
        )
    }

    #[test]
    fn lambertian_lobe_evaluates_to_kd_over_pi() {
        let arena = Bump::new();
        let si = surface();
        let material = MatteMaterial::new(Spectrum::new(0.6));
        let sf = material.compute_scattering_functions(&si, &arena, TransportMode::Radiance, true);
        let bsdf = sf.bsdf.expect("bsdf");
        assert!(sf.bssrdf.is_none());
        assert_eq!(bsdf.num_components(BxDFType::BSDF_ALL), 1);
        assert_eq!(bsdf.num_components(BxDFType::BSDF_REFLECTION | BxDFType::BSDF_DIFFUSE), 1);

        let wo = Vector3f::new(0.0, 0.0, 1.0);
        let wi = Vector3f::new(0.6, 0.0, 0.8);
        let f = bsdf.f(&wo, &wi, BxDFType::BSDF_ALL);
        assert!(approx_eq!(Float, f[0], 0.6 * INV_PI, ulps = 4));

        // No transmission through an opaque surface.
        let below = Vector3f::new(0.0, 0.0, -1.0);
        assert!(bsdf.f(&wo, &below, BxDFType::BSDF_ALL).is_black());
    }

    #[test]
    fn black_reflectance_has_no_lobes() {
        let arena = Bump::new();
        let si = surface();
        let material = MatteMaterial::new(Spectrum::new(-1.0));
        let sf = material.compute_scattering_functions(&si, &arena, TransportMode::Radiance, true);
        assert_eq!(sf.bsdf.expect("bsdf").num_components(BxDFType::BSDF_ALL), 0);
    }
}
