//! Mirror Material

use bumpalo::Bump;
use lumen_core::interaction::*;
use lumen_core::material::*;
use lumen_core::pbrt::*;
use lumen_core::reflection::*;
use lumen_core::spectrum::*;

/// Implements a simple mirror, modeled with perfect specular reflection.
#[derive(Copy, Clone, Debug)]
pub struct MirrorMaterial {
    /// Reflectivity of the mirror.
    kr: Spectrum,
}

impl MirrorMaterial {
    /// Create a new `MirrorMaterial`.
    ///
    /// * `kr` - Reflectivity of the mirror.
    pub fn new(kr: Spectrum) -> Self {
        Self {
            kr: kr.clamp(0.0, INFINITY),
        }
    }
}

impl Default for MirrorMaterial {
    fn default() -> Self {
        Self::new(Spectrum::new(0.9))
    }
}

impl Material for MirrorMaterial {
    fn compute_scattering_functions<'arena>(
        &self,
        si: &SurfaceInteraction,
        arena: &'arena Bump,
        _mode: TransportMode,
        _allow_multiple_lobes: bool,
    ) -> ScatteringFunctions<'arena> {
        let mut bsdf = BSDF::new(si, None);
        if !self.kr.is_black() {
            bsdf.add(SpecularReflection::alloc(arena, self.kr, Fresnel::NoOp));
        }
        ScatteringFunctions::from_bsdf(arena.alloc(bsdf))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
