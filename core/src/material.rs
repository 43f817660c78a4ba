//! Material

use crate::bssrdf::*;
use crate::interaction::*;
use crate::reflection::*;
use bumpalo::Bump;
use std::sync::Arc;

/// Light transport mode enumeration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransportMode {
    /// Indicates incident ray that intersected a point started at the camera.
    Radiance,

    /// Indicates incident ray that intersected a point started at the light
    /// source.
    Importance,
}

/// The scattering functions at a surface point, allocated in the per-thread
/// arena. Both are `None` for surfaces that only delineate media.
///
/// The lifetime specifier:
/// * `'arena` - The arena the functions were allocated in.
#[derive(Copy, Clone, Default)]
pub struct ScatteringFunctions<'arena> {
    /// The BSDF.
    pub bsdf: Option<&'arena BSDF<'arena>>,

    /// The BSSRDF for materials with subsurface scattering.
    pub bssrdf: Option<&'arena dyn Bssrdf>,
}

impl<'arena> ScatteringFunctions<'arena> {
    /// Returns scattering functions with just a BSDF.
    ///
    /// * `bsdf` - The BSDF.
    pub fn from_bsdf(bsdf: &'arena BSDF<'arena>) -> Self {
        Self {
            bsdf: Some(bsdf),
            bssrdf: None,
        }
    }
}

/// Material trait provides common behavior.
pub trait Material {
    /// Allocates the light-scattering functions of the material at the
    /// intersection point on the surface.
    ///
    /// * `si`                   - The surface interaction at the intersection.
    /// * `arena`                - The arena for memory allocations.
    /// * `mode`                 - Transport mode.
    /// * `allow_multiple_lobes` - Indicates whether the material should use
    ///                            BxDFs that aggregate multiple types of
    ///                            scattering into a single BxDF when such BxDFs
    ///                            are available.
    fn compute_scattering_functions<'arena>(
        &self,
        si: &SurfaceInteraction,
        arena: &'arena Bump,
        mode: TransportMode,
        allow_multiple_lobes: bool,
    ) -> ScatteringFunctions<'arena>;
}

/// Atomic reference counted `Material`.
pub type ArcMaterial = Arc<dyn Material + Send + Sync>;
