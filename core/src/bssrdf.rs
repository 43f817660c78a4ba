//! BSSRDF

use crate::geometry::*;
use crate::interaction::*;
use crate::pbrt::*;
use crate::reflection::*;
use crate::scene::*;
use crate::spectrum::*;
use bumpalo::Bump;

/// Result of `Bssrdf::sample_s()`.
///
/// The lifetime specifiers:
/// * `'scene` - The scene the exit point was found in.
/// * `'arena` - The arena the exit point's BSDF was allocated in.
pub struct BssrdfSample<'scene, 'arena> {
    /// Value of the BSSRDF for the sampled pair of points.
    pub s: Spectrum,

    /// The sampled exit point.
    pub pi: SurfaceInteraction<'scene>,

    /// BSDF at the exit point describing how light leaves the surface.
    pub bsdf: &'arena BSDF<'arena>,

    /// Probability density of the sampled exit point.
    pub pdf: Float,
}

/// Bidirectional scattering surface reflectance distribution function, for
/// light entering a surface at one point and leaving at another.
pub trait Bssrdf {
    /// Samples an exit point on the surface for light that entered at the
    /// point the BSSRDF was created for. Returns `None` if no exit point was
    /// found.
    ///
    /// * `scene` - The scene.
    /// * `u1`    - 1D sample value.
    /// * `u2`    - 2D sample value.
    /// * `arena` - The arena for the exit point's BSDF.
    fn sample_s<'scene, 'arena>(
        &self,
        scene: &'scene Scene,
        u1: Float,
        u2: &Point2f,
        arena: &'arena Bump,
    ) -> Option<BssrdfSample<'scene, 'arena>>;
}
