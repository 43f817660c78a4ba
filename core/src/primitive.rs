//! Primitives

use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::material::*;
use bumpalo::Bump;
use std::sync::Arc;

/// Primitive is the bridge between the geometry processing and shading
/// subsystems.
pub trait Primitive {
    /// Returns a bounding box in the world space.
    fn world_bound(&self) -> Bounds3f;

    /// Returns geometric details if a ray intersects the primitive and updates
    /// the `t_max` parameter of the ray. If there is no intersection, `None` is
    /// returned.
    ///
    /// * `r` - The ray.
    fn intersect(&self, r: &mut Ray) -> Option<SurfaceInteraction<'_>>;

    /// Returns `true` if a ray-primitive intersection succeeds; otherwise `false`.
    ///
    /// * `r` - The ray.
    fn intersect_p(&self, r: &Ray) -> bool;

    /// Returns the area light that describes the primitive's emission
    /// distribution, if the primitive is itself a light source.
    fn get_area_light(&self) -> Option<&ArcAreaLight>;

    /// Returns the material assigned to the primitive. If `None` is returned,
    /// the primitive only delineates a boundary between participating media
    /// and ray intersections with it should be ignored.
    fn get_material(&self) -> Option<&ArcMaterial>;

    /// Allocates the light-scattering functions of the material at the
    /// intersection point in the given arena.
    ///
    /// * `si`                   - The surface interaction at the intersection.
    /// * `arena`                - The per-thread memory arena.
    /// * `mode`                 - Transport mode.
    /// * `allow_multiple_lobes` - Allow multiple lobes.
    fn compute_scattering_functions<'arena>(
        &self,
        si: &SurfaceInteraction,
        arena: &'arena Bump,
        mode: TransportMode,
        allow_multiple_lobes: bool,
    ) -> ScatteringFunctions<'arena>;
}

/// Atomic reference counted `Primitive`.
pub type ArcPrimitive = Arc<dyn Primitive + Send + Sync>;
