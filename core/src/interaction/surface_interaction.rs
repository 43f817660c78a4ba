//! Surface Interactions

use super::Hit;
use crate::geometry::*;
use crate::material::*;
use crate::pbrt::*;
use crate::primitive::*;
use crate::spectrum::*;
use bumpalo::Bump;
use std::fmt;

/// SurfaceInteraction represents geometry of a particular point on a surface.
///
/// The lifetime specifiers:
/// * `'scene` - Shared reference to the scene containing primitive.
#[derive(Clone)]
pub struct SurfaceInteraction<'scene> {
    /// The common interaction data.
    pub hit: Hit,

    /// The uv coordinates from surface parametrization.
    pub uv: Point2f,

    /// Parametric partial derivative of the point ∂p/∂u.
    pub dpdu: Vector3f,

    /// Parametric partial derivative of the point ∂p/∂v.
    pub dpdv: Vector3f,

    /// Shading geometry used for perturbed values.
    pub shading: Shading,

    /// The primitive that was hit. Set by `Primitive::intersect()`.
    pub primitive: Option<&'scene dyn Primitive>,
}

impl<'scene> SurfaceInteraction<'scene> {
    /// Create a new surface interaction. The geometric normal is the
    /// normalized cross product of the partial derivatives.
    ///
    /// * `p`                   - Point of interaction.
    /// * `uv`                  - The uv coordinates from surface parametrization.
    /// * `wo`                  - The negative ray direction.
    /// * `dpdu`                - Parametric partial derivative of the point ∂p/∂u.
    /// * `dpdv`                - Parametric partial derivative of the point ∂p/∂v.
    /// * `time`                - Time when interaction occurred.
    /// * `reverse_orientation` - Flip the normal.
    pub fn new(
        p: Point3f,
        uv: Point2f,
        wo: Vector3f,
        dpdu: Vector3f,
        dpdv: Vector3f,
        time: Float,
        reverse_orientation: bool,
    ) -> Self {
        let mut n = Normal3f::from(dpdu.cross(&dpdv).normalize());
        if reverse_orientation {
            n = -n;
        }

        Self {
            hit: Hit::new(p, time, wo, n, None),
            uv,
            dpdu,
            dpdv,
            shading: Shading { n, dpdu, dpdv },
            primitive: None,
        }
    }

    /// Updates the shading geometry.
    ///
    /// * `dpdus`                          - Shading ∂p/∂u.
    /// * `dpdvs`                          - Shading ∂p/∂v.
    /// * `orientation_is_authoritative`   - If `true` the geometric normal is
    ///                                      flipped toward the shading normal,
    ///                                      otherwise the other way round.
    pub fn set_shading_geometry(&mut self, dpdus: &Vector3f, dpdvs: &Vector3f, orientation_is_authoritative: bool) {
        self.shading.n = Normal3f::from(dpdus.cross(dpdvs).normalize());
        if orientation_is_authoritative {
            self.hit.n = self.hit.n.face_forward(&Vector3f::from(self.shading.n));
        } else {
            self.shading.n = self.shading.n.face_forward(&Vector3f::from(self.hit.n));
        }
        self.shading.dpdu = *dpdus;
        self.shading.dpdv = *dpdvs;
    }

    /// Allocates the BSDF (and BSSRDF if any) of the hit primitive's material
    /// in the arena. Returns empty scattering functions for material-less
    /// surfaces.
    ///
    /// * `arena`                - The per-thread memory arena.
    /// * `mode`                 - Transport mode.
    /// * `allow_multiple_lobes` - Allow multiple lobes.
    pub fn compute_scattering_functions<'arena>(
        &self,
        arena: &'arena Bump,
        mode: TransportMode,
        allow_multiple_lobes: bool,
    ) -> ScatteringFunctions<'arena> {
        match self.primitive {
            Some(primitive) => primitive.compute_scattering_functions(self, arena, mode, allow_multiple_lobes),
            None => ScatteringFunctions::default(),
        }
    }

    /// Returns the emitted radiance at a surface point intersected by a ray
    /// for an area light.
    ///
    /// * `w` - The outgoing direction.
    pub fn le(&self, w: &Vector3f) -> Spectrum {
        self.primitive
            .and_then(|primitive| primitive.get_area_light())
            .map_or(Spectrum::ZERO, |area_light| area_light.l(&self.hit, w))
    }

    /// Spawn's a new ray in the given direction.
    ///
    /// * `d` - The new direction.
    pub fn spawn_ray(&self, d: &Vector3f) -> Ray {
        self.hit.spawn_ray(d)
    }
}

impl<'scene> fmt::Display for SurfaceInteraction<'scene> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ p: {}, n: {}, wo: {}, shading.n: {}, uv: {} ]",
            self.hit.p, self.hit.n, self.hit.wo, self.shading.n, self.uv
        )
    }
}

/// Shading geometry used for perturbed values.
#[derive(Copy, Clone, Default)]
pub struct Shading {
    /// Shading normal.
    pub n: Normal3f,

    /// Shading ∂p/∂u.
    pub dpdu: Vector3f,

    /// Shading ∂p/∂v.
    pub dpdv: Vector3f,
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn si(reverse: bool) -> SurfaceInteraction<'static> {
        SurfaceInteraction::new(
            Point3f::ZERO,
            Point2f::ZERO,
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            0.0,
            reverse,
        )
    }

    #[test]
    fn normal_follows_partial_derivatives() {
        let si = si(false);
        assert!(approx_eq!(Float, si.hit.n.z, 1.0, ulps = 2));
        assert_eq!(si.hit.n, si.shading.n);
        assert!(approx_eq!(Float, self::si(true).hit.n.z, -1.0, ulps = 2));
    }

    #[test]
    fn shading_normal_is_flipped_toward_geometric_normal() {
        let mut si = si(false);
        si.set_shading_geometry(&Vector3f::new(0.0, 1.0, 0.0), &Vector3f::new(1.0, 0.0, 0.0), false);
        assert!(si.shading.n.z > 0.0);
    }

    #[test]
    fn surface_without_primitive_emits_nothing() {
        assert!(si(false).le(&Vector3f::new(0.0, 0.0, 1.0)).is_black());
    }
}
