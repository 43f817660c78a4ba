//! Interactions

use crate::geometry::*;
use crate::medium::*;
use crate::pbrt::*;

mod medium_interaction;
mod surface_interaction;

pub use medium_interaction::*;
pub use surface_interaction::*;

/// A scattering vertex. Surface and medium vertices are told apart once when
/// the vertex is created and dispatched by pattern matching afterwards.
#[derive(Copy, Clone)]
pub enum Interaction<'a> {
    /// Represents geometry of a particular point on a surface.
    Surface { si: &'a SurfaceInteraction<'a> },

    /// Represents an interaction point in a scattering medium.
    Medium { mi: &'a MediumInteraction },
}

impl<'a> Interaction<'a> {
    /// Returns the interaction hit point.
    pub fn get_hit(&self) -> &'a Hit {
        match self {
            Self::Surface { si } => &si.hit,
            Self::Medium { mi } => &mi.hit,
        }
    }
}

impl<'a> From<&'a SurfaceInteraction<'a>> for Interaction<'a> {
    fn from(si: &'a SurfaceInteraction<'a>) -> Self {
        Self::Surface { si }
    }
}

impl<'a> From<&'a MediumInteraction> for Interaction<'a> {
    fn from(mi: &'a MediumInteraction) -> Self {
        Self::Medium { mi }
    }
}

/// Hit provides common data shared by surface and medium interactions.
#[derive(Clone, Default)]
pub struct Hit {
    /// Point of interaction.
    pub p: Point3f,

    /// Time when interaction occurred.
    pub time: Float,

    /// The negative ray direction (outgoing direction used when computing
    /// lighting at points).
    pub wo: Vector3f,

    /// Surface normal at the point `p`. Zero for medium interactions.
    pub n: Normal3f,

    /// The medium interface used for scattering media.
    pub medium_interface: Option<MediumInterface>,
}

impl Hit {
    /// Create a new hit. `wo` is normalized; use `Hit::new_minimal()` when
    /// there is no outgoing direction.
    ///
    /// `p`                - Point of interaction.
    /// `time`             - Time when interaction occurred.
    /// `wo`               - The negative ray direction.
    /// `n`                - Surface normal at the point `p`.
    /// `medium_interface` - The medium interface used for scattering media.
    pub fn new(
        p: Point3f,
        time: Float,
        wo: Vector3f,
        n: Normal3f,
        medium_interface: Option<MediumInterface>,
    ) -> Self {
        Self {
            p,
            time,
            wo: wo.normalize(),
            n,
            medium_interface,
        }
    }

    /// Create a new hit from minimal fields.
    ///
    /// `p`                - Point of interaction.
    /// `time`             - Time when interaction occurred.
    /// `medium_interface` - The medium interface used for scattering media.
    pub fn new_minimal(p: Point3f, time: Float, medium_interface: Option<MediumInterface>) -> Self {
        Self {
            p,
            time,
            medium_interface,
            ..Self::default()
        }
    }

    /// Returns `true` if this is a surface interaction.
    pub fn is_surface_interaction(&self) -> bool {
        !self.n.is_zero()
    }

    /// Returns the ray origin offset away from the surface on the side `w`
    /// points to.
    ///
    /// * `w` - Direction of the ray leaving the surface.
    fn offset_origin(&self, w: &Vector3f) -> Point3f {
        if self.n.is_zero() {
            return self.p;
        }
        let magnitude = max(1.0, max(abs(self.p.x), max(abs(self.p.y), abs(self.p.z))));
        self.p.offset_ray_origin(&self.n, w, RAY_EPSILON * magnitude)
    }

    /// Spawn's a new ray in the given direction.
    ///
    /// * `d` - The new direction.
    pub fn spawn_ray(&self, d: &Vector3f) -> Ray {
        Ray::new(
            self.offset_origin(d),
            *d,
            INFINITY,
            self.time,
            self.get_medium_in_direction(d),
        )
    }

    /// Spawn's a new ray towards another point. The ray stops just short of
    /// the target.
    ///
    /// * `p` - The target point.
    pub fn spawn_ray_to_point(&self, p: &Point3f) -> Ray {
        let origin = self.offset_origin(&(*p - self.p));
        let d = *p - origin;
        Ray::new(
            origin,
            d,
            1.0 - SHADOW_EPSILON,
            self.time,
            self.get_medium_in_direction(&d),
        )
    }

    /// Spawn's a new ray towards another interaction.
    ///
    /// * `hit` - The interaction.
    pub fn spawn_ray_to_hit(&self, hit: &Hit) -> Ray {
        let origin = self.offset_origin(&(hit.p - self.p));
        let target = hit.offset_origin(&(origin - hit.p));
        let d = target - origin;
        Ray::new(
            origin,
            d,
            1.0 - SHADOW_EPSILON,
            self.time,
            self.get_medium_in_direction(&d),
        )
    }

    /// Returns the medium on the side of the surface a direction points to.
    ///
    /// * `w` - The direction.
    pub fn get_medium_in_direction(&self, w: &Vector3f) -> Option<ArcMedium> {
        self.medium_interface.as_ref().and_then(|mi| {
            if w.dot_normal(&self.n) > 0.0 {
                mi.outside.clone()
            } else {
                mi.inside.clone()
            }
        })
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    fn surface_hit() -> Hit {
        Hit::new(
            Point3f::new(0.0, 0.0, 0.0),
            0.0,
            Vector3f::new(0.0, 0.0, 2.0),
            Normal3f::new(0.0, 0.0, 1.0),
            None,
        )
    }

    #[test]
    fn wo_is_normalized() {
        assert!(approx_eq!(Float, surface_hit().wo.length(), 1.0, ulps = 2));
    }

    #[test]
    fn spawned_rays_leave_from_the_correct_side() {
        let hit = surface_hit();
        let up = hit.spawn_ray(&Vector3f::new(0.0, 0.0, 1.0));
        assert!(up.o.z > 0.0);
        let down = hit.spawn_ray(&Vector3f::new(0.0, 0.0, -1.0));
        assert!(down.o.z < 0.0);
    }

    #[test]
    fn ray_to_point_stops_short_of_target() {
        let hit = surface_hit();
        let target = Point3f::new(0.0, 0.0, 5.0);
        let ray = hit.spawn_ray_to_point(&target);
        assert!(ray.at(ray.t_max).z < target.z);
        assert!(ray.at(ray.t_max).z > 4.99);
    }

    #[test]
    fn medium_hits_are_not_offset() {
        let hit = Hit::new_minimal(Point3f::new(1.0, 2.0, 3.0), 0.0, None);
        let ray = hit.spawn_ray(&Vector3f::new(1.0, 0.0, 0.0));
        assert_eq!(ray.o, hit.p);
        assert!(!hit.is_surface_interaction());
    }
}
