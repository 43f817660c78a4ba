//! Medium

use crate::geometry::*;
use crate::interaction::*;
use crate::sampler::*;
use crate::spectrum::*;
use std::sync::Arc;

mod henyey_greenstein;
mod homogeneous;

// Re-exports
pub use henyey_greenstein::*;
pub use homogeneous::*;

/// Medium trait to handle volumetric scattering properties.
pub trait Medium {
    /// Returns the beam transmittance along a given ray from its origin to
    /// `ray.t_max`.
    ///
    /// * `ray`     - The ray.
    /// * `sampler` - The sampler.
    fn tr(&self, ray: &Ray, sampler: &mut dyn Sampler) -> Spectrum;

    /// Samples a scattering point along the ray. Returns the throughput
    /// weight for the sampled segment and the medium interaction if the
    /// sample fell inside the medium before `ray.t_max`.
    ///
    /// * `ray`     - The ray.
    /// * `sampler` - The sampler.
    fn sample(&self, ray: &Ray, sampler: &mut dyn Sampler) -> (Spectrum, Option<MediumInteraction>);
}

/// Atomic reference counted `Medium`.
pub type ArcMedium = Arc<dyn Medium + Send + Sync>;

/// MediumInterface represents the boundary interface between two media.
#[derive(Clone, Default)]
pub struct MediumInterface {
    /// Represent the interior of a geometric primitive.
    pub inside: Option<ArcMedium>,

    /// Represent the exterior of a geometric primitive.
    pub outside: Option<ArcMedium>,
}

impl MediumInterface {
    /// Create a medium interface between two media.
    ///
    /// * `inside`  - The interior medium.
    /// * `outside` - The exterior medium.
    pub fn new(inside: Option<ArcMedium>, outside: Option<ArcMedium>) -> Self {
        Self { inside, outside }
    }

    /// Create a medium interface that represents a vacuum.
    pub fn vacuum() -> Self {
        Self::default()
    }

    /// Returns `true` if the medium interface marks a transition between
    /// two distinct media.
    pub fn is_medium_transition(&self) -> bool {
        match (self.inside.as_ref(), self.outside.as_ref()) {
            (Some(inside), Some(outside)) => !Arc::ptr_eq(inside, outside),
            (Some(_), None) | (None, Some(_)) => true,
            (None, None) => false,
        }
    }
}

impl From<Option<ArcMedium>> for MediumInterface {
    /// Create a medium interface with the same medium on both sides.
    ///
    /// * `medium` - The medium on either side of the interface.
    fn from(medium: Option<ArcMedium>) -> Self {
        Self {
            inside: medium.clone(),
            outside: medium,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn fog() -> ArcMedium {
        Arc::new(HomogeneousMedium::new(
            Spectrum::new(0.5),
            Spectrum::new(0.5),
            0.0,
        ))
    }

    #[test]
    fn vacuum_is_not_a_transition() {
        assert!(!MediumInterface::vacuum().is_medium_transition());
    }

    #[test]
    fn same_medium_on_both_sides_is_not_a_transition() {
        let m = fog();
        assert!(!MediumInterface::from(Some(m)).is_medium_transition());
    }

    #[test]
    fn distinct_media_is_a_transition() {
        assert!(MediumInterface::new(Some(fog()), Some(fog())).is_medium_transition());
        assert!(MediumInterface::new(Some(fog()), None).is_medium_transition());
    }
}
