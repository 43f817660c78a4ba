//! Power Light Distribution.

use super::LightDistribution;
use crate::geometry::*;
use crate::integrator::compute_light_power_distribution;
use crate::sampling::*;
use crate::scene::*;
use std::sync::Arc;

/// Returns a distribution with sampling probability proportional to the
/// total emitted power of each light, ignoring the lookup point. Does poorly
/// when lights matter in some regions of the scene and not in others.
pub struct PowerLightDistribution {
    distrib: Option<Arc<Distribution1D>>,
}

impl PowerLightDistribution {
    /// Create a new instance of `PowerLightDistribution`.
    ///
    /// * `scene` - The scene.
    pub fn new(scene: &Scene) -> Self {
        Self {
            distrib: compute_light_power_distribution(scene).map(Arc::new),
        }
    }
}

impl LightDistribution for PowerLightDistribution {
    fn lookup(&self, _p: &Point3f) -> Option<Arc<Distribution1D>> {
        self.distrib.clone()
    }
}
