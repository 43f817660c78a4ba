//! Uniform Light Distribution.

use super::LightDistribution;
use crate::geometry::*;
use crate::sampling::*;
use crate::scene::*;
use std::sync::Arc;

/// Returns a uniform distribution over all light sources, ignoring the
/// lookup point. Works well for scenes with a handful of lights.
pub struct UniformLightDistribution {
    distrib: Option<Arc<Distribution1D>>,
}

impl UniformLightDistribution {
    /// Create a new instance of `UniformLightDistribution`.
    ///
    /// * `scene` - The scene.
    pub fn new(scene: &Scene) -> Self {
        let distrib = if scene.lights.is_empty() {
            None
        } else {
            Some(Arc::new(Distribution1D::new(vec![1.0; scene.lights.len()])))
        };
        Self { distrib }
    }
}

impl LightDistribution for UniformLightDistribution {
    fn lookup(&self, _p: &Point3f) -> Option<Arc<Distribution1D>> {
        self.distrib.clone()
    }
}
