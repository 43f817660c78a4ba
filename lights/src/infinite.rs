//! Infinite Area Light Source

use lumen_core::geometry::*;
use lumen_core::interaction::*;
use lumen_core::light::*;
use lumen_core::pbrt::*;
use lumen_core::sampling::*;
use lumen_core::scene::*;
use lumen_core::spectrum::*;
use std::sync::{PoisonError, RwLock};

/// Implements an infinitely far away area light source that surrounds the
/// scene with constant radiance.
pub struct InfiniteAreaLight {
    /// Light source type.
    pub light_type: LightType,

    /// Used to trace multiple shadow rays to the light to compute soft shadows.
    pub n_samples: usize,

    /// Radiance arriving from every direction.
    pub l: Spectrum,

    /// Radius of the spherical world bounds. Calculated in `preprocess()`.
    world_radius: RwLock<Float>,
}

impl InfiniteAreaLight {
    /// Returns a new `InfiniteAreaLight`.
    ///
    /// * `l`         - Radiance arriving from every direction.
    /// * `n_samples` - Used to trace multiple shadow rays to the light to
    ///                 compute soft shadows.
    pub fn new(l: Spectrum, n_samples: usize) -> Self {
        Self {
            light_type: LightType::INFINITE_LIGHT,
            n_samples: max(1, n_samples),
            l,
            world_radius: RwLock::new(1.0),
        }
    }

    fn world_radius(&self) -> Float {
        *self.world_radius.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Light for InfiniteAreaLight {
    fn preprocess(&self, scene: &Scene) {
        let (_, world_radius) = scene.world_bound.bounding_sphere();
        *self.world_radius.write().unwrap_or_else(PoisonError::into_inner) = world_radius;
    }

    fn get_type(&self) -> LightType {
        self.light_type
    }

    /// Return the radiance arriving at an interaction point from a uniformly
    /// sampled direction.
    ///
    /// * `hit` - The interaction hit point.
    /// * `u`   - Sample value for Monte Carlo integration.
    fn sample_li(&self, hit: &Hit, u: &Point2f) -> Li {
        let wi = uniform_sample_sphere(u);
        let p_outside = hit.p + wi * (2.0 * self.world_radius());

        let p1 = Hit::new_minimal(p_outside, hit.time, hit.medium_interface.clone());
        let vis = VisibilityTester::new(hit.clone(), p1);
        Li::new(wi, uniform_sphere_pdf(), Some(vis), self.l)
    }

    fn power(&self) -> Spectrum {
        let world_radius = self.world_radius();
        PI * world_radius * world_radius * self.l
    }

    fn le(&self, _ray: &Ray) -> Spectrum {
        self.l
    }

    fn pdf_li(&self, _hit: &Hit, _wi: &Vector3f) -> Float {
        uniform_sphere_pdf()
    }

    fn get_num_samples(&self) -> usize {
        self.n_samples
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn escaping_rays_see_constant_radiance() {
        let light = InfiniteAreaLight::new(Spectrum::new(0.25), 1);
        let ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 1.0, 0.0), INFINITY, 0.0, None);
        assert_eq!(light.le(&ray), Spectrum::new(0.25));
        assert!(light.get_type().matches(LightType::INFINITE_LIGHT));
        assert!(!light.is_delta_light());
    }

    #[test]
    fn sample_pdf_matches_pdf_li() {
        let light = InfiniteAreaLight::new(Spectrum::ONE, 4);
        let hit = Hit::new_minimal(Point3f::ZERO, 0.0, None);
        let li = light.sample_li(&hit, &Point2f::new(0.3, 0.7));
        assert!(approx_eq!(Float, li.wi.length(), 1.0, epsilon = 1e-5));
        assert_eq!(li.pdf, light.pdf_li(&hit, &li.wi));
        assert!(approx_eq!(Float, li.pdf, INV_FOUR_PI, ulps = 2));
        assert_eq!(light.get_num_samples(), 4);
    }
}
