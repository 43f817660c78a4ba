//! Distant Source

use lumen_core::geometry::*;
use lumen_core::interaction::*;
use lumen_core::light::*;
use lumen_core::pbrt::*;
use lumen_core::scene::*;
use lumen_core::spectrum::*;
use std::sync::{PoisonError, RwLock};

/// Implements a directional light source that deposits illumination from the
/// same direction at every point in space.
pub struct DistantLight {
    /// Light source type.
    pub light_type: LightType,

    /// The emitted radiance `L`.
    pub emitted_radiance: Spectrum,

    /// Direction towards the light.
    pub w_light: Vector3f,

    /// Center and radius of the spherical world bounds. Calculated in
    /// `preprocess()`.
    world_sphere: RwLock<(Point3f, Float)>,
}

impl DistantLight {
    /// Returns a new `DistantLight`.
    ///
    /// * `emitted_radiance` - The emitted radiance.
    /// * `w_light`          - Direction towards the light.
    pub fn new(emitted_radiance: Spectrum, w_light: Vector3f) -> Self {
        Self {
            light_type: LightType::DELTA_DIRECTION_LIGHT,
            emitted_radiance,
            w_light: w_light.normalize(),
            world_sphere: RwLock::new((Point3f::ZERO, 1.0)),
        }
    }

    /// Returns the radius of the spherical world bounds.
    pub fn world_radius(&self) -> Float {
        self.world_sphere.read().unwrap_or_else(PoisonError::into_inner).1
    }
}

impl Light for DistantLight {
    fn preprocess(&self, scene: &Scene) {
        let sphere = scene.world_bound.bounding_sphere();
        debug!("DistantLight world sphere center {}, radius {}", sphere.0, sphere.1);
        *self.world_sphere.write().unwrap_or_else(PoisonError::into_inner) = sphere;
    }

    fn get_type(&self) -> LightType {
        self.light_type
    }

    /// Return the radiance arriving at an interaction point. The shadow ray
    /// ends outside the world bounds.
    ///
    /// * `hit` - The interaction hit point.
    /// * `u`   - Sample value for Monte Carlo integration.
    fn sample_li(&self, hit: &Hit, _u: &Point2f) -> Li {
        let world_radius = self.world_radius();
        let p_outside = hit.p + self.w_light * (2.0 * world_radius);

        let p1 = Hit::new_minimal(p_outside, hit.time, hit.medium_interface.clone());
        let vis = VisibilityTester::new(hit.clone(), p1);
        Li::new(self.w_light, 1.0, Some(vis), self.emitted_radiance)
    }

    fn power(&self) -> Spectrum {
        let world_radius = self.world_radius();
        self.emitted_radiance * PI * world_radius * world_radius
    }

    fn pdf_li(&self, _hit: &Hit, _wi: &Vector3f) -> Float {
        0.0
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use lumen_core::primitive::*;
    use lumen_core::primitives::*;
    use shapes::*;
    use std::sync::Arc;

    #[test]
    fn preprocess_uses_scene_bounds() {
        let light = Arc::new(DistantLight::new(Spectrum::ONE, Vector3f::new(0.0, 2.0, 0.0)));
        let sphere = Arc::new(Sphere::new(Point3f::ZERO, 3.0, false));
        let prim: ArcPrimitive = Arc::new(GeometricPrimitive::new(sphere, None, None, Default::default()));
        let aggregate: ArcPrimitive = Arc::new(PrimitiveList::new(vec![prim]));
        let lights = vec![light.clone() as ArcLight];
        let _scene = Scene::new(aggregate, lights);

        // Radius of the sphere enclosing a cube of half-width 3.
        let expected = 3.0 * (3.0 as Float).sqrt();
        assert!(approx_eq!(Float, light.world_radius(), expected, epsilon = 1e-4));
        assert!(approx_eq!(Float, light.power()[0], PI * expected * expected, epsilon = 1e-2));
    }

    #[test]
    fn direction_is_constant() {
        let light = DistantLight::new(Spectrum::new(2.0), Vector3f::new(0.0, 0.0, 5.0));
        let a = light.sample_li(&Hit::new_minimal(Point3f::ZERO, 0.0, None), &Point2f::new(0.1, 0.2));
        let b = light.sample_li(&Hit::new_minimal(Point3f::new(4.0, -1.0, 2.0), 0.0, None), &Point2f::new(0.9, 0.3));
        assert_eq!(a.wi, b.wi);
        assert!(approx_eq!(Float, a.wi.z, 1.0, ulps = 2));
        assert_eq!(a.value, Spectrum::new(2.0));
        assert!(light.is_delta_light());
    }
}
