//! Point Light Source

use lumen_core::geometry::*;
use lumen_core::interaction::*;
use lumen_core::light::*;
use lumen_core::medium::*;
use lumen_core::pbrt::*;
use lumen_core::spectrum::*;

/// Implements an isotropic point light source that emits the same amount of
/// light in all directions.
#[derive(Clone)]
pub struct PointLight {
    /// Light source type.
    pub light_type: LightType,

    /// Participating medium.
    pub medium_interface: MediumInterface,

    /// Position.
    pub p_light: Point3f,

    /// Intensity.
    pub intensity: Spectrum,
}

impl PointLight {
    /// Returns a new `PointLight`.
    ///
    /// * `p_light`          - Position.
    /// * `intensity`        - Intensity.
    /// * `medium_interface` - Participating medium.
    pub fn new(p_light: Point3f, intensity: Spectrum, medium_interface: MediumInterface) -> Self {
        Self {
            light_type: LightType::DELTA_POSITION_LIGHT,
            medium_interface,
            p_light,
            intensity,
        }
    }
}

impl Light for PointLight {
    fn get_type(&self) -> LightType {
        self.light_type
    }

    /// Return the radiance arriving at an interaction point. Falls off with
    /// the inverse square of the distance.
    ///
    /// * `hit` - The interaction hit point.
    /// * `u`   - Sample value for Monte Carlo integration.
    fn sample_li(&self, hit: &Hit, _u: &Point2f) -> Li {
        let d2 = self.p_light.distance_squared(&hit.p);
        if d2 == 0.0 {
            return Li::default();
        }

        let wi = (self.p_light - hit.p).normalize();
        let p1 = Hit::new_minimal(self.p_light, hit.time, Some(self.medium_interface.clone()));
        let vis = VisibilityTester::new(hit.clone(), p1);
        Li::new(wi, 1.0, Some(vis), self.intensity / d2)
    }

    fn power(&self) -> Spectrum {
        FOUR_PI * self.intensity
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

    #[test]
    fn inverse_square_falloff() {
        let light = PointLight::new(Point3f::new(0.0, 0.0, 2.0), Spectrum::new(8.0), MediumInterface::vacuum());
        let hit = Hit::new_minimal(Point3f::ZERO, 0.0, None);
        let li = light.sample_li(&hit, &Point2f::new(0.5, 0.5));
        assert!(approx_eq!(Float, li.value[0], 2.0, ulps = 2));
        assert_eq!(li.pdf, 1.0);
        assert!(approx_eq!(Float, li.wi.z, 1.0, ulps = 2));
        assert!(li.visibility.is_some());
    }

    #[test]
    fn is_delta_with_zero_pdf() {
        let light = PointLight::new(Point3f::ZERO, Spectrum::ONE, MediumInterface::vacuum());
        assert!(light.is_delta_light());
        let hit = Hit::new_minimal(Point3f::new(1.0, 0.0, 0.0), 0.0, None);
        assert_eq!(light.pdf_li(&hit, &Vector3f::new(-1.0, 0.0, 0.0)), 0.0);
        assert!(approx_eq!(Float, light.power()[1], FOUR_PI, ulps = 2));
    }

    #[test]
    fn coincident_point_is_a_failed_sample() {
        let light = PointLight::new(Point3f::ZERO, Spectrum::ONE, MediumInterface::vacuum());
        let hit = Hit::new_minimal(Point3f::ZERO, 0.0, None);
        let li = light.sample_li(&hit, &Point2f::new(0.5, 0.5));
        assert_eq!(li.pdf, 0.0);
        assert!(li.value.is_black());
    }
}
