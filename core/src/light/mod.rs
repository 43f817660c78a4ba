//! Light

use crate::geometry::*;
use crate::interaction::*;
use crate::pbrt::*;
use crate::scene::*;
use crate::spectrum::*;
use std::sync::Arc;

mod light_type;
mod visibility_tester;

// Re-export
pub use light_type::*;
pub use visibility_tester::*;

/// Return value for `Light::sample_li()`.
#[derive(Clone)]
pub struct Li {
    /// Incident direction.
    pub wi: Vector3f,

    /// PDF with respect to solid angle. Zero for a failed sample.
    pub pdf: Float,

    /// Visibility tester.
    pub visibility: Option<VisibilityTester>,

    /// Radiance arriving at intersection point.
    pub value: Spectrum,
}

impl Li {
    /// Return a new `Li`.
    ///
    /// * `wi`         - Incident direction.
    /// * `pdf`        - PDF.
    /// * `visibility` - Visibility tester.
    /// * `value`      - Radiance arriving at intersection point.
    pub fn new(wi: Vector3f, pdf: Float, visibility: Option<VisibilityTester>, value: Spectrum) -> Self {
        Self {
            wi,
            pdf,
            visibility,
            value,
        }
    }
}

impl Default for Li {
    /// Returns a failed sample that carries no radiance.
    fn default() -> Self {
        Self::new(Vector3f::ZERO, 0.0, None, Spectrum::ZERO)
    }
}

/// Light trait provides common behavior.
pub trait Light {
    /// Initialize the light source before rendering begins.
    ///
    /// * `scene` - The scene.
    fn preprocess(&self, _scene: &Scene) {}

    /// Returns the type of light.
    fn get_type(&self) -> LightType;

    /// Return the radiance arriving at an interaction point.
    ///
    /// * `hit` - The interaction hit point.
    /// * `u`   - Sample value for Monte Carlo integration.
    fn sample_li(&self, hit: &Hit, u: &Point2f) -> Li;

    /// Return the total emitted power.
    fn power(&self) -> Spectrum;

    /// Returns emitted radiance due to that light along a ray that escapes the
    /// scene bounds.
    ///
    /// * `ray` - The ray.
    fn le(&self, _ray: &Ray) -> Spectrum {
        Spectrum::ZERO
    }

    /// Returns the probability density with respect to solid angle for the
    /// light's `sample_li()`.
    ///
    /// * `hit` - The interaction hit point.
    /// * `wi`  - The incident direction.
    fn pdf_li(&self, hit: &Hit, wi: &Vector3f) -> Float;

    /// Returns whether light source is a delta light.
    fn is_delta_light(&self) -> bool {
        self.get_type().is_delta_light()
    }

    /// Returns the number of samples to use for the light source.
    fn get_num_samples(&self) -> usize {
        1
    }
}

/// Atomic reference counted `Light`.
pub type ArcLight = Arc<dyn Light + Send + Sync>;

/// AreaLight trait provides common behavior for area lights.
pub trait AreaLight: Light {
    /// Returns the area light's emitted radiance in a given outgoing direction.
    ///
    /// * `hit` - Point on a surface to evaluate emitted radiance.
    /// * `w`   - Outgoing direction.
    fn l(&self, hit: &Hit, w: &Vector3f) -> Spectrum;
}

/// Atomic reference counted `AreaLight`.
pub type ArcAreaLight = Arc<dyn AreaLight + Send + Sync>;

/// Returns `true` if an area light and a light are the same object.
///
/// * `area_light` - The area light.
/// * `light`      - The light.
pub fn is_same_light(area_light: &ArcAreaLight, light: &ArcLight) -> bool {
    std::ptr::eq(
        Arc::as_ptr(area_light) as *const (),
        Arc::as_ptr(light) as *const (),
    )
}
