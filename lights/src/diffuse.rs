//! Diffuse Area Light Source

use lumen_core::geometry::*;
use lumen_core::interaction::*;
use lumen_core::light::*;
use lumen_core::medium::*;
use lumen_core::pbrt::*;
use lumen_core::shape::*;
use lumen_core::spectrum::*;
use std::sync::Arc;

/// Implements a basic area light source with uniform spatial and directional
/// radiance distribution.
#[derive(Clone)]
pub struct DiffuseAreaLight {
    /// Light source type.
    pub light_type: LightType,

    /// Used to trace multiple shadow rays to the light to compute soft shadows.
    pub n_samples: usize,

    /// Participating medium.
    pub medium_interface: MediumInterface,

    /// Emitted radiance.
    pub l_emit: Spectrum,

    /// Shape describing surface of the light source.
    pub shape: ArcShape,

    /// Surface area of the shape.
    pub area: Float,

    /// Indicates whether light source 2-sided.
    pub two_sided: bool,
}

impl DiffuseAreaLight {
    /// Returns a new `DiffuseAreaLight`.
    ///
    /// * `l_emit`           - Emitted radiance.
    /// * `n_samples`        - Used to trace multiple shadow rays to the light
    ///                        to compute soft shadows.
    /// * `shape`            - Shape describing surface of the light source.
    /// * `two_sided`        - Indicates whether light source 2-sided.
    /// * `medium_interface` - Participating medium.
    pub fn new(
        l_emit: Spectrum,
        n_samples: usize,
        shape: ArcShape,
        two_sided: bool,
        medium_interface: MediumInterface,
    ) -> Self {
        let area = shape.area();
        Self {
            light_type: LightType::AREA_LIGHT,
            n_samples: max(1, n_samples),
            medium_interface,
            l_emit,
            shape: Arc::clone(&shape),
            area,
            two_sided,
        }
    }

    /// Returns the light behind both handles a scene needs: the area light
    /// attached to the emitting primitive and the light in the scene's light
    /// list. Both point to the same object.
    pub fn into_handles(self) -> (ArcAreaLight, ArcLight) {
        let light = Arc::new(self);
        let area_light: ArcAreaLight = light.clone();
        let light: ArcLight = light;
        (area_light, light)
    }
}

impl Light for DiffuseAreaLight {
    fn get_type(&self) -> LightType {
        self.light_type
    }

    /// Return the radiance arriving at an interaction point.
    ///
    /// * `hit` - The interaction hit point.
    /// * `u`   - Sample value for Monte Carlo integration.
    fn sample_li(&self, hit: &Hit, u: &Point2f) -> Li {
        let (mut p_shape_hit, pdf) = match self.shape.sample_ref(hit, u) {
            Some(sample) => sample,
            None => return Li::default(),
        };
        p_shape_hit.medium_interface = Some(self.medium_interface.clone());

        let wi = p_shape_hit.p - hit.p;
        if pdf == 0.0 || wi.length_squared() == 0.0 {
            return Li::default();
        }

        let wi = wi.normalize();
        let value = self.l(&p_shape_hit, &-wi);
        let visibility = Some(VisibilityTester::new(hit.clone(), p_shape_hit));
        Li::new(wi, pdf, visibility, value)
    }

    fn power(&self) -> Spectrum {
        let sides = if self.two_sided { 2.0 } else { 1.0 };
        sides * self.l_emit * self.area * PI
    }

    fn pdf_li(&self, hit: &Hit, wi: &Vector3f) -> Float {
        self.shape.pdf_ref(hit, wi)
    }

    fn get_num_samples(&self) -> usize {
        self.n_samples
    }
}

impl AreaLight for DiffuseAreaLight {
    /// Returns emitted radiance based on `two_sided` flag.
    ///
    /// * `hit` - The interaction point.
    /// * `w`   - Outgoing direction.
    fn l(&self, hit: &Hit, w: &Vector3f) -> Spectrum {
        if self.two_sided || hit.n.dot_vec(w) > 0.0 {
            self.l_emit
        } else {
            Spectrum::ZERO
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
