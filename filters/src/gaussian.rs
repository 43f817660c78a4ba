//! Gaussian Filter

use lumen_core::filter::*;
use lumen_core::geometry::*;
use lumen_core::pbrt::*;

/// Implements the Gaussian filter. The Gaussian value at the radius is
/// subtracted so the filter goes to 0 at its extent.
pub struct GaussianFilter {
    /// Filter data.
    pub data: FilterData,

    /// Falloff rate of the filter.
    pub alpha: Float,

    /// `exp(-alpha * radius.x^2)`.
    pub exp_x: Float,

    /// `exp(-alpha * radius.y^2)`.
    pub exp_y: Float,
}

impl GaussianFilter {
    /// Returns a new instance of `GaussianFilter`.
    ///
    /// * `radius` - Radius of the filter in x and y directions; beyond this
    ///              filter is 0.
    /// * `alpha`  - Falloff rate; larger values give a sharper filter.
    pub fn new(radius: Vector2f, alpha: Float) -> Self {
        Self {
            data: FilterData::new(radius),
            alpha,
            exp_x: (-alpha * radius.x * radius.x).exp(),
            exp_y: (-alpha * radius.y * radius.y).exp(),
        }
    }

    /// Returns the offset 1D Gaussian at `d`.
    ///
    /// * `d`    - Distance from the center.
    /// * `expv` - Gaussian value at the radius.
    fn gaussian(&self, d: Float, expv: Float) -> Float {
        max(0.0, (-self.alpha * d * d).exp() - expv)
    }
}

impl Default for GaussianFilter {
    fn default() -> Self {
        Self::new(Vector2f::new(1.5, 1.5), 2.0)
    }
}

impl Filter for GaussianFilter {
    fn get_data(&self) -> &FilterData {
        &self.data
    }

    fn evaluate(&self, p: &Point2f) -> Float {
        self.gaussian(p.x, self.exp_x) * self.gaussian(p.y, self.exp_y)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
