//! Box Filter

use lumen_core::filter::*;
use lumen_core::geometry::*;
use lumen_core::pbrt::*;

/// Implements the box filter which equally weights all samples within a
/// square region of the image.
pub struct BoxFilter {
    /// Filter data.
    pub data: FilterData,
}

impl BoxFilter {
    /// Returns a new instance of `BoxFilter`.
    ///
    /// * `radius` - Radius of the filter in x and y directions; beyond this
    ///              filter is 0.
    pub fn new(radius: Vector2f) -> Self {
        Self {
            data: FilterData::new(radius),
        }
    }
}

impl Default for BoxFilter {
    fn default() -> Self {
        Self::new(Vector2f::new(0.5, 0.5))
    }
}

impl Filter for BoxFilter {
    fn get_data(&self) -> &FilterData {
        &self.data
    }

    fn evaluate(&self, _p: &Point2f) -> Float {
        1.0
    }
}
