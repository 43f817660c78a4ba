//! Triangle Filter

use lumen_core::filter::*;
use lumen_core::geometry::*;
use lumen_core::pbrt::*;

/// Implements the triangle filter in which the weight falls off linearly from
/// the filter center over the square extent of the filter.
pub struct TriangleFilter {
    /// Filter data.
    pub data: FilterData,
}

impl TriangleFilter {
    /// Returns a new instance of `TriangleFilter`.
    ///
    /// * `radius` - Radius of the filter in x and y directions; beyond this
    ///              filter is 0.
    pub fn new(radius: Vector2f) -> Self {
        Self {
            data: FilterData::new(radius),
        }
    }
}

impl Default for TriangleFilter {
    fn default() -> Self {
        Self::new(Vector2f::new(2.0, 2.0))
    }
}

impl Filter for TriangleFilter {
    fn get_data(&self) -> &FilterData {
        &self.data
    }

    fn evaluate(&self, p: &Point2f) -> Float {
        max(0.0, self.data.radius.x - abs(p.x)) * max(0.0, self.data.radius.y - abs(p.y))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
