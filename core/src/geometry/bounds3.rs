//! 3-D Axis Aligned Bounding Boxes.

use crate::geometry::*;
use crate::pbrt::*;
use std::fmt;

/// 3-D Axis Aligned Bounding Box containing `Float` points.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds3f {
    /// Minimum bounds.
    pub p_min: Point3f,

    /// Maximum bounds.
    pub p_max: Point3f,
}

impl Default for Bounds3f {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bounds3f {
    /// Empty bounding box.
    pub const EMPTY: Self = Self {
        p_min: Point3f::new(Float::MAX, Float::MAX, Float::MAX),
        p_max: Point3f::new(Float::MIN, Float::MIN, Float::MIN),
    };

    /// Creates a new bounding box from 2 corner points.
    ///
    /// * `p1` - First point.
    /// * `p2` - Second point.
    pub fn new(p1: Point3f, p2: Point3f) -> Self {
        Self {
            p_min: p1.min(&p2),
            p_max: p1.max(&p2),
        }
    }

    /// Returns true if the box encloses no volume.
    pub fn is_empty(&self) -> bool {
        self.p_max.x < self.p_min.x || self.p_max.y < self.p_min.y || self.p_max.z < self.p_min.z
    }

    /// Returns the vector along the box diagonal from the minimum point to
    /// the maximum point.
    pub fn diagonal(&self) -> Vector3f {
        self.p_max - self.p_min
    }

    /// Returns the index of the longest axis.
    pub fn maximum_extent(&self) -> usize {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }

    /// Returns the center and radius of a sphere enclosing the box.
    pub fn bounding_sphere(&self) -> (Point3f, Float) {
        let center = Point3f::lerp(0.5, &self.p_min, &self.p_max);
        let radius = if self.is_empty() {
            0.0
        } else {
            center.distance(&self.p_max)
        };
        (center, radius)
    }

    /// Linearly interpolate between the corners by `t` in each dimension.
    ///
    /// * `t` - Interpolation parameter per dimension.
    pub fn lerp(&self, t: &Point3f) -> Point3f {
        Point3f::new(
            lerp(t.x, self.p_min.x, self.p_max.x),
            lerp(t.y, self.p_min.y, self.p_max.y),
            lerp(t.z, self.p_min.z, self.p_max.z),
        )
    }

    /// Returns the continuous position of a point relative to the corners;
    /// `p_min` maps to (0, 0, 0) and `p_max` to (1, 1, 1).
    ///
    /// * `p` - The point.
    pub fn offset(&self, p: &Point3f) -> Vector3f {
        let mut o = *p - self.p_min;
        if self.p_max.x > self.p_min.x {
            o.x /= self.p_max.x - self.p_min.x;
        }
        if self.p_max.y > self.p_min.y {
            o.y /= self.p_max.y - self.p_min.y;
        }
        if self.p_max.z > self.p_min.z {
            o.z /= self.p_max.z - self.p_min.z;
        }
        o
    }
}

impl Union<Bounds3f> for Bounds3f {
    fn union(&self, other: &Bounds3f) -> Self {
        Self {
            p_min: self.p_min.min(&other.p_min),
            p_max: self.p_max.max(&other.p_max),
        }
    }
}

impl Union<Point3f> for Bounds3f {
    fn union(&self, p: &Point3f) -> Self {
        Self {
            p_min: self.p_min.min(p),
            p_max: self.p_max.max(p),
        }
    }
}

impl fmt::Display for Bounds3f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.p_min, self.p_max)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maximum_extent_picks_longest_axis() {
        let b = Bounds3f::new(Point3f::new(0.0, 0.0, 0.0), Point3f::new(1.0, 3.0, 2.0));
        assert_eq!(b.maximum_extent(), 1);
    }

    #[test]
    fn union_with_empty_is_identity() {
        let b = Bounds3f::new(Point3f::new(-1.0, 0.0, 2.0), Point3f::new(1.0, 3.0, 4.0));
        assert_eq!(Bounds3f::EMPTY.union(&b), b);
    }

    #[test]
    fn bounding_sphere_of_empty_has_zero_radius() {
        assert_eq!(Bounds3f::EMPTY.bounding_sphere().1, 0.0);
    }
}
