//! 2-D Axis Aligned Bounding Boxes.

use crate::geometry::*;
use crate::pbrt::*;
use itertools::{iproduct, Product};
use num_traits::Num;
use std::fmt;
use std::ops::Range;

/// 2-D Axis Aligned Bounding Box.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Bounds2<T> {
    /// Minimum bounds.
    pub p_min: Point2<T>,

    /// Maximum bounds.
    pub p_max: Point2<T>,
}

/// 2-D bounding box containing `Float` points.
pub type Bounds2f = Bounds2<Float>;

/// 2-D bounding box containing `Int` points.
pub type Bounds2i = Bounds2<Int>;

impl Bounds2f {
    /// Empty bounding box.
    pub const EMPTY: Self = Self {
        p_min: Point2 { x: Float::MAX, y: Float::MAX },
        p_max: Point2 { x: Float::MIN, y: Float::MIN },
    };

    /// Unit square [0, 1]^2, e.g. a crop window covering the whole image.
    pub const UNIT: Self = Self {
        p_min: Point2 { x: 0.0, y: 0.0 },
        p_max: Point2 { x: 1.0, y: 1.0 },
    };
}

impl Bounds2i {
    /// Empty bounding box.
    pub const EMPTY: Self = Self {
        p_min: Point2 { x: Int::MAX, y: Int::MAX },
        p_max: Point2 { x: Int::MIN, y: Int::MIN },
    };
}

impl From<Bounds2i> for Bounds2f {
    /// Convert a `Bounds2i` to `Bounds2f`.
    ///
    /// * `b` - The `Bounds2i` to convert.
    fn from(b: Bounds2i) -> Self {
        Self {
            p_min: Point2f::from(b.p_min),
            p_max: Point2f::from(b.p_max),
        }
    }
}

impl From<Bounds2f> for Bounds2i {
    /// Convert a `Bounds2f` to `Bounds2i`.
    ///
    /// * `b` - The `Bounds2f` to convert.
    fn from(b: Bounds2f) -> Self {
        Self {
            p_min: Point2i::from(b.p_min),
            p_max: Point2i::from(b.p_max),
        }
    }
}

impl<T: Num + PartialOrd + Copy> Bounds2<T> {
    /// Creates a new 2-D bounding box from 2 points. The minimum and maximum
    /// bounds are used for each coordinate axis.
    ///
    /// * `p1` - First point.
    /// * `p2` - Second point.
    pub fn new(p1: Point2<T>, p2: Point2<T>) -> Self {
        Self {
            p_min: p1.min(&p2),
            p_max: p1.max(&p2),
        }
    }

    /// Returns true if the bounds describes an empty box where any component
    /// of `p_max` is less than or equal to the corresponding component of
    /// `p_min`.
    pub fn is_empty(&self) -> bool {
        self.p_max.x <= self.p_min.x || self.p_max.y <= self.p_min.y
    }

    /// Returns the vector along the box diagonal from the minimum point to
    /// the maximum point.
    pub fn diagonal(&self) -> Vector2<T> {
        self.p_max - self.p_min
    }

    /// Returns the area of the box; zero for empty boxes.
    pub fn area(&self) -> T {
        if self.is_empty() {
            T::zero()
        } else {
            let d = self.diagonal();
            d.x * d.y
        }
    }

    /// Returns true if a point is inside the bounding box with the upper
    /// boundary excluded.
    ///
    /// * `p` - The point.
    pub fn contains_exclusive(&self, p: &Point2<T>) -> bool {
        p.x >= self.p_min.x && p.x < self.p_max.x && p.y >= self.p_min.y && p.y < self.p_max.y
    }

    /// Returns true if a point is inside the bounding box, boundary included.
    ///
    /// * `p` - The point.
    pub fn contains(&self, p: &Point2<T>) -> bool {
        p.x >= self.p_min.x && p.x <= self.p_max.x && p.y >= self.p_min.y && p.y <= self.p_max.y
    }
}

impl<T: Num + PartialOrd + Copy> Union<Bounds2<T>> for Bounds2<T> {
    /// Return a bounding box that encloses both boxes.
    ///
    /// * `other` - The other bounding box.
    fn union(&self, other: &Bounds2<T>) -> Self {
        Self {
            p_min: self.p_min.min(&other.p_min),
            p_max: self.p_max.max(&other.p_max),
        }
    }
}

impl<T: Num + PartialOrd + Copy> Intersect<Bounds2<T>> for Bounds2<T> {
    /// Return the overlapping region of two bounding boxes. The result may
    /// be empty.
    ///
    /// * `other` - The other bounding box.
    fn intersect(&self, other: &Bounds2<T>) -> Self {
        Self {
            p_min: self.p_min.max(&other.p_min),
            p_max: self.p_max.min(&other.p_max),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Bounds2<T> {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.p_min, self.p_max)
    }
}

/// An iterator that can step through integer coordinates in a bounding box
/// in a left-to-right (x-axis) and top-to-bottom (y-axis) scan order.
pub struct Bounds2iIterator {
    /// The iterator that will supply points.
    p: Product<Range<Int>, Range<Int>>,
}

impl IntoIterator for Bounds2i {
    type Item = Point2i;
    type IntoIter = Bounds2iIterator;

    /// Create an iterator for `Bounds2i`. Degenerate boxes yield no points.
    fn into_iter(self) -> Self::IntoIter {
        let (max_x, max_y) = if self.is_empty() {
            (self.p_min.x, self.p_min.y)
        } else {
            (self.p_max.x, self.p_max.y)
        };
        Bounds2iIterator {
            p: iproduct!(self.p_min.y..max_y, self.p_min.x..max_x),
        }
    }
}

impl Iterator for Bounds2iIterator {
    type Item = Point2i;

    /// Get the next point.
    fn next(&mut self) -> Option<Self::Item> {
        self.p.next().map(|(y, x)| Point2i::new(x, y))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
