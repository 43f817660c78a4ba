//! Rays

use crate::geometry::*;
use crate::medium::*;
use crate::pbrt::*;
use std::fmt;

/// Offset rays for the x and y image directions.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RayDifferential {
    /// Origin of ray offset in x-direction.
    pub rx_origin: Point3f,

    /// Origin of ray offset in y-direction.
    pub ry_origin: Point3f,

    /// Direction of ray offset in x-direction.
    pub rx_direction: Vector3f,

    /// Direction of ray offset in y-direction.
    pub ry_direction: Vector3f,
}

/// A semi-infinite line.
#[derive(Clone)]
pub struct Ray {
    /// Origin.
    pub o: Point3f,

    /// Direction.
    pub d: Vector3f,

    /// Limits the ray to a segment along its infinite extent.
    pub t_max: Float,

    /// Time.
    pub time: Float,

    /// The medium containing the origin.
    pub medium: Option<ArcMedium>,

    /// Optional offset rays used for texture filtering.
    pub differentials: Option<RayDifferential>,
}

impl Ray {
    /// Returns a ray.
    ///
    /// * `o`      - Origin.
    /// * `d`      - Direction.
    /// * `t_max`  - Limits the ray to a segment along its infinite extent.
    /// * `time`   - Time.
    /// * `medium` - The medium containing the origin.
    pub fn new(o: Point3f, d: Vector3f, t_max: Float, time: Float, medium: Option<ArcMedium>) -> Self {
        Self {
            o,
            d,
            t_max,
            time,
            medium,
            differentials: None,
        }
    }

    /// Returns the position along the ray at a given parameter.
    ///
    /// * `t` - The parameter.
    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }

    /// Returns true if the ray has NaN components.
    pub fn has_nans(&self) -> bool {
        self.o.has_nans() || self.d.has_nans() || self.t_max.is_nan()
    }

    /// Scale the differential rays to account for the spacing between
    /// camera samples on the film.
    ///
    /// * `s` - The scale factor.
    pub fn scale_differentials(&mut self, s: Float) {
        if let Some(rd) = self.differentials.as_mut() {
            rd.rx_origin = self.o + (rd.rx_origin - self.o) * s;
            rd.ry_origin = self.o + (rd.ry_origin - self.o) * s;
            rd.rx_direction = self.d + (rd.rx_direction - self.d) * s;
            rd.ry_direction = self.d + (rd.ry_direction - self.d) * s;
        }
    }
}

impl fmt::Debug for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ray")
            .field("o", &self.o)
            .field("d", &self.d)
            .field("t_max", &self.t_max)
            .field("time", &self.time)
            .field("has_medium", &self.medium.is_some())
            .field("differentials", &self.differentials)
            .finish()
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[o={}, d={}, t_max={}, time={}]", self.o, self.d, self.t_max, self.time)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_differentials_shrinks_offsets_toward_main_ray() {
        let mut r = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, 1.0), INFINITY, 0.0, None);
        r.differentials = Some(RayDifferential {
            rx_origin: Point3f::new(2.0, 0.0, 0.0),
            ry_origin: Point3f::new(0.0, 2.0, 0.0),
            rx_direction: Vector3f::new(0.0, 0.0, 1.0),
            ry_direction: Vector3f::new(0.0, 0.0, 1.0),
        });
        r.scale_differentials(0.25);
        let rd = r.differentials.unwrap();
        assert_eq!(rd.rx_origin, Point3f::new(0.5, 0.0, 0.0));
        assert_eq!(rd.ry_origin, Point3f::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn at_returns_point_along_direction() {
        let r = Ray::new(Point3f::new(1.0, 1.0, 1.0), Vector3f::new(0.0, 2.0, 0.0), INFINITY, 0.0, None);
        assert_eq!(r.at(1.5), Point3f::new(1.0, 4.0, 1.0));
    }
}
