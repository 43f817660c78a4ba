//! Shapes

use crate::geometry::*;
use crate::interaction::*;
use crate::pbrt::*;
use std::sync::Arc;

/// Shape common functions.
pub trait Shape {
    /// Returns a bounding box in world space.
    fn world_bound(&self) -> Bounds3f;

    /// Returns geometric details if a ray intersects the shape. If there is
    /// no intersection within `(0, r.t_max)`, `None` is returned.
    ///
    /// * `r` - The ray.
    fn intersect(&self, r: &Ray) -> Option<Intersection<'static>>;

    /// Returns `true` if a ray-shape intersection succeeds; otherwise `false`.
    ///
    /// * `r` - The ray.
    fn intersect_p(&self, r: &Ray) -> bool {
        self.intersect(r).is_some()
    }

    /// Returns the surface area of the shape.
    fn area(&self) -> Float;

    /// Samples a point uniformly on the surface and returns it with the pdf
    /// with respect to surface area.
    ///
    /// * `u` - Sample value in [0, 1)^2.
    fn sample(&self, u: &Point2f) -> (Hit, Float);

    /// Samples a point on the surface as seen from a reference point and
    /// returns it with the pdf with respect to solid angle at the reference
    /// point. Returns `None` for degenerate samples.
    ///
    /// * `hit` - The reference point.
    /// * `u`   - Sample value in [0, 1)^2.
    fn sample_ref(&self, hit: &Hit, u: &Point2f) -> Option<(Hit, Float)> {
        let (intr, pdf_area) = self.sample(u);
        let wi = intr.p - hit.p;
        if wi.length_squared() == 0.0 {
            return None;
        }

        // Convert from area measure to solid angle measure.
        let wi = wi.normalize();
        let pdf = pdf_area * hit.p.distance_squared(&intr.p) / intr.n.abs_dot_vec(&-wi);
        if pdf.is_infinite() {
            None
        } else {
            Some((intr, pdf))
        }
    }

    /// Returns the solid angle pdf of sampling direction `wi` from a
    /// reference point with `sample_ref()`.
    ///
    /// * `hit` - The reference point.
    /// * `wi`  - The incident direction.
    fn pdf_ref(&self, hit: &Hit, wi: &Vector3f) -> Float {
        let ray = hit.spawn_ray(wi);
        match self.intersect(&ray) {
            Some(Intersection { isect, .. }) => {
                let pdf = hit.p.distance_squared(&isect.hit.p) / (isect.hit.n.abs_dot_vec(&-*wi) * self.area());
                if pdf.is_infinite() {
                    0.0
                } else {
                    pdf
                }
            }
            None => 0.0,
        }
    }
}

/// Atomic reference counted `Shape`.
pub type ArcShape = Arc<dyn Shape + Send + Sync>;

/// Stores geometric information about a single ray-shape intersection.
#[derive(Clone)]
pub struct Intersection<'a> {
    /// The parameter along the ray where intersection occurred.
    pub t: Float,

    /// The surface interaction details.
    pub isect: SurfaceInteraction<'a>,
}

impl<'a> Intersection<'a> {
    /// Create a new intersection.
    ///
    /// * `t`     - The parameter along the ray where intersection occurred.
    /// * `isect` - The surface interaction details.
    pub fn new(t: Float, isect: SurfaceInteraction<'a>) -> Self {
        Self { t, isect }
    }
}
