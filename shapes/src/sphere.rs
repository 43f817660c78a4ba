//! Spheres

use lumen_core::geometry::*;
use lumen_core::interaction::*;
use lumen_core::pbrt::*;
use lumen_core::sampling::*;
use lumen_core::shape::*;

/// A full sphere positioned in world space.
#[derive(Copy, Clone, Debug)]
pub struct Sphere {
    /// Center of the sphere.
    pub center: Point3f,

    /// Radius of sphere.
    pub radius: Float,

    /// Indicates whether surface normals point inwards.
    pub reverse_orientation: bool,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// * `center`              - Center of the sphere.
    /// * `radius`              - Radius of sphere.
    /// * `reverse_orientation` - Indicates whether their surface normal directions
    ///                           should be reversed from the default.
    pub fn new(center: Point3f, radius: Float, reverse_orientation: bool) -> Self {
        if radius <= 0.0 {
            warn!("Sphere radius {} is not positive; using its magnitude", radius);
        }
        Self {
            center,
            radius: abs(radius),
            reverse_orientation,
        }
    }

    /// Returns the outward facing normal at a point on the surface, flipped
    /// when the orientation is reversed.
    ///
    /// * `p` - Point on the surface.
    fn normal_at(&self, p: &Point3f) -> Normal3f {
        let n = Normal3f::from((*p - self.center).normalize());
        if self.reverse_orientation {
            -n
        } else {
            n
        }
    }

    /// Returns the cosine of the half angle of the cone subtended by the sphere
    /// as seen from `hit`, or `None` if `hit` lies inside the sphere. Points on
    /// the surface are first offset towards the center so they count as inside.
    ///
    /// * `hit` - The reference point.
    fn cos_theta_max(&self, hit: &Hit) -> Option<Float> {
        let p_origin = hit.spawn_ray(&(self.center - hit.p)).o;
        let dc2 = p_origin.distance_squared(&self.center);
        let r2 = self.radius * self.radius;
        if dc2 <= r2 {
            None
        } else {
            let sin2_theta_max = r2 / dc2;
            Some(max(0.0, 1.0 - sin2_theta_max).sqrt())
        }
    }

    /// Converts an area sample into a solid angle sample at `hit`.
    ///
    /// * `hit` - The reference point.
    /// * `u`   - Sample value in [0, 1)^2.
    fn sample_area_as_solid_angle(&self, hit: &Hit, u: &Point2f) -> Option<(Hit, Float)> {
        let (intr, pdf_area) = self.sample(u);
        let wi = intr.p - hit.p;
        if wi.length_squared() == 0.0 {
            return None;
        }

        let wi = wi.normalize();
        let pdf = pdf_area * hit.p.distance_squared(&intr.p) / intr.n.abs_dot_vec(&-wi);
        if pdf.is_infinite() {
            None
        } else {
            Some((intr, pdf))
        }
    }
}

impl Shape for Sphere {
    fn world_bound(&self) -> Bounds3f {
        let r = Vector3f::new(self.radius, self.radius, self.radius);
        Bounds3f::new(self.center - r, self.center + r)
    }

    fn intersect(&self, r: &Ray) -> Option<Intersection<'static>> {
        // Solve the quadratic in double precision relative to the center.
        let oc = r.o - self.center;
        let (ox, oy, oz) = (oc.x as f64, oc.y as f64, oc.z as f64);
        let (dx, dy, dz) = (r.d.x as f64, r.d.y as f64, r.d.z as f64);
        let radius = self.radius as f64;

        let a = dx * dx + dy * dy + dz * dz;
        let b = 2.0 * (dx * ox + dy * oy + dz * oz);
        let c = ox * ox + oy * oy + oz * oz - radius * radius;

        let discrim = b * b - 4.0 * a * c;
        if discrim < 0.0 || a == 0.0 {
            return None;
        }
        let root_discrim = discrim.sqrt();
        let q = if b < 0.0 {
            -0.5 * (b - root_discrim)
        } else {
            -0.5 * (b + root_discrim)
        };
        if q == 0.0 {
            return None;
        }
        let (mut t0, mut t1) = (q / a, c / q);
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }

        let t_max = r.t_max as f64;
        if t0 > t_max || t1 <= 0.0 {
            return None;
        }
        let mut t_shape_hit = t0;
        if t_shape_hit <= 0.0 {
            t_shape_hit = t1;
            if t_shape_hit > t_max {
                return None;
            }
        }
        let t_hit = t_shape_hit as Float;

        // Refine the hit point so it lies on the surface.
        let mut p_local = r.at(t_hit) - self.center;
        p_local *= self.radius / p_local.length();
        if p_local.x == 0.0 && p_local.y == 0.0 {
            p_local.x = 1e-5 * self.radius;
        }

        let mut phi = p_local.y.atan2(p_local.x);
        if phi < 0.0 {
            phi += TWO_PI;
        }
        let cos_theta = clamp(p_local.z / self.radius, -1.0, 1.0);
        let theta = cos_theta.acos();
        let uv = Point2f::new(phi * INV_TWO_PI, 1.0 - theta * INV_PI);

        // θ runs from π at the south pole to 0 at the north pole, which makes
        // the cross product of the partials point outwards.
        let z_radius = (p_local.x * p_local.x + p_local.y * p_local.y).sqrt();
        let cos_phi = p_local.x / z_radius;
        let sin_phi = p_local.y / z_radius;
        let sin_theta = max(0.0, 1.0 - cos_theta * cos_theta).sqrt();
        let dpdu = Vector3f::new(-TWO_PI * p_local.y, TWO_PI * p_local.x, 0.0);
        let dpdv = -PI
            * Vector3f::new(
                p_local.z * cos_phi,
                p_local.z * sin_phi,
                -self.radius * sin_theta,
            );

        let p_hit = self.center + p_local;
        let isect = SurfaceInteraction::new(p_hit, uv, -r.d, dpdu, dpdv, r.time, self.reverse_orientation);
        Some(Intersection::new(t_hit, isect))
    }

    fn area(&self) -> Float {
        FOUR_PI * self.radius * self.radius
    }

    fn sample(&self, u: &Point2f) -> (Hit, Float) {
        let p = self.center + self.radius * uniform_sample_sphere(u);
        let mut it = Hit::new_minimal(p, 0.0, None);
        it.n = self.normal_at(&p);
        (it, 1.0 / self.area())
    }

    /// Samples the cone of directions subtended by the sphere when the
    /// reference point is outside, otherwise falls back to area sampling.
    ///
    /// * `hit` - The reference point.
    /// * `u`   - Sample value in [0, 1)^2.
    fn sample_ref(&self, hit: &Hit, u: &Point2f) -> Option<(Hit, Float)> {
        let cos_theta_max = match self.cos_theta_max(hit) {
            Some(cos_theta_max) => cos_theta_max,
            None => return self.sample_area_as_solid_angle(hit, u),
        };

        let dc = hit.p.distance(&self.center);
        let wc = (self.center - hit.p).normalize();
        let (wc_x, wc_y) = coordinate_system(&wc);

        // Sample θ and φ inside the cone and find the matching surface point.
        let cos_theta = (1.0 - u[0]) + u[0] * cos_theta_max;
        let sin_theta = max(0.0, 1.0 - cos_theta * cos_theta).sqrt();
        let phi = u[1] * TWO_PI;

        let r2 = self.radius * self.radius;
        let ds = dc * cos_theta - max(0.0, r2 - dc * dc * sin_theta * sin_theta).sqrt();
        let cos_alpha = (dc * dc + r2 - ds * ds) / (2.0 * dc * self.radius);
        let sin_alpha = max(0.0, 1.0 - cos_alpha * cos_alpha).sqrt();

        let n_world = spherical_direction_in_coord_frame(sin_alpha, cos_alpha, phi, &-wc_x, &-wc_y, &-wc);
        let p = self.center + self.radius * n_world;

        let mut it = Hit::new_minimal(p, hit.time, None);
        it.n = Normal3f::from(n_world);
        if self.reverse_orientation {
            it.n = -it.n;
        }
        Some((it, uniform_cone_pdf(cos_theta_max)))
    }

    fn pdf_ref(&self, hit: &Hit, wi: &Vector3f) -> Float {
        match self.cos_theta_max(hit) {
            Some(cos_theta_max) => uniform_cone_pdf(cos_theta_max),
            None => {
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
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    fn ray(o: Point3f, d: Vector3f) -> Ray {
        Ray::new(o, d, INFINITY, 0.0, None)
    }

    #[test]
    fn ray_hits_near_side_with_outward_normal() {
        let s = Sphere::new(Point3f::new(1.0, 2.0, 3.0), 1.0, false);
        let r = ray(Point3f::new(1.0, 2.0, -2.0), Vector3f::new(0.0, 0.0, 1.0));
        let Intersection { t, isect } = s.intersect(&r).expect("hit");
        assert!(approx_eq!(Float, t, 4.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, isect.hit.p.z, 2.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, isect.hit.n.z, -1.0, epsilon = 1e-4));
        assert!(approx_eq!(Float, isect.hit.wo.z, -1.0, epsilon = 1e-6));
    }

    #[test]
    fn ray_from_inside_hits_far_side() {
        let s = Sphere::new(Point3f::ZERO, 2.0, false);
        let r = ray(Point3f::ZERO, Vector3f::new(1.0, 0.0, 0.0));
        let Intersection { t, isect } = s.intersect(&r).expect("hit");
        assert!(approx_eq!(Float, t, 2.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, isect.hit.n.x, 1.0, epsilon = 1e-4));
    }

    #[test]
    fn reversed_orientation_flips_normal() {
        let s = Sphere::new(Point3f::ZERO, 1.0, true);
        let r = ray(Point3f::new(-3.0, 0.0, 0.0), Vector3f::new(1.0, 0.0, 0.0));
        let Intersection { isect, .. } = s.intersect(&r).expect("hit");
        assert!(approx_eq!(Float, isect.hit.n.x, 1.0, epsilon = 1e-4));
    }

    #[test]
    fn misses_and_t_max_cutoff() {
        let s = Sphere::new(Point3f::ZERO, 1.0, false);
        let miss = ray(Point3f::new(0.0, 2.0, -5.0), Vector3f::new(0.0, 0.0, 1.0));
        assert!(s.intersect(&miss).is_none());

        let short = Ray::new(Point3f::new(0.0, 0.0, -5.0), Vector3f::new(0.0, 0.0, 1.0), 3.0, 0.0, None);
        assert!(s.intersect(&short).is_none());
        assert!(!s.intersect_p(&short));

        let behind = ray(Point3f::new(0.0, 0.0, 5.0), Vector3f::new(0.0, 0.0, 1.0));
        assert!(s.intersect(&behind).is_none());
    }

    #[test]
    fn pole_hit_is_well_defined() {
        let s = Sphere::new(Point3f::ZERO, 1.0, false);
        let r = ray(Point3f::new(0.0, 0.0, 4.0), Vector3f::new(0.0, 0.0, -1.0));
        let Intersection { isect, .. } = s.intersect(&r).expect("hit");
        assert!(!isect.hit.n.z.is_nan());
        assert!(isect.hit.n.z > 0.99);
    }

    #[test]
    fn area_and_bounds() {
        let s = Sphere::new(Point3f::new(0.0, 1.0, 0.0), 2.0, false);
        assert!(approx_eq!(Float, s.area(), 16.0 * PI, ulps = 4));
        let b = s.world_bound();
        assert_eq!(b.p_min, Point3f::new(-2.0, -1.0, -2.0));
        assert_eq!(b.p_max, Point3f::new(2.0, 3.0, 2.0));
    }

    #[test]
    fn inside_reference_uses_area_sampling() {
        let s = Sphere::new(Point3f::ZERO, 1.0, false);
        let hit = Hit::new_minimal(Point3f::ZERO, 0.0, None);
        let (it, pdf) = s.sample_ref(&hit, &Point2f::new(0.3, 0.6)).expect("sample");
        // From the center every direction sees the surface at distance 1 head on.
        assert!(approx_eq!(Float, pdf, INV_FOUR_PI, epsilon = 1e-4));
        assert!(approx_eq!(Float, it.p.distance(&Point3f::ZERO), 1.0, epsilon = 1e-5));
    }

    proptest! {
        #[test]
        fn area_samples_lie_on_surface(u0 in 0.0f32..1.0, u1 in 0.0f32..1.0) {
            let s = Sphere::new(Point3f::new(-1.0, 0.5, 2.0), 1.5, false);
            let (it, pdf) = s.sample(&Point2f::new(u0, u1));
            prop_assert!(approx_eq!(Float, it.p.distance(&s.center), 1.5, epsilon = 1e-4));
            prop_assert!(approx_eq!(Float, pdf, 1.0 / s.area(), ulps = 4));
            prop_assert!(it.n.dot_vec(&(it.p - s.center)) > 0.0);
        }

        #[test]
        fn cone_samples_are_visible_from_reference(u0 in 0.0f32..1.0, u1 in 0.0f32..1.0) {
            let s = Sphere::new(Point3f::new(0.0, 0.0, 5.0), 1.0, false);
            let hit = Hit::new_minimal(Point3f::ZERO, 0.0, None);
            let (it, pdf) = s.sample_ref(&hit, &Point2f::new(u0, u1)).expect("sample");

            prop_assert!(approx_eq!(Float, it.p.distance(&s.center), 1.0, epsilon = 1e-3));
            // Sampled points face the reference point.
            prop_assert!(it.n.dot_vec(&(hit.p - it.p)) >= -1e-3);

            let wi = (it.p - hit.p).normalize();
            prop_assert!(approx_eq!(Float, pdf, s.pdf_ref(&hit, &wi), ulps = 4));
        }
    }
}
