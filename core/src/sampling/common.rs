//! Common sampling functions.

use crate::geometry::*;
use crate::pbrt::*;

/// Uniformly sample a direction on the unit sphere.
///
/// * `u` - The random sample.
pub fn uniform_sample_sphere(u: &Point2f) -> Vector3f {
    let z = 1.0 - 2.0 * u[0];
    let r = max(0.0, 1.0 - z * z).sqrt();
    let phi = TWO_PI * u[1];
    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

/// Returns the PDF for uniformly sampling the unit sphere.
pub fn uniform_sphere_pdf() -> Float {
    INV_FOUR_PI
}

/// Map a uniform sample in [0, 1)^2 onto the unit disk with Shirley's
/// concentric mapping.
///
/// * `u` - The random sample.
pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    let u_offset = Point2f::new(2.0 * u.x - 1.0, 2.0 * u.y - 1.0);
    if u_offset.x == 0.0 && u_offset.y == 0.0 {
        return Point2f::ZERO;
    }

    let (r, theta) = if abs(u_offset.x) > abs(u_offset.y) {
        (u_offset.x, PI_OVER_FOUR * (u_offset.y / u_offset.x))
    } else {
        (u_offset.y, PI_OVER_TWO - PI_OVER_FOUR * (u_offset.x / u_offset.y))
    };
    Point2f::new(r * theta.cos(), r * theta.sin())
}

/// Sample a cosine-weighted direction on the hemisphere around +z
/// (Malley's method).
///
/// * `u` - The random sample.
pub fn cosine_sample_hemisphere(u: &Point2f) -> Vector3f {
    let d = concentric_sample_disk(u);
    let z = max(0.0, 1.0 - d.x * d.x - d.y * d.y).sqrt();
    Vector3f::new(d.x, d.y, z)
}

/// Uniformly sample a direction inside a cone around +z.
///
/// * `u`             - The random sample.
/// * `cos_theta_max` - Cosine of the cone's half angle.
pub fn uniform_sample_cone(u: &Point2f, cos_theta_max: Float) -> Vector3f {
    let cos_theta = (1.0 - u[0]) + u[0] * cos_theta_max;
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
    let phi = u[1] * TWO_PI;
    Vector3f::new(phi.cos() * sin_theta, phi.sin() * sin_theta, cos_theta)
}

/// Returns the PDF for uniformly sampling a cone.
///
/// * `cos_theta_max` - Cosine of the cone's half angle.
pub fn uniform_cone_pdf(cos_theta_max: Float) -> Float {
    1.0 / (TWO_PI * (1.0 - cos_theta_max))
}

/// Power heuristic (exponent 2) for multiple importance sampling.
///
/// * `nf`    - Number of samples taken from the `f` distribution.
/// * `f_pdf` - PDF of the `f` strategy.
/// * `ng`    - Number of samples taken from the `g` distribution.
/// * `g_pdf` - PDF of the `g` strategy.
pub fn power_heuristic(nf: Int, f_pdf: Float, ng: Int, g_pdf: Float) -> Float {
    let f = nf as Float * f_pdf;
    let g = ng as Float * g_pdf;
    if f.is_infinite() {
        return 1.0;
    }
    let denom = f * f + g * g;
    if denom == 0.0 {
        0.0
    } else {
        (f * f) / denom
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
