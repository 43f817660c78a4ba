//! Reflection and surface scattering models

use crate::geometry::*;
use crate::pbrt::*;
use crate::sampling::*;
use crate::spectrum::*;
use std::fmt;

mod bsdf;
mod bxdf_sample;
mod bxdf_type;
mod fresnel;
mod fresnel_specular;
mod lambertian_reflection;
mod specular_reflection;
mod specular_transmission;

// Re-export
pub use bsdf::*;
pub use bxdf_sample::*;
pub use bxdf_type::*;
pub use fresnel::*;
pub use fresnel_specular::*;
pub use lambertian_reflection::*;
pub use specular_reflection::*;
pub use specular_transmission::*;

/// BxDF for BRDFs and BTDFs. Lobes are allocated in the per-thread arena
/// and referenced from a `BSDF`.
#[derive(Clone)]
pub enum BxDF {
    FresnelSpecular(FresnelSpecular),
    LambertianReflection(LambertianReflection),
    SpecularReflection(SpecularReflection),
    SpecularTransmission(SpecularTransmission),
}

impl BxDF {
    /// Returns the BxDF type.
    pub fn get_type(&self) -> BxDFType {
        match self {
            BxDF::FresnelSpecular(bxdf) => bxdf.get_type(),
            BxDF::LambertianReflection(bxdf) => bxdf.get_type(),
            BxDF::SpecularReflection(bxdf) => bxdf.get_type(),
            BxDF::SpecularTransmission(bxdf) => bxdf.get_type(),
        }
    }

    /// Returns true if every flag of this BxDF's type is set in `t`.
    ///
    /// * `t` - The reflection model to compare.
    pub fn matches_flags(&self, t: BxDFType) -> bool {
        t.contains(self.get_type())
    }

    /// Returns the value of the distribution function for the given pair of
    /// directions.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn f(&self, wo: &Vector3f, wi: &Vector3f) -> Spectrum {
        match self {
            BxDF::FresnelSpecular(bxdf) => bxdf.f(wo, wi),
            BxDF::LambertianReflection(bxdf) => bxdf.f(wo, wi),
            BxDF::SpecularReflection(bxdf) => bxdf.f(wo, wi),
            BxDF::SpecularTransmission(bxdf) => bxdf.f(wo, wi),
        }
    }

    /// Samples an incident direction for the given outgoing direction.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - The 2D uniform random values.
    pub fn sample_f(&self, wo: &Vector3f, u: &Point2f) -> BxDFSample {
        match self {
            BxDF::FresnelSpecular(bxdf) => bxdf.sample_f(wo, u),
            BxDF::SpecularReflection(bxdf) => bxdf.sample_f(wo, u),
            BxDF::SpecularTransmission(bxdf) => bxdf.sample_f(wo, u),
            BxDF::LambertianReflection(_) => {
                // Cosine-sample the hemisphere, flipping the direction if necessary.
                let mut wi = cosine_sample_hemisphere(u);
                if wo.z < 0.0 {
                    wi.z *= -1.0;
                }
                let pdf = self.pdf(wo, &wi);
                BxDFSample::new(self.f(wo, &wi), pdf, wi, self.get_type())
            }
        }
    }

    /// Evaluates the PDF for the sampling method.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        match self {
            BxDF::FresnelSpecular(_) | BxDF::SpecularReflection(_) | BxDF::SpecularTransmission(_) => 0.0,
            BxDF::LambertianReflection(_) => {
                if same_hemisphere(wo, wi) {
                    abs_cos_theta(wi) * INV_PI
                } else {
                    0.0
                }
            }
        }
    }
}

impl fmt::Display for BxDF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BxDF::FresnelSpecular(bxdf) => write!(f, "BxDF {{ {} }}", bxdf),
            BxDF::LambertianReflection(bxdf) => write!(f, "BxDF {{ {} }}", bxdf),
            BxDF::SpecularReflection(bxdf) => write!(f, "BxDF {{ {} }}", bxdf),
            BxDF::SpecularTransmission(bxdf) => write!(f, "BxDF {{ {} }}", bxdf),
        }
    }
}

/// Returns cos(θ) of a direction in the shading coordinate system.
///
/// * `w` - The direction.
#[inline(always)]
pub fn cos_theta(w: &Vector3f) -> Float {
    w.z
}

/// Returns |cos(θ)| of a direction in the shading coordinate system.
///
/// * `w` - The direction.
#[inline(always)]
pub fn abs_cos_theta(w: &Vector3f) -> Float {
    abs(w.z)
}

/// Returns `true` if two directions lie in the same hemisphere of the shading
/// coordinate system.
///
/// * `w`  - First direction.
/// * `wp` - Second direction.
#[inline(always)]
pub fn same_hemisphere(w: &Vector3f, wp: &Vector3f) -> bool {
    w.z * wp.z > 0.0
}

/// Returns the direction `wo` reflected about the normal `n`.
///
/// * `wo` - Outgoing direction.
/// * `n`  - The normal.
pub fn reflect(wo: &Vector3f, n: &Vector3f) -> Vector3f {
    -*wo + 2.0 * wo.dot(n) * *n
}

/// Returns the refracted direction of `wi` through an interface with normal
/// `n` and relative index of refraction `eta`, or `None` on total internal
/// reflection.
///
/// * `wi`  - Incident direction.
/// * `n`   - Normal on the same side as `wi`.
/// * `eta` - Ratio of indices of refraction of the incident and transmitted
///           media.
pub fn refract(wi: &Vector3f, n: &Normal3f, eta: Float) -> Option<Vector3f> {
    let cos_theta_i = n.dot_vec(wi);
    let sin2_theta_i = max(0.0, 1.0 - cos_theta_i * cos_theta_i);
    let sin2_theta_t = eta * eta * sin2_theta_i;

    if sin2_theta_t >= 1.0 {
        return None;
    }

    let cos_theta_t = (1.0 - sin2_theta_t).sqrt();
    Some(eta * -*wi + (eta * cos_theta_i - cos_theta_t) * Vector3f::from(*n))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
