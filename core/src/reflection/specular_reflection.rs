//! Specular Reflection

use super::*;
use bumpalo::Bump;

/// BRDF for physically plausible specular reflection using Fresnel interface.
#[derive(Clone)]
pub struct SpecularReflection {
    /// Fresnel interface for dielectrics and conductors.
    fresnel: Fresnel,

    /// Spectrum used to scale the reflected colour.
    r: Spectrum,
}

impl SpecularReflection {
    /// Create a new instance of `SpecularReflection`.
    ///
    /// * `r`       - Spectrum used to scale the reflected colour.
    /// * `fresnel` - Fresnel interface.
    pub fn new(r: Spectrum, fresnel: Fresnel) -> Self {
        Self { fresnel, r }
    }

    /// Allocate a new `SpecularReflection` lobe in the arena.
    ///
    /// * `arena`   - The arena for memory allocations.
    /// * `r`       - Spectrum used to scale the reflected colour.
    /// * `fresnel` - Fresnel interface.
    pub fn alloc(arena: &Bump, r: Spectrum, fresnel: Fresnel) -> &BxDF {
        arena.alloc(BxDF::SpecularReflection(Self::new(r, fresnel)))
    }

    /// Returns the BxDF type.
    pub fn get_type(&self) -> BxDFType {
        BxDFType::BSDF_REFLECTION | BxDFType::BSDF_SPECULAR
    }

    /// A delta distribution; no scattering is returned for arbitrary
    /// direction pairs.
    ///
    /// * `wo` - Outgoing direction.
    /// * `wi` - Incident direction.
    pub fn f(&self, _wo: &Vector3f, _wi: &Vector3f) -> Spectrum {
        Spectrum::ZERO
    }

    /// Samples the perfect specular reflection direction.
    ///
    /// * `wo` - Outgoing direction.
    /// * `u`  - The 2D uniform random values.
    pub fn sample_f(&self, wo: &Vector3f, _u: &Point2f) -> BxDFSample {
        let wi = Vector3f::new(-wo.x, -wo.y, wo.z);
        let f = self.fresnel.evaluate(cos_theta(&wi)) * self.r / abs_cos_theta(&wi);
        BxDFSample::new(f, 1.0, wi, self.get_type())
    }
}

impl fmt::Display for SpecularReflection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SpecularReflection {{ fresnel: {}, r: {} }}", self.fresnel, self.r)
    }
}
