//! BSDF

use super::*;
use crate::interaction::*;
use crate::rng::ONE_MINUS_EPSILON;

/// Maximum number of BxDFs that can be stored in `BSDF`.
pub const MAX_BXDFS: usize = 8;

/// BSDF represents a collection of BRDFs and BTDFs at a surface point. It
/// lives in the per-thread arena together with its lobes.
///
/// The lifetime specifier:
/// * `'arena` - The arena the `BxDF` lobes were allocated in.
#[derive(Clone)]
pub struct BSDF<'arena> {
    /// The shading normal. It is the first axis in the orthonormal
    /// coordinate system and defines hemispheres for integrating incident
    /// illumination for surface reflection.
    pub ns: Normal3f,

    /// The geometric normal defined by surface geometry.
    pub ng: Normal3f,

    /// Second axis for the orthonormal coordinate system.
    pub ss: Vector3f,

    /// Third axis for the orthonormal coordinate system.
    pub ts: Vector3f,

    /// Relative index of refraction over the surface boundary.
    pub eta: Float,

    /// Number of `BxDF`s in use.
    n_bxdfs: usize,

    /// The `BxDF`s.
    bxdfs: [Option<&'arena BxDF>; MAX_BXDFS],
}

impl<'arena> BSDF<'arena> {
    /// Creates a new `BSDF` with no lobes.
    ///
    /// * `si`  - The differential geometry at the point on a surface.
    /// * `eta` - Optional relative index of refraction over the surface
    ///           boundary. Defaults to 1.0 for opaque surfaces.
    pub fn new(si: &SurfaceInteraction, eta: Option<Float>) -> Self {
        let ns = si.shading.n;
        let ss = si.shading.dpdu.normalize();
        Self {
            ns,
            ng: si.hit.n,
            ss,
            ts: Vector3f::from(ns).cross(&ss),
            eta: eta.unwrap_or(1.0),
            n_bxdfs: 0,
            bxdfs: [None; MAX_BXDFS],
        }
    }

    /// Add a `BxDF`.
    ///
    /// * `bxdf` - The `BxDF`.
    pub fn add(&mut self, bxdf: &'arena BxDF) {
        assert!(
            self.n_bxdfs < MAX_BXDFS,
            "Cannot add BxDFs. BSDF maximum limit {} reached.",
            MAX_BXDFS
        );
        self.bxdfs[self.n_bxdfs] = Some(bxdf);
        self.n_bxdfs += 1;
    }

    /// Iterates over the lobes.
    fn lobes(&self) -> impl Iterator<Item = &'arena BxDF> + '_ {
        self.bxdfs[..self.n_bxdfs].iter().flatten().copied()
    }

    /// Returns the number of `BxDF`s whose type flags are all set in
    /// `bxdf_type`.
    ///
    /// * `bxdf_type` - The `BxDFType` to match (usually `BSDF_ALL`).
    pub fn num_components(&self, bxdf_type: BxDFType) -> usize {
        self.lobes().filter(|b| b.matches_flags(bxdf_type)).count()
    }

    /// Transforms a vector from world space to local space.
    ///
    /// * `v` - The vector to transform.
    pub fn world_to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.ss), v.dot(&self.ts), v.dot_normal(&self.ns))
    }

    /// Transforms a vector from local space to world space.
    ///
    /// * `v` - The vector to transform.
    pub fn local_to_world(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(
            self.ss.x * v.x + self.ts.x * v.y + self.ns.x * v.z,
            self.ss.y * v.x + self.ts.y * v.y + self.ns.y * v.z,
            self.ss.z * v.x + self.ts.z * v.y + self.ns.z * v.z,
        )
    }

    /// Sums the lobes matching `bxdf_type` that scatter to the side of the
    /// geometric surface `wi_w` lies on.
    fn sum_f(&self, wo_w: &Vector3f, wi_w: &Vector3f, wo: &Vector3f, wi: &Vector3f, bxdf_type: BxDFType) -> Spectrum {
        let reflect = wi_w.dot_normal(&self.ng) * wo_w.dot_normal(&self.ng) > 0.0;
        let side = if reflect {
            BxDFType::BSDF_REFLECTION
        } else {
            BxDFType::BSDF_TRANSMISSION
        };
        self.lobes()
            .filter(|b| b.matches_flags(bxdf_type) && b.get_type().matches(side))
            .fold(Spectrum::ZERO, |l, b| l + b.f(wo, wi))
    }

    /// Returns the BSDF evaluated for a pair of directions.
    ///
    /// * `wo_w`      - Outgoing direction in world-space.
    /// * `wi_w`      - Incident direction in world-space.
    /// * `bxdf_type` - The `BxDFType` to evaluate.
    pub fn f(&self, wo_w: &Vector3f, wi_w: &Vector3f, bxdf_type: BxDFType) -> Spectrum {
        let wi = self.world_to_local(wi_w);
        let wo = self.world_to_local(wo_w);
        if wo.z == 0.0 {
            return Spectrum::ZERO;
        }
        self.sum_f(wo_w, wi_w, &wo, &wi, bxdf_type)
    }

    /// Samples an incident direction by choosing one matching lobe uniformly.
    /// A failed sample has zero `pdf`.
    ///
    /// * `wo_w`      - Outgoing direction in world-space.
    /// * `u`         - The 2D uniform random values.
    /// * `bxdf_type` - The `BxDFType` to sample.
    pub fn sample_f(&self, wo_w: &Vector3f, u: &Point2f, bxdf_type: BxDFType) -> BxDFSample {
        // Choose which `BxDF` to sample.
        let matching_comps = self.num_components(bxdf_type);
        if matching_comps == 0 {
            return BxDFSample::default();
        }
        let comp = min((u[0] * matching_comps as Float).floor() as usize, matching_comps - 1);
        let (index, bxdf) = match self
            .lobes()
            .enumerate()
            .filter(|(_, b)| b.matches_flags(bxdf_type))
            .nth(comp)
        {
            Some(found) => found,
            None => return BxDFSample::default(),
        };

        // Remap BxDF sample `u` to `[0,1)^2`.
        let u_remapped = Point2f::new(
            min(u[0] * matching_comps as Float - comp as Float, ONE_MINUS_EPSILON),
            u[1],
        );

        // Sample chosen `BxDF`.
        let wo = self.world_to_local(wo_w);
        if wo.z == 0.0 {
            return BxDFSample::default();
        }
        let sample = bxdf.sample_f(&wo, &u_remapped);
        if sample.pdf == 0.0 {
            return BxDFSample::from(sample.bxdf_type);
        }
        let wi_w = self.local_to_world(&sample.wi);

        // Compute overall PDF with all matching BxDFs.
        let specular = bxdf.get_type().matches(BxDFType::BSDF_SPECULAR);
        let mut pdf = sample.pdf;
        if !specular && matching_comps > 1 {
            pdf += self
                .lobes()
                .enumerate()
                .filter(|(i, b)| *i != index && b.matches_flags(bxdf_type))
                .map(|(_, b)| b.pdf(&wo, &sample.wi))
                .sum::<Float>();
        }
        if matching_comps > 1 {
            pdf /= matching_comps as Float;
        }

        // Compute value of BSDF for sampled direction.
        let f = if specular {
            sample.f
        } else {
            self.sum_f(wo_w, &wi_w, &wo, &sample.wi, bxdf_type)
        };

        BxDFSample::new(f, pdf, wi_w, sample.bxdf_type)
    }

    /// Evaluates the PDF of `sample_f()` for a pair of directions.
    ///
    /// * `wo_w`      - Outgoing direction in world-space.
    /// * `wi_w`      - Incident direction in world-space.
    /// * `bxdf_type` - The `BxDFType` to evaluate.
    pub fn pdf(&self, wo_w: &Vector3f, wi_w: &Vector3f, bxdf_type: BxDFType) -> Float {
        let wo = self.world_to_local(wo_w);
        let wi = self.world_to_local(wi_w);
        if wo.z == 0.0 {
            return 0.0;
        }

        let (matching_comps, pdf) = self
            .lobes()
            .filter(|b| b.matches_flags(bxdf_type))
            .fold((0, 0.0), |(n, pdf), b| (n + 1, pdf + b.pdf(&wo, &wi)));
        if matching_comps > 0 {
            pdf / matching_comps as Float
        } else {
            0.0
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
