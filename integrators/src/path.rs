//! Path Integrator

use bumpalo::Bump;
use lumen_core::bssrdf::*;
use lumen_core::camera::*;
use lumen_core::error::*;
use lumen_core::geometry::*;
use lumen_core::integrator::*;
use lumen_core::interaction::*;
use lumen_core::light_distrib::*;
use lumen_core::material::*;
use lumen_core::pbrt::*;
use lumen_core::reflection::*;
use lumen_core::sampler::*;
use lumen_core::sampling::Distribution1D;
use lumen_core::scene::*;
use lumen_core::spectrum::*;
use std::sync::Arc;

/// Default number of bounces before Russian roulette may terminate a path.
pub const DEFAULT_MIN_RR_BOUNCES: usize = 3;

/// Default Russian roulette threshold.
pub const DEFAULT_RR_THRESHOLD: Float = 1.0;

/// Returns the factor that undoes the radiance scaling of a specular
/// refraction through an interface with relative index `eta`. Entering and
/// then leaving the same medium returns the product to 1.
///
/// * `eta`      - Relative index of refraction of the interface.
/// * `entering` - `true` when the path crosses into the medium.
pub fn refraction_scale(eta: Float, entering: bool) -> Float {
    if entering {
        eta * eta
    } else {
        1.0 / (eta * eta)
    }
}

/// Implements path tracing algorithm.
pub struct PathIntegrator {
    /// Common data for sampler integrators.
    pub data: SamplerIntegratorData,

    /// Russian roulette threshold used to terminate path sampling.
    rr_threshold: Float,

    /// Russian roulette is only applied once `bounces` exceeds this.
    min_rr_bounces: usize,

    /// Light sampling strategy.
    light_sample_strategy: LightSampleStrategy,

    /// Light distribution. Set by `preprocess()`.
    light_distribution: Option<ArcLightDistribution>,
}

impl PathIntegrator {
    /// Create a new `PathIntegrator`.
    ///
    /// * `max_depth`             - Maximum recursion depth.
    /// * `camera`                - The camera.
    /// * `sampler`               - Prototype sampler.
    /// * `pixel_bounds`          - Pixel bounds for the image.
    /// * `rr_threshold`          - Russian roulette threshold used to terminate
    ///                             path sampling.
    /// * `light_sample_strategy` - Light sampling strategy.
    pub fn new(
        max_depth: usize,
        camera: ArcCamera,
        sampler: BoxSampler,
        pixel_bounds: Bounds2i,
        rr_threshold: Float,
        light_sample_strategy: LightSampleStrategy,
    ) -> Self {
        Self {
            data: SamplerIntegratorData::new(max_depth, camera, sampler, pixel_bounds),
            rr_threshold,
            min_rr_bounces: DEFAULT_MIN_RR_BOUNCES,
            light_sample_strategy,
            light_distribution: None,
        }
    }

    /// Set the number of bounces a path always survives before Russian
    /// roulette is considered.
    ///
    /// * `min_rr_bounces` - Bounce count.
    pub fn with_min_rr_bounces(mut self, min_rr_bounces: usize) -> Self {
        self.min_rr_bounces = min_rr_bounces;
        self
    }

    /// Returns the light selection distribution at a point. Lights are
    /// chosen uniformly when the scene was not preprocessed.
    ///
    /// * `p` - The point.
    fn light_distribution_at(&self, p: &Point3f) -> Option<Arc<Distribution1D>> {
        self.light_distribution.as_ref().and_then(|ld| ld.lookup(p))
    }
}

impl SamplerIntegrator for PathIntegrator {
    fn get_data(&self) -> &SamplerIntegratorData {
        &self.data
    }

    fn get_data_mut(&mut self) -> &mut SamplerIntegratorData {
        &mut self.data
    }
}

impl Integrator for PathIntegrator {
    /// Builds the light sampling distribution.
    ///
    /// * `scene` - The scene
    fn preprocess(&mut self, scene: &Scene) {
        self.light_distribution = Some(create_light_sample_distribution(self.light_sample_strategy, scene));
    }

    /// Render the scene.
    ///
    /// * `scene` - The scene.
    fn render(&self, scene: &Scene) -> Result<(), RenderError> {
        self.render_tiles(scene)
    }

    /// Returns the incident radiance at the origin of a given ray.
    ///
    /// * `ray`     - The ray.
    /// * `scene`   - The scene.
    /// * `sampler` - The sampler.
    /// * `arena`   - The memory arena for allocations.
    /// * `_depth`  - The recursion depth (unused; paths are built iteratively).
    fn li(&self, ray: &mut Ray, scene: &Scene, sampler: &mut dyn Sampler, arena: &Bump, _depth: usize) -> Spectrum {
        let mut l = Spectrum::ZERO;
        let mut beta = Spectrum::ONE;
        let mut specular_bounce = false;

        // Radiance scaling from refraction so far. Factored out of `beta`
        // for Russian roulette.
        let mut eta_scale: Float = 1.0;

        let mut bounces = 0_usize;
        loop {
            debug!("Path tracer bounce {}, current L = {}, beta = {}", bounces, l, beta);

            let isect = scene.intersect(ray);

            // Emission was already counted by next-event estimation unless the
            // previous vertex was the camera or a specular bounce.
            if bounces == 0 || specular_bounce {
                match isect.as_ref() {
                    Some(si) => {
                        l += beta * si.le(&-ray.d);
                        debug!("Added Le -> L = {}", l);
                    }
                    None => {
                        for light in scene.infinite_lights.iter() {
                            l += beta * light.le(ray);
                        }
                        debug!("Added infinite area lights -> L = {}", l);
                    }
                }
            }

            let si = match isect {
                Some(si) if bounces < self.data.max_depth => si,
                _ => break,
            };

            let sf = si.compute_scattering_functions(arena, TransportMode::Radiance, true);
            let bsdf = match sf.bsdf {
                Some(bsdf) => bsdf,
                None => {
                    debug!("Skipping intersection due to null bsdf");
                    *ray = si.spawn_ray(&ray.d);
                    continue;
                }
            };

            // Next-event estimation. Perfectly specular BSDFs have no use
            // for it.
            if bsdf.num_components(BxDFType::BSDF_ALL & !BxDFType::BSDF_SPECULAR) > 0 {
                let distrib = self.light_distribution_at(&si.hit.p);
                let ld = beta
                    * uniform_sample_one_light(
                        Interaction::from(&si),
                        Some(bsdf),
                        scene,
                        sampler,
                        false,
                        distrib.as_deref(),
                    );
                debug!("Sampled direct lighting Ld = {}", ld);
                debug_assert!(ld.y() >= 0.0);
                l += ld;
            }

            // Sample BSDF to get new path direction.
            let wo = -ray.d;
            let u = sampler.get_2d();
            let BxDFSample {
                f,
                pdf,
                wi,
                bxdf_type: flags,
            } = bsdf.sample_f(&wo, &u, BxDFType::BSDF_ALL);
            debug!("Sampled BSDF, f = {}, pdf = {}", f, pdf);
            if f.is_black() || pdf == 0.0 {
                break;
            }

            beta *= f * wi.abs_dot_normal(&si.shading.n) / pdf;
            debug!("Updated beta = {}", beta);
            debug_assert!(beta.y() >= 0.0);
            debug_assert!(!beta.y().is_infinite());

            specular_bounce = flags.matches(BxDFType::BSDF_SPECULAR);
            if flags.matches(BxDFType::BSDF_SPECULAR) && flags.matches(BxDFType::BSDF_TRANSMISSION) {
                eta_scale *= refraction_scale(bsdf.eta, wo.dot_normal(&si.hit.n) > 0.0);
            }
            *ray = si.spawn_ray(&wi);

            // Subsurface scattering re-enters the surface at a sampled exit
            // point and continues the walk from there.
            if let Some(bssrdf) = sf.bssrdf {
                if flags.matches(BxDFType::BSDF_TRANSMISSION) {
                    let u1 = sampler.get_1d();
                    let u2 = sampler.get_2d();
                    let BssrdfSample {
                        s,
                        pi,
                        bsdf: pi_bsdf,
                        pdf,
                    } = match bssrdf.sample_s(scene, u1, &u2, arena) {
                        Some(sample) => sample,
                        None => break,
                    };
                    if s.is_black() || pdf == 0.0 {
                        break;
                    }
                    beta *= s / pdf;
                    debug_assert!(!beta.y().is_infinite());

                    // Direct subsurface component.
                    let distrib = self.light_distribution_at(&pi.hit.p);
                    l += beta
                        * uniform_sample_one_light(
                            Interaction::from(&pi),
                            Some(pi_bsdf),
                            scene,
                            sampler,
                            false,
                            distrib.as_deref(),
                        );

                    // Indirect subsurface component.
                    let u = sampler.get_2d();
                    let BxDFSample {
                        f,
                        pdf,
                        wi,
                        bxdf_type: flags,
                    } = pi_bsdf.sample_f(&pi.hit.wo, &u, BxDFType::BSDF_ALL);
                    if f.is_black() || pdf == 0.0 {
                        break;
                    }
                    beta *= f * wi.abs_dot_normal(&pi.shading.n) / pdf;
                    debug_assert!(!beta.y().is_infinite());
                    specular_bounce = flags.matches(BxDFType::BSDF_SPECULAR);
                    *ray = pi.spawn_ray(&wi);
                }
            }

            // Russian roulette on the throughput without refraction scaling.
            let rr_beta = beta * eta_scale;
            let max_component = rr_beta.max_component_value();
            if max_component < self.rr_threshold && bounces > self.min_rr_bounces {
                let q = max(0.05, 1.0 - max_component);
                if sampler.get_1d() < q {
                    break;
                }
                beta /= 1.0 - q;
                debug_assert!(!beta.y().is_infinite());
            }

            bounces += 1;
        }

        l
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn refraction_scale_is_restored_after_leaving_the_medium() {
        for &eta in &[1.33, 1.5, 2.4] {
            let inside = refraction_scale(eta, true);
            assert!(approx_eq!(Float, inside, eta * eta, ulps = 2));
            assert!(inside > 1.0);
            assert!(approx_eq!(Float, inside * refraction_scale(eta, false), 1.0, epsilon = 1e-6));
        }
        assert_eq!(refraction_scale(1.0, true), 1.0);
    }
}
