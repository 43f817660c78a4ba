//! Whitted Integrator

use bumpalo::Bump;
use lumen_core::camera::*;
use lumen_core::error::*;
use lumen_core::geometry::*;
use lumen_core::integrator::*;
use lumen_core::light::*;
use lumen_core::material::*;
use lumen_core::reflection::*;
use lumen_core::sampler::*;
use lumen_core::scene::*;
use lumen_core::spectrum::*;

/// Implements Whitted's ray tracing algorithm.
pub struct WhittedIntegrator {
    /// Common data for sampler integrators.
    pub data: SamplerIntegratorData,
}

impl WhittedIntegrator {
    /// Create a new `WhittedIntegrator`.
    ///
    /// * `max_depth`    - Maximum recursion depth.
    /// * `camera`       - The camera.
    /// * `sampler`      - Prototype sampler.
    /// * `pixel_bounds` - Pixel bounds for the image.
    pub fn new(max_depth: usize, camera: ArcCamera, sampler: BoxSampler, pixel_bounds: Bounds2i) -> Self {
        Self {
            data: SamplerIntegratorData::new(max_depth, camera, sampler, pixel_bounds),
        }
    }
}

impl SamplerIntegrator for WhittedIntegrator {
    fn get_data(&self) -> &SamplerIntegratorData {
        &self.data
    }

    fn get_data_mut(&mut self) -> &mut SamplerIntegratorData {
        &mut self.data
    }
}

impl Integrator for WhittedIntegrator {
    fn render(&self, scene: &Scene) -> Result<(), RenderError> {
        self.render_tiles(scene)
    }

    /// Returns the incident radiance at the origin of a given ray.
    ///
    /// * `ray`     - The ray.
    /// * `scene`   - The scene.
    /// * `sampler` - The sampler.
    /// * `arena`   - The memory arena for allocations.
    /// * `depth`   - The recursion depth.
    fn li(&self, ray: &mut Ray, scene: &Scene, sampler: &mut dyn Sampler, arena: &Bump, depth: usize) -> Spectrum {
        let mut l = Spectrum::ZERO;

        let isect = match scene.intersect(ray) {
            Some(isect) => isect,
            None => {
                for light in scene.infinite_lights.iter() {
                    l += light.le(ray);
                }
                return l;
            }
        };

        let n = isect.shading.n;
        let wo = isect.hit.wo;

        let bsdf = match isect
            .compute_scattering_functions(arena, TransportMode::Radiance, false)
            .bsdf
        {
            Some(bsdf) => bsdf,
            None => {
                let mut new_ray = isect.spawn_ray(&ray.d);
                return self.li(&mut new_ray, scene, sampler, arena, depth);
            }
        };

        // Emitted light if the ray hit an area light source.
        l += isect.le(&wo);

        // Add contribution of each light source.
        for light in scene.lights.iter() {
            let u = sampler.get_2d();
            let Li {
                wi,
                pdf,
                visibility,
                value: li,
            } = light.sample_li(&isect.hit, &u);
            if li.is_black() || pdf == 0.0 {
                continue;
            }

            let f = bsdf.f(&wo, &wi, BxDFType::BSDF_ALL);
            if !f.is_black() && visibility.map_or(true, |vis| vis.unoccluded(scene)) {
                l += f * li * wi.abs_dot_normal(&n) / pdf;
            }
        }

        if depth + 1 < self.data.max_depth {
            l += self.specular_reflect(&isect, bsdf, scene, sampler, arena, depth);
            l += self.specular_transmit(&isect, bsdf, scene, sampler, arena, depth);
        }

        l
    }
}
