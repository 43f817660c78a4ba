//! Direct Lighting Integrator

use bumpalo::Bump;
use lumen_core::camera::*;
use lumen_core::error::*;
use lumen_core::geometry::*;
use lumen_core::integrator::*;
use lumen_core::interaction::*;
use lumen_core::material::*;
use lumen_core::sampler::*;
use lumen_core::scene::*;
use lumen_core::spectrum::*;
use std::fmt;

/// Direct light sampling strategy.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DirectLightStrategy {
    /// Loops over all of the lights and takes a number of samples based on
    /// `n_samples` from each of them, summing the result.
    UniformSampleAll,

    /// Takes a single sample from just one of the lights, chosen at random.
    UniformSampleOne,
}

impl From<&str> for DirectLightStrategy {
    /// Returns the strategy for a name. Unknown names fall back to
    /// `UniformSampleAll`.
    ///
    /// * `s` - The name; "all" or "one".
    fn from(s: &str) -> Self {
        match s {
            "one" => Self::UniformSampleOne,
            "all" => Self::UniformSampleAll,
            _ => {
                warn!("Strategy '{}' for direct lighting unknown. Using 'all'.", s);
                Self::UniformSampleAll
            }
        }
    }
}

impl fmt::Display for DirectLightStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UniformSampleAll => write!(f, "all"),
            Self::UniformSampleOne => write!(f, "one"),
        }
    }
}

/// Implements the direct lighting integrator.
pub struct DirectLightingIntegrator {
    /// Common data for sampler integrators.
    pub data: SamplerIntegratorData,

    /// Direct light sampling strategy.
    strategy: DirectLightStrategy,

    /// Number of samples to use for each light source.
    n_light_samples: Vec<usize>,
}

impl DirectLightingIntegrator {
    /// Create a new `DirectLightingIntegrator`.
    ///
    /// * `strategy`     - Light sampling strategy.
    /// * `max_depth`    - Maximum recursion depth.
    /// * `camera`       - The camera.
    /// * `sampler`      - Prototype sampler.
    /// * `pixel_bounds` - Pixel bounds for the image.
    pub fn new(
        strategy: DirectLightStrategy,
        max_depth: usize,
        camera: ArcCamera,
        sampler: BoxSampler,
        pixel_bounds: Bounds2i,
    ) -> Self {
        Self {
            data: SamplerIntegratorData::new(max_depth, camera, sampler, pixel_bounds),
            strategy,
            n_light_samples: vec![],
        }
    }

    /// Returns the number of samples taken from each light. Empty until the
    /// scene is preprocessed with `UniformSampleAll`.
    pub fn light_sample_counts(&self) -> &[usize] {
        &self.n_light_samples
    }
}

impl SamplerIntegrator for DirectLightingIntegrator {
    fn get_data(&self) -> &SamplerIntegratorData {
        &self.data
    }

    fn get_data_mut(&mut self) -> &mut SamplerIntegratorData {
        &mut self.data
    }
}

impl Integrator for DirectLightingIntegrator {
    /// Requests the per-light sample arrays for every bounce.
    ///
    /// * `scene` - The scene
    fn preprocess(&mut self, scene: &Scene) {
        if self.strategy != DirectLightStrategy::UniformSampleAll {
            return;
        }

        let sampler = &mut self.data.sampler;
        self.n_light_samples = scene
            .lights
            .iter()
            .map(|light| sampler.round_count(light.get_num_samples()))
            .collect();

        for _ in 0..self.data.max_depth {
            for &n in self.n_light_samples.iter() {
                sampler.request_2d_array(n);
                sampler.request_2d_array(n);
            }
        }
        debug!("Requested light sample arrays {:?}", self.n_light_samples);
    }

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

        let wo = isect.hit.wo;
        l += isect.le(&wo);

        if !scene.lights.is_empty() {
            let it = Interaction::from(&isect);
            l += match self.strategy {
                DirectLightStrategy::UniformSampleAll => {
                    uniform_sample_all_lights(it, Some(bsdf), scene, sampler, &self.n_light_samples, false)
                }
                DirectLightStrategy::UniformSampleOne => {
                    uniform_sample_one_light(it, Some(bsdf), scene, sampler, false, None)
                }
            };
        }

        if depth + 1 < self.data.max_depth {
            l += self.specular_reflect(&isect, bsdf, scene, sampler, arena, depth);
            l += self.specular_transmit(&isect, bsdf, scene, sampler, arena, depth);
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

    #[test]
    fn strategy_from_name() {
        assert_eq!(DirectLightStrategy::from("one"), DirectLightStrategy::UniformSampleOne);
        assert_eq!(DirectLightStrategy::from("all"), DirectLightStrategy::UniformSampleAll);
        assert_eq!(DirectLightStrategy::from("bogus"), DirectLightStrategy::UniformSampleAll);
        assert_eq!(DirectLightStrategy::UniformSampleOne.to_string(), "one");
    }
}
