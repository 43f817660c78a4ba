//! Scene

use crate::geometry::*;
use crate::interaction::*;
use crate::light::*;
use crate::primitive::*;
use crate::sampler::*;
use crate::spectrum::*;

/// Scene.
#[derive(Clone)]
pub struct Scene {
    /// An aggregate of all primitives in the scene.
    pub aggregate: ArcPrimitive,

    /// All light sources in the scene.
    pub lights: Vec<ArcLight>,

    /// Infinite light sources in the scene.
    pub infinite_lights: Vec<ArcLight>,

    /// The bounding box of the scene geometry.
    pub world_bound: Bounds3f,
}

impl Scene {
    /// Creates a new `Scene` and preprocesses its lights.
    ///
    /// * `aggregate` - An aggregate of all primitives in the scene.
    /// * `lights`    - All light sources in the scene.
    pub fn new(aggregate: ArcPrimitive, lights: Vec<ArcLight>) -> Self {
        let infinite_lights = lights
            .iter()
            .filter(|l| l.get_type().matches(LightType::INFINITE_LIGHT))
            .cloned()
            .collect();

        let scene = Self {
            world_bound: aggregate.world_bound(),
            aggregate,
            lights,
            infinite_lights,
        };

        for light in scene.lights.iter() {
            light.preprocess(&scene);
        }

        scene
    }

    /// Traces the ray into the scene and returns the `SurfaceInteraction` if
    /// an intersection occurred. `ray.t_max` is updated to the hit distance.
    ///
    /// * `ray` - The ray to trace.
    pub fn intersect(&self, ray: &mut Ray) -> Option<SurfaceInteraction<'_>> {
        self.aggregate.intersect(ray)
    }

    /// Traces the ray into the scene and returns whether or not an intersection
    /// occurred.
    ///
    /// * `ray` - The ray to trace.
    pub fn intersect_p(&self, ray: &Ray) -> bool {
        self.aggregate.intersect_p(ray)
    }

    /// Traces the ray into the scene and returns the first intersection with a
    /// light scattering surface along the ray together with the beam
    /// transmittance up to that point (or to infinity on a miss).
    ///
    /// * `ray`     - The ray to trace. On return it holds the last segment.
    /// * `sampler` - Sampler.
    pub fn intersect_tr(&self, ray: &mut Ray, sampler: &mut dyn Sampler) -> (Option<SurfaceInteraction<'_>>, Spectrum) {
        let mut tr = Spectrum::ONE;

        loop {
            let hit_surface = self.intersect(ray);

            // Accumulate beam transmittance for ray segment.
            if let Some(medium) = ray.medium.as_ref() {
                tr *= medium.tr(ray, sampler);
            }

            // Initialize next ray segment or terminate transmittance computation.
            match hit_surface {
                Some(isect) => {
                    if isect.primitive.and_then(|p| p.get_material()).is_some() {
                        return (Some(isect), tr);
                    }
                    *ray = isect.spawn_ray(&ray.d);
                }
                None => return (None, tr),
            }
        }
    }
}
