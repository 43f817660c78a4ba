//! End-to-end renders through the tile scheduler.

mod common;

use bumpalo::Bump;
use common::*;
use float_cmp::*;
use integrators::*;
use lumen_core::error::*;
use lumen_core::filter::ArcFilter;
use lumen_core::geometry::*;
use lumen_core::integrator::*;
use lumen_core::light_distrib::*;
use lumen_core::pbrt::*;
use lumen_core::sampler::*;
use lumen_core::scene::*;
use lumen_core::spectrum::*;
use samplers::*;
use std::sync::atomic::{AtomicUsize, Ordering};

fn path_integrator(
    max_depth: usize,
    w: Int,
    h: Int,
    filter: ArcFilter,
    sampler: BoxSampler,
    n_threads: usize,
    tile_size: usize,
) -> PathIntegrator {
    let film = film(w, h, filter);
    let pixel_bounds = film.cropped_pixel_bounds;
    let mut integrator = PathIntegrator::new(
        max_depth,
        camera(film),
        sampler,
        pixel_bounds,
        DEFAULT_RR_THRESHOLD,
        LightSampleStrategy::Spatial,
    );
    configure(&mut integrator, n_threads, tile_size);
    integrator
}

fn configure(integrator: &mut dyn SamplerIntegrator, n_threads: usize, tile_size: usize) {
    let data = integrator.get_data_mut();
    data.n_threads = n_threads;
    data.tile_size = tile_size;
    data.write_image = false;
    data.quiet = true;
}

fn render(integrator: &mut dyn SamplerIntegrator, scene: &Scene) -> Vec<Spectrum> {
    integrator.preprocess(scene);
    integrator.render(scene).expect("render");
    film_of(integrator.get_data()).get_image()
}

#[test]
fn max_depth_zero_sees_only_emission() {
    let le = Spectrum::new(0.75);
    let scene = emissive_sphere_scene(le);

    let sampler = Box::new(RandomSampler::new(4, Some(0)));
    let mut integrator = path_integrator(0, 32, 32, box_filter(), sampler, 2, 16);
    render(&mut integrator, &scene);
    let film = film_of(&integrator.data);

    // The point light in front of the sphere adds nothing at depth 0.
    let center = film.get_pixel(&Point2i::new(16, 16));
    for c in 0..3 {
        assert!(approx_eq!(Float, center[c], 0.75, epsilon = 1e-5));
    }
    assert!(film.get_pixel(&Point2i::new(0, 0)).is_black());

    // One bounce picks up the point light.
    let sampler = Box::new(RandomSampler::new(64, Some(0)));
    let mut integrator = path_integrator(1, 32, 32, box_filter(), sampler, 2, 16);
    render(&mut integrator, &scene);
    let lit = film_of(&integrator.data).get_pixel(&Point2i::new(16, 16));
    assert!(lit[0] > 0.8);
}

#[test]
fn renders_are_identical_across_runs_and_thread_counts() {
    let scene = showcase_scene();

    let images: Vec<Vec<Spectrum>> = [1, 1, 4]
        .iter()
        .map(|&n_threads| {
            let sampler = Box::new(RandomSampler::new(1, Some(0)));
            let mut integrator = path_integrator(5, 48, 40, mitchell_filter(2.0), sampler, n_threads, 16);
            render(&mut integrator, &scene)
        })
        .collect();

    assert!(images[0].iter().any(|s| !s.is_black()));
    assert_eq!(images[0], images[1]);
    assert_eq!(images[0], images[2]);
}

#[test]
fn halton_render_is_independent_of_tiling() {
    // Halton samples are a function of the pixel alone, so splitting the
    // image into tiles only changes the order in which borders are summed.
    let scene = showcase_scene();

    let render_with_tiles = |tile_size: usize| {
        let film = film(32, 16, mitchell_filter(2.0));
        let sampler = Box::new(HaltonSampler::new(8, film.get_sample_bounds(), false));
        let mut integrator = path_integrator(3, 32, 16, mitchell_filter(2.0), sampler, 2, tile_size);
        render(&mut integrator, &scene)
    };

    let tiled = render_with_tiles(16);
    let whole = render_with_tiles(64);
    assert_eq!(tiled.len(), whole.len());
    for (a, b) in tiled.iter().zip(whole.iter()) {
        for c in 0..3 {
            assert!(approx_eq!(Float, a[c], b[c], epsilon = 1e-4), "{} != {}", a, b);
        }
    }
}

#[test]
fn constant_environment_is_seamless_across_tiles() {
    // A constant environment resolves to its radiance everywhere, including
    // the columns on either side of the border between the two tiles.
    let scene = {
        use lights::InfiniteAreaLight;
        use lumen_core::light::ArcLight;
        use lumen_core::primitive::ArcPrimitive;
        use lumen_core::primitives::PrimitiveList;
        use std::sync::Arc;

        // The material-less sphere is transparent to camera rays.
        let sky: ArcLight = Arc::new(InfiniteAreaLight::new(Spectrum::new(0.6), 1));
        let far = shapes::Sphere::new(Point3f::new(0.0, 0.0, 1000.0), 1.0, false);
        let aggregate: ArcPrimitive = Arc::new(PrimitiveList::new(vec![primitive(far, None, None)]));
        Scene::new(aggregate, vec![sky])
    };

    let sampler = Box::new(RandomSampler::new(16, Some(3)));
    let mut integrator = path_integrator(2, 32, 16, mitchell_filter(2.0), sampler, 2, 16);
    render(&mut integrator, &scene);
    let film = film_of(&integrator.data);

    for y in 0..16 {
        let left = film.get_pixel(&Point2i::new(15, y));
        let right = film.get_pixel(&Point2i::new(16, y));
        assert!(approx_eq!(Float, left[1], 0.6, epsilon = 1e-4));
        assert!(approx_eq!(Float, left[1], right[1], epsilon = 1e-4));
    }
}

#[test]
fn deep_paths_with_halton_render_without_roulette() {
    // Inside a closed, bright room every path reaches max depth and draws
    // well over a thousand Halton dimensions.
    let scene = {
        use lumen_core::light::ArcLight;
        use lumen_core::material::ArcMaterial;
        use lumen_core::medium::MediumInterface;
        use lumen_core::primitive::ArcPrimitive;
        use lumen_core::primitives::PrimitiveList;
        use std::sync::Arc;

        let walls: ArcMaterial = Arc::new(materials::MatteMaterial::new(Spectrum::new(0.95)));
        let point: ArcLight = Arc::new(lights::PointLight::new(
            Point3f::new(0.0, 2.0, 0.0),
            Spectrum::new(10.0),
            MediumInterface::vacuum(),
        ));
        let aggregate: ArcPrimitive = Arc::new(PrimitiveList::new(vec![primitive(
            shapes::Sphere::new(Point3f::ZERO, 10.0, true),
            Some(walls),
            None,
        )]));
        Scene::new(aggregate, vec![point])
    };

    let film = film(4, 4, box_filter());
    let pixel_bounds = film.cropped_pixel_bounds;
    let sampler = Box::new(HaltonSampler::new(1, film.get_sample_bounds(), false));
    let mut integrator =
        PathIntegrator::new(200, camera(film), sampler, pixel_bounds, 0.0, LightSampleStrategy::Uniform);
    configure(&mut integrator, 2, 16);

    let image = render(&mut integrator, &scene);
    assert!(image.iter().all(|s| !s.is_black() && !s.has_nans()));
}

#[test]
fn whitted_and_direct_lighting_agree_on_diffuse_surfaces() {
    // With one point light and a purely diffuse sphere both integrators
    // compute the same, noise free, direct illumination.
    let scene = {
        use lumen_core::light::ArcLight;
        use lumen_core::material::ArcMaterial;
        use lumen_core::medium::MediumInterface;
        use lumen_core::primitive::ArcPrimitive;
        use lumen_core::primitives::PrimitiveList;
        use std::sync::Arc;

        let matte: ArcMaterial = Arc::new(materials::MatteMaterial::new(Spectrum::new(0.5)));
        let point: ArcLight = Arc::new(lights::PointLight::new(
            Point3f::new(0.0, 0.0, -4.0),
            Spectrum::new(10.0),
            MediumInterface::vacuum(),
        ));
        let aggregate: ArcPrimitive = Arc::new(PrimitiveList::new(vec![primitive(
            shapes::Sphere::new(Point3f::ZERO, 1.0, false),
            Some(matte),
            None,
        )]));
        Scene::new(aggregate, vec![point])
    };

    let film_a = film(16, 16, box_filter());
    let pixel_bounds = film_a.cropped_pixel_bounds;
    let mut whitted = WhittedIntegrator::new(3, camera(film_a), Box::new(RandomSampler::new(2, Some(0))), pixel_bounds);
    configure(&mut whitted, 2, 16);

    let mut direct = DirectLightingIntegrator::new(
        DirectLightStrategy::UniformSampleAll,
        3,
        camera(film(16, 16, box_filter())),
        Box::new(RandomSampler::new(2, Some(0))),
        pixel_bounds,
    );
    configure(&mut direct, 2, 16);

    let a = render(&mut whitted, &scene);
    let b = render(&mut direct, &scene);
    assert_eq!(direct.light_sample_counts().to_vec(), vec![1]);
    assert!(a.iter().any(|s| !s.is_black()));
    for (a, b) in a.iter().zip(b.iter()) {
        assert!(approx_eq!(Float, a[0], b[0], epsilon = 1e-4), "{} != {}", a, b);
    }
}

#[test]
fn cancelled_render_returns_cancelled() {
    let scene = showcase_scene();
    let sampler = Box::new(RandomSampler::new(1, Some(0)));
    let mut integrator = path_integrator(2, 64, 64, box_filter(), sampler, 2, 16);
    let cancel = CancelToken::new();
    cancel.cancel();
    integrator.data.cancel = cancel;

    integrator.preprocess(&scene);
    assert!(matches!(integrator.render(&scene), Err(RenderError::Cancelled)));
}

/// Panics on camera rays heading into the upper right corner of the image
/// and returns unit radiance everywhere else.
struct FaultyIntegrator {
    data: SamplerIntegratorData,
    calls: AtomicUsize,
}

impl SamplerIntegrator for FaultyIntegrator {
    fn get_data(&self) -> &SamplerIntegratorData {
        &self.data
    }

    fn get_data_mut(&mut self) -> &mut SamplerIntegratorData {
        &mut self.data
    }
}

impl Integrator for FaultyIntegrator {
    fn render(&self, scene: &Scene) -> Result<(), RenderError> {
        self.render_tiles(scene)
    }

    fn li(
        &self,
        ray: &mut Ray,
        _scene: &Scene,
        _sampler: &mut dyn Sampler,
        _arena: &Bump,
        _depth: usize,
    ) -> Spectrum {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if ray.d.x > 0.2 && ray.d.y > 0.2 {
            panic!("bad sample");
        }
        Spectrum::ONE
    }
}

#[test]
fn tile_panic_fails_the_render() {
    let scene = emissive_sphere_scene(Spectrum::ONE);
    let film = film(64, 64, box_filter());
    let pixel_bounds = film.cropped_pixel_bounds;
    let integrator = FaultyIntegrator {
        data: SamplerIntegratorData::new(1, camera(film), Box::new(RandomSampler::new(1, Some(0))), pixel_bounds)
            .with_threads(2)
            .with_tile_size(16)
            .with_image_output(false),
        calls: AtomicUsize::new(0),
    };

    match integrator.render(&scene) {
        Err(RenderError::TileFailed { message, .. }) => assert_eq!(message, "bad sample"),
        Err(err) => panic!("unexpected error {}", err),
        Ok(()) => panic!("render succeeded"),
    }
    assert!(integrator.calls.load(Ordering::Relaxed) > 0);
}
