//! Statistical checks of the radiance estimators, calling `li()` directly.

mod common;

use bumpalo::Bump;
use common::*;
use float_cmp::*;
use integrators::*;
use lights::*;
use lumen_core::bssrdf::*;
use lumen_core::geometry::*;
use lumen_core::integrator::*;
use lumen_core::interaction::*;
use lumen_core::light::*;
use lumen_core::light_distrib::*;
use lumen_core::material::*;
use lumen_core::medium::*;
use lumen_core::pbrt::*;
use lumen_core::primitive::*;
use lumen_core::primitives::*;
use lumen_core::reflection::*;
use lumen_core::rng::*;
use lumen_core::sampler::*;
use lumen_core::sampling::*;
use lumen_core::scene::*;
use lumen_core::shape::*;
use lumen_core::spectrum::*;
use materials::*;
use samplers::*;
use shapes::*;
use std::sync::Arc;

/// Inside of a matte sphere of albedo `albedo` that also emits `le` inwards.
fn furnace(albedo: Float, le: Float) -> Scene {
    let sphere = Sphere::new(Point3f::ZERO, 1.0, true);
    let shape: ArcShape = Arc::new(sphere);
    let (area_light, light) =
        DiffuseAreaLight::new(Spectrum::new(le), 1, shape, false, MediumInterface::vacuum()).into_handles();
    let matte: ArcMaterial = Arc::new(MatteMaterial::new(Spectrum::new(albedo)));
    let aggregate: ArcPrimitive = Arc::new(PrimitiveList::new(vec![primitive(
        sphere,
        Some(matte),
        Some(area_light),
    )]));
    Scene::new(aggregate, vec![light])
}

fn path_integrator(max_depth: usize, rr_threshold: Float) -> PathIntegrator {
    let film = film(1, 1, box_filter());
    let pixel_bounds = film.cropped_pixel_bounds;
    PathIntegrator::new(
        max_depth,
        camera(film),
        Box::new(RandomSampler::new(1, Some(0))),
        pixel_bounds,
        rr_threshold,
        LightSampleStrategy::Uniform,
    )
}

/// Average red channel radiance of `n` rays leaving the origin in uniformly
/// distributed directions.
fn mean_radiance_from_origin(integrator: &dyn Integrator, scene: &Scene, n: usize, seed: u64) -> f64 {
    let mut sampler = RandomSampler::new(1, Some(seed));
    sampler.start_pixel(&Point2i::new(0, 0));
    let mut rng = RNG::new(seed + 1);
    let mut arena = Bump::new();

    let mut sum = 0.0_f64;
    for _ in 0..n {
        let u = Point2f::new(rng.uniform_float(), rng.uniform_float());
        let mut ray = Ray::new(Point3f::ZERO, uniform_sample_sphere(&u), INFINITY, 0.0, None);
        sum += integrator.li(&mut ray, scene, &mut sampler, &arena, 0)[0] as f64;
        arena.reset();
    }
    sum / n as f64
}

#[test]
fn russian_roulette_preserves_the_expected_value() {
    let (albedo, max_depth) = (0.5, 8);
    let scene = furnace(albedo, 1.0);

    // Emission seen directly plus one term per bounce.
    let expected: f64 = (0..=max_depth).map(|k| 0.5_f64.powi(k as i32)).sum();
    assert!(approx_eq!(f64, expected, 1.99609375, ulps = 2));

    let mut without_rr = path_integrator(max_depth, 0.0);
    without_rr.preprocess(&scene);
    let mut with_rr = path_integrator(max_depth, 1.0);
    with_rr.preprocess(&scene);

    let n = 20_000;
    let a = mean_radiance_from_origin(&without_rr, &scene, n, 1);
    let b = mean_radiance_from_origin(&with_rr, &scene, n, 2);
    assert!((a - expected).abs() / expected < 0.01, "without roulette {} != {}", a, expected);
    assert!((b - expected).abs() / expected < 0.02, "with roulette {} != {}", b, expected);
}

#[test]
fn max_depth_bounds_the_number_of_scattering_events() {
    let scene = furnace(0.5, 1.0);
    for max_depth in 0..4 {
        let mut integrator = path_integrator(max_depth, 0.0);
        integrator.preprocess(&scene);
        let expected: f64 = (0..=max_depth).map(|k| 0.5_f64.powi(k as i32)).sum();
        let mean = mean_radiance_from_origin(&integrator, &scene, 2_000, 5);
        assert!((mean - expected).abs() / expected < 0.01, "depth {}: {} != {}", max_depth, mean, expected);
    }
}

/// A point at the origin facing +z below a spherical lamp.
fn lamp_scene(le: Float, radius: Float, distance: Float) -> Scene {
    let lamp = Sphere::new(Point3f::new(0.0, 0.0, distance), radius, false);
    let shape: ArcShape = Arc::new(lamp);
    let (area_light, light) =
        DiffuseAreaLight::new(Spectrum::new(le), 1, shape, false, MediumInterface::vacuum()).into_handles();
    let aggregate: ArcPrimitive = Arc::new(PrimitiveList::new(vec![primitive(lamp, None, Some(area_light))]));
    Scene::new(aggregate, vec![light])
}

fn facing_up() -> SurfaceInteraction<'static> {
    SurfaceInteraction::new(
        Point3f::ZERO,
        Point2f::default(),
        Vector3f::new(0.0, 0.0, 1.0),
        Vector3f::new(1.0, 0.0, 0.0),
        Vector3f::new(0.0, 1.0, 0.0),
        0.0,
        false,
    )
}

#[test]
fn mis_direct_lighting_is_unbiased_and_beats_bsdf_sampling() {
    let (albedo, le, radius, distance) = (0.5, 4.0, 1.0, 3.0);
    let scene = lamp_scene(le, radius, distance);

    // Irradiance from a uniformly emitting sphere straight overhead is
    // pi * Le * (R / D)^2; a Lambertian surface reflects albedo / pi of it.
    let sin2_theta_max = (radius * radius / (distance * distance)) as f64;
    let expected = (albedo * le) as f64 * sin2_theta_max;

    let arena = Bump::new();
    let si = facing_up();
    let bsdf = MatteMaterial::new(Spectrum::new(albedo))
        .compute_scattering_functions(&si, &arena, TransportMode::Radiance, true)
        .bsdf
        .expect("bsdf");

    let mut sampler = RandomSampler::new(1, Some(9));
    sampler.start_pixel(&Point2i::new(0, 0));

    let n = 20_000;
    let estimates: Vec<f64> = (0..n)
        .map(|_| uniform_sample_one_light(Interaction::from(&si), Some(bsdf), &scene, &mut sampler, false, None)[0] as f64)
        .collect();
    let mean = estimates.iter().sum::<f64>() / n as f64;
    let variance = estimates.iter().map(|e| (e - mean) * (e - mean)).sum::<f64>() / (n - 1) as f64;
    assert!((mean - expected).abs() / expected < 0.01, "{} != {}", mean, expected);

    // Cosine weighted BSDF sampling alone scores albedo * Le whenever it hits
    // the lamp, which happens with probability sin^2(theta_max).
    let bsdf_only_variance = ((albedo * le) as f64).powi(2) * sin2_theta_max * (1.0 - sin2_theta_max);
    assert!(variance < 0.1 * bsdf_only_variance, "{} !< {}", variance, bsdf_only_variance);

    // Sampling every light agrees with sampling one of them.
    let all: f64 = (0..n)
        .map(|_| uniform_sample_all_lights(Interaction::from(&si), Some(bsdf), &scene, &mut sampler, &[1], false)[0] as f64)
        .sum::<f64>()
        / n as f64;
    assert!((all - expected).abs() / expected < 0.01, "{} != {}", all, expected);
}

#[test]
fn power_heuristic_weights_sum_to_one() {
    for &(f_pdf, g_pdf) in &[(0.1, 0.9), (1.0, 1.0), (5.0, 0.25), (0.0, 2.0)] {
        let w_f = power_heuristic(1, f_pdf, 1, g_pdf);
        let w_g = power_heuristic(1, g_pdf, 1, f_pdf);
        assert!(approx_eq!(Float, w_f + w_g, 1.0, epsilon = 1e-6));
    }
}

/// Subsurface model that always exits at the front of the unit sphere,
/// facing the camera, through a Lambertian BSDF.
struct ExitAtFront;

impl Bssrdf for ExitAtFront {
    fn sample_s<'scene, 'arena>(
        &self,
        _scene: &'scene Scene,
        _u1: Float,
        _u2: &Point2f,
        arena: &'arena Bump,
    ) -> Option<BssrdfSample<'scene, 'arena>> {
        let pi = SurfaceInteraction::new(
            Point3f::new(0.0, 0.0, -1.0),
            Point2f::default(),
            Vector3f::new(0.0, 0.0, -1.0),
            Vector3f::new(0.0, 1.0, 0.0),
            Vector3f::new(1.0, 0.0, 0.0),
            0.0,
            false,
        );
        let mut bsdf = BSDF::new(&pi, None);
        bsdf.add(LambertianReflection::alloc(arena, Spectrum::new(0.6)));
        Some(BssrdfSample {
            s: Spectrum::new(0.5),
            pi,
            bsdf: arena.alloc(bsdf),
            pdf: 1.0,
        })
    }
}

/// Index matched boundary that hands all light to `ExitAtFront`.
struct Translucent;

impl Material for Translucent {
    fn compute_scattering_functions<'arena>(
        &self,
        si: &SurfaceInteraction,
        arena: &'arena Bump,
        mode: TransportMode,
        _allow_multiple_lobes: bool,
    ) -> ScatteringFunctions<'arena> {
        let mut bsdf = BSDF::new(si, Some(1.0));
        bsdf.add(SpecularTransmission::alloc(arena, Spectrum::ONE, 1.0, 1.0, mode));
        let bssrdf: &'arena dyn Bssrdf = arena.alloc(ExitAtFront);
        ScatteringFunctions {
            bsdf: Some(arena.alloc(bsdf)),
            bssrdf: Some(bssrdf),
        }
    }
}

#[test]
fn subsurface_exit_point_is_lit_by_next_event_estimation() {
    let material: ArcMaterial = Arc::new(Translucent);
    let light: ArcLight = Arc::new(PointLight::new(
        Point3f::new(0.0, 0.0, -3.0),
        Spectrum::new(20.0),
        MediumInterface::vacuum(),
    ));
    let aggregate: ArcPrimitive = Arc::new(PrimitiveList::new(vec![primitive(
        Sphere::new(Point3f::ZERO, 1.0, false),
        Some(material),
        None,
    )]));
    let scene = Scene::new(aggregate, vec![light]);

    let mut integrator = path_integrator(1, 1.0);
    integrator.preprocess(&scene);

    let mut sampler = RandomSampler::new(1, Some(0));
    sampler.start_pixel(&Point2i::new(0, 0));
    let arena = Bump::new();
    let mut ray = Ray::new(Point3f::new(0.0, 0.0, -5.0), Vector3f::new(0.0, 0.0, 1.0), INFINITY, 0.0, None);
    let l = integrator.li(&mut ray, &scene, &mut sampler, &arena, 0);

    // s / pdf * kd / pi * I / d^2 with the light 2 units from the exit point.
    let expected = 0.5 * 0.6 * INV_PI * 20.0 / 4.0;
    assert!(approx_eq!(Float, l[0], expected, epsilon = 1e-3), "{} != {}", l[0], expected);
}

/// Sampler returning the same values in every dimension. With `u1 == 0`
/// Russian roulette terminates a path whenever it is applied.
struct ConstantSampler {
    data: SamplerData,
    u1: Float,
    u2: Point2f,
}

impl ConstantSampler {
    fn new(u1: Float, u2: Point2f) -> Self {
        Self {
            data: SamplerData::new(1),
            u1,
            u2,
        }
    }
}

impl Sampler for ConstantSampler {
    fn get_data(&self) -> &SamplerData {
        &self.data
    }

    fn get_data_mut(&mut self) -> &mut SamplerData {
        &mut self.data
    }

    fn clone_sampler(&self, _seed: u64) -> BoxSampler {
        Box::new(Self::new(self.u1, self.u2))
    }

    fn get_1d(&mut self) -> Float {
        self.u1
    }

    fn get_2d(&mut self) -> Point2f {
        self.u2
    }
}

/// Inside of an emitting mirror sphere of reflectivity `kr`. A ray through
/// the center bounces back and forth, picking up `kr^k` of the emission at
/// its k-th vertex.
fn mirror_furnace(kr: Float) -> Scene {
    let sphere = Sphere::new(Point3f::ZERO, 1.0, true);
    let shape: ArcShape = Arc::new(sphere);
    let (area_light, light) =
        DiffuseAreaLight::new(Spectrum::ONE, 1, shape, false, MediumInterface::vacuum()).into_handles();
    let mirror: ArcMaterial = Arc::new(MirrorMaterial::new(Spectrum::new(kr)));
    let aggregate: ArcPrimitive = Arc::new(PrimitiveList::new(vec![primitive(
        sphere,
        Some(mirror),
        Some(area_light),
    )]));
    Scene::new(aggregate, vec![light])
}

#[test]
fn roulette_never_fires_at_or_below_min_bounces() {
    let scene = mirror_furnace(0.5);
    let arena = Bump::new();
    let radiance = |integrator: &PathIntegrator| {
        let mut sampler = ConstantSampler::new(0.0, Point2f::new(0.5, 0.5));
        let mut ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, 1.0), INFINITY, 0.0, None);
        integrator.li(&mut ray, &scene, &mut sampler, &arena, 0)[0]
    };
    let vertices = |n: usize| (0..n).map(|k| (0.5 as Float).powi(k as i32)).sum::<Float>();

    // Every path is terminated by the first roulette test, which happens
    // right after the vertex following `min_rr_bounces`.
    for min_rr_bounces in 0..5 {
        let integrator = path_integrator(20, 1.0).with_min_rr_bounces(min_rr_bounces);
        let l = radiance(&integrator);
        let expected = vertices(min_rr_bounces + 2);
        assert!(
            approx_eq!(Float, l, expected, epsilon = 1e-4),
            "min bounces {}: {} != {}",
            min_rr_bounces,
            l,
            expected
        );
    }

    // Without roulette only `max_depth` ends the path.
    let integrator = path_integrator(6, 0.0).with_min_rr_bounces(0);
    assert!(approx_eq!(Float, radiance(&integrator), vertices(7), epsilon = 1e-4));
}

/// Transmits everything not reflected at a dielectric boundary with index
/// `ETA` on the inside.
struct Dielectric;

const ETA: Float = 1.5;

impl Material for Dielectric {
    fn compute_scattering_functions<'arena>(
        &self,
        si: &SurfaceInteraction,
        arena: &'arena Bump,
        mode: TransportMode,
        _allow_multiple_lobes: bool,
    ) -> ScatteringFunctions<'arena> {
        let mut bsdf = BSDF::new(si, Some(ETA));
        bsdf.add(SpecularTransmission::alloc(arena, Spectrum::ONE, 1.0, ETA, mode));
        ScatteringFunctions::from_bsdf(arena.alloc(bsdf))
    }
}

#[test]
fn refraction_does_not_trigger_roulette() {
    // Two glass balls on the z axis under a constant sky. Head-on, each
    // interface transmits 1 - ((eta - 1) / (eta + 1))^2 = 0.96 of the
    // throughput, but radiance inside is scaled by 1 / eta^2, which Russian
    // roulette must not see.
    let material: ArcMaterial = Arc::new(Dielectric);
    let sky: ArcLight = Arc::new(InfiniteAreaLight::new(Spectrum::ONE, 1));
    let aggregate: ArcPrimitive = Arc::new(PrimitiveList::new(vec![
        primitive(Sphere::new(Point3f::ZERO, 1.0, false), Some(Arc::clone(&material)), None),
        primitive(Sphere::new(Point3f::new(0.0, 0.0, 3.0), 1.0, false), Some(material), None),
    ]));
    let scene = Scene::new(aggregate, vec![sky]);

    // The second ball is entered at bounce 2 with beta = 0.96^3 / eta^2,
    // well under the threshold unless the refraction scale is factored out.
    let integrator = path_integrator(10, 0.8).with_min_rr_bounces(1);
    let arena = Bump::new();
    let mut sampler = ConstantSampler::new(0.0, Point2f::new(0.5, 0.5));
    let mut ray = Ray::new(Point3f::new(0.0, 0.0, -5.0), Vector3f::new(0.0, 0.0, 1.0), INFINITY, 0.0, None);
    let l = integrator.li(&mut ray, &scene, &mut sampler, &arena, 0);

    let expected = (0.96 as Float).powi(4);
    assert!(approx_eq!(Float, l[0], expected, epsilon = 1e-3), "{} != {}", l[0], expected);
}

#[test]
fn russian_roulette_is_unbiased_through_glass() {
    // A lossless glass ball inside the furnace leaves the equilibrium
    // radiance Le / (1 - albedo) unchanged outside of it.
    let (albedo, le) = (0.5, 1.0);
    let furnace_sphere = Sphere::new(Point3f::ZERO, 1.0, true);
    let shape: ArcShape = Arc::new(furnace_sphere);
    let (area_light, light) =
        DiffuseAreaLight::new(Spectrum::new(le), 1, shape, false, MediumInterface::vacuum()).into_handles();
    let matte: ArcMaterial = Arc::new(MatteMaterial::new(Spectrum::new(albedo)));
    let glass: ArcMaterial = Arc::new(GlassMaterial::default());
    let aggregate: ArcPrimitive = Arc::new(PrimitiveList::new(vec![
        primitive(furnace_sphere, Some(matte), Some(area_light)),
        primitive(Sphere::new(Point3f::new(0.0, 0.0, 0.5), 0.3, false), Some(glass), None),
    ]));
    let scene = Scene::new(aggregate, vec![light]);
    let expected = (le / (1.0 - albedo)) as f64;

    let mut without_rr = path_integrator(40, 0.0);
    without_rr.preprocess(&scene);
    let mut with_rr = path_integrator(40, 1.0);
    with_rr.preprocess(&scene);

    let n = 20_000;
    let a = mean_radiance_from_origin(&without_rr, &scene, n, 11);
    let b = mean_radiance_from_origin(&with_rr, &scene, n, 12);
    assert!((a - expected).abs() / expected < 0.03, "without roulette {} != {}", a, expected);
    assert!((b - expected).abs() / expected < 0.03, "with roulette {} != {}", b, expected);
    assert!((a - b).abs() / expected < 0.04, "{} != {}", a, b);
}
