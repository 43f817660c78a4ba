//! Scene fixtures shared by the integrator scenario tests.

#![allow(dead_code)]

use cameras::*;
use filters::*;
use lights::*;
use lumen_core::camera::*;
use lumen_core::film::*;
use lumen_core::filter::*;
use lumen_core::geometry::*;
use lumen_core::integrator::*;
use lumen_core::light::*;
use lumen_core::material::*;
use lumen_core::medium::*;
use lumen_core::pbrt::*;
use lumen_core::primitive::*;
use lumen_core::primitives::*;
use lumen_core::scene::*;
use lumen_core::shape::*;
use lumen_core::spectrum::*;
use materials::*;
use shapes::*;
use std::sync::Arc;

/// Create a film covering the whole image.
///
/// * `w`      - Width in pixels.
/// * `h`      - Height in pixels.
/// * `filter` - Reconstruction filter.
pub fn film(w: Int, h: Int, filter: ArcFilter) -> Arc<Film> {
    let crop = Bounds2f::new(Point2f::new(0.0, 0.0), Point2f::new(1.0, 1.0));
    Arc::new(Film::new(&Point2i::new(w, h), &crop, filter, "test.png", None, None))
}

/// Box filter with half-pixel radius; samples only reach their own pixel.
pub fn box_filter() -> ArcFilter {
    Arc::new(BoxFilter::default())
}

/// Mitchell filter with the given radius.
pub fn mitchell_filter(radius: Float) -> ArcFilter {
    Arc::new(MitchellFilter::new(Vector2f::new(radius, radius), 1.0 / 3.0, 1.0 / 3.0))
}

/// Pinhole camera at (0, 0, -5) looking at the origin.
///
/// * `film` - The film.
pub fn camera(film: Arc<Film>) -> ArcCamera {
    Arc::new(PerspectiveCamera::new(
        Point3f::new(0.0, 0.0, -5.0),
        Point3f::ZERO,
        Vector3f::new(0.0, 1.0, 0.0),
        40.0,
        0.0,
        1e6,
        film,
        None,
    ))
}

/// Returns the film of an integrator's camera.
pub fn film_of(data: &SamplerIntegratorData) -> Arc<Film> {
    Arc::clone(&data.camera.get_data().film)
}

/// A sphere primitive.
///
/// * `sphere`     - The shape.
/// * `material`   - Optional material.
/// * `area_light` - Optional emission.
pub fn primitive(sphere: Sphere, material: Option<ArcMaterial>, area_light: Option<ArcAreaLight>) -> ArcPrimitive {
    let shape: ArcShape = Arc::new(sphere);
    Arc::new(GeometricPrimitive::new(shape, material, area_light, MediumInterface::vacuum()))
}

/// A matte sphere in the middle of the image that also emits `le`, and a
/// point light in front of it.
///
/// * `le` - Emitted radiance of the sphere.
pub fn emissive_sphere_scene(le: Spectrum) -> Scene {
    let sphere = Sphere::new(Point3f::ZERO, 1.0, false);
    let shape: ArcShape = Arc::new(sphere);
    let (area_light, light) = DiffuseAreaLight::new(le, 1, shape, false, MediumInterface::vacuum()).into_handles();
    let matte: ArcMaterial = Arc::new(MatteMaterial::new(Spectrum::new(0.8)));

    let point: ArcLight = Arc::new(PointLight::new(
        Point3f::new(0.0, 0.0, -3.0),
        Spectrum::new(20.0),
        MediumInterface::vacuum(),
    ));

    let aggregate: ArcPrimitive = Arc::new(PrimitiveList::new(vec![primitive(
        sphere,
        Some(matte),
        Some(area_light),
    )]));
    Scene::new(aggregate, vec![light, point])
}

/// A diffuse sphere resting on a large diffuse floor sphere, a mirror
/// sphere, a glass sphere, a point light and a spherical area light.
pub fn showcase_scene() -> Scene {
    let matte: ArcMaterial = Arc::new(MatteMaterial::new(Spectrum::from_rgb(&[0.7, 0.4, 0.3])));
    let floor: ArcMaterial = Arc::new(MatteMaterial::default());
    let mirror: ArcMaterial = Arc::new(MirrorMaterial::default());
    let glass: ArcMaterial = Arc::new(GlassMaterial::default());

    let lamp = Sphere::new(Point3f::new(1.5, 2.5, -1.0), 0.4, false);
    let lamp_shape: ArcShape = Arc::new(lamp);
    let (area_light, lamp_light) =
        DiffuseAreaLight::new(Spectrum::new(8.0), 1, lamp_shape, false, MediumInterface::vacuum()).into_handles();

    let point: ArcLight = Arc::new(PointLight::new(
        Point3f::new(-2.0, 3.0, -2.0),
        Spectrum::new(15.0),
        MediumInterface::vacuum(),
    ));

    let aggregate: ArcPrimitive = Arc::new(PrimitiveList::new(vec![
        primitive(Sphere::new(Point3f::new(0.0, -101.0, 0.0), 100.0, false), Some(floor), None),
        primitive(Sphere::new(Point3f::new(-1.2, -0.4, 0.5), 0.6, false), Some(matte), None),
        primitive(Sphere::new(Point3f::new(0.0, -0.4, 0.0), 0.6, false), Some(mirror), None),
        primitive(Sphere::new(Point3f::new(1.2, -0.4, -0.5), 0.6, false), Some(glass), None),
        primitive(lamp, None, Some(area_light)),
    ]));
    Scene::new(aggregate, vec![point, lamp_light])
}
