//! Built-in demo scene

use lights::*;
use lumen_core::geometry::*;
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

/// Camera position.
pub const EYE: Point3f = Point3f {
    x: 0.0,
    y: 1.0,
    z: -6.0,
};

/// Point the camera looks at.
pub const LOOK_AT: Point3f = Point3f { x: 0.0, y: 0.0, z: 0.0 };

/// Vertical field of view in degrees.
pub const FOV: Float = 40.0;

fn sphere(center: Point3f, radius: Float, material: Option<ArcMaterial>, area_light: Option<ArcAreaLight>) -> ArcPrimitive {
    let shape: ArcShape = Arc::new(Sphere::new(center, radius, false));
    Arc::new(GeometricPrimitive::new(
        shape,
        material,
        area_light,
        MediumInterface::vacuum(),
    ))
}

/// Builds the demo scene: three spheres (diffuse, mirror and glass) resting
/// on a large diffuse floor sphere, lit by a point light and a spherical area
/// light.
///
/// * `environment` - Radiance of a constant environment light. No environment
///                   light is added when it is not positive.
pub fn demo_scene(environment: Float) -> Scene {
    let floor: ArcMaterial = Arc::new(MatteMaterial::new(Spectrum::new(0.6)));
    let diffuse: ArcMaterial = Arc::new(MatteMaterial::new(Spectrum::from_rgb(&[0.8, 0.25, 0.2])));
    let mirror: ArcMaterial = Arc::new(MirrorMaterial::default());
    let glass: ArcMaterial = Arc::new(GlassMaterial::default());
    let lamp_material: ArcMaterial = Arc::new(MatteMaterial::new(Spectrum::ZERO));

    let lamp_center = Point3f::new(-1.5, 3.0, -1.0);
    let lamp_shape: ArcShape = Arc::new(Sphere::new(lamp_center, 0.5, false));
    let (lamp_area_light, lamp_light) =
        DiffuseAreaLight::new(Spectrum::new(6.0), 4, lamp_shape, false, MediumInterface::vacuum()).into_handles();

    let primitives = vec![
        sphere(Point3f::new(0.0, -100.0, 0.0), 100.0, Some(floor), None),
        sphere(Point3f::new(-1.5, 0.75, 0.5), 0.75, Some(diffuse), None),
        sphere(Point3f::new(0.0, 0.75, 1.0), 0.75, Some(mirror), None),
        sphere(Point3f::new(1.5, 0.75, 0.0), 0.75, Some(glass), None),
        sphere(lamp_center, 0.5, Some(lamp_material), Some(lamp_area_light)),
    ];

    let point_light: ArcLight = Arc::new(PointLight::new(
        Point3f::new(3.0, 4.0, -3.0),
        Spectrum::new(25.0),
        MediumInterface::vacuum(),
    ));

    let mut lights = vec![point_light, lamp_light];
    if environment > 0.0 {
        let sky: ArcLight = Arc::new(InfiniteAreaLight::new(Spectrum::new(environment), 4));
        lights.push(sky);
    }

    info!("Demo scene with {} primitives and {} lights", primitives.len(), lights.len());
    let aggregate: ArcPrimitive = Arc::new(PrimitiveList::new(primitives));
    Scene::new(aggregate, lights)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_light_is_optional() {
        let scene = demo_scene(0.0);
        assert_eq!(scene.lights.len(), 2);
        assert!(scene.infinite_lights.is_empty());

        let scene = demo_scene(0.5);
        assert_eq!(scene.lights.len(), 3);
        assert_eq!(scene.infinite_lights.len(), 1);
    }

    #[test]
    fn camera_sees_the_spheres() {
        let mut ray = Ray::new(EYE, (Point3f::new(0.0, 0.75, 1.0) - EYE).normalize(), INFINITY, 0.0, None);
        let scene = demo_scene(0.0);
        let isect = scene.intersect(&mut ray).expect("hit");
        assert!(isect.hit.p.y > 0.0);
    }
}
