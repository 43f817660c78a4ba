//! Perspective Camera

use lumen_core::camera::*;
use lumen_core::film::*;
use lumen_core::geometry::*;
use lumen_core::medium::*;
use lumen_core::pbrt::*;
use lumen_core::sampling::*;
use std::sync::Arc;

/// Perspective camera positioned with a look-at frame.
pub struct PerspectiveCamera {
    /// Common camera parameters.
    pub data: CameraData,

    /// Position of the camera.
    pub eye: Point3f,

    /// Camera space x-axis in world space.
    pub right: Vector3f,

    /// Camera space y-axis in world space.
    pub up: Vector3f,

    /// Viewing direction; camera space z-axis in world space.
    pub forward: Vector3f,

    /// Bounds of screen space.
    pub screen_window: Bounds2f,

    /// tan(fov/2). Scales screen space onto the image plane at z=1.
    pub tan_half_fov: Float,

    /// Radius of camera lens.
    pub lens_radius: Float,

    /// Focal distance.
    pub focal_distance: Float,
}

impl PerspectiveCamera {
    /// Create a new perspective camera.
    ///
    /// * `eye`            - Position of the camera.
    /// * `look_at`        - Point the camera looks at.
    /// * `up`             - Approximate up direction.
    /// * `fov`            - The field-of-view angle in degrees, spanning the
    ///                      shorter image axis.
    /// * `lens_radius`    - Radius of camera lens. Zero for a pinhole.
    /// * `focal_distance` - Focal distance.
    /// * `film`           - The film to capture the rendered image.
    /// * `medium`         - Scattering medium the camera lies in.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        eye: Point3f,
        look_at: Point3f,
        up: Vector3f,
        fov: Float,
        lens_radius: Float,
        focal_distance: Float,
        film: Arc<Film>,
        medium: Option<ArcMedium>,
    ) -> Self {
        let forward = (look_at - eye).normalize();
        let mut right = up.normalize().cross(&forward);
        if right.length_squared() == 0.0 {
            warn!("Up vector {} and viewing direction {} are parallel", up, forward);
            right = coordinate_system(&forward).0;
        }
        let right = right.normalize();
        let up = forward.cross(&right);

        let res = film.full_resolution;
        let aspect = res.x as Float / res.y as Float;
        let screen_window = if aspect > 1.0 {
            Bounds2f::new(Point2f::new(-aspect, -1.0), Point2f::new(aspect, 1.0))
        } else {
            Bounds2f::new(Point2f::new(-1.0, -1.0 / aspect), Point2f::new(1.0, 1.0 / aspect))
        };

        Self {
            data: CameraData::new(0.0, 1.0, film, medium),
            eye,
            right,
            up,
            forward,
            screen_window,
            tan_half_fov: (0.5 * fov).to_radians().tan(),
            lens_radius,
            focal_distance,
        }
    }

    /// Maps a raster space film point onto the image plane at z=1 in camera
    /// space.
    ///
    /// * `p_film` - Point on the film in raster space.
    fn raster_to_camera(&self, p_film: &Point2f) -> Vector3f {
        let res = self.data.film.full_resolution;
        let sw = &self.screen_window;
        let sx = sw.p_min.x + (p_film.x / res.x as Float) * (sw.p_max.x - sw.p_min.x);
        let sy = sw.p_max.y - (p_film.y / res.y as Float) * (sw.p_max.y - sw.p_min.y);
        Vector3f::new(sx * self.tan_half_fov, sy * self.tan_half_fov, 1.0)
    }

    /// Transforms a camera space vector to world space.
    ///
    /// * `v` - The vector.
    fn camera_to_world(&self, v: &Vector3f) -> Vector3f {
        v.x * self.right + v.y * self.up + v.z * self.forward
    }
}

impl Camera for PerspectiveCamera {
    fn get_data(&self) -> &CameraData {
        &self.data
    }

    /// Returns a ray corresponding to a given sample. Every ray carries full
    /// weight.
    ///
    /// * `sample` - The sample.
    fn generate_ray(&self, sample: &CameraSample) -> (Ray, Float) {
        let mut o = Vector3f::ZERO;
        let mut d = self.raster_to_camera(&sample.p_film).normalize();

        // Modify ray for depth of field.
        if self.lens_radius > 0.0 {
            let p_lens = concentric_sample_disk(&sample.p_lens) * self.lens_radius;
            let ft = self.focal_distance / d.z;
            let p_focus = d * ft;
            o = Vector3f::new(p_lens.x, p_lens.y, 0.0);
            d = (p_focus - o).normalize();
        }

        let ray = Ray::new(
            self.eye + self.camera_to_world(&o),
            self.camera_to_world(&d),
            INFINITY,
            lerp(sample.time, self.data.shutter_open, self.data.shutter_close),
            self.data.medium.clone(),
        );
        (ray, 1.0)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
