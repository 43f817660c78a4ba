//! Camera

use crate::film::*;
use crate::geometry::*;
use crate::medium::*;
use crate::pbrt::*;
use std::fmt;
use std::sync::Arc;

/// Fraction of a pixel the film point is shifted by to find differential rays.
const DIFFERENTIAL_SHIFT: [Float; 2] = [0.05, -0.05];

/// Camera interface.
pub trait Camera {
    /// Returns the common camera data.
    fn get_data(&self) -> &CameraData;

    /// Returns a ray for a given sample together with a weight for how much
    /// the radiance arriving along it contributes to the image.
    ///
    /// * `sample` - The sample.
    fn generate_ray(&self, sample: &CameraSample) -> (Ray, Float);

    /// Returns a ray with differentials for rays shifted by one pixel in x
    /// and y on the film, together with its weight. The differentials are
    /// estimated by finite differences of `generate_ray()`.
    ///
    /// * `sample` - The sample.
    fn generate_ray_differential(&self, sample: &CameraSample) -> (Ray, Float) {
        let (mut ray, wt) = self.generate_ray(sample);
        if wt == 0.0 {
            return (ray, 0.0);
        }

        let mut rd = RayDifferential::default();
        for axis in 0..2 {
            let mut shifted_wt = 0.0;
            for eps in DIFFERENTIAL_SHIFT {
                let mut shifted = *sample;
                if axis == 0 {
                    shifted.p_film.x += eps;
                } else {
                    shifted.p_film.y += eps;
                }

                let (r, w) = self.generate_ray(&shifted);
                let o = ray.o + (r.o - ray.o) * (1.0 / eps);
                let d = ray.d + (r.d - ray.d) * (1.0 / eps);
                if axis == 0 {
                    rd.rx_origin = o;
                    rd.rx_direction = d;
                } else {
                    rd.ry_origin = o;
                    rd.ry_direction = d;
                }

                shifted_wt = w;
                if shifted_wt != 0.0 {
                    break;
                }
            }
            if shifted_wt == 0.0 {
                return (ray, 0.0);
            }
        }

        ray.differentials = Some(rd);
        (ray, wt)
    }
}

/// Atomic reference counted `Camera`.
pub type ArcCamera = Arc<dyn Camera + Send + Sync>;

/// Data common to all cameras.
#[derive(Clone)]
pub struct CameraData {
    /// Shutter open time.
    pub shutter_open: Float,

    /// Shutter close time.
    pub shutter_close: Float,

    /// The film the camera images onto.
    pub film: Arc<Film>,

    /// Scattering medium the camera sits in.
    pub medium: Option<ArcMedium>,
}

impl CameraData {
    /// Create a new `CameraData`.
    ///
    /// * `shutter_open`  - Shutter open time.
    /// * `shutter_close` - Shutter close time.
    /// * `film`          - The film.
    /// * `medium`        - Scattering medium the camera sits in.
    pub fn new(shutter_open: Float, shutter_close: Float, film: Arc<Film>, medium: Option<ArcMedium>) -> Self {
        Self {
            shutter_open,
            shutter_close,
            film,
            medium,
        }
    }
}

/// The sample values needed to generate a camera ray.
#[derive(Copy, Clone, Debug, Default)]
pub struct CameraSample {
    /// Point on the film in raster space.
    pub p_film: Point2f,

    /// Point on the lens in [0, 1)^2.
    pub p_lens: Point2f,

    /// Sample time in [0, 1), mapped onto the shutter interval.
    pub time: Float,
}

impl CameraSample {
    /// Create a new `CameraSample`.
    ///
    /// * `p_film` - Point on the film in raster space.
    /// * `p_lens` - Point on the lens.
    /// * `time`   - Sample time.
    pub fn new(p_film: Point2f, p_lens: Point2f, time: Float) -> Self {
        Self { p_film, p_lens, time }
    }
}

impl fmt::Display for CameraSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CameraSample<p_film: {}, p_lens: {}, time: {}>",
            self.p_film, self.p_lens, self.time
        )
    }
}
