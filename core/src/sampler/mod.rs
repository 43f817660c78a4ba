//! Sampler

mod common;

use crate::camera::*;
use crate::geometry::*;
use crate::pbrt::*;

// Re-export
pub use common::*;

/// Number of sample dimensions consumed by `Sampler::get_camera_sample()`:
/// film offset (2), time (1) and lens (2).
pub const CAMERA_SAMPLE_DIMENSIONS: usize = 5;

/// Sampler interface.
pub trait Sampler {
    /// Returns a shared reference underlying `SamplerData`.
    fn get_data(&self) -> &SamplerData;

    /// Returns a mutable reference to underlying `SamplerData`.
    fn get_data_mut(&mut self) -> &mut SamplerData;

    /// Returns an independent sampler with the same configuration and
    /// requested arrays, for use by one tile.
    ///
    /// * `seed` - Seed for samplers that draw from a random number generator.
    fn clone_sampler(&self, seed: u64) -> BoxSampler;

    /// This should be called when the rendering algorithm is ready to start
    /// working on a given pixel.
    ///
    /// * `p` - The pixel.
    fn start_pixel(&mut self, p: &Point2i) {
        self.get_data_mut().start_pixel(p);
    }

    /// Returns the sample value for the next dimension of the current sample vector.
    fn get_1d(&mut self) -> Float;

    /// Returns the sample value for the next two dimensions of the current sample vector.
    fn get_2d(&mut self) -> Point2f;

    /// Returns a `CameraSample` for a given pixel. Consumes the film offset,
    /// time and lens dimensions in that order.
    ///
    /// * `p_raster` - The pixel.
    fn get_camera_sample(&mut self, p_raster: &Point2i) -> CameraSample {
        let film_sample = self.get_2d();
        let p_film = Point2f::new(p_raster.x as Float + film_sample.x, p_raster.y as Float + film_sample.y);
        let time = self.get_1d();
        let p_lens = self.get_2d();
        CameraSample::new(p_film, p_lens, time)
    }

    /// Reserve an array of `n` 1D samples per pixel sample. Must be called
    /// before the first `start_pixel()`.
    ///
    /// * `n` - The number of samples.
    fn request_1d_array(&mut self, n: usize) {
        assert_eq!(self.round_count(n), n, "request_1d_array: unsupported count {}", n);
        self.get_data_mut().request_1d_array(n);
    }

    /// Reserve an array of `n` 2D samples per pixel sample. Must be called
    /// before the first `start_pixel()`.
    ///
    /// * `n` - The number of samples.
    fn request_2d_array(&mut self, n: usize) {
        assert_eq!(self.round_count(n), n, "request_2d_array: unsupported count {}", n);
        self.get_data_mut().request_2d_array(n);
    }

    /// Returns the sample count the sampler can generate most effectively
    /// near `n`. The default returns `n` unchanged.
    ///
    /// * `n` - The requested count.
    fn round_count(&self, n: usize) -> usize {
        n
    }

    /// Returns the next requested 1D array for the current sample, or `None`
    /// when all requested arrays have been consumed.
    ///
    /// * `n` - The number of samples; must match the requested size.
    fn get_1d_array(&mut self, n: usize) -> Option<&[Float]> {
        self.get_data_mut().get_1d_array(n)
    }

    /// Returns the next requested 2D array for the current sample, or `None`
    /// when all requested arrays have been consumed.
    ///
    /// * `n` - The number of samples; must match the requested size.
    fn get_2d_array(&mut self, n: usize) -> Option<&[Point2f]> {
        self.get_data_mut().get_2d_array(n)
    }

    /// Advance to the next sample of the current pixel. Returns `false` once
    /// `samples_per_pixel` samples have been taken.
    fn start_next_sample(&mut self) -> bool {
        self.get_data_mut().start_next_sample()
    }

    /// Jump to a given sample of the current pixel. Returns `false` if the
    /// sample number is out of range.
    ///
    /// * `sample_num` - The sample number.
    fn set_sample_number(&mut self, sample_num: usize) -> bool {
        self.get_data_mut().set_sample_number(sample_num)
    }

    /// Returns the index of the current sample in the current pixel.
    fn current_sample_number(&self) -> usize {
        self.get_data().current_pixel_sample_index
    }

    /// Returns the number of samples taken per pixel.
    fn samples_per_pixel(&self) -> usize {
        self.get_data().samples_per_pixel
    }
}

/// Heap allocated `Sampler` that can be handed to a worker thread.
pub type BoxSampler = Box<dyn Sampler + Send + Sync>;
