//! Common

use super::*;

/// Stores the sampler data and implements common functionality for all samplers.
#[derive(Clone, Debug, Default)]
pub struct SamplerData {
    /// Number of samples generated for each pixel.
    pub samples_per_pixel: usize,

    /// Coordinates of current pixel being generated.
    pub current_pixel: Point2i,

    /// Sample number of the pixel currently being generated.
    pub current_pixel_sample_index: usize,

    /// Set once the first pixel is started; arrays can no longer be requested.
    pub pixel_started: bool,

    /// Sizes of requested 1D sample arrays.
    pub samples_1d_array_sizes: Vec<usize>,

    /// Sizes of requested 2D sample arrays.
    pub samples_2d_array_sizes: Vec<usize>,

    /// `n * samples_per_pixel` values for each requested 1D array.
    pub sample_array_1d: Vec<Vec<Float>>,

    /// `n * samples_per_pixel` values for each requested 2D array.
    pub sample_array_2d: Vec<Vec<Point2f>>,

    /// Index of the next 1D array to hand out for the current sample.
    pub array_1d_offset: usize,

    /// Index of the next 2D array to hand out for the current sample.
    pub array_2d_offset: usize,
}

impl SamplerData {
    /// Create a new `SamplerData` instance.
    ///
    /// * `samples_per_pixel` - Number of samples to generate for each pixel.
    pub fn new(samples_per_pixel: usize) -> Self {
        Self {
            samples_per_pixel,
            ..Default::default()
        }
    }

    /// Returns a copy with the same configuration and array shapes but no
    /// pixel state.
    pub fn fresh_copy(&self) -> Self {
        let mut data = Self::new(self.samples_per_pixel);
        for &n in self.samples_1d_array_sizes.iter() {
            data.request_1d_array(n);
        }
        for &n in self.samples_2d_array_sizes.iter() {
            data.request_2d_array(n);
        }
        data
    }

    /// Start working on a given pixel.
    ///
    /// * `p` - The pixel.
    pub fn start_pixel(&mut self, p: &Point2i) {
        self.pixel_started = true;
        self.current_pixel = *p;
        self.current_pixel_sample_index = 0;
        self.array_1d_offset = 0;
        self.array_2d_offset = 0;
    }

    /// Reserve an array of `n` 1D samples per pixel sample.
    ///
    /// * `n` - The number of samples.
    pub fn request_1d_array(&mut self, n: usize) {
        assert!(!self.pixel_started, "1D sample array requested after start_pixel()");
        self.samples_1d_array_sizes.push(n);
        self.sample_array_1d.push(vec![0.0; n * self.samples_per_pixel]);
    }

    /// Reserve an array of `n` 2D samples per pixel sample.
    ///
    /// * `n` - The number of samples.
    pub fn request_2d_array(&mut self, n: usize) {
        assert!(!self.pixel_started, "2D sample array requested after start_pixel()");
        self.samples_2d_array_sizes.push(n);
        self.sample_array_2d.push(vec![Point2f::ZERO; n * self.samples_per_pixel]);
    }

    /// Returns the next 1D array for the current sample.
    ///
    /// * `n` - The number of samples.
    pub fn get_1d_array(&mut self, n: usize) -> Option<&[Float]> {
        if self.array_1d_offset == self.sample_array_1d.len() {
            return None;
        }
        assert!(self.pixel_started, "sample arrays accessed before start_pixel()");
        assert_eq!(self.samples_1d_array_sizes[self.array_1d_offset], n);
        assert!(self.current_pixel_sample_index < self.samples_per_pixel);

        let i = self.current_pixel_sample_index * n;
        let array = &self.sample_array_1d[self.array_1d_offset];
        self.array_1d_offset += 1;
        Some(&array[i..i + n])
    }

    /// Returns the next 2D array for the current sample.
    ///
    /// * `n` - The number of samples.
    pub fn get_2d_array(&mut self, n: usize) -> Option<&[Point2f]> {
        if self.array_2d_offset == self.sample_array_2d.len() {
            return None;
        }
        assert!(self.pixel_started, "sample arrays accessed before start_pixel()");
        assert_eq!(self.samples_2d_array_sizes[self.array_2d_offset], n);
        assert!(self.current_pixel_sample_index < self.samples_per_pixel);

        let i = self.current_pixel_sample_index * n;
        let array = &self.sample_array_2d[self.array_2d_offset];
        self.array_2d_offset += 1;
        Some(&array[i..i + n])
    }

    /// Advance to the next sample of the current pixel.
    pub fn start_next_sample(&mut self) -> bool {
        self.array_1d_offset = 0;
        self.array_2d_offset = 0;
        self.current_pixel_sample_index += 1;
        self.current_pixel_sample_index < self.samples_per_pixel
    }

    /// Jump to a given sample of the current pixel.
    ///
    /// * `sample_num` - The sample number.
    pub fn set_sample_number(&mut self, sample_num: usize) -> bool {
        self.array_1d_offset = 0;
        self.array_2d_offset = 0;
        self.current_pixel_sample_index = sample_num;
        self.current_pixel_sample_index < self.samples_per_pixel
    }
}

/// Dimension bookkeeping for samplers that index one global sequence for
/// the whole image rather than generating samples pixel by pixel.
#[derive(Clone, Debug)]
pub struct GlobalSamplerData {
    /// Next dimension of the current sample vector.
    pub dimension: usize,

    /// Global index of the current sample.
    pub interval_sample_index: u64,

    /// First dimension devoted to array samples. Dimensions below it belong
    /// to the camera sample.
    pub array_start_dim: usize,

    /// One past the last array dimension; non-array samples after the
    /// camera sample continue from here.
    pub array_end_dim: usize,
}

impl GlobalSamplerData {
    /// Create a new `GlobalSamplerData` instance with no array dimensions.
    pub fn new() -> Self {
        Self {
            dimension: 0,
            interval_sample_index: 0,
            array_start_dim: CAMERA_SAMPLE_DIMENSIONS,
            array_end_dim: CAMERA_SAMPLE_DIMENSIONS,
        }
    }

    /// Recompute `array_end_dim` from the requested array counts. 2D arrays
    /// take two dimensions each.
    ///
    /// * `data` - Sampler data holding the requested arrays.
    pub fn update_array_end_dim(&mut self, data: &SamplerData) {
        self.array_end_dim = self.array_start_dim
            + data.sample_array_1d.len()
            + 2 * data.sample_array_2d.len();
    }

    /// Returns the dimension to use for the next `count` non-array values,
    /// skipping over the array region, and advances the cursor.
    ///
    /// * `count` - 1 for `get_1d()`, 2 for `get_2d()`.
    pub fn next_dimension(&mut self, count: usize) -> usize {
        if self.dimension + count > self.array_start_dim && self.dimension < self.array_end_dim {
            self.dimension = self.array_end_dim;
        }
        let dim = self.dimension;
        self.dimension += count;
        dim
    }
}

impl Default for GlobalSamplerData {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_dimension_skips_array_region() {
        let mut data = SamplerData::new(4);
        data.request_1d_array(2);
        data.request_2d_array(3);
        let mut g = GlobalSamplerData::new();
        g.update_array_end_dim(&data);
        assert_eq!(g.array_end_dim, 8);

        assert_eq!(g.next_dimension(2), 0);
        assert_eq!(g.next_dimension(1), 2);
        assert_eq!(g.next_dimension(2), 3);
        assert_eq!(g.next_dimension(1), 8);
        assert_eq!(g.next_dimension(2), 9);
    }

    #[test]
    fn next_dimension_without_arrays_is_sequential() {
        let mut g = GlobalSamplerData::new();
        let dims: Vec<usize> = (0..6).map(|_| g.next_dimension(1)).collect();
        assert_eq!(dims, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn arrays_are_exhausted_per_sample() {
        let mut data = SamplerData::new(2);
        data.request_1d_array(3);
        data.start_pixel(&Point2i::new(0, 0));
        assert_eq!(data.get_1d_array(3).map(|a| a.len()), Some(3));
        assert!(data.get_1d_array(3).is_none());
        assert!(data.start_next_sample());
        assert!(data.get_1d_array(3).is_some());
        assert!(!data.start_next_sample());
    }

    #[test]
    #[should_panic]
    fn request_after_start_pixel_panics() {
        let mut data = SamplerData::new(1);
        data.start_pixel(&Point2i::new(0, 0));
        data.request_1d_array(1);
    }

    #[test]
    fn fresh_copy_keeps_array_shapes() {
        let mut data = SamplerData::new(4);
        data.request_1d_array(2);
        data.request_2d_array(5);
        data.start_pixel(&Point2i::new(3, 4));
        let copy = data.fresh_copy();
        assert!(!copy.pixel_started);
        assert_eq!(copy.samples_1d_array_sizes, vec![2]);
        assert_eq!(copy.sample_array_2d[0].len(), 20);
    }
}
