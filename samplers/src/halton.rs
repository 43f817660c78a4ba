//! Halton Sampler.

use lumen_core::geometry::*;
use lumen_core::low_discrepancy::*;
use lumen_core::pbrt::*;
use lumen_core::rng::*;
use lumen_core::sampler::*;
use std::sync::LazyLock;

/// Maximum resolution for sampling first 2 dimensions.
const K_MAX_RESOLUTION: Int = 128;

/// Random digit permutations for every prime base, computed once and
/// shared read-only by all samplers.
static RADICAL_INVERSE_PERMUTATIONS: LazyLock<Vec<u16>> = LazyLock::new(|| {
    let mut rng = RNG::default();
    compute_radical_inverse_permutations(&mut rng)
});

/// Implements a low-discrepancy sampler using Halton sequences. The first
/// two dimensions are scaled so that pixels inside a 128x128 region map onto
/// disjoint runs of the same global sequence.
pub struct HaltonSampler {
    /// The sampler data.
    data: SamplerData,

    /// The global sampler data.
    gdata: GlobalSamplerData,

    /// Sample bounds.
    sample_bounds: Bounds2i,

    /// Scale factors `2^j` and `3^k` for the exponents in `base_exponents`.
    base_scales: [u64; 2],

    /// The exponents `j` and `k` of `base_scales`.
    base_exponents: [u64; 2],

    /// Stores the product `2^j * 3^k`. Every pixel of the region is visited
    /// once per `sample_stride` samples.
    sample_stride: u64,

    /// Multiplicative inverses used to combine the per-axis offsets.
    mult_inverse: [u64; 2],

    /// Film dimensions return the pixel center.
    sample_at_pixel_center: bool,

    /// Pixel for which `offset_for_current_pixel` was computed.
    pixel_for_offset: Point2i,

    /// Global index of the first sample of `pixel_for_offset`.
    offset_for_current_pixel: u64,
}

impl HaltonSampler {
    /// Create a new `HaltonSampler`.
    ///
    /// * `samples_per_pixel` - Number of samples per pixel.
    /// * `sample_bounds`     - Sample bounds.
    /// * `sample_at_center`  - Always sample the pixel center on the film.
    pub fn new(samples_per_pixel: usize, sample_bounds: Bounds2i, sample_at_center: bool) -> Self {
        // Find base scales and exponents that cover the sampling area.
        let res = sample_bounds.p_max - sample_bounds.p_min;
        let mut base_scales = [1_u64; 2];
        let mut base_exponents = [0_u64; 2];
        for i in 0..2 {
            let base = if i == 0 { 2_u64 } else { 3_u64 };
            while (base_scales[i] as Int) < min(res[i], K_MAX_RESOLUTION) {
                base_scales[i] *= base;
                base_exponents[i] += 1;
            }
        }

        let sample_stride = base_scales[0] * base_scales[1];

        let mult_inverse = [
            multiplicative_inverse(base_scales[1], base_scales[0]),
            multiplicative_inverse(base_scales[0], base_scales[1]),
        ];

        debug!(
            "HaltonSampler: base scales {:?}, exponents {:?}, stride {}",
            base_scales, base_exponents, sample_stride
        );

        Self {
            data: SamplerData::new(samples_per_pixel),
            gdata: GlobalSamplerData::new(),
            sample_bounds,
            base_scales,
            base_exponents,
            sample_stride,
            mult_inverse,
            sample_at_pixel_center: sample_at_center,
            pixel_for_offset: Point2i::new(Int::MAX, Int::MAX),
            offset_for_current_pixel: 0,
        }
    }

    /// Returns the prime base index used for a dimension. Dimensions past the
    /// prime table fold back onto the scrambled bases, skipping the two film
    /// bases, so the dimension index itself is unbounded.
    ///
    /// * `dim` - Dimension.
    fn base_index_for_dimension(dim: usize) -> u16 {
        if dim < PRIME_TABLE_SIZE {
            dim as u16
        } else {
            (2 + (dim - 2) % (PRIME_TABLE_SIZE - 2)) as u16
        }
    }

    /// Returns the digit permutation for a given prime base index.
    ///
    /// * `base_index` - Index into `PRIMES`.
    fn permutation_for_base(base_index: u16) -> &'static [u16] {
        &RADICAL_INVERSE_PERMUTATIONS[PRIME_SUMS[base_index as usize]..]
    }

    /// Maps the current pixel and a sample number within it to an index into
    /// the global sequence. The first sample of a pixel is found by inverting
    /// the radical inverse of each pixel coordinate and combining the two
    /// residues with the Chinese remainder theorem.
    ///
    /// * `sample_num` - The sample number.
    fn get_index_for_sample(&mut self, sample_num: usize) -> u64 {
        if self.data.current_pixel != self.pixel_for_offset {
            self.offset_for_current_pixel = 0;
            if self.sample_stride > 1 {
                let pm = [
                    rem(self.data.current_pixel.x, K_MAX_RESOLUTION) as u64,
                    rem(self.data.current_pixel.y, K_MAX_RESOLUTION) as u64,
                ];
                for i in 0..2 {
                    let base = if i == 0 { 2 } else { 3 };
                    let dim_offset = inverse_radical_inverse(base, pm[i], self.base_exponents[i]);
                    self.offset_for_current_pixel +=
                        dim_offset * (self.sample_stride / self.base_scales[i]) * self.mult_inverse[i];
                }
                self.offset_for_current_pixel %= self.sample_stride;
            }
            self.pixel_for_offset = self.data.current_pixel;
        }

        self.offset_for_current_pixel + sample_num as u64 * self.sample_stride
    }

    /// Returns the value of a dimension of the `index`-th sample vector of
    /// the global sequence.
    ///
    /// The two film dimensions (bases 2 and 3) are left unscrambled. Pixel
    /// lookup inverts their radical inverses to find the global index of a
    /// pixel's first sample, and a digit permutation would move samples out
    /// of the pixel they were generated for. They are only shifted and
    /// rescaled to the pixel. Every other dimension is scrambled.
    ///
    /// * `index` - Index of the sample.
    /// * `dim`   - Dimension.
    fn sample_dimension(&self, index: u64, dim: usize) -> Float {
        if self.sample_at_pixel_center && (dim == 0 || dim == 1) {
            0.5
        } else if dim == 0 {
            radical_inverse(0, index >> self.base_exponents[0])
        } else if dim == 1 {
            radical_inverse(1, index / self.base_scales[1])
        } else {
            let base_index = Self::base_index_for_dimension(dim);
            scrambled_radical_inverse(base_index, index, Self::permutation_for_base(base_index))
        }
    }
}

impl Sampler for HaltonSampler {
    fn get_data(&self) -> &SamplerData {
        &self.data
    }

    fn get_data_mut(&mut self) -> &mut SamplerData {
        &mut self.data
    }

    /// Returns a sampler with the same configuration and array requests. The
    /// sequence depends only on pixel and sample index so `seed` is ignored.
    ///
    /// * `_seed` - Ignored.
    fn clone_sampler(&self, _seed: u64) -> BoxSampler {
        let mut sampler = Self::new(
            self.data.samples_per_pixel,
            self.sample_bounds,
            self.sample_at_pixel_center,
        );
        sampler.data = self.data.fresh_copy();
        Box::new(sampler)
    }

    /// Start a pixel and fill the requested arrays from the dimensions that
    /// follow the camera sample.
    ///
    /// * `p` - The pixel.
    fn start_pixel(&mut self, p: &Point2i) {
        self.data.start_pixel(p);

        self.gdata.dimension = 0;
        self.gdata.interval_sample_index = self.get_index_for_sample(0);
        self.gdata.update_array_end_dim(&self.data);

        let spp = self.data.samples_per_pixel;
        let mut dim = self.gdata.array_start_dim;
        for i in 0..self.data.samples_1d_array_sizes.len() {
            let n_samples = self.data.samples_1d_array_sizes[i] * spp;
            for j in 0..n_samples {
                let index = self.get_index_for_sample(j);
                self.data.sample_array_1d[i][j] = self.sample_dimension(index, dim);
            }
            dim += 1;
        }

        for i in 0..self.data.samples_2d_array_sizes.len() {
            let n_samples = self.data.samples_2d_array_sizes[i] * spp;
            for j in 0..n_samples {
                let index = self.get_index_for_sample(j);
                self.data.sample_array_2d[i][j] =
                    Point2f::new(self.sample_dimension(index, dim), self.sample_dimension(index, dim + 1));
            }
            dim += 2;
        }

        debug_assert_eq!(self.gdata.array_end_dim, dim);
    }

    fn get_1d(&mut self) -> Float {
        let dim = self.gdata.next_dimension(1);
        self.sample_dimension(self.gdata.interval_sample_index, dim)
    }

    fn get_2d(&mut self) -> Point2f {
        let dim = self.gdata.next_dimension(2);
        let index = self.gdata.interval_sample_index;
        Point2f::new(self.sample_dimension(index, dim), self.sample_dimension(index, dim + 1))
    }

    fn start_next_sample(&mut self) -> bool {
        self.gdata.dimension = 0;
        self.gdata.interval_sample_index = self.get_index_for_sample(self.data.current_pixel_sample_index + 1);
        self.data.start_next_sample()
    }

    fn set_sample_number(&mut self, sample_num: usize) -> bool {
        self.gdata.dimension = 0;
        self.gdata.interval_sample_index = self.get_index_for_sample(sample_num);
        self.data.set_sample_number(sample_num)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    fn bounds(x: Int, y: Int) -> Bounds2i {
        Bounds2i::new(Point2i::new(0, 0), Point2i::new(x, y))
    }

    #[test]
    fn base_scales_cover_resolution() {
        let sampler = HaltonSampler::new(16, bounds(100, 50), false);
        assert_eq!(sampler.base_scales, [128, 81]);
        assert_eq!(sampler.base_exponents, [7, 4]);
        assert_eq!(sampler.sample_stride, 128 * 81);
    }

    #[test]
    fn resolution_is_capped() {
        let sampler = HaltonSampler::new(1, bounds(1000, 1000), false);
        assert_eq!(sampler.base_scales, [128, 243]);
    }

    #[test]
    fn pixel_offsets_combine_both_axes() {
        // The global index of a pixel's first sample carries the reversed
        // digits of x modulo 2^j and of y modulo 3^k.
        let mut sampler = HaltonSampler::new(4, bounds(16, 9), false);
        for p in bounds(16, 9) {
            sampler.start_pixel(&p);
            let index = sampler.gdata.interval_sample_index;
            assert_eq!(index % 16, inverse_radical_inverse(2, p.x as u64, 4), "pixel {}", p);
            assert_eq!(index % 9, inverse_radical_inverse(3, p.y as u64, 2), "pixel {}", p);
        }
    }

    #[test]
    fn pixel_center_option_returns_half() {
        let mut sampler = HaltonSampler::new(4, bounds(8, 8), true);
        sampler.start_pixel(&Point2i::new(3, 5));
        let cs = sampler.get_camera_sample(&Point2i::new(3, 5));
        assert!(approx_eq!(Float, cs.p_film.x, 3.5));
        assert!(approx_eq!(Float, cs.p_film.y, 5.5));
    }

    #[test]
    fn clones_produce_identical_streams() {
        let mut proto = HaltonSampler::new(8, bounds(32, 32), false);
        proto.request_1d_array(2);
        proto.request_2d_array(4);

        let mut a = proto.clone_sampler(1);
        let mut b = proto.clone_sampler(99);
        let p = Point2i::new(7, 11);
        a.start_pixel(&p);
        b.start_pixel(&p);
        loop {
            assert_eq!(a.get_camera_sample(&p).p_film, b.get_camera_sample(&p).p_film);
            assert_eq!(a.get_1d_array(2).map(<[_]>::to_vec), b.get_1d_array(2).map(<[_]>::to_vec));
            assert_eq!(a.get_2d_array(4).map(<[_]>::to_vec), b.get_2d_array(4).map(<[_]>::to_vec));
            assert_eq!(a.get_1d(), b.get_1d());
            let more = a.start_next_sample();
            assert_eq!(more, b.start_next_sample());
            if !more {
                break;
            }
        }
    }

    #[test]
    fn non_array_dimensions_skip_arrays() {
        let mut with_arrays = HaltonSampler::new(4, bounds(8, 8), false);
        with_arrays.request_1d_array(1);
        let mut without = HaltonSampler::new(4, bounds(8, 8), false);

        let p = Point2i::new(2, 2);
        with_arrays.start_pixel(&p);
        without.start_pixel(&p);
        with_arrays.get_camera_sample(&p);
        without.get_camera_sample(&p);

        // Dimension 5 is the array; ad hoc values continue at dimension 6.
        let first = with_arrays.get_1d();
        let index = without.gdata.interval_sample_index;
        assert_eq!(first, without.sample_dimension(index, 6));
        assert_eq!(with_arrays.get_1d_array(1).map(|a| a[0]), Some(without.sample_dimension(index, 5)));
    }

    #[test]
    fn samples_per_pixel_bounds_sample_loop() {
        let mut sampler = HaltonSampler::new(5, bounds(4, 4), false);
        sampler.start_pixel(&Point2i::new(1, 1));
        let mut n = 1;
        while sampler.start_next_sample() {
            n += 1;
        }
        assert_eq!(n, 5);
        assert_eq!(sampler.current_sample_number(), 5);
    }

    #[test]
    fn dimensions_past_prime_table_fold_onto_scrambled_bases() {
        assert_eq!(HaltonSampler::base_index_for_dimension(999), 999);
        assert_eq!(HaltonSampler::base_index_for_dimension(PRIME_TABLE_SIZE), 2);
        assert_eq!(HaltonSampler::base_index_for_dimension(PRIME_TABLE_SIZE + 1), 3);
        assert_eq!(HaltonSampler::base_index_for_dimension(2 * PRIME_TABLE_SIZE - 2), 2);
    }

    #[test]
    fn long_sample_vectors_keep_producing_values() {
        let mut sampler = HaltonSampler::new(1, bounds(4, 4), false);
        sampler.start_pixel(&Point2i::new(1, 2));
        for _ in 0..1200 {
            let u = sampler.get_1d();
            assert!((0.0..1.0).contains(&u));
        }
        let p = sampler.get_2d();
        assert!((0.0..1.0).contains(&p.x) && (0.0..1.0).contains(&p.y));
        assert_eq!(sampler.gdata.dimension, 1202);
    }

    proptest! {
        #[test]
        fn film_samples_stay_inside_pixel(x in 0..64_i32, y in 0..64_i32, s in 0..16_usize) {
            let mut sampler = HaltonSampler::new(16, bounds(64, 64), false);
            let p = Point2i::new(x, y);
            sampler.start_pixel(&p);
            sampler.set_sample_number(s);
            let cs = sampler.get_camera_sample(&p);
            prop_assert!(cs.p_film.x >= x as Float && cs.p_film.x < (x + 1) as Float);
            prop_assert!(cs.p_film.y >= y as Float && cs.p_film.y < (y + 1) as Float);
            prop_assert!((0.0..1.0).contains(&cs.time));
        }
    }
}
