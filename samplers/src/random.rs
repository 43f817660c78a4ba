//! Random Sampler.

use lumen_core::geometry::*;
use lumen_core::pbrt::*;
use lumen_core::rng::*;
use lumen_core::sampler::*;

/// Implements a sampler that uses a PRNG to generate uniformly random samples.
pub struct RandomSampler {
    /// The common sampler data.
    pub data: SamplerData,

    /// The random number generator.
    pub rng: RNG,
}

impl RandomSampler {
    /// Create a new `RandomSampler`.
    ///
    /// * `samples_per_pixel` - Number of samples to generate for each pixel.
    /// * `seed`              - Optional seed for the random number generator.
    pub fn new(samples_per_pixel: usize, seed: Option<u64>) -> Self {
        Self {
            data: SamplerData::new(samples_per_pixel),
            rng: match seed {
                Some(s) => RNG::new(s),
                None => RNG::default(),
            },
        }
    }
}

impl Sampler for RandomSampler {
    fn get_data(&self) -> &SamplerData {
        &self.data
    }

    fn get_data_mut(&mut self) -> &mut SamplerData {
        &mut self.data
    }

    /// Returns a sampler with the same array requests whose random number
    /// generator uses `seed` as its sequence.
    ///
    /// * `seed` - The seed for the random number generator.
    fn clone_sampler(&self, seed: u64) -> BoxSampler {
        Box::new(Self {
            data: self.data.fresh_copy(),
            rng: RNG::new(seed),
        })
    }

    /// Fill all requested arrays with fresh random values for every sample
    /// of the pixel.
    ///
    /// * `p` - The pixel.
    fn start_pixel(&mut self, p: &Point2i) {
        for array in self.data.sample_array_1d.iter_mut() {
            for v in array.iter_mut() {
                *v = self.rng.uniform_float();
            }
        }

        for array in self.data.sample_array_2d.iter_mut() {
            for v in array.iter_mut() {
                *v = Point2f::new(self.rng.uniform_float(), self.rng.uniform_float());
            }
        }

        self.data.start_pixel(p);
    }

    fn get_1d(&mut self) -> Float {
        self.rng.uniform_float()
    }

    fn get_2d(&mut self) -> Point2f {
        Point2f::new(self.rng.uniform_float(), self.rng.uniform_float())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_in_unit_interval() {
        let mut sampler = RandomSampler::new(4, Some(7));
        sampler.start_pixel(&Point2i::new(0, 0));
        for _ in 0..1000 {
            let u = sampler.get_1d();
            assert!((0.0..1.0).contains(&u));
            let p = sampler.get_2d();
            assert!((0.0..1.0).contains(&p.x) && (0.0..1.0).contains(&p.y));
        }
    }

    #[test]
    fn clones_with_same_seed_match_and_keep_arrays() {
        let mut proto = RandomSampler::new(2, None);
        proto.request_2d_array(3);

        let mut a = proto.clone_sampler(5);
        let mut b = proto.clone_sampler(5);
        let mut c = proto.clone_sampler(6);
        let p = Point2i::new(3, 4);
        a.start_pixel(&p);
        b.start_pixel(&p);
        c.start_pixel(&p);

        let arr_a = a.get_2d_array(3).map(<[_]>::to_vec);
        let arr_b = b.get_2d_array(3).map(<[_]>::to_vec);
        let arr_c = c.get_2d_array(3).map(<[_]>::to_vec);
        assert!(arr_a.is_some());
        assert_eq!(arr_a, arr_b);
        assert_ne!(arr_a, arr_c);
        assert_eq!(a.get_1d(), b.get_1d());
    }

    #[test]
    fn sample_loop_ends_after_samples_per_pixel() {
        let mut sampler = RandomSampler::new(3, Some(1));
        sampler.start_pixel(&Point2i::new(0, 0));
        let mut n = 1;
        while sampler.start_next_sample() {
            n += 1;
        }
        assert_eq!(n, 3);
    }
}
