//! Random Number Generator.

use crate::pbrt::*;

/// Largest `f32` strictly below 1.
pub const FLOAT_ONE_MINUS_EPSILON: f32 = hexf32!("0x1.fffffep-1");

/// Largest `f64` strictly below 1.
pub const DOUBLE_ONE_MINUS_EPSILON: f64 = hexf64!("0x1.fffffffffffffp-1");

/// Largest `Float` strictly below 1. Sample values are clamped to this so
/// that they stay inside [0, 1).
pub const ONE_MINUS_EPSILON: Float = FLOAT_ONE_MINUS_EPSILON;

const PCG32_DEFAULT_STATE: u64 = 0x853c49e6748fea9b;
const PCG32_DEFAULT_STREAM: u64 = 0xda3e39cb94b95bdb;
const PCG32_MULT: u64 = 0x5851f42d4c957f2d;

/// PCG32 pseudo-random number generator.
#[derive(Clone, Debug)]
pub struct RNG {
    state: u64,
    inc: u64,
}

impl Default for RNG {
    fn default() -> Self {
        Self {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        }
    }
}

impl RNG {
    /// Create a new `RNG` seeded with the given sequence.
    ///
    /// * `sequence_index` - The sequence to seed with.
    pub fn new(sequence_index: u64) -> Self {
        let mut rng = Self { state: 0, inc: 0 };
        rng.set_sequence(sequence_index);
        rng
    }

    /// Restart the generator on a new sequence.
    ///
    /// * `init_seq` - The sequence to seed with.
    pub fn set_sequence(&mut self, init_seq: u64) {
        self.state = 0;
        self.inc = init_seq.wrapping_shl(1) | 1;
        self.uniform_u32();
        self.state = self.state.wrapping_add(PCG32_DEFAULT_STATE);
        self.uniform_u32();
    }

    /// Returns a uniformly distributed u32 value.
    #[inline(always)]
    pub fn uniform_u32(&mut self) -> u32 {
        let old_state = self.state;
        self.state = old_state.wrapping_mul(PCG32_MULT).wrapping_add(self.inc);
        let xor_shifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rot = (old_state >> 59) as u32;
        xor_shifted.rotate_right(rot)
    }

    /// Returns a uniformly distributed value in [0, `bound`).
    ///
    /// * `bound` - Exclusive upper bound; must be non-zero.
    pub fn bounded_uniform_u32(&mut self, bound: u32) -> u32 {
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let r = self.uniform_u32();
            if r >= threshold {
                return r % bound;
            }
        }
    }

    /// Returns a uniformly distributed value in [0, 1).
    pub fn uniform_float(&mut self) -> Float {
        min(
            self.uniform_u32() as Float * hexf32!("0x1.0p-32"),
            ONE_MINUS_EPSILON,
        )
    }

    /// Randomly permute `count` blocks of `n_dimensions` consecutive values.
    ///
    /// * `v`            - The slice to shuffle.
    /// * `count`        - Number of blocks.
    /// * `n_dimensions` - Values per block.
    pub fn shuffle<T>(&mut self, v: &mut [T], count: usize, n_dimensions: usize) {
        debug_assert!(count * n_dimensions <= v.len());
        for i in 0..count {
            let other = i + self.bounded_uniform_u32((count - i) as u32) as usize;
            for j in 0..n_dimensions {
                v.swap(n_dimensions * i + j, n_dimensions * other + j);
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
