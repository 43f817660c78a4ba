//! Spatial Light Distribution.

use super::LightDistribution;
use crate::geometry::*;
use crate::interaction::Hit;
use crate::light::*;
use crate::low_discrepancy::radical_inverse;
use crate::pbrt::*;
use crate::sampling::*;
use crate::scene::*;
use arc_swap::ArcSwapOption;
use std::hint;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Voxel coordinates are packed into a `u64` with 20 bits per coordinate.
/// This value cannot be produced by packing and marks an unclaimed entry.
const INVALID_PACKED_POS: u64 = 0xffffffffffffffff;

/// Number of Halton points used to estimate light contributions in a voxel.
const N_SAMPLES: u64 = 128;

struct HashEntry {
    packed_pos: AtomicU64,
    distribution: ArcSwapOption<Distribution1D>,
}

impl Default for HashEntry {
    fn default() -> Self {
        Self {
            packed_pos: AtomicU64::new(INVALID_PACKED_POS),
            distribution: ArcSwapOption::const_empty(),
        }
    }
}

/// A spatially-varying light distribution that adjusts the probability of
/// sampling a light source based on an estimate of its contribution to a
/// region of space. A fixed voxel grid is imposed over the scene bounds and
/// a distribution is computed lazily for each voxel the first time a point
/// inside it is looked up.
pub struct SpatialLightDistribution {
    lights: Vec<ArcLight>,
    world_bound: Bounds3f,
    n_voxels: [usize; 3],
    hash_table: Vec<HashEntry>,
}

impl SpatialLightDistribution {
    /// Create a new instance of `SpatialLightDistribution`.
    ///
    /// * `scene`      - The scene.
    /// * `max_voxels` - Number of voxels along the widest scene dimension.
    pub fn new(scene: &Scene, max_voxels: usize) -> Self {
        // Voxels are roughly cube shaped with `max_voxels` along the
        // widest dimension.
        let b = scene.world_bound;
        let diag = b.diagonal();
        let bmax = diag[b.maximum_extent()];
        let mut n_voxels = [1_usize; 3];
        if bmax > 0.0 {
            for (i, n) in n_voxels.iter_mut().enumerate() {
                *n = max(1.0, (diag[i] / bmax * max_voxels as Float).round()) as usize;
                assert!(*n < (1 << 20));
            }
        }

        info!(
            "SpatialLightDistribution: scene bounds {}, voxel res ({}, {}, {})",
            b, n_voxels[0], n_voxels[1], n_voxels[2]
        );

        let hash_table_size = 4 * n_voxels[0] * n_voxels[1] * n_voxels[2];
        Self {
            lights: scene.lights.clone(),
            world_bound: b,
            n_voxels,
            hash_table: (0..hash_table_size).map(|_| HashEntry::default()).collect(),
        }
    }

    /// Returns the integer voxel coordinates containing a point. Points
    /// slightly outside the scene bounds are clamped to the border voxels.
    ///
    /// * `p` - The point.
    fn voxel(&self, p: &Point3f) -> [Int; 3] {
        let offset = self.world_bound.offset(p);
        let mut pi = [0; 3];
        for (i, c) in pi.iter_mut().enumerate() {
            *c = clamp(
                (offset[i] * self.n_voxels[i] as Float) as Int,
                0,
                self.n_voxels[i] as Int - 1,
            );
        }
        pi
    }

    /// Compute the sampling distribution for the voxel with integer
    /// coordinates `pi`.
    ///
    /// * `pi` - Voxel coordinates.
    fn compute_distribution(&self, pi: &[Int; 3]) -> Distribution1D {
        let corner = |d: Int| {
            Point3f::new(
                (pi[0] + d) as Float / self.n_voxels[0] as Float,
                (pi[1] + d) as Float / self.n_voxels[1] as Float,
                (pi[2] + d) as Float / self.n_voxels[2] as Float,
            )
        };
        let voxel_bounds = Bounds3f::new(self.world_bound.lerp(&corner(0)), self.world_bound.lerp(&corner(1)));

        // Estimate Li/pdf of each light at Halton points inside the voxel,
        // ignoring visibility.
        let mut light_contrib = vec![0.0; self.lights.len()];
        for i in 0..N_SAMPLES {
            let po = voxel_bounds.lerp(&Point3f::new(
                radical_inverse(0, i),
                radical_inverse(1, i),
                radical_inverse(2, i),
            ));
            let hit = Hit::new(po, 0.0, Vector3f::new(1.0, 0.0, 0.0), Normal3f::ZERO, None);

            let u = Point2f::new(radical_inverse(3, i), radical_inverse(4, i));
            for (j, light) in self.lights.iter().enumerate() {
                let li = light.sample_li(&hit, &u);
                if li.pdf > 0.0 {
                    light_contrib[j] += li.value.y() / li.pdf;
                }
            }
        }

        // A light missed by every sample can still illuminate part of the
        // voxel so every light keeps a small minimum weight.
        let sum_contrib: Float = light_contrib.iter().sum();
        let avg_contrib = sum_contrib / (N_SAMPLES as usize * light_contrib.len()) as Float;
        let min_contrib = if avg_contrib > 0.0 { 0.001 * avg_contrib } else { 1.0 };
        for (i, contrib) in light_contrib.iter_mut().enumerate() {
            trace!("Voxel pi = {:?}, light {} contrib = {}", pi, i, contrib);
            *contrib = max(*contrib, min_contrib);
        }
        debug!(
            "Initialized light distribution in voxel pi = {:?}, avg_contrib = {}",
            pi, avg_contrib
        );

        Distribution1D::new(light_contrib)
    }
}

/// Mix the bits of a packed voxel position.
///
/// * `packed_pos` - Packed voxel coordinates.
fn mix_bits(packed_pos: u64) -> u64 {
    let mut hash = packed_pos;
    hash ^= hash >> 31;
    hash = hash.wrapping_mul(0x7fb5d329728ea185);
    hash ^= hash >> 27;
    hash = hash.wrapping_mul(0x81dadef4bc2dd44d);
    hash ^= hash >> 33;
    hash
}

impl LightDistribution for SpatialLightDistribution {
    fn lookup(&self, p: &Point3f) -> Option<Arc<Distribution1D>> {
        if self.lights.is_empty() {
            return None;
        }

        let pi = self.voxel(p);
        let packed_pos = ((pi[0] as u64) << 40) | ((pi[1] as u64) << 20) | pi[2] as u64;
        debug_assert_ne!(packed_pos, INVALID_PACKED_POS);

        let hash_table_size = self.hash_table.len();
        let mut hash = (mix_bits(packed_pos) % hash_table_size as u64) as usize;

        // Quadratic probing; `step` is the square root of the probe step.
        let mut step = 1;
        loop {
            let entry = &self.hash_table[hash];

            let entry_packed_pos = entry.packed_pos.load(Ordering::Acquire);
            if entry_packed_pos == packed_pos {
                // Another thread may have claimed the entry without having
                // stored the distribution yet.
                loop {
                    if let Some(dist) = entry.distribution.load_full() {
                        return Some(dist);
                    }
                    hint::spin_loop();
                }
            } else if entry_packed_pos != INVALID_PACKED_POS {
                hash = (hash + step * step) % hash_table_size;
                step += 1;
            } else if entry
                .packed_pos
                .compare_exchange_weak(INVALID_PACKED_POS, packed_pos, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                let dist = Arc::new(self.compute_distribution(&pi));
                entry.distribution.store(Some(Arc::clone(&dist)));
                return Some(dist);
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mix_bits_spreads_neighbouring_positions() {
        assert_eq!(mix_bits(0), 0);
        assert_ne!(mix_bits(1), mix_bits(2));
        assert_ne!(mix_bits(1 << 20), mix_bits(1 << 40));
    }
}
