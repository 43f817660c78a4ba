//! Sampler Integrator

use super::*;
use crate::app::{create_progress_bar, Options};
use crate::camera::*;
use crate::error::*;
use crate::film::FilmTile;
use crate::geometry::*;
use crate::interaction::*;
use crate::pbrt::*;
use crate::reflection::*;
use crate::sampler::*;
use crate::scene::*;
use crate::spectrum::*;
use bumpalo::Bump;
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};

/// Default edge length of square image tiles.
pub const DEFAULT_TILE_SIZE: usize = 16;

/// Common data for sampler integrators.
pub struct SamplerIntegratorData {
    /// The camera.
    pub camera: ArcCamera,

    /// Prototype sampler. Every tile renders with its own clone.
    pub sampler: BoxSampler,

    /// Pixel bounds for the image.
    pub pixel_bounds: Bounds2i,

    /// Maximum recursion depth.
    pub max_depth: usize,

    /// Edge length of square image tiles in pixels.
    pub tile_size: usize,

    /// Number of worker threads.
    pub n_threads: usize,

    /// Write the partial image after every merged tile.
    pub progressive: bool,

    /// Write the final image when rendering completes.
    pub write_image: bool,

    /// Hide the progress bar.
    pub quiet: bool,

    /// Cooperative cancellation flag.
    pub cancel: CancelToken,
}

impl SamplerIntegratorData {
    /// Create a new `SamplerIntegratorData` that renders 16x16 tiles on all
    /// logical CPUs.
    ///
    /// * `max_depth`    - Maximum recursion depth.
    /// * `camera`       - The camera.
    /// * `sampler`      - Prototype sampler.
    /// * `pixel_bounds` - Pixel bounds for the image.
    pub fn new(max_depth: usize, camera: ArcCamera, sampler: BoxSampler, pixel_bounds: Bounds2i) -> Self {
        Self {
            camera,
            sampler,
            pixel_bounds,
            max_depth,
            tile_size: DEFAULT_TILE_SIZE,
            n_threads: num_cpus::get(),
            progressive: false,
            write_image: true,
            quiet: false,
            cancel: CancelToken::new(),
        }
    }

    /// Apply the scheduling settings from the system wide options.
    ///
    /// * `options` - System wide options.
    pub fn apply_options(&mut self, options: &Options) {
        self.tile_size = options.tile_size;
        self.n_threads = options.threads();
        self.progressive = options.progressive;
        self.quiet = options.quiet;
    }

    /// Set the number of worker threads.
    ///
    /// * `n_threads` - Number of threads.
    pub fn with_threads(mut self, n_threads: usize) -> Self {
        self.n_threads = n_threads;
        self
    }

    /// Set the tile size.
    ///
    /// * `tile_size` - Edge length of square tiles in pixels.
    pub fn with_tile_size(mut self, tile_size: usize) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Enable or disable writing the final image.
    ///
    /// * `write_image` - Write the image after rendering.
    pub fn with_image_output(mut self, write_image: bool) -> Self {
        self.write_image = write_image;
        self
    }

    /// Use a given cancellation token.
    ///
    /// * `cancel` - The token.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Partition of the film's sample bounds into square tiles. Tiles on the
/// right and bottom edges are clipped to the sample bounds.
#[derive(Copy, Clone, Debug)]
pub struct TileGrid {
    /// Bounds covered by the tiles.
    pub sample_bounds: Bounds2i,

    /// Edge length of a tile in pixels.
    pub tile_size: Int,

    /// Number of tiles in x and y.
    pub n_tiles: Point2i,
}

impl TileGrid {
    /// Create a new `TileGrid`.
    ///
    /// * `sample_bounds` - Bounds covered by the tiles.
    /// * `tile_size`     - Edge length of a tile in pixels.
    pub fn new(sample_bounds: Bounds2i, tile_size: usize) -> Self {
        assert!(tile_size > 0, "tile size must be positive");
        let tile_size = tile_size as Int;
        let sample_extent = sample_bounds.diagonal();
        let n_tiles = Point2i::new(
            max(0, (sample_extent.x + tile_size - 1) / tile_size),
            max(0, (sample_extent.y + tile_size - 1) / tile_size),
        );
        Self {
            sample_bounds,
            tile_size,
            n_tiles,
        }
    }

    /// Returns the number of tiles.
    pub fn count(&self) -> usize {
        (self.n_tiles.x * self.n_tiles.y) as usize
    }

    /// Returns the tile coordinates, in tile units, for a linear tile index.
    ///
    /// * `tile_idx` - Linear tile index `y * n_tiles.x + x`.
    pub fn tile_coords(&self, tile_idx: usize) -> Point2i {
        let tile_idx = tile_idx as Int;
        Point2i::new(tile_idx % self.n_tiles.x, tile_idx / self.n_tiles.x)
    }

    /// Returns the pixel bounds of a tile.
    ///
    /// * `tile_idx` - Linear tile index.
    pub fn tile_bounds(&self, tile_idx: usize) -> Bounds2i {
        let tile = self.tile_coords(tile_idx);
        let x0 = self.sample_bounds.p_min.x + tile.x * self.tile_size;
        let x1 = min(x0 + self.tile_size, self.sample_bounds.p_max.x);
        let y0 = self.sample_bounds.p_min.y + tile.y * self.tile_size;
        let y1 = min(y0 + self.tile_size, self.sample_bounds.p_max.y);
        Bounds2i::new(Point2i::new(x0, y0), Point2i::new(x1, y1))
    }
}

/// Replace a radiance value that is NaN, has negative luminance or is
/// infinite with black, logging the offending pixel sample.
///
/// * `l`          - Radiance returned by an integrator.
/// * `pixel`      - The pixel.
/// * `sample_num` - Sample index within the pixel.
pub fn sanitize_radiance(l: Spectrum, pixel: &Point2i, sample_num: usize) -> Spectrum {
    if l.has_nans() {
        error!(
            "Not-a-number radiance value returned for pixel ({}, {}), sample {}. Setting to black.",
            pixel.x, pixel.y, sample_num
        );
        Spectrum::ZERO
    } else if l.y() < -1e-5 {
        error!(
            "Negative luminance value, {}, returned for pixel ({}, {}), sample {}. Setting to black.",
            l.y(),
            pixel.x,
            pixel.y,
            sample_num
        );
        Spectrum::ZERO
    } else if l.y().is_infinite() {
        error!(
            "Infinite luminance value returned for pixel ({}, {}), sample {}. Setting to black.",
            pixel.x, pixel.y, sample_num
        );
        Spectrum::ZERO
    } else {
        l
    }
}

/// Returns the message carried by a panic payload.
///
/// * `payload` - The payload from `catch_unwind()`.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        String::from(*s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("unknown panic")
    }
}

/// Implements the basis of a rendering process driven by a stream of samples
/// from a `Sampler`. Each sample identifies a point on the image plane at
/// which we compute the light arriving from the scene.
pub trait SamplerIntegrator: Integrator + Send + Sync {
    /// Returns the common data.
    fn get_data(&self) -> &SamplerIntegratorData;

    /// Returns the common data for modification before rendering.
    fn get_data_mut(&mut self) -> &mut SamplerIntegratorData;

    /// Trace rays for specular reflection.
    ///
    /// * `isect`   - The surface interaction.
    /// * `bsdf`    - The BSDF at the surface interaction.
    /// * `scene`   - The scene.
    /// * `sampler` - The sampler.
    /// * `arena`   - The memory arena for allocations.
    /// * `depth`   - The recursive depth.
    fn specular_reflect(
        &self,
        isect: &SurfaceInteraction,
        bsdf: &BSDF,
        scene: &Scene,
        sampler: &mut dyn Sampler,
        arena: &Bump,
        depth: usize,
    ) -> Spectrum {
        let bxdf_type = BxDFType::BSDF_REFLECTION | BxDFType::BSDF_SPECULAR;
        self.specular_bounce(isect, bsdf, scene, sampler, arena, depth, bxdf_type)
    }

    /// Trace rays for specular refraction.
    ///
    /// * `isect`   - The surface interaction.
    /// * `bsdf`    - The BSDF at the surface interaction.
    /// * `scene`   - The scene.
    /// * `sampler` - The sampler.
    /// * `arena`   - The memory arena for allocations.
    /// * `depth`   - The recursive depth.
    fn specular_transmit(
        &self,
        isect: &SurfaceInteraction,
        bsdf: &BSDF,
        scene: &Scene,
        sampler: &mut dyn Sampler,
        arena: &Bump,
        depth: usize,
    ) -> Spectrum {
        let bxdf_type = BxDFType::BSDF_TRANSMISSION | BxDFType::BSDF_SPECULAR;
        self.specular_bounce(isect, bsdf, scene, sampler, arena, depth, bxdf_type)
    }

    /// Sample a specular lobe of the BSDF and return the radiance arriving
    /// along the sampled direction weighted by the lobe.
    #[allow(clippy::too_many_arguments)]
    fn specular_bounce(
        &self,
        isect: &SurfaceInteraction,
        bsdf: &BSDF,
        scene: &Scene,
        sampler: &mut dyn Sampler,
        arena: &Bump,
        depth: usize,
        bxdf_type: BxDFType,
    ) -> Spectrum {
        let wo = isect.hit.wo;
        let u = sampler.get_2d();
        let BxDFSample { f, pdf, wi, .. } = bsdf.sample_f(&wo, &u, bxdf_type);

        let ns = isect.shading.n;
        let cos = wi.abs_dot_normal(&ns);
        if pdf > 0.0 && !f.is_black() && cos != 0.0 {
            let mut rd = isect.spawn_ray(&wi);
            f * self.li(&mut rd, scene, sampler, arena, depth + 1) * cos / pdf
        } else {
            Spectrum::ZERO
        }
    }

    /// Render the scene tile by tile on a pool of worker threads and merge
    /// the tiles into the film in tile index order.
    ///
    /// * `scene` - The scene.
    fn render_tiles(&self, scene: &Scene) -> Result<(), RenderError> {
        let data = self.get_data();
        let film = &data.camera.get_data().film;

        let grid = TileGrid::new(film.get_sample_bounds(), data.tile_size);
        let tile_count = grid.count();
        info!(
            "Rendering {}x{} tiles on {} threads",
            grid.n_tiles.x, grid.n_tiles.y, data.n_threads
        );

        // Render + image write.
        let progress = create_progress_bar(tile_count as u64 + 1, data.quiet);
        progress.set_message("Rendering scene");

        let (work_tx, work_rx) = crossbeam_channel::unbounded();
        for tile_idx in 0..tile_count {
            work_tx.send(tile_idx).map_err(|_| RenderError::NoWorkers)?;
        }
        drop(work_tx);

        let (result_tx, result_rx) = crossbeam_channel::unbounded::<(usize, Result<FilmTile, String>)>();
        let failed = AtomicBool::new(false);
        let stop = || data.cancel.is_cancelled() || failed.load(Ordering::Acquire);

        let outcome = crossbeam::scope(|scope| {
            let mut n_workers = 0;
            for worker in 0..data.n_threads {
                let work_rx = work_rx.clone();
                let result_tx = result_tx.clone();
                let failed = &failed;
                let stop = &stop;
                let spawned = scope
                    .builder()
                    .name(format!("render-worker-{}", worker))
                    .spawn(move |_| {
                        let mut arena = Bump::new();
                        for tile_idx in work_rx.iter() {
                            if stop() {
                                break;
                            }

                            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                                self.render_tile(tile_idx, &grid, scene, &mut arena, stop)
                            }));
                            arena.reset();

                            let result = match result {
                                Ok(Some(film_tile)) => Ok(film_tile),
                                Ok(None) => break,
                                Err(payload) => {
                                    failed.store(true, Ordering::Release);
                                    Err(panic_message(payload.as_ref()))
                                }
                            };
                            if result_tx.send((tile_idx, result)).is_err() {
                                break;
                            }
                        }
                        debug!("Worker {} done, arena capacity {} bytes", worker, arena.allocated_bytes());
                    });
                match spawned {
                    Ok(_) => n_workers += 1,
                    Err(err) => warn!("Unable to start render worker {}: {}", worker, err),
                }
            }
            drop(result_tx);

            if n_workers == 0 {
                return Err(RenderError::NoWorkers);
            }

            // Tiles arrive in any order; merge them in index order so
            // overlapping borders are always summed the same way.
            let mut pending: BTreeMap<usize, FilmTile> = BTreeMap::new();
            let mut next_tile = 0;
            let mut failure: Option<(usize, String)> = None;
            for (tile_idx, result) in result_rx.iter() {
                match result {
                    Ok(film_tile) => {
                        pending.insert(tile_idx, film_tile);
                        while let Some(film_tile) = pending.remove(&next_tile) {
                            film.merge_film_tile(&film_tile);
                            next_tile += 1;
                            progress.inc(1);

                            if data.progressive && data.write_image && failure.is_none() {
                                if let Err(err) = film.write_image_file() {
                                    warn!("Unable to write progressive image: {}", err);
                                }
                            }
                        }
                    }
                    Err(message) => {
                        error!("Tile {} failed: {}", tile_idx, message);
                        if failure.as_ref().map_or(true, |(t, _)| tile_idx < *t) {
                            failure = Some((tile_idx, message));
                        }
                    }
                }
            }

            match failure {
                Some((tile, message)) => Err(RenderError::TileFailed { tile, message }),
                None => Ok(next_tile),
            }
        });

        // Tile work runs under `catch_unwind()` so anything reaching here
        // is a bug in the scheduler itself.
        let merged = match outcome {
            Ok(result) => result?,
            Err(payload) => panic::resume_unwind(payload),
        };

        if merged < tile_count {
            info!("Render cancelled after {} of {} tiles", merged, tile_count);
            progress.abandon_with_message("Render cancelled");
            return Err(RenderError::Cancelled);
        }

        if data.write_image {
            progress.set_message("Writing image");
            film.write_image_file()?;
        }
        progress.inc(1);
        progress.finish_with_message("Render complete");

        Ok(())
    }

    /// Render an image tile. Returns `None` if the render was stopped before
    /// the tile completed.
    ///
    /// * `tile_idx` - Linear tile index, also used as the sampler seed.
    /// * `grid`     - The tile grid.
    /// * `scene`    - The scene.
    /// * `arena`    - The worker's memory arena; reset after every sample.
    /// * `stop`     - Returns `true` when rendering should stop.
    fn render_tile(
        &self,
        tile_idx: usize,
        grid: &TileGrid,
        scene: &Scene,
        arena: &mut Bump,
        stop: &dyn Fn() -> bool,
    ) -> Option<FilmTile> {
        let data = self.get_data();
        let camera = &data.camera;
        let film = &camera.get_data().film;

        let tile_bounds = grid.tile_bounds(tile_idx);
        debug!("Starting image tile {} -> {}", tile_idx, tile_bounds);

        // The seed depends only on the tile so the result does not depend on
        // which worker renders it.
        let mut tile_sampler = data.sampler.clone_sampler(tile_idx as u64);
        let samples_per_pixel = tile_sampler.samples_per_pixel();

        let mut film_tile = film.get_film_tile(&tile_bounds);

        for pixel in tile_bounds {
            if stop() {
                debug!("Stopping image tile {}", tile_idx);
                return None;
            }

            tile_sampler.start_pixel(&pixel);

            // Checked after start_pixel() to keep the random number streams of
            // cropped and full renders identical.
            if !data.pixel_bounds.contains_exclusive(&pixel) {
                continue;
            }

            loop {
                let camera_sample = tile_sampler.get_camera_sample(&pixel);

                let (mut ray, ray_weight) = camera.generate_ray_differential(&camera_sample);
                ray.scale_differentials(1.0 / (samples_per_pixel as Float).sqrt());

                let mut l = Spectrum::ZERO;
                if ray_weight > 0.0 {
                    l = self.li(&mut ray, scene, tile_sampler.as_mut(), arena, 0);
                }
                let l = sanitize_radiance(l, &pixel, tile_sampler.current_sample_number());
                trace!(
                    "Pixel: {}, Camera sample: {} -> ray: {}, ray weight {} -> L = {}",
                    pixel,
                    camera_sample,
                    ray,
                    ray_weight,
                    l
                );

                film_tile.add_sample(camera_sample.p_film, l, ray_weight);

                // Nothing allocated for this sample outlives it.
                arena.reset();

                if !tile_sampler.start_next_sample() {
                    break;
                }
            }
        }

        debug!("Finished image tile {} -> {}", tile_idx, tile_bounds);

        Some(film_tile)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
