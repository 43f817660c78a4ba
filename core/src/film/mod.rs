//! Film

use crate::filter::*;
use crate::geometry::*;
use crate::image_io::*;
use crate::pbrt::*;
use crate::spectrum::*;
use std::sync::{Arc, PoisonError, RwLock};

mod film_tile;

// Re-export.
pub use film_tile::*;

/// Filter table width.
pub const FILTER_TABLE_WIDTH: usize = 16;

/// Filter table size.
pub const FILTER_TABLE_SIZE: usize = FILTER_TABLE_WIDTH * FILTER_TABLE_WIDTH;

/// Accumulated contributions for one image pixel.
#[derive(Copy, Clone, Debug, Default)]
pub struct Pixel {
    /// Running sum of filter weighted RGB contributions.
    pub contrib_sum: Spectrum,

    /// Running sum of filter weights.
    pub filter_weight_sum: Float,
}

impl Pixel {
    /// Returns the reconstructed value, or black if nothing contributed.
    pub fn resolve(&self) -> Spectrum {
        if self.filter_weight_sum != 0.0 {
            self.contrib_sum / self.filter_weight_sum
        } else {
            Spectrum::ZERO
        }
    }
}

/// Models the sensing device in a simulated camera. Accumulates filtered
/// samples and resolves them into the final image.
pub struct Film {
    /// The overall image resolution in pixels.
    pub full_resolution: Point2i,

    /// Filter function to use for image reconstruction from samples.
    pub filter: ArcFilter,

    /// Filename of output image.
    pub filename: String,

    /// Crop window of the subset of the image to render.
    pub cropped_pixel_bounds: Bounds2i,

    /// Filter values over one quadrant of the filter support.
    filter_table: Arc<[Float]>,

    /// Scale factor applied to resolved pixel values.
    scale: Float,

    /// Sample luminance above which samples are scaled down.
    max_sample_luminance: Float,

    /// The image pixels, covering `cropped_pixel_bounds`.
    pixels: RwLock<Vec<Pixel>>,
}

impl Film {
    /// Create a new `Film` instance.
    ///
    /// * `resolution`           - The overall image resolution in pixels.
    /// * `crop_window`          - Crop window in normalized [0, 1]^2 image coordinates.
    /// * `filter`               - Filter function to use for image reconstruction from samples.
    /// * `filename`             - Filename of output image.
    /// * `scale`                - Optional scale factor for pixel values. Defaults to 1.
    /// * `max_sample_luminance` - Optional maximum sample luminance. Defaults to `INFINITY`.
    pub fn new(
        resolution: &Point2i,
        crop_window: &Bounds2f,
        filter: ArcFilter,
        filename: &str,
        scale: Option<Float>,
        max_sample_luminance: Option<Float>,
    ) -> Self {
        let cropped_pixel_bounds = Bounds2i::new(
            Point2i::new(
                (resolution.x as Float * crop_window.p_min.x).ceil() as Int,
                (resolution.y as Float * crop_window.p_min.y).ceil() as Int,
            ),
            Point2i::new(
                (resolution.x as Float * crop_window.p_max.x).ceil() as Int,
                (resolution.y as Float * crop_window.p_max.y).ceil() as Int,
            ),
        );
        debug!(
            "Created film with full resolution {}, crop window {} -> cropped pixel bounds {}",
            resolution, crop_window, cropped_pixel_bounds
        );

        // Sample the filter at the center of each table cell.
        let radius = filter.get_data().radius;
        let filter_table: Vec<Float> = (0..FILTER_TABLE_SIZE)
            .map(|offset| {
                let (x, y) = (offset % FILTER_TABLE_WIDTH, offset / FILTER_TABLE_WIDTH);
                let p = Point2f::new(
                    (x as Float + 0.5) * radius.x / FILTER_TABLE_WIDTH as Float,
                    (y as Float + 0.5) * radius.y / FILTER_TABLE_WIDTH as Float,
                );
                filter.evaluate(&p)
            })
            .collect();

        let n = max(0, cropped_pixel_bounds.area()) as usize;

        Self {
            full_resolution: *resolution,
            filter,
            filename: String::from(filename),
            cropped_pixel_bounds,
            filter_table: filter_table.into(),
            scale: scale.unwrap_or(1.0),
            max_sample_luminance: max_sample_luminance.unwrap_or(INFINITY),
            pixels: RwLock::new(vec![Pixel::default(); n]),
        }
    }

    /// Returns the bounds of pixels to generate samples for: the cropped
    /// pixel bounds expanded by the filter radius, so that every pixel the
    /// filter reaches receives samples near its border.
    pub fn get_sample_bounds(&self) -> Bounds2i {
        let radius = self.filter.get_data().radius;
        let half_pixel = Vector2f::new(0.5, 0.5);

        let p0 = (Point2f::from(self.cropped_pixel_bounds.p_min) + half_pixel - radius).floor();
        let p1 = (Point2f::from(self.cropped_pixel_bounds.p_max) - half_pixel + radius).ceil();
        Bounds2i::from(Bounds2f::new(p0, p1))
    }

    /// Returns a `FilmTile` for the pixels that samples inside
    /// `sample_bounds` can contribute to.
    ///
    /// * `sample_bounds` - Tile region in the overall image.
    pub fn get_film_tile(&self, sample_bounds: &Bounds2i) -> FilmTile {
        let radius = self.filter.get_data().radius;
        let half_pixel = Vector2f::new(0.5, 0.5);

        let float_bounds = Bounds2f::from(*sample_bounds);
        let p0 = Point2i::from((float_bounds.p_min - half_pixel - radius).ceil());
        let p1 = Point2i::from((float_bounds.p_max - half_pixel + radius).floor()) + Vector2i::new(1, 1);
        let tile_pixel_bounds = Bounds2i::new(p0, p1).intersect(&self.cropped_pixel_bounds);

        FilmTile::new(
            tile_pixel_bounds,
            radius,
            Arc::clone(&self.filter_table),
            Some(self.max_sample_luminance),
        )
    }

    /// Offset of a pixel in `pixels`.
    ///
    /// * `p` - The pixel coordinates with respect to the overall image.
    fn get_pixel_offset(&self, p: &Point2i) -> usize {
        debug_assert!(self.cropped_pixel_bounds.contains_exclusive(p));
        let width = self.cropped_pixel_bounds.p_max.x - self.cropped_pixel_bounds.p_min.x;
        ((p.x - self.cropped_pixel_bounds.p_min.x) + (p.y - self.cropped_pixel_bounds.p_min.y) * width) as usize
    }

    /// Add a tile's accumulated sums into the image. Pixels are summed,
    /// never overwritten, so overlapping tile borders combine.
    ///
    /// * `tile` - The `FilmTile` to merge.
    pub fn merge_film_tile(&self, tile: &FilmTile) {
        let tile_pixel_bounds = tile.get_pixel_bounds();
        trace!("Merging film tile {}", tile_pixel_bounds);

        let mut pixels = self.pixels.write().unwrap_or_else(PoisonError::into_inner);
        for p in tile_pixel_bounds {
            let tile_pixel = tile.get_pixel(&p);
            let merge_pixel = &mut pixels[self.get_pixel_offset(&p)];
            merge_pixel.contrib_sum += tile_pixel.contrib_sum;
            merge_pixel.filter_weight_sum += tile_pixel.filter_weight_sum;
        }
    }

    /// Returns the resolved value of a pixel, with the scale applied.
    ///
    /// * `p` - The pixel coordinates with respect to the overall image.
    pub fn get_pixel(&self, p: &Point2i) -> Spectrum {
        assert!(
            self.cropped_pixel_bounds.contains_exclusive(p),
            "pixel {} outside of film bounds {}",
            p,
            self.cropped_pixel_bounds
        );
        let pixels = self.pixels.read().unwrap_or_else(PoisonError::into_inner);
        pixels[self.get_pixel_offset(p)].resolve() * self.scale
    }

    /// Returns the resolved and scaled values of all pixels in the cropped
    /// bounds in scanline order.
    pub fn get_image(&self) -> Vec<Spectrum> {
        let pixels = self.pixels.read().unwrap_or_else(PoisonError::into_inner);
        pixels.iter().map(|pixel| pixel.resolve() * self.scale).collect()
    }

    /// Discard all accumulated contributions.
    pub fn clear(&self) {
        let mut pixels = self.pixels.write().unwrap_or_else(PoisonError::into_inner);
        pixels.iter_mut().for_each(|pixel| *pixel = Pixel::default());
    }

    /// Resolve the current image and hand it to a sink.
    ///
    /// * `sink` - Image destination.
    pub fn write_image(&self, sink: &dyn ImageSink) -> Result<(), ImageError> {
        info!("Converting image to RGB and computing final weighted pixel values");

        let rgb: Vec<Float> = self.get_image().iter().flat_map(|s| s.to_rgb()).collect();
        sink.write(&rgb, &self.cropped_pixel_bounds, &self.full_resolution)
    }

    /// Resolve the current image and write it to `filename`.
    pub fn write_image_file(&self) -> Result<(), ImageError> {
        self.write_image(&FileImageSink::new(&self.filename))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
