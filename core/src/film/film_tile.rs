//! Film tile

use super::{Pixel, FILTER_TABLE_WIDTH};
use crate::geometry::*;
use crate::pbrt::*;
use crate::spectrum::*;
use std::sync::Arc;

/// Stores contributions for the pixels in a region of the image. A tile is
/// owned by one worker and merged into the `Film` when complete.
pub struct FilmTile {
    /// Contributions of all pixels in the tile.
    pixels: Vec<Pixel>,

    /// Bounds of the pixels in the final image.
    pixel_bounds: Bounds2i,

    /// Filter radius.
    filter_radius: Vector2f,

    /// Reciprocal of `filter_radius`.
    inv_filter_radius: Vector2f,

    /// Filter table shared with the film.
    filter_table: Arc<[Float]>,

    /// Maximum sample luminance.
    max_sample_luminance: Float,
}

impl FilmTile {
    /// Create a new `FilmTile` instance.
    ///
    /// * `pixel_bounds`         - Bounds of the pixels in the final image.
    /// * `filter_radius`        - Filter radius.
    /// * `filter_table`         - Filter table.
    /// * `max_sample_luminance` - Optional maximum sample luminance. Defaults to `INFINITY`.
    pub fn new(
        pixel_bounds: Bounds2i,
        filter_radius: Vector2f,
        filter_table: Arc<[Float]>,
        max_sample_luminance: Option<Float>,
    ) -> Self {
        Self {
            pixels: vec![Pixel::default(); max(0, pixel_bounds.area()) as usize],
            pixel_bounds,
            filter_radius,
            inv_filter_radius: Vector2f::new(1.0 / filter_radius.x, 1.0 / filter_radius.y),
            filter_table,
            max_sample_luminance: max_sample_luminance.unwrap_or(INFINITY),
        }
    }

    /// Add the radiance carried by a camera ray to every pixel within the
    /// filter radius of the film position.
    ///
    /// * `p_film`        - Point on film in raster space.
    /// * `l`             - Radiance value `L`.
    /// * `sample_weight` - Weight for the sample's contribution.
    pub fn add_sample(&mut self, p_film: Point2f, l: Spectrum, sample_weight: Float) {
        if sample_weight == 0.0 {
            return;
        }

        let ly = l.y();
        let l = if ly > self.max_sample_luminance {
            l * (self.max_sample_luminance / ly)
        } else {
            l
        };

        // Raster bounds of the sample's filter support.
        let p_film_discrete = p_film - Vector2f::new(0.5, 0.5);
        let p0 = Point2i::from((p_film_discrete - self.filter_radius).ceil()).max(&self.pixel_bounds.p_min);
        let p1 = (Point2i::from((p_film_discrete + self.filter_radius).floor()) + Vector2i::new(1, 1))
            .min(&self.pixel_bounds.p_max);
        if p0.x >= p1.x || p0.y >= p1.y {
            return;
        }

        // Filter table offsets per row and column.
        let table_index = |d: Float, inv_radius: Float| {
            let f = (d * inv_radius * FILTER_TABLE_WIDTH as Float).abs();
            min(f.floor() as usize, FILTER_TABLE_WIDTH - 1)
        };
        let ifx: Vec<usize> = (p0.x..p1.x)
            .map(|x| table_index(x as Float - p_film_discrete.x, self.inv_filter_radius.x))
            .collect();
        let ify: Vec<usize> = (p0.y..p1.y)
            .map(|y| table_index(y as Float - p_film_discrete.y, self.inv_filter_radius.y))
            .collect();

        for (y, iy) in (p0.y..p1.y).zip(ify.iter()) {
            for (x, ix) in (p0.x..p1.x).zip(ifx.iter()) {
                let filter_weight = self.filter_table[iy * FILTER_TABLE_WIDTH + ix];
                if filter_weight == 0.0 {
                    continue;
                }

                let offset = self.get_pixel_offset(&Point2i::new(x, y));
                let pixel = &mut self.pixels[offset];
                pixel.contrib_sum += l * (sample_weight * filter_weight);
                pixel.filter_weight_sum += filter_weight;
            }
        }
    }

    /// Offset of a pixel in `pixels`.
    ///
    /// * `p` - The pixel coordinates with respect to the overall image.
    fn get_pixel_offset(&self, p: &Point2i) -> usize {
        debug_assert!(self.pixel_bounds.contains_exclusive(p));
        let width = self.pixel_bounds.p_max.x - self.pixel_bounds.p_min.x;
        ((p.x - self.pixel_bounds.p_min.x) + (p.y - self.pixel_bounds.p_min.y) * width) as usize
    }

    /// Returns the accumulated contributions of a pixel.
    ///
    /// * `p` - The pixel coordinates with respect to the overall image.
    pub fn get_pixel(&self, p: &Point2i) -> &Pixel {
        &self.pixels[self.get_pixel_offset(p)]
    }

    /// Returns the bounds of the pixels in the final image.
    pub fn get_pixel_bounds(&self) -> Bounds2i {
        self.pixel_bounds
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::film::FILTER_TABLE_SIZE;

    fn tile_with_table(table: Vec<Float>) -> FilmTile {
        FilmTile::new(
            Bounds2::new(Point2i::new(0, 0), Point2i::new(4, 4)),
            Vector2f::new(1.0, 1.0),
            table.into(),
            None,
        )
    }

    #[test]
    fn zero_weight_sample_contributes_nothing() {
        let mut tile = tile_with_table(vec![1.0; FILTER_TABLE_SIZE]);
        tile.add_sample(Point2f::new(1.5, 1.5), Spectrum::ONE, 0.0);
        assert_eq!(tile.get_pixel(&Point2i::new(1, 1)).filter_weight_sum, 0.0);
    }

    #[test]
    fn zero_filter_value_contributes_nothing() {
        let mut tile = tile_with_table(vec![0.0; FILTER_TABLE_SIZE]);
        tile.add_sample(Point2f::new(1.5, 1.5), Spectrum::ONE, 1.0);
        assert!(tile.get_pixel(&Point2i::new(1, 1)).contrib_sum.is_black());
        assert_eq!(tile.get_pixel(&Point2i::new(1, 1)).filter_weight_sum, 0.0);
    }

    #[test]
    fn bright_samples_are_clamped_to_max_luminance() {
        let mut tile = FilmTile::new(
            Bounds2::new(Point2i::new(0, 0), Point2i::new(2, 2)),
            Vector2f::new(0.5, 0.5),
            vec![1.0; FILTER_TABLE_SIZE].into(),
            Some(1.0),
        );
        tile.add_sample(Point2f::new(0.5, 0.5), Spectrum::new(10.0), 1.0);
        let pixel = tile.get_pixel(&Point2i::new(0, 0));
        assert!((pixel.contrib_sum.y() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn samples_outside_tile_are_ignored() {
        let mut tile = tile_with_table(vec![1.0; FILTER_TABLE_SIZE]);
        tile.add_sample(Point2f::new(10.0, 10.0), Spectrum::ONE, 1.0);
        for p in tile.get_pixel_bounds() {
            assert_eq!(tile.get_pixel(&p).filter_weight_sum, 0.0);
        }
    }
}
