//! Reconstruction through the film with each filter.

use filters::*;
use float_cmp::*;
use lumen_core::film::*;
use lumen_core::filter::*;
use lumen_core::geometry::*;
use lumen_core::pbrt::*;
use lumen_core::spectrum::*;
use std::sync::Arc;

fn all_filters() -> Vec<(&'static str, ArcFilter)> {
    let radius = Vector2f::new(2.0, 2.0);
    vec![
        ("box", Arc::new(BoxFilter::new(Vector2f::new(0.5, 0.5)))),
        ("triangle", Arc::new(TriangleFilter::new(radius))),
        ("gaussian", Arc::new(GaussianFilter::new(radius, 2.0))),
        ("mitchell", Arc::new(MitchellFilter::new(radius, 1.0 / 3.0, 1.0 / 3.0))),
    ]
}

fn film(filter: ArcFilter) -> Film {
    let crop = Bounds2f::new(Point2f::new(0.0, 0.0), Point2f::new(1.0, 1.0));
    Film::new(&Point2i::new(8, 8), &crop, filter, "energy.png", None, None)
}

#[test]
fn lone_sample_at_pixel_center_keeps_its_value() {
    for (name, filter) in all_filters() {
        let film = film(filter);
        let value = Spectrum::from_rgb(&[0.25, 1.5, 3.0]);

        let mut tile = film.get_film_tile(&Bounds2i::new(Point2i::new(3, 3), Point2i::new(4, 4)));
        tile.add_sample(Point2f::new(3.5, 3.5), value, 1.0);
        film.merge_film_tile(&tile);

        let pixel = film.get_pixel(&Point2i::new(3, 3));
        for c in 0..3 {
            assert!(
                approx_eq!(Float, pixel[c], value[c], epsilon = 1e-5),
                "{}: {} != {}",
                name,
                pixel,
                value
            );
        }
    }
}

#[test]
fn constant_radiance_resolves_to_itself_across_tiles() {
    for (name, filter) in all_filters() {
        let film = film(filter);
        let sample_bounds = film.get_sample_bounds();

        // Two tiles splitting the sample bounds down the middle, with a
        // sample at every pixel center and quarter offsets.
        let mid = (sample_bounds.p_min.x + sample_bounds.p_max.x) / 2;
        let halves = [
            Bounds2i::new(sample_bounds.p_min, Point2i::new(mid, sample_bounds.p_max.y)),
            Bounds2i::new(Point2i::new(mid, sample_bounds.p_min.y), sample_bounds.p_max),
        ];
        for bounds in halves.iter() {
            let mut tile = film.get_film_tile(bounds);
            for p in *bounds {
                for &(dx, dy) in &[(0.5, 0.5), (0.25, 0.25), (0.75, 0.25), (0.25, 0.75), (0.75, 0.75)] {
                    let p_film = Point2f::new(p.x as Float + dx, p.y as Float + dy);
                    tile.add_sample(p_film, Spectrum::new(0.4), 1.0);
                }
            }
            film.merge_film_tile(&tile);
        }

        for p in film.cropped_pixel_bounds {
            let pixel = film.get_pixel(&p);
            assert!(approx_eq!(Float, pixel[1], 0.4, epsilon = 1e-4), "{} at {}: {}", name, p, pixel);
        }
    }
}
