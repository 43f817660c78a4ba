//! Star discrepancy of Halton samples against uniform random samples.

use lumen_core::geometry::*;
use lumen_core::pbrt::*;
use lumen_core::sampler::*;
use samplers::*;

/// Exact star discrepancy of a 2D point set, evaluated at every box whose
/// upper corner is formed from point coordinates or 1.
fn star_discrepancy(points: &[Point2f]) -> Float {
    let n = points.len() as Float;
    let mut xs: Vec<Float> = points.iter().map(|p| p.x).collect();
    let mut ys: Vec<Float> = points.iter().map(|p| p.y).collect();
    xs.push(1.0);
    ys.push(1.0);

    let mut d: Float = 0.0;
    for &x in xs.iter() {
        for &y in ys.iter() {
            let open = points.iter().filter(|p| p.x < x && p.y < y).count() as Float;
            let closed = points.iter().filter(|p| p.x <= x && p.y <= y).count() as Float;
            let volume = x * y;
            d = d.max(volume - open / n).max(closed / n - volume);
        }
    }
    d
}

/// Draws `n` consecutive `get_2d()` values, one per pixel sample.
fn draw_2d(sampler: &mut dyn Sampler, n: usize) -> Vec<Point2f> {
    let p = Point2i::new(0, 0);
    sampler.start_pixel(&p);
    let mut points = Vec::with_capacity(n);
    loop {
        points.push(sampler.get_2d());
        if !sampler.start_next_sample() {
            break;
        }
    }
    assert_eq!(points.len(), n);
    points
}

#[test]
fn halton_has_lower_discrepancy_than_random() {
    let single_pixel = Bounds2i::new(Point2i::new(0, 0), Point2i::new(1, 1));

    for n in [16, 64, 256] {
        let mut halton = HaltonSampler::new(n, single_pixel, false);
        let halton_d = star_discrepancy(&draw_2d(&mut halton, n));

        let seeds = 8;
        let random_d: Float = (0..seeds)
            .map(|seed| {
                let mut random = RandomSampler::new(n, Some(seed));
                star_discrepancy(&draw_2d(&mut random, n))
            })
            .sum::<Float>()
            / seeds as Float;

        assert!(
            halton_d < random_d,
            "N = {}: halton {} >= random {}",
            n,
            halton_d,
            random_d
        );
    }
}

#[test]
fn discrepancy_of_regular_grid_is_small() {
    let points: Vec<Point2f> = (0..4)
        .flat_map(|i| (0..4).map(move |j| Point2f::new((i as Float + 0.5) / 4.0, (j as Float + 0.5) / 4.0)))
        .collect();
    let d = star_discrepancy(&points);
    assert!(d > 0.0 && d < 0.5);
}
