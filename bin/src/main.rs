#[macro_use]
extern crate log;

mod demo;

use cameras::*;
use clap::Parser;
use demo::*;
use filters::*;
use integrators::*;
use lumen_core::app::*;
use lumen_core::camera::*;
use lumen_core::error::*;
use lumen_core::film::*;
use lumen_core::filter::*;
use lumen_core::geometry::*;
use lumen_core::integrator::*;
use lumen_core::sampler::*;
use samplers::*;
use std::sync::Arc;
use std::time::Instant;

#[cfg(all(feature = "dhat-rs", feature = "jemalloc"))]
compile_error!("feature 'dhat-rs' and feature 'jemalloc' cannot be enabled at the same time");

#[cfg(feature = "dhat-rs")]
use dhat::{Dhat, DhatAlloc};

#[cfg(feature = "dhat-rs")]
#[global_allocator]
static ALLOCATOR: DhatAlloc = DhatAlloc;

#[cfg(feature = "jemalloc")]
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(feature = "jemalloc")]
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static ALLOCATOR: Jemalloc = Jemalloc;

fn main() {
    #[cfg(feature = "dhat-rs")]
    let _dhat = Dhat::start_heap_profiling();

    let options = Options::parse();

    // `RUST_LOG` overrides the default level.
    let level = if options.quiet { "error" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(err) = render(&options) {
        error!("{}", err);
        std::process::exit(1);
    }
}

/// Render the demo scene with the integrator and sampler selected in
/// `options` and write the image.
///
/// * `options` - System wide options.
fn render(options: &Options) -> Result<(), RenderError> {
    let start = Instant::now();

    let filter: ArcFilter = Arc::new(MitchellFilter::default());
    let film = Arc::new(Film::new(
        &options.resolution(),
        &options.crop_window(),
        filter,
        &options.image_file,
        None,
        None,
    ));
    let pixel_bounds = film.cropped_pixel_bounds;

    let sampler: BoxSampler = match options.sampler {
        SamplerKind::Halton => Box::new(HaltonSampler::new(options.spp, film.get_sample_bounds(), false)),
        SamplerKind::Random => Box::new(RandomSampler::new(options.spp, None)),
    };

    let camera: ArcCamera = Arc::new(PerspectiveCamera::new(
        EYE,
        LOOK_AT,
        Vector3f::new(0.0, 1.0, 0.0),
        FOV,
        0.0,
        1e6,
        film,
        None,
    ));

    let mut integrator: Box<dyn SamplerIntegrator> = match options.integrator {
        IntegratorKind::Path => Box::new(
            PathIntegrator::new(
                options.max_depth,
                camera,
                sampler,
                pixel_bounds,
                options.rr_threshold,
                options.light_sample_strategy,
            )
            .with_min_rr_bounces(options.rr_min_bounces),
        ),
        IntegratorKind::Whitted => Box::new(WhittedIntegrator::new(options.max_depth, camera, sampler, pixel_bounds)),
        IntegratorKind::DirectLighting => Box::new(DirectLightingIntegrator::new(
            DirectLightStrategy::UniformSampleAll,
            options.max_depth,
            camera,
            sampler,
            pixel_bounds,
        )),
    };
    integrator.get_data_mut().apply_options(options);

    let scene = demo_scene(options.environment);
    info!("Scene built in {:.3} s", start.elapsed().as_secs_f64());

    let render_start = Instant::now();
    integrator.preprocess(&scene);
    integrator.render(&scene)?;
    info!(
        "Rendered with {:?} integrator at {} spp in {:.3} s; image written to '{}'",
        options.integrator,
        options.spp,
        render_start.elapsed().as_secs_f64(),
        options.image_file
    );

    Ok(())
}
