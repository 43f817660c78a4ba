//! Application related stuff

use crate::geometry::*;
use crate::light_distrib::LightSampleStrategy;
use crate::pbrt::*;
use clap::builder::RangedU64ValueParser;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

/// Available surface integrators.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum IntegratorKind {
    /// Unidirectional path tracing.
    #[default]
    Path,

    /// Whitted ray tracing.
    Whitted,

    /// Direct lighting with specular recursion.
    #[value(name = "directlighting")]
    DirectLighting,
}

/// Available samplers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SamplerKind {
    /// Scrambled Halton sequence.
    #[default]
    Halton,

    /// Independent uniform random samples.
    Random,
}

/// System wide options.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Options {
    /// Number of threads to use for rendering; 0 uses all logical CPUs.
    #[arg(long = "nthreads", short = 't', value_name = "NUM", default_value_t = 0)]
    pub n_threads: usize,

    /// Size in pixels of square tiles rendered per thread.
    #[arg(
        long = "tilesize",
        short = 'p',
        value_name = "NUM",
        default_value_t = 16,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub tile_size: usize,

    /// Samples per pixel.
    #[arg(long = "spp", short = 's', value_name = "NUM", default_value_t = 16)]
    pub spp: usize,

    /// Maximum path depth.
    #[arg(long = "maxdepth", short = 'd', value_name = "NUM", default_value_t = 5)]
    pub max_depth: usize,

    /// Surface integrator.
    #[arg(long = "integrator", value_enum, default_value_t = IntegratorKind::Path)]
    pub integrator: IntegratorKind,

    /// Pixel sampler.
    #[arg(long = "sampler", value_enum, default_value_t = SamplerKind::Halton)]
    pub sampler: SamplerKind,

    /// Strategy for choosing the light to sample at each path vertex.
    #[arg(long = "lightsamplestrategy", value_enum, default_value_t = LightSampleStrategy::Spatial)]
    pub light_sample_strategy: LightSampleStrategy,

    /// Throughput below which Russian roulette is applied.
    #[arg(long = "rrthreshold", value_name = "FLOAT", default_value_t = 1.0)]
    pub rr_threshold: Float,

    /// Number of bounces a path always survives before Russian roulette.
    #[arg(long = "rrminbounces", value_name = "NUM", default_value_t = 3)]
    pub rr_min_bounces: usize,

    /// Crop window in normalized image coordinates (x0 x1 y0 y1).
    #[arg(long = "cropwindow", short = 'c', value_name = "FLOAT", num_args = 4)]
    pub crop_window: Vec<Float>,

    /// Image width in pixels.
    #[arg(long = "xresolution", value_name = "NUM", default_value_t = 400)]
    pub x_resolution: Int,

    /// Image height in pixels.
    #[arg(long = "yresolution", value_name = "NUM", default_value_t = 300)]
    pub y_resolution: Int,

    /// Radiance of a constant environment light; 0 disables it.
    #[arg(long = "environment", value_name = "FLOAT", default_value_t = 0.0)]
    pub environment: Float,

    /// Write the final image to the given filename.
    #[arg(long = "outfile", short = 'o', value_name = "FILE", default_value = "lumen.png")]
    pub image_file: String,

    /// Write the partial image after every merged tile.
    #[arg(long)]
    pub progressive: bool,

    /// Suppress all text output other than error messages.
    #[arg(long)]
    pub quiet: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            n_threads: 0,
            tile_size: 16,
            spp: 16,
            max_depth: 5,
            integrator: IntegratorKind::default(),
            sampler: SamplerKind::default(),
            light_sample_strategy: LightSampleStrategy::default(),
            rr_threshold: 1.0,
            rr_min_bounces: 3,
            crop_window: vec![],
            x_resolution: 400,
            y_resolution: 300,
            environment: 0.0,
            image_file: String::from("lumen.png"),
            progressive: false,
            quiet: false,
        }
    }
}

impl Options {
    /// Returns the number of threads to use.
    pub fn threads(&self) -> usize {
        let max_threads = num_cpus::get();
        match self.n_threads {
            0 => max_threads,
            n if n > max_threads => {
                warn!("Num threads > max logical CPUs {}", max_threads);
                max_threads
            }
            n => n,
        }
    }

    /// Returns the image resolution.
    pub fn resolution(&self) -> Point2i {
        Point2i::new(self.x_resolution, self.y_resolution)
    }

    /// Returns the crop window in normalized image coordinates. A missing or
    /// malformed window selects the whole image.
    pub fn crop_window(&self) -> Bounds2f {
        match self.crop_window[..] {
            [x0, x1, y0, y1] => {
                let (x0, x1) = (clamp(min(x0, x1), 0.0, 1.0), clamp(max(x0, x1), 0.0, 1.0));
                let (y0, y1) = (clamp(min(y0, y1), 0.0, 1.0), clamp(max(y0, y1), 0.0, 1.0));
                Bounds2f::new(Point2f::new(x0, y0), Point2f::new(x1, y1))
            }
            [] => Bounds2f::new(Point2f::new(0.0, 0.0), Point2f::new(1.0, 1.0)),
            _ => {
                warn!("Ignoring crop window {:?}; expected 4 values", self.crop_window);
                Bounds2f::new(Point2f::new(0.0, 0.0), Point2f::new(1.0, 1.0))
            }
        }
    }
}

/// Returns a progress bar of a given length, hidden in quiet mode.
///
/// * `len`   - Number of steps.
/// * `quiet` - Hide the progress bar.
pub fn create_progress_bar(len: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new(len);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    progress
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
