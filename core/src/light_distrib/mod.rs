//! Light Distribution.

mod power;
mod spatial;
mod uniform;

pub use power::*;
pub use spatial::*;
pub use uniform::*;

use crate::geometry::*;
use crate::sampling::*;
use crate::scene::*;
use clap::ValueEnum;
use std::fmt;
use std::sync::Arc;

/// Light sampling strategy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LightSampleStrategy {
    /// Sample all light sources uniformly.
    Uniform,

    /// Samples light sources according to their emitted power.
    Power,

    /// Compute light contributions in regions of the scene and samples from a
    /// related distribution.
    #[default]
    Spatial,
}

impl From<&str> for LightSampleStrategy {
    /// Returns a `LightSampleStrategy` given a string name.
    fn from(name: &str) -> Self {
        match name {
            "uniform" => Self::Uniform,
            "power" => Self::Power,
            "spatial" => Self::Spatial,
            _ => {
                warn!(
                    "Light sample distribution type '{}' unknown. Using 'spatial'.",
                    name
                );
                Self::Spatial
            }
        }
    }
}

impl fmt::Display for LightSampleStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => write!(f, "uniform"),
            Self::Power => write!(f, "power"),
            Self::Spatial => write!(f, "spatial"),
        }
    }
}

/// Interface of light distribution implementations that provide probability
/// distributions for sampling light sources at a given point in space.
pub trait LightDistribution {
    /// Returns a sampling distribution for light sources at a given point.
    /// Returns `None` when the scene has no lights.
    ///
    /// * `p` - The point.
    fn lookup(&self, p: &Point3f) -> Option<Arc<Distribution1D>>;
}

/// Atomic reference counted `LightDistribution `.
pub type ArcLightDistribution = Arc<dyn LightDistribution + Send + Sync>;

/// Returns a smart pointer to a new `LightDistribution` implementation.
/// Scenes with a single light always use the uniform strategy.
///
/// * `strategy` - The strategy to use for light sampling.
/// * `scene`    - The scene.
pub fn create_light_sample_distribution(
    strategy: LightSampleStrategy,
    scene: &Scene,
) -> ArcLightDistribution {
    let strategy = if scene.lights.len() == 1 {
        LightSampleStrategy::Uniform
    } else {
        strategy
    };
    debug!("Using '{}' light sample distribution.", strategy);
    match strategy {
        LightSampleStrategy::Uniform => Arc::new(UniformLightDistribution::new(scene)),
        LightSampleStrategy::Power => Arc::new(PowerLightDistribution::new(scene)),
        LightSampleStrategy::Spatial => Arc::new(SpatialLightDistribution::new(scene, 64)),
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
