//! Integrator

mod common;
mod sampler_integrator;

use crate::error::RenderError;
use crate::geometry::*;
use crate::sampler::*;
use crate::scene::Scene;
use crate::spectrum::*;
use bumpalo::Bump;

// Re-export.
pub use common::*;
pub use sampler_integrator::*;

/// Integrator interface.
pub trait Integrator {
    /// Preprocess the scene before rendering. Sample arrays must be requested
    /// here, before any pixel is started.
    ///
    /// * `scene` - The scene
    fn preprocess(&mut self, _scene: &Scene) {}

    /// Render the scene.
    ///
    /// * `scene` - The scene.
    fn render(&self, scene: &Scene) -> Result<(), RenderError>;

    /// Returns the incident radiance at the origin of a given ray.
    ///
    /// * `ray`     - The ray.
    /// * `scene`   - The scene.
    /// * `sampler` - The sampler.
    /// * `arena`   - The memory arena for per-sample allocations.
    /// * `depth`   - The recursion depth.
    fn li(&self, ray: &mut Ray, scene: &Scene, sampler: &mut dyn Sampler, arena: &Bump, depth: usize) -> Spectrum;
}
