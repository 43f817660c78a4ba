//! Errors

use crate::image_io::ImageError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Errors returned by `Integrator::render()`.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The render was cancelled through its `CancelToken`.
    #[error("render cancelled")]
    Cancelled,

    /// Rendering a tile panicked. The remaining tiles were not started and
    /// the image was not written.
    #[error("tile {tile} failed: {message}")]
    TileFailed {
        /// Linear index of the tile.
        tile: usize,
        /// Panic message.
        message: String,
    },

    /// No worker thread could be started.
    #[error("no render worker threads could be started")]
    NoWorkers,

    /// Writing the final image failed.
    #[error("unable to write image: {0}")]
    ImageWrite(String),
}

impl From<ImageError> for RenderError {
    fn from(err: ImageError) -> Self {
        Self::ImageWrite(err.to_string())
    }
}

/// Shared flag used to request cooperative cancellation of a render.
/// Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a new token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns `true` once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
