//! Filters

mod boxf; // box is reserved keyword
mod gaussian;
mod mitchell;
mod triangle;

// Re-export.
pub use boxf::*;
pub use gaussian::*;
pub use mitchell::*;
pub use triangle::*;
