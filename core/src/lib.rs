//! Core

#[macro_use]
extern crate hexf;
#[macro_use]
extern crate log;

// Re-export.
pub mod app;
pub mod bssrdf;
pub mod camera;
pub mod error;
pub mod film;
pub mod filter;
pub mod geometry;
pub mod image_io;
pub mod integrator;
pub mod interaction;
pub mod light;
pub mod light_distrib;
pub mod low_discrepancy;
pub mod material;
pub mod medium;
pub mod pbrt;
pub mod primitive;
pub mod primitives;
pub mod reflection;
pub mod rng;
pub mod sampler;
pub mod sampling;
pub mod scene;
pub mod shape;
pub mod spectrum;
