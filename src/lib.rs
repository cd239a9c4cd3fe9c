//! Procedural painting generator composing randomized stamp projections
//!
//! The system builds a large raster image from many small source bitmaps
//! ("stamps") placed at randomized positions, scales, rotations and colors.
//! Spatially varying sine-wave formulas bias which stamp and color get picked
//! at each location, producing coherent regions instead of uniform noise.

#![forbid(unsafe_code)]

/// Color models and palettes for projection tinting
pub mod color;
/// Run orchestration, retained state and projection scheduling
pub mod generate;
/// Input/output operations, configuration and error handling
pub mod io;
/// The shared canvas, projections and concurrent painting lifecycle
pub mod paint;
/// Spatial formulas and randomized selection queries
pub mod query;
/// Stamp bitmaps, grouping and composition strategies
pub mod stamp;

pub use io::error::{GenerationError, Result};
