//! Type definitions shared by the parser and encoder.

/// BLP file header structures
pub mod header;
/// Decoded image type
pub mod image;

pub use header::*;
pub use image::*;
