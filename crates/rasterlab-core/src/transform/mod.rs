//! Geometric transforms: resize, crop, rotate, flip.
//!
//! Each transform borrows its input and returns a freshly allocated buffer
//! sized to the output dimensions. Inputs are never mutated.
//!
//! # Coordinate System
//!
//! - Origin is the top-left pixel, y grows downwards
//! - Crop coordinates are source pixels
//! - Positive rotation angles turn the image clockwise on screen

mod crop;
mod flip;
mod resize;
mod rotation;

pub use crop::crop;
pub use flip::flip;
pub use resize::{resize, ResizeMode};
pub(crate) use resize::resample;
pub use rotation::{compute_rotated_bounds, rotate};
