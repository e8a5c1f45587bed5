//! Neighbourhood filters.
//!
//! Unlike the per-pixel operations in [`crate::adjustments`], these read a
//! window of source pixels for every output pixel, so they always write into
//! a separate output buffer.

mod blur;
mod pixelate;

pub use blur::box_blur;
pub use pixelate::pixelate;
