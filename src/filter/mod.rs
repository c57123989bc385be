//! Sobel edge filter.
//!
//! Everything in here is pure: the same input buffer always yields the same
//! output bytes, no matter which thread or strategy calls it.

mod convolution;
mod kernel;
mod magnitude;

pub use convolution::convolve;
pub use kernel::{Kernel, SOBEL_X, SOBEL_Y};
pub use magnitude::{combine, magnitude};

use crate::errors::FilterError;
use crate::raster::PixelBuffer;

/// Run both Sobel convolutions on `source` and combine them.
pub fn sobel(source: &PixelBuffer) -> Result<PixelBuffer, FilterError> {
    let gx = convolve(source, &SOBEL_X);
    let gy = convolve(source, &SOBEL_Y);
    combine(&gx, &gy)
}
