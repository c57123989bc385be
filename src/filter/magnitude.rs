use crate::errors::FilterError;
use crate::raster::{CHANNELS, PixelBuffer};

/// Merge horizontal and vertical gradients into a grayscale magnitude image.
///
/// Reads the intensity channel of both inputs and writes each magnitude as an
/// equal-intensity triple.
pub fn combine(gx: &PixelBuffer, gy: &PixelBuffer) -> Result<PixelBuffer, FilterError> {
    if gx.dimensions() != gy.dimensions() {
        return Err(FilterError::DimensionMismatch {
            left: gx.dimensions(),
            right: gy.dimensions(),
        });
    }

    let (width, height) = gx.dimensions();
    let mut data = Vec::with_capacity(width * height * CHANNELS);
    for (x, y) in gx.intensities().into_iter().zip(gy.intensities()) {
        data.extend_from_slice(&[magnitude(x, y); CHANNELS]);
    }

    Ok(PixelBuffer::from_rgb_unchecked(width, height, data))
}

/// `min(255, round(sqrt(gx² + gy²)))`
#[inline]
pub fn magnitude(gx: u8, gy: u8) -> u8 {
    let (gx, gy) = (gx as f64, gy as f64);
    (gx * gx + gy * gy).sqrt().round().min(255.0) as u8
}
