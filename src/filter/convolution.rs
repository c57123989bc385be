use super::Kernel;
use crate::raster::{CHANNELS, PixelBuffer};

/// Apply `kernel` to every channel of `source`.
///
/// Kernels are applied as correlation (not flipped). Pixels outside the buffer
/// replicate the nearest edge pixel, so the output has the same dimensions as
/// the input. Each weighted sum is divided by [`Kernel::divisor`] and then
/// saturated into `0..=255`, which means negative responses become 0.
pub fn convolve(source: &PixelBuffer, kernel: &Kernel) -> PixelBuffer {
    let (width, height) = source.dimensions();
    let radius = kernel.radius() as isize;
    let divisor = kernel.divisor();
    let mut data = Vec::with_capacity(width * height * CHANNELS);

    for y in 0..height {
        for x in 0..width {
            for channel in 0..CHANNELS {
                let mut sum = 0i32;
                for ky in 0..kernel.size() {
                    let sy = clamp_index(y as isize + ky as isize - radius, height);
                    for kx in 0..kernel.size() {
                        let sx = clamp_index(x as isize + kx as isize - radius, width);
                        sum += kernel.weight(kx, ky) * source.sample(sx, sy, channel) as i32;
                    }
                }
                data.push((sum / divisor).clamp(0, 255) as u8);
            }
        }
    }

    PixelBuffer::from_rgb_unchecked(width, height, data)
}

#[inline]
fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}
