//! Owned pixel storage shared by the codec and the filter stages.

use crate::errors::FilterError;

/// Samples per pixel. Buffers always use an RGB-compatible layout so the codec
/// can write them without conversion, even when all three samples are equal.
pub const CHANNELS: usize = 3;

/// Channel read when a buffer is treated as single-intensity data.
pub const INTENSITY_CHANNEL: usize = 0;

/// Row-major 8-bit pixel buffer.
///
/// The length invariant `data.len() == width * height * CHANNELS` is checked
/// once at construction; every pipeline stage produces a new buffer instead of
/// mutating an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGB samples.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, FilterError> {
        let expected = width * height * CHANNELS;
        if data.len() != expected {
            return Err(FilterError::BufferLength {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Expand single-channel intensities into equal-intensity triples.
    pub fn from_luma(width: usize, height: usize, luma: &[u8]) -> Result<Self, FilterError> {
        if luma.len() != width * height {
            return Err(FilterError::BufferLength {
                width,
                height,
                expected: width * height,
                actual: luma.len(),
            });
        }
        let data = luma
            .iter()
            .flat_map(|&v| std::iter::repeat_n(v, CHANNELS))
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a grayscale buffer from a per-pixel intensity function.
    pub fn from_fn(width: usize, height: usize, mut intensity: impl FnMut(usize, usize) -> u8) -> Self {
        let mut data = Vec::with_capacity(width * height * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                let v = intensity(x, y);
                data.extend_from_slice(&[v; CHANNELS]);
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Callers must guarantee the length invariant themselves.
    pub(crate) fn from_rgb_unchecked(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height * CHANNELS);
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        CHANNELS
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Number of pixels, without the channel multiplier.
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sample at `(x, y)` on `channel`. Panics when out of bounds.
    #[inline]
    pub fn sample(&self, x: usize, y: usize, channel: usize) -> u8 {
        self.data[(y * self.width + x) * CHANNELS + channel]
    }

    /// Representative intensity at `(x, y)`.
    #[inline]
    pub fn intensity(&self, x: usize, y: usize) -> u8 {
        self.sample(x, y, INTENSITY_CHANNEL)
    }

    /// Intensities of the representative channel in row-major order.
    pub fn intensities(&self) -> Vec<u8> {
        self.data.chunks_exact(CHANNELS).map(|px| px[INTENSITY_CHANNEL]).collect()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length() {
        let err = PixelBuffer::new(2, 2, vec![0; 11]).unwrap_err();
        assert_eq!(
            err,
            FilterError::BufferLength {
                width: 2,
                height: 2,
                expected: 12,
                actual: 11
            }
        );
    }

    #[test]
    fn luma_is_replicated_into_every_channel() {
        let buffer = PixelBuffer::from_luma(2, 1, &[7, 200]).unwrap();
        assert_eq!(buffer.as_bytes(), &[7, 7, 7, 200, 200, 200]);
        assert_eq!(buffer.intensity(1, 0), 200);
        assert_eq!(buffer.pixel_count(), 2);
    }

    #[test]
    fn from_fn_is_row_major() {
        let buffer = PixelBuffer::from_fn(3, 2, |x, y| (y * 10 + x) as u8);
        assert_eq!(buffer.intensities(), vec![0, 1, 2, 10, 11, 12]);
        assert_eq!(buffer.dimensions(), (3, 2));
        assert_eq!(buffer.as_bytes().len(), 3 * 2 * CHANNELS);
    }

    #[test]
    fn empty_buffers_are_valid() {
        let buffer = PixelBuffer::new(0, 5, Vec::new()).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.pixel_count(), 0);
    }
}
