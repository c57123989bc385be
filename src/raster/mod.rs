//! Pixel buffers and the codec seam.

mod buffer;
mod codec;

pub use buffer::{CHANNELS, INTENSITY_CHANNEL, PixelBuffer};
pub use codec::{ImageCodec, ImageCrateCodec};
