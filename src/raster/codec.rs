//! Image codec adapter.
//!
//! The batch pipeline only sees the [`ImageCodec`] trait. [`ImageCrateCodec`]
//! is the production adapter on top of the `image` crate; tests plug in
//! in-memory codecs through the same seam.

use super::PixelBuffer;
use crate::errors::CodecError;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Decodes source files into pixel buffers and encodes results back to disk.
///
/// Implementations are shared by every worker of a run, so they must be
/// `Send + Sync` and must not rely on per-call mutable state.
pub trait ImageCodec: Send + Sync {
    fn decode(&self, path: &Path) -> Result<PixelBuffer, CodecError>;

    fn encode(&self, buffer: &PixelBuffer, path: &Path) -> Result<(), CodecError>;
}

/// `image`-crate backed codec.
///
/// Decoding converts any supported raster to 8-bit luma. Encoding picks the
/// format from the output extension; JPEG output uses `jpeg_quality`.
#[derive(Debug, Clone)]
pub struct ImageCrateCodec {
    jpeg_quality: u8,
}

impl ImageCrateCodec {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }
}

impl Default for ImageCrateCodec {
    fn default() -> Self {
        Self::new(90)
    }
}

impl ImageCodec for ImageCrateCodec {
    fn decode(&self, path: &Path) -> Result<PixelBuffer, CodecError> {
        let luma = image::open(path)?.into_luma8();
        let (width, height) = (luma.width() as usize, luma.height() as usize);
        PixelBuffer::from_luma(width, height, luma.as_raw())
            .map_err(|e| CodecError::Unsupported(e.to_string()))
    }

    fn encode(&self, buffer: &PixelBuffer, path: &Path) -> Result<(), CodecError> {
        let (width, height) = buffer.dimensions();
        let rgb = RgbImage::from_raw(width as u32, height as u32, buffer.as_bytes().to_vec())
            .ok_or(CodecError::Layout {
                width,
                height,
                len: buffer.as_bytes().len(),
            })?;

        match ImageFormat::from_path(path)? {
            ImageFormat::Jpeg => {
                let mut writer = BufWriter::new(File::create(path)?);
                let encoder = JpegEncoder::new_with_quality(&mut writer, self.jpeg_quality);
                rgb.write_with_encoder(encoder)?;
                writer.flush()?;
            }
            format => rgb.save_with_format(path, format)?,
        }

        tracing::trace!("wrote {}x{} image to {}", width, height, path.display());
        Ok(())
    }
}
