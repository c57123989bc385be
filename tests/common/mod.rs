//! Shared fixtures for library-level tests.

#![allow(dead_code)]

use sobel_batch::batch::{ProgressSnapshot, WorkItem};
use sobel_batch::errors::CodecError;
use sobel_batch::raster::{ImageCodec, PixelBuffer};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Codec that decodes from and encodes into memory.
#[derive(Default)]
pub struct MemoryCodec {
    inputs: HashMap<PathBuf, PixelBuffer>,
    written: Mutex<HashMap<String, PixelBuffer>>,
}

impl MemoryCodec {
    pub fn with_inputs(inputs: impl IntoIterator<Item = (WorkItem, PixelBuffer)>) -> (Self, Vec<WorkItem>) {
        let mut codec = Self::default();
        let mut items = Vec::new();
        for (item, buffer) in inputs {
            codec.inputs.insert(item.source().to_path_buf(), buffer);
            items.push(item);
        }
        (codec, items)
    }

    /// Written buffers keyed by output file name.
    pub fn written(&self) -> HashMap<String, PixelBuffer> {
        self.written.lock().unwrap().clone()
    }
}

impl ImageCodec for MemoryCodec {
    fn decode(&self, path: &Path) -> Result<PixelBuffer, CodecError> {
        self.inputs
            .get(path)
            .cloned()
            .ok_or_else(|| CodecError::Unsupported(format!("no image at {}", path.display())))
    }

    fn encode(&self, buffer: &PixelBuffer, path: &Path) -> Result<(), CodecError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.written.lock().unwrap().insert(name, buffer.clone());
        Ok(())
    }
}

pub fn item(name: &str) -> WorkItem {
    WorkItem::new(PathBuf::from("in").join(name), Path::new("out"), "sobeled ")
}

/// `count` small images named `img00.png`, `img01.png`, ...
pub fn numbered_batch(count: usize) -> (MemoryCodec, Vec<WorkItem>) {
    MemoryCodec::with_inputs((0..count).map(|i| {
        (
            item(&format!("img{i:02}.png")),
            PixelBuffer::from_fn(6, 5, move |x, y| ((x * 17 + y * 31 + i) % 256) as u8),
        )
    }))
}

pub fn horizontal_ramp() -> PixelBuffer {
    PixelBuffer::from_fn(4, 4, |x, _| (10 * x) as u8)
}

pub fn vertical_ramp() -> PixelBuffer {
    PixelBuffer::from_fn(4, 4, |_, y| (20 * y) as u8)
}

pub fn diagonal_ramp() -> PixelBuffer {
    PixelBuffer::from_fn(4, 4, |x, y| (10 * x + 10 * y) as u8)
}

/// Observer that keeps every snapshot it receives.
pub fn recorder() -> (
    impl FnMut(ProgressSnapshot) + Send + 'static,
    Arc<Mutex<Vec<ProgressSnapshot>>>,
) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (move |snapshot: ProgressSnapshot| sink.lock().unwrap().push(snapshot), seen)
}
