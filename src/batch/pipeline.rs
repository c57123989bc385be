use super::types::{ProcessedResult, WorkItem};
use crate::errors::{FilterError, ItemError};
use crate::filter::sobel;
use crate::parallel::WorkerId;
use crate::raster::{ImageCodec, PixelBuffer};
use std::sync::Arc;

/// Transform from a decoded image to the edge map that gets encoded.
pub(crate) type EdgeFilter = fn(&PixelBuffer) -> Result<PixelBuffer, FilterError>;

/// Per-item transform: decode, both Sobel passes, combine, encode.
///
/// Identical for every strategy; only the caller's scheduling differs.
#[derive(Clone)]
pub struct EdgePipeline {
    codec: Arc<dyn ImageCodec>,
    filter: EdgeFilter,
}

impl EdgePipeline {
    pub fn new(codec: Arc<dyn ImageCodec>) -> Self {
        Self { codec, filter: sobel }
    }

    #[cfg(test)]
    pub(crate) fn with_filter(codec: Arc<dyn ImageCodec>, filter: EdgeFilter) -> Self {
        Self { codec, filter }
    }

    pub fn process(&self, item: &WorkItem, worker: WorkerId) -> Result<ProcessedResult, ItemError> {
        let source = self
            .codec
            .decode(item.source())
            .map_err(|source| ItemError::Decode {
                path: item.source().to_path_buf(),
                source,
            })?;

        let edges = (self.filter)(&source)?;
        drop(source);

        self.codec
            .encode(&edges, item.output())
            .map_err(|source| ItemError::Encode {
                path: item.output().to_path_buf(),
                source,
            })?;

        tracing::debug!(
            "{} processed on [{}], output size {} pixels",
            item.file_name(),
            worker,
            edges.pixel_count()
        );

        Ok(ProcessedResult {
            file_name: item.file_name().to_string(),
            worker,
            pixel_count: edges.pixel_count(),
        })
    }
}
