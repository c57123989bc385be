use std::path::PathBuf;
use thiserror::Error;

/// Invariant violations inside the filter stage.
///
/// None of these can be caused by bad input files; they indicate a defect in
/// the code that built the buffers or kernels.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("pixel buffer of {width}x{height} needs {expected} bytes, got {actual}")]
    BufferLength {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("kernel must be an odd-sized square matrix, got size {size} with {weights} weights")]
    InvalidKernel { size: usize, weights: usize },

    #[error("gradient buffers differ in size: {left:?} vs {right:?}")]
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
}

/// Failure reported by an [`ImageCodec`](crate::raster::ImageCodec).
#[derive(Error, Debug)]
pub enum CodecError {
    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{width}x{height} buffer cannot be laid out as RGB ({len} bytes)")]
    Layout { width: usize, height: usize, len: usize },

    #[error("{0}")]
    Unsupported(String),
}

/// Why a single work item did not produce a result.
#[derive(Error, Debug)]
pub enum ItemError {
    #[error("could not decode {path:?}")]
    Decode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("could not encode {path:?}")]
    Encode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error(transparent)]
    Filter(#[from] FilterError),
}

impl ItemError {
    /// Filter errors are defects and abort the whole batch; codec errors only
    /// affect their own item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ItemError::Filter(_))
    }

    /// Error message including the codec cause, suitable for a failure entry.
    pub fn describe(&self) -> String {
        match self {
            ItemError::Decode { source, .. } => format!("decode failed: {source}"),
            ItemError::Encode { source, .. } => format!("encode failed: {source}"),
            ItemError::Filter(e) => e.to_string(),
        }
    }
}

/// Errors raised by the executors themselves rather than by the work they run.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("a worker thread panicked during {0} execution")]
    WorkerPanicked(&'static str),

    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
}

/// Fatal errors for a whole batch run.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("input directory {path:?} is not accessible")]
    InputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("output directory {path:?} is not accessible")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid file pattern `{pattern}`")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("{0} is not configured")]
    MissingSetting(&'static str),

    #[error(transparent)]
    Config(#[from] figment::Error),

    #[error("edge pipeline invariant violated")]
    Pipeline(#[source] FilterError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl From<tokio::task::JoinError> for BatchError {
    fn from(err: tokio::task::JoinError) -> Self {
        BatchError::Execution(ExecutionError::Join(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_filter_errors_are_fatal() {
        let decode = ItemError::Decode {
            path: PathBuf::from("a.jpg"),
            source: CodecError::Unsupported("bad header".into()),
        };
        assert!(!decode.is_fatal());
        assert_eq!(decode.describe(), "decode failed: bad header");

        let mismatch = ItemError::from(FilterError::DimensionMismatch {
            left: (2, 2),
            right: (3, 3),
        });
        assert!(mismatch.is_fatal());
    }
}
