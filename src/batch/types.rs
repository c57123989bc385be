use crate::parallel::WorkerId;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// One source image and where its edge map goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    source: PathBuf,
    output: PathBuf,
    file_name: String,
}

impl WorkItem {
    /// Output path is `output_dir / (prefix + file name)`.
    ///
    /// The output name keeps the source name's raw bytes; the lossy
    /// `file_name` is only for display.
    pub fn new(source: impl Into<PathBuf>, output_dir: &Path, prefix: &str) -> Self {
        let source = source.into();
        let mut output_name = OsString::from(prefix);
        let file_name = match source.file_name() {
            Some(name) => {
                output_name.push(name);
                name.to_string_lossy().into_owned()
            }
            None => String::new(),
        };
        let output = output_dir.join(output_name);
        Self {
            source,
            output,
            file_name,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

/// A successfully transformed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedResult {
    pub file_name: String,
    pub worker: WorkerId,
    /// `width * height` of the written image
    pub pixel_count: usize,
}

/// An item whose decode or encode failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub file_name: String,
    pub source: PathBuf,
    pub worker: WorkerId,
    pub reason: String,
}

/// Outcome of one finished item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Processed(ProcessedResult),
    Failed(ItemFailure),
}

impl ItemOutcome {
    pub fn file_name(&self) -> &str {
        match self {
            ItemOutcome::Processed(result) => &result.file_name,
            ItemOutcome::Failed(failure) => &failure.file_name,
        }
    }

    pub fn worker(&self) -> WorkerId {
        match self {
            ItemOutcome::Processed(result) => result.worker,
            ItemOutcome::Failed(failure) => failure.worker,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    Completed,
    Cancelled,
}

/// Terminal report of a batch run.
///
/// `processed.len() + failures.len() + not_started.len() == total` always
/// holds.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub status: BatchStatus,
    pub total: usize,
    pub processed: Vec<ProcessedResult>,
    pub failures: Vec<ItemFailure>,
    pub not_started: Vec<WorkItem>,
}

impl BatchOutcome {
    pub fn completed(&self) -> usize {
        self.processed.len() + self.failures.len()
    }

    pub fn percentage(&self) -> u8 {
        super::progress::percentage(self.completed(), self.total)
    }

    /// Every item was attempted and none failed.
    pub fn is_success(&self) -> bool {
        self.status == BatchStatus::Completed && self.failures.is_empty()
    }
}
