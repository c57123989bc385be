//! Batch orchestration: work list discovery, the per-item edge pipeline,
//! progress accounting and the [`BatchProcessor`] that ties them to an
//! [`ExecutionStrategy`](crate::parallel::ExecutionStrategy).

pub mod discovery;
mod pipeline;
pub mod progress;
mod processor;
mod types;

pub use discovery::discover;
pub use pipeline::EdgePipeline;
pub use processor::BatchProcessor;
pub use progress::{ProgressAccumulator, ProgressObserver, ProgressSnapshot, percentage, progress_channel};
pub use types::{BatchOutcome, BatchStatus, ItemFailure, ItemOutcome, ProcessedResult, WorkItem};
