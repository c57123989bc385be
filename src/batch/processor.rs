use super::pipeline::EdgePipeline;
use super::progress::{ProgressAccumulator, ProgressObserver};
use super::types::{BatchOutcome, BatchStatus, ItemFailure, ItemOutcome, WorkItem};
use crate::errors::{BatchError, FilterError, ItemError};
use crate::parallel::{CancelToken, ExecutionStrategy, WorkerId};
use crate::raster::ImageCodec;
use std::sync::{Arc, Mutex, PoisonError};

/// Runs a list of work items through the edge pipeline under a chosen strategy.
pub struct BatchProcessor {
    pipeline: EdgePipeline,
}

impl BatchProcessor {
    pub fn new(codec: Arc<dyn ImageCodec>) -> Self {
        Self {
            pipeline: EdgePipeline::new(codec),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_pipeline(pipeline: EdgePipeline) -> Self {
        Self { pipeline }
    }

    /// Process `items` and report one snapshot per finished item to `observer`.
    ///
    /// Decode and encode errors are recorded as failures and never stop the
    /// other items. Cancelling `cancel` stops new items from starting; items
    /// already running finish and are reported. The outcome is
    /// [`BatchStatus::Cancelled`] only when at least one item never started.
    /// A filter invariant violation
    /// stops the run the same way and is returned as
    /// [`BatchError::Pipeline`] once the in-flight items are done.
    pub async fn run(
        &self,
        items: Vec<WorkItem>,
        strategy: &ExecutionStrategy,
        observer: impl ProgressObserver + 'static,
        cancel: &CancelToken,
    ) -> Result<BatchOutcome, BatchError> {
        let total = items.len();
        let accumulator = Arc::new(ProgressAccumulator::new(total, observer));
        tracing::info!("processing {} images using {}", total, strategy);

        if total == 0 {
            accumulator.report_current();
            return Ok(BatchOutcome {
                status: BatchStatus::Completed,
                total,
                processed: Vec::new(),
                failures: Vec::new(),
                not_started: Vec::new(),
            });
        }

        let run_token = cancel.child_token();
        let fatal: Arc<Mutex<Option<FilterError>>> = Arc::new(Mutex::new(None));

        let processor = {
            let pipeline = self.pipeline.clone();
            let accumulator = Arc::clone(&accumulator);
            let run_token = run_token.clone();
            let fatal = Arc::clone(&fatal);

            Arc::new(move |item: &WorkItem, worker: WorkerId| {
                match pipeline.process(item, worker) {
                    Ok(result) => accumulator.record(ItemOutcome::Processed(result)),
                    Err(ItemError::Filter(error)) => {
                        tracing::error!("{}: {}", item.file_name(), error);
                        run_token.cancel();
                        fatal
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .get_or_insert(error);
                    }
                    Err(error) => {
                        tracing::warn!("{} failed on [{}]: {}", item.file_name(), worker, error.describe());
                        accumulator.record(ItemOutcome::Failed(ItemFailure {
                            file_name: item.file_name().to_string(),
                            source: item.source().to_path_buf(),
                            worker,
                            reason: error.describe(),
                        }));
                    }
                }
            })
        };

        let execution = strategy.execute(items, processor, &run_token).await?;

        if let Some(error) = fatal.lock().unwrap_or_else(PoisonError::into_inner).take() {
            return Err(BatchError::Pipeline(error));
        }

        let (processed, failures) = accumulator.take();
        let mut not_started = execution.skipped;
        not_started.sort_by(|a, b| a.source().cmp(b.source()));

        // A cancel that arrives after every item passed the gate changes nothing
        let status = if not_started.is_empty() {
            BatchStatus::Completed
        } else {
            BatchStatus::Cancelled
        };

        tracing::info!(
            "batch {:?}: {} processed, {} failed, {} not started",
            status,
            processed.len(),
            failures.len(),
            not_started.len()
        );

        Ok(BatchOutcome {
            status,
            total,
            processed,
            failures,
            not_started,
        })
    }
}
