use super::CancelToken;
use crate::errors::ExecutionError;
use crossbeam::channel::{Receiver, Sender, bounded};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Identity of the worker that ran an item, as reported back to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerId {
    /// The single blocking worker of a sequential run
    Main,
    /// A thread of the crossbeam pool
    Pool(usize),
    /// The tokio task spawned for the item with this index
    Task(usize),
}

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerId::Main => write!(f, "main"),
            WorkerId::Pool(id) => write!(f, "worker-{id}"),
            WorkerId::Task(id) => write!(f, "task-{id}"),
        }
    }
}

/// What an executor did with its work items.
#[derive(Debug)]
pub struct Execution<T, R> {
    /// Results in the order the items finished
    pub completed: Vec<R>,
    /// Items that never passed the cancellation gate
    pub skipped: Vec<T>,
}

impl<T, R> Execution<T, R> {
    fn empty() -> Self {
        Self {
            completed: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

enum Slot<T, R> {
    Done(R),
    Skipped(T),
}

/// Sequential execution: one worker, input order.
pub struct SequentialExecutor;

impl SequentialExecutor {
    pub fn execute<T, R, F>(work_items: Vec<T>, processor: &F, cancel: &CancelToken) -> Execution<T, R>
    where
        F: Fn(&T, WorkerId) -> R,
    {
        let mut execution = Execution::empty();
        execution.completed.reserve(work_items.len());

        let mut items = work_items.into_iter();
        for work_item in items.by_ref() {
            if cancel.is_cancelled() {
                execution.skipped.push(work_item);
                break;
            }
            execution.completed.push(processor(&work_item, WorkerId::Main));
        }
        execution.skipped.extend(items);

        execution
    }
}

/// Crossbeam worker pool fed through a bounded channel.
pub struct ParallelExecutor {
    max_workers: usize,
    buffer_size: usize,
}

/// Context for worker threads to avoid too many function parameters
struct WorkerContext<'a, T, R, F> {
    worker_id: usize,
    work_rx: Receiver<T>,
    result_tx: Sender<Slot<T, R>>,
    processor: &'a F,
    cancel: &'a CancelToken,
}

impl ParallelExecutor {
    pub fn new(max_workers: usize) -> Self {
        let max_workers = max_workers.max(1);
        Self {
            max_workers,
            buffer_size: max_workers * 2,
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Execute work items in parallel using a producer-consumer pattern.
    ///
    /// At most `min(max_workers, work_items.len())` threads are started.
    pub fn execute<T, R, F>(
        &self,
        work_items: Vec<T>,
        processor: &F,
        cancel: &CancelToken,
    ) -> Result<Execution<T, R>, ExecutionError>
    where
        T: Send,
        R: Send,
        F: Fn(&T, WorkerId) -> R + Sync,
    {
        if work_items.is_empty() {
            return Ok(Execution::empty());
        }

        let actual_workers = std::cmp::min(self.max_workers, work_items.len());
        let (work_tx, work_rx) = bounded::<T>(self.buffer_size);
        let (result_tx, result_rx) = bounded::<Slot<T, R>>(self.buffer_size);

        tracing::debug!("starting {} pool workers for {} items", actual_workers, work_items.len());

        crossbeam::thread::scope(|s| {
            for worker_id in 0..actual_workers {
                let ctx = WorkerContext {
                    worker_id,
                    work_rx: work_rx.clone(),
                    result_tx: result_tx.clone(),
                    processor,
                    cancel,
                };
                s.spawn(move |_| Self::worker_thread(ctx));
            }

            // Only workers hold the receiving end, so the producer stops if they all exit
            drop(work_rx);
            drop(result_tx);

            s.spawn(move |_| {
                for work_item in work_items {
                    if work_tx.send(work_item).is_err() {
                        break;
                    }
                }
            });

            Self::collect_results(result_rx)
        })
        .map_err(|_| ExecutionError::WorkerPanicked("parallel"))
    }

    fn worker_thread<T, R, F>(ctx: WorkerContext<'_, T, R, F>)
    where
        F: Fn(&T, WorkerId) -> R,
    {
        while let Ok(work_item) = ctx.work_rx.recv() {
            let slot = if ctx.cancel.is_cancelled() {
                Slot::Skipped(work_item)
            } else {
                Slot::Done((ctx.processor)(&work_item, WorkerId::Pool(ctx.worker_id)))
            };

            if ctx.result_tx.send(slot).is_err() {
                break;
            }
        }
    }

    fn collect_results<T, R>(result_rx: Receiver<Slot<T, R>>) -> Execution<T, R> {
        let mut execution = Execution::empty();
        while let Ok(slot) = result_rx.recv() {
            match slot {
                Slot::Done(result) => execution.completed.push(result),
                Slot::Skipped(item) => execution.skipped.push(item),
            }
        }
        execution
    }
}

/// One tokio task per item, each running its work on the blocking pool.
///
/// Every task is spawned up front. With a `limit`, a semaphore caps how many
/// of them run their work at the same time.
pub struct FanOutExecutor {
    limit: Option<usize>,
}

impl FanOutExecutor {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            limit: limit.map(|n| n.max(1)),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub async fn execute<T, R, F>(
        &self,
        work_items: Vec<T>,
        processor: Arc<F>,
        cancel: &CancelToken,
    ) -> Result<Execution<T, R>, ExecutionError>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(&T, WorkerId) -> R + Send + Sync + 'static,
    {
        let semaphore = self.limit.map(|n| Arc::new(Semaphore::new(n)));
        let mut tasks = JoinSet::new();

        tracing::debug!("spawning {} fan-out tasks (limit: {:?})", work_items.len(), self.limit);

        for (index, work_item) in work_items.into_iter().enumerate() {
            let processor = Arc::clone(&processor);
            let semaphore = semaphore.clone();
            let cancel = cancel.clone();

            tasks.spawn(async move {
                let _permit = match semaphore {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                if cancel.is_cancelled() {
                    return Ok(Slot::Skipped(work_item));
                }
                tokio::task::spawn_blocking(move || {
                    Slot::Done((*processor)(&work_item, WorkerId::Task(index)))
                })
                .await
            });
        }

        let mut execution = Execution::empty();
        while let Some(joined) = tasks.join_next().await {
            match joined?? {
                Slot::Done(result) => execution.completed.push(result),
                Slot::Skipped(item) => execution.skipped.push(item),
            }
        }
        Ok(execution)
    }
}

/// Execution strategy enum for choosing how a batch is scheduled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStrategy {
    Sequential,
    Parallel { workers: usize },
    FanOut { limit: Option<usize> },
}

impl ExecutionStrategy {
    /// Run `processor` over every item that passes the cancellation gate.
    ///
    /// Sequential and parallel runs are moved onto the blocking pool, so this
    /// never blocks the async caller.
    pub async fn execute<T, R, F>(
        &self,
        work_items: Vec<T>,
        processor: Arc<F>,
        cancel: &CancelToken,
    ) -> Result<Execution<T, R>, ExecutionError>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(&T, WorkerId) -> R + Send + Sync + 'static,
    {
        match self {
            ExecutionStrategy::Sequential => {
                let cancel = cancel.clone();
                Ok(tokio::task::spawn_blocking(move || {
                    SequentialExecutor::execute(work_items, processor.as_ref(), &cancel)
                })
                .await?)
            }
            ExecutionStrategy::Parallel { workers } => {
                let executor = ParallelExecutor::new(*workers);
                let cancel = cancel.clone();
                tokio::task::spawn_blocking(move || {
                    executor.execute(work_items, processor.as_ref(), &cancel)
                })
                .await?
            }
            ExecutionStrategy::FanOut { limit } => {
                FanOutExecutor::new(*limit)
                    .execute(work_items, processor, cancel)
                    .await
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExecutionStrategy::Sequential => "Sequential",
            ExecutionStrategy::Parallel { .. } => "Parallel",
            ExecutionStrategy::FanOut { .. } => "FanOut",
        }
    }

    /// Calculate optimal workers based on available system resources and configuration limits
    ///
    /// # Algorithm
    /// ```text
    /// 1. Detect available CPU cores: num_cpus::get()
    /// 2. Apply percentage: cores * thread_percentage / 100
    /// 3. Apply config limit: min(max_threads_config, percentage_result) if max_threads_config > 0
    /// 4. Ensure minimum: max(1, final_result)
    /// ```
    ///
    /// # Examples
    /// ```rust
    /// use sobel_batch::parallel::ExecutionStrategy;
    ///
    /// let workers = ExecutionStrategy::calculate_optimal_workers(0, 75);
    /// assert!(workers >= 1);
    ///
    /// let workers = ExecutionStrategy::calculate_optimal_workers(8, 75);
    /// assert!(workers <= 8);
    /// ```
    pub fn calculate_optimal_workers(max_threads_config: usize, thread_percentage: u8) -> usize {
        let available_cores = num_cpus::get();

        let workers_by_percentage =
            std::cmp::max(1, (available_cores * thread_percentage as usize) / 100);

        if max_threads_config > 0 {
            std::cmp::min(max_threads_config, workers_by_percentage)
        } else {
            workers_by_percentage
        }
    }
}

impl fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionStrategy::Sequential => write!(f, "sequential"),
            ExecutionStrategy::Parallel { workers } => write!(f, "parallel ({workers} workers)"),
            ExecutionStrategy::FanOut { limit: Some(limit) } => write!(f, "fan-out (limit {limit})"),
            ExecutionStrategy::FanOut { limit: None } => write!(f, "fan-out (unbounded)"),
        }
    }
}
