//! Progress snapshots and the observer seam.
//!
//! Every finished item produces exactly one [`ProgressSnapshot`]. Snapshots
//! are built and delivered while the accumulator lock is held, so observers
//! see them one at a time and in the order the items finished.

use super::types::{ItemFailure, ItemOutcome, ProcessedResult};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// Point-in-time view of a running batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub processed: Vec<ProcessedResult>,
    pub failures: Vec<ItemFailure>,
    /// `processed.len() + failures.len()`
    pub completed: usize,
    pub total: usize,
    pub percentage: u8,
    /// The item whose completion produced this snapshot
    pub latest: Option<ItemOutcome>,
}

/// Integer percentage of finished items, rounded down. An empty batch is 100%.
pub fn percentage(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (completed.min(total) * 100 / total) as u8
}

/// Receives progress snapshots.
///
/// Calls are serialized by the batch processor, so implementations only need
/// to be `Send`. They run on worker threads and should return quickly.
pub trait ProgressObserver: Send {
    fn report(&mut self, snapshot: ProgressSnapshot);
}

impl<F> ProgressObserver for F
where
    F: FnMut(ProgressSnapshot) + Send,
{
    fn report(&mut self, snapshot: ProgressSnapshot) {
        self(snapshot)
    }
}

/// Observers chosen at runtime.
impl ProgressObserver for Box<dyn ProgressObserver> {
    fn report(&mut self, snapshot: ProgressSnapshot) {
        (**self).report(snapshot)
    }
}

/// Fire-and-forget delivery to an async consumer. Snapshots sent after the
/// receiver is gone are dropped.
impl ProgressObserver for UnboundedSender<ProgressSnapshot> {
    fn report(&mut self, snapshot: ProgressSnapshot) {
        let _ = self.send(snapshot);
    }
}

/// Observer/receiver pair for consumers that prefer to subscribe to a stream.
pub fn progress_channel() -> (UnboundedSender<ProgressSnapshot>, UnboundedReceiver<ProgressSnapshot>) {
    unbounded_channel()
}

struct Ledger {
    processed: Vec<ProcessedResult>,
    failures: Vec<ItemFailure>,
    observer: Box<dyn ProgressObserver>,
}

/// Shared result lists plus the observer, guarded by a single lock.
pub struct ProgressAccumulator {
    total: usize,
    ledger: Mutex<Ledger>,
}

impl ProgressAccumulator {
    pub fn new(total: usize, observer: impl ProgressObserver + 'static) -> Self {
        Self {
            total,
            ledger: Mutex::new(Ledger {
                processed: Vec::with_capacity(total),
                failures: Vec::new(),
                observer: Box::new(observer),
            }),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Append `outcome` and report the resulting snapshot.
    pub fn record(&self, outcome: ItemOutcome) {
        let mut ledger = self.lock();
        match &outcome {
            ItemOutcome::Processed(result) => ledger.processed.push(result.clone()),
            ItemOutcome::Failed(failure) => ledger.failures.push(failure.clone()),
        }
        let snapshot = self.snapshot(&ledger, Some(outcome));
        ledger.observer.report(snapshot);
    }

    /// Report the current state without a triggering item. Used for empty batches.
    pub fn report_current(&self) {
        let mut ledger = self.lock();
        let snapshot = self.snapshot(&ledger, None);
        ledger.observer.report(snapshot);
    }

    /// Take the recorded lists out of the accumulator.
    pub fn take(&self) -> (Vec<ProcessedResult>, Vec<ItemFailure>) {
        let mut ledger = self.lock();
        (
            std::mem::take(&mut ledger.processed),
            std::mem::take(&mut ledger.failures),
        )
    }

    fn snapshot(&self, ledger: &Ledger, latest: Option<ItemOutcome>) -> ProgressSnapshot {
        let completed = ledger.processed.len() + ledger.failures.len();
        ProgressSnapshot {
            processed: ledger.processed.clone(),
            failures: ledger.failures.clone(),
            completed,
            total: self.total,
            percentage: percentage(completed, self.total),
            latest,
        }
    }

    // An observer that panicked must not take the remaining items down with it
    fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
