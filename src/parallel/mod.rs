//! Generic execution framework
//!
//! This module provides the scheduling layer used by the batch processor. It
//! knows nothing about images: it runs a processor closure over a list of work
//! items and hands back what finished and what never started.
//!
//! # Architecture Responsibilities
//!
//! ## What This Module Does:
//! - **Resource Calculation**: Applies user configuration (thread percentage, max threads) to available cores
//! - **Execution Strategy**: Sequential, crossbeam worker pool, or tokio task fan-out
//! - **Cancellation Gate**: Checks a [`CancelToken`] right before each item starts
//!
//! ## What This Module Does NOT Do:
//! - **Domain Logic**: Decoding, filtering and progress accounting live in `batch`
//! - **Error Policy**: The processor decides what an item failure means
//!
//! # Strategies
//!
//! ```text
//! Sequential   one blocking thread, items in input order
//! Parallel     N crossbeam threads pulling from a bounded channel (capacity N * 2)
//! FanOut       one tokio task per item, work on the blocking pool, optional semaphore
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use sobel_batch::parallel::{CancelToken, ExecutionStrategy, WorkerId};
//! use std::sync::Arc;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let strategy = ExecutionStrategy::Parallel { workers: 4 };
//! let execution = strategy
//!     .execute(vec![1, 2, 3], Arc::new(|x: &i32, _: WorkerId| x * 2), &CancelToken::new())
//!     .await
//!     .unwrap();
//! assert_eq!(execution.completed.len(), 3);
//! # });
//! ```

mod cancel;
pub mod core;

pub use cancel::CancelToken;
pub use self::core::{Execution, ExecutionStrategy, FanOutExecutor, ParallelExecutor, SequentialExecutor, WorkerId};
