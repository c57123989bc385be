//! # sobel-batch - Batch Sobel edge detection
//!
//! Applies the Sobel operator to a directory of images and reports progress
//! while doing so. The same per-image pipeline can be scheduled three ways:
//!
//! - **Sequential**: one blocking worker, results in input order
//! - **Parallel**: a bounded crossbeam thread pool
//! - **Fan-out**: one tokio task per image, optionally limited by a semaphore
//!
//! Every strategy writes byte-identical output, isolates per-image failures,
//! reports one [`batch::ProgressSnapshot`] per finished image and honours a
//! shared [`parallel::CancelToken`].
//!
//! ## Quick Start
//!
//! ```bash
//! sobel-batch run --input photos --output edges --create-output-dir
//! sobel-batch run --input photos --output edges --mode fan-out --fan-out-limit 8
//! sobel-batch compare --input photos --output edges
//! ```

pub mod batch;
pub mod cli;
pub mod config;
pub mod errors;
pub mod filter;
pub mod parallel;
pub mod raster;

pub use cli::{Cli, Output};
pub use config::SobelConfig;

/// Result type alias for CLI-level operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
