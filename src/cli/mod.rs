//! Command-line interface for sobel-batch
//!
//! Argument parsing with clap, styled output with console and progress bars
//! with indicatif.

pub mod commands;
mod output;

pub use commands::Cli;
pub use output::{Output, ProgressRenderer};
