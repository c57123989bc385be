//! Command implementations for the sobel-batch CLI
//!
//! Each subcommand lives in its own module with its clap `Args` and an async
//! `execute` entry point.

use crate::cli::Output;
use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

pub mod compare;
pub mod config;
pub mod run;
pub mod version;

#[derive(Parser)]
#[command(
    name = "sobel-batch",
    version = env!("CARGO_PKG_VERSION"),
    about = "Batch Sobel edge detection",
    long_about = "Applies the Sobel operator to every matching image in a directory using a \
                  sequential, parallel or fan-out execution strategy, with live progress."
)]
pub struct Cli {
    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run edge detection over a directory of images
    Run(run::RunArgs),
    /// Run every strategy on the same images and compare timings
    Compare(compare::CompareArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Show version information
    Version(version::VersionArgs),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose > 0, self.quiet);
        let custom_config = self.config.as_deref();

        match self.command {
            Some(Commands::Run(args)) => run::execute(args, &output, custom_config).await,
            Some(Commands::Compare(args)) => compare::execute(args, &output, custom_config).await,
            Some(Commands::Config(args)) => config::execute(args, custom_config).await,
            Some(Commands::Version(args)) => version::execute(args).await,
            None => {
                Cli::command().print_help()?;
                Ok(())
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => tracing_subscriber::EnvFilter::new("warn"),
        1 => tracing_subscriber::EnvFilter::new("info,ignore=warn,globset=warn"),
        2 => tracing_subscriber::EnvFilter::new("debug,ignore=warn,globset=warn"),
        _ => tracing_subscriber::EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
