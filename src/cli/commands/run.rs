use crate::batch::{BatchOutcome, BatchProcessor, BatchStatus, discover};
use crate::cli::{Output, ProgressRenderer};
use crate::config::{BatchOverrides, ConfigOverrides, ExecutionMode, ExecutionOverrides, SobelConfig};
use crate::parallel::CancelToken;
use crate::raster::ImageCrateCodec;
use anyhow::{Context, Result, bail};
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Input/output flags shared by `run` and `compare`.
#[derive(Args, Debug, Clone, Default)]
pub struct BatchArgs {
    /// Directory containing the source images
    #[arg(short, long, value_name = "DIR")]
    pub input: Option<PathBuf>,

    /// Directory the edge maps are written to
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Glob matched against file names (case-insensitive)
    #[arg(long)]
    pub pattern: Option<String>,

    /// Prefix prepended to every output file name
    #[arg(long)]
    pub prefix: Option<String>,

    /// Create the output directory if it does not exist
    #[arg(long)]
    pub create_output_dir: bool,

    /// Maximum worker threads for parallel mode
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Maximum concurrent tasks for fan-out mode (0 = unbounded)
    #[arg(long, value_name = "N")]
    pub fan_out_limit: Option<usize>,
}

impl BatchArgs {
    pub fn overrides(&self, mode: Option<ExecutionMode>) -> ConfigOverrides {
        ConfigOverrides {
            batch: BatchOverrides {
                input_dir: self.input.clone(),
                output_dir: self.output.clone(),
                pattern: self.pattern.clone(),
                output_prefix: self.prefix.clone(),
                create_output_dir: self.create_output_dir.then_some(true),
            },
            execution: ExecutionOverrides {
                mode,
                max_threads: self.workers,
                fan_out_limit: self.fan_out_limit,
            },
        }
    }
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub batch: BatchArgs,

    /// Execution strategy
    #[arg(short, long, value_enum)]
    pub mode: Option<ExecutionMode>,

    /// Hide the live progress bar
    #[arg(long)]
    pub no_progress: bool,
}

pub async fn execute(args: RunArgs, output: &Output, custom_config: Option<&Path>) -> Result<()> {
    let config = SobelConfig::load_with(custom_config, Some(&args.batch.overrides(args.mode)))?;
    let settings = config.settings().context("Failed to read configuration")?;
    let items = discover(&settings.batch)?;
    let strategy = settings.execution.strategy();

    output.info(&format!(
        "Processing {} images from {} using {}",
        items.len(),
        settings.batch.input_dir.as_deref().unwrap_or(Path::new(".")).display(),
        strategy
    ));

    let processor = BatchProcessor::new(Arc::new(ImageCrateCodec::new(settings.codec.jpeg_quality)));
    let renderer = ProgressRenderer::new(items.len(), !args.no_progress && !output.is_quiet(), !output.is_quiet())?;

    let cancel = CancelToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received, waiting for running images to finish");
                cancel.cancel();
            }
        })
    };

    let start_time = Instant::now();
    let result = processor.run(items, &strategy, renderer.clone(), &cancel).await;
    let elapsed = start_time.elapsed();
    renderer.finish();
    ctrl_c.abort();

    let outcome = result?;
    print_summary(&outcome, output);
    output.info(&format!(
        "Total [{}] execution time: {} ms",
        strategy.name(),
        elapsed.as_millis()
    ));

    if outcome.status == BatchStatus::Cancelled {
        bail!("batch cancelled, {} images not started", outcome.not_started.len());
    }
    if !outcome.failures.is_empty() {
        bail!("{} of {} images failed", outcome.failures.len(), outcome.total);
    }
    Ok(())
}

pub(crate) fn print_summary(outcome: &BatchOutcome, output: &Output) {
    let summary = format!("{} of {} succeeded", outcome.processed.len(), outcome.total);
    if outcome.is_success() {
        output.success(&summary);
    } else {
        output.warning(&summary);
    }

    for failure in &outcome.failures {
        output.list_item(&format!("{}: {}", failure.file_name, failure.reason));
    }
    if !outcome.not_started.is_empty() {
        output.warning(&format!("{} images were not started", outcome.not_started.len()));
    }
}
