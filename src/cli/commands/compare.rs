use super::run::{BatchArgs, print_summary};
use crate::batch::{BatchProcessor, BatchStatus, discover};
use crate::cli::{Output, ProgressRenderer};
use crate::config::{ExecutionMode, SobelConfig};
use crate::parallel::CancelToken;
use crate::raster::ImageCrateCodec;
use anyhow::{Context, Result, bail};
use clap::Args;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub batch: BatchArgs,
}

/// Run sequential, parallel and fan-out back to back on the same work list.
pub async fn execute(args: CompareArgs, output: &Output, custom_config: Option<&Path>) -> Result<()> {
    let config = SobelConfig::load_with(custom_config, Some(&args.batch.overrides(None)))?;
    let settings = config.settings().context("Failed to read configuration")?;
    let items = discover(&settings.batch)?;
    let processor = BatchProcessor::new(Arc::new(ImageCrateCodec::new(settings.codec.jpeg_quality)));

    output.header(&format!("Comparing strategies on {} images", items.len()));

    let cancel = CancelToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let mut timings: Vec<(String, Duration, usize)> = Vec::new();
    let mut any_failed = false;
    for mode in [ExecutionMode::Sequential, ExecutionMode::Parallel, ExecutionMode::FanOut] {
        let strategy = settings.execution.strategy_for(mode);
        let renderer = ProgressRenderer::new(items.len(), !output.is_quiet(), false)?;

        let start_time = Instant::now();
        let result = processor.run(items.clone(), &strategy, renderer.clone(), &cancel).await;
        let elapsed = start_time.elapsed();
        renderer.finish();

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                ctrl_c.abort();
                return Err(e.into());
            }
        };

        output.verbose(&format!("{strategy}"));
        print_summary(&outcome, output);
        any_failed |= !outcome.failures.is_empty();
        timings.push((strategy.name().to_string(), elapsed, outcome.processed.len()));

        if outcome.status == BatchStatus::Cancelled {
            ctrl_c.abort();
            bail!("comparison cancelled during {} run", strategy.name());
        }
    }
    ctrl_c.abort();

    output.blank_line();
    for (name, elapsed, processed) in &timings {
        output.table_row(
            &format!("Total [{name}]"),
            &format!("{} ms ({} images)", elapsed.as_millis(), processed),
        );
    }

    if any_failed {
        bail!("some images failed to process");
    }
    Ok(())
}
