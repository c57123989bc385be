//! Terminal output for sobel-batch
//!
//! Styled status lines via `console` and a live progress bar via `indicatif`
//! that doubles as the batch progress observer.

use crate::batch::{ItemOutcome, ProgressObserver, ProgressSnapshot};
use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output handler for consistent CLI formatting
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("ℹ").blue(), message);
        }
    }

    /// Print a verbose message (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            println!("{} {}", style("ℹ").dim(), style(message).dim());
        }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Print a header/title
    pub fn header(&self, title: &str) {
        if !self.quiet {
            println!("\n{}", style(title).bold().underlined());
        }
    }

    /// Print a table row
    pub fn table_row(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<20} {}", style(key).dim(), value);
        }
    }

    /// Print a list item
    pub fn list_item(&self, item: &str) {
        if !self.quiet {
            println!("  • {}", item);
        }
    }

    /// Print blank line
    pub fn blank_line(&self) {
        if !self.quiet {
            println!();
        }
    }
}

/// Progress bar fed by batch snapshots.
///
/// Prints one line per finished item above the bar, in the order items
/// finish. Clones share the same bar, so the command can keep one to finish
/// it after the run.
#[derive(Clone)]
pub struct ProgressRenderer {
    bar: ProgressBar,
    item_lines: bool,
}

impl ProgressRenderer {
    /// `show_bar` controls the live bar; `item_lines` controls the per-item log.
    pub fn new(total: usize, show_bar: bool, item_lines: bool) -> Result<Self> {
        let bar = if show_bar {
            ProgressBar::new(total as u64)
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )?
            .progress_chars("#>-"),
        );
        Ok(Self { bar, item_lines })
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    fn line(&self, message: String) {
        if self.bar.is_hidden() {
            println!("{message}");
        } else {
            self.bar.println(message);
        }
    }
}

impl ProgressObserver for ProgressRenderer {
    fn report(&mut self, snapshot: ProgressSnapshot) {
        self.bar.set_length(snapshot.total as u64);
        self.bar.set_position(snapshot.completed as u64);

        let Some(latest) = snapshot.latest else {
            return;
        };
        self.bar.set_message(latest.file_name().to_string());

        if self.item_lines {
            match latest {
                ItemOutcome::Processed(result) => self.line(format!(
                    "{} processed on [{}], output size {} pixels",
                    result.file_name, result.worker, result.pixel_count
                )),
                ItemOutcome::Failed(failure) => self.line(format!(
                    "{} {} failed on [{}]: {}",
                    style("✖").red(),
                    failure.file_name,
                    failure.worker,
                    failure.reason
                )),
            }
        }
    }
}
