use super::types::WorkItem;
use crate::config::BatchSettings;
use crate::errors::BatchError;
use globset::{GlobBuilder, GlobMatcher};
use ignore::WalkBuilder;
use std::path::Path;

/// Build the work list for a batch.
///
/// Lists `input_dir` without descending into subdirectories and keeps the
/// regular files whose name matches `pattern` (case-insensitive). Items are
/// sorted by path so every strategy sees the same input order.
pub fn discover(settings: &BatchSettings) -> Result<Vec<WorkItem>, BatchError> {
    let input_dir = settings
        .input_dir
        .as_deref()
        .ok_or(BatchError::MissingSetting("batch.input_dir"))?;
    let output_dir = settings
        .output_dir
        .as_deref()
        .ok_or(BatchError::MissingSetting("batch.output_dir"))?;

    check_input_dir(input_dir)?;
    prepare_output_dir(output_dir, settings.create_output_dir)?;
    let matcher = compile_pattern(&settings.pattern)?;

    let mut items = Vec::new();
    for entry in build_walker(input_dir).build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("skipping unreadable entry in {}: {}", input_dir.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        if !matcher.is_match(entry.file_name()) {
            tracing::trace!("{} does not match {}", entry.path().display(), settings.pattern);
            continue;
        }
        items.push(WorkItem::new(entry.path(), output_dir, &settings.output_prefix));
    }

    items.sort_by(|a, b| a.source().cmp(b.source()));
    tracing::debug!("discovered {} work items in {}", items.len(), input_dir.display());
    Ok(items)
}

/// Single-level listing with every ignore rule disabled; an image folder is
/// not a source tree.
fn build_walker(input_dir: &Path) -> WalkBuilder {
    let mut builder = WalkBuilder::new(input_dir);
    builder
        .max_depth(Some(1))
        .standard_filters(false)
        .follow_links(true);
    builder
}

fn compile_pattern(pattern: &str) -> Result<GlobMatcher, BatchError> {
    GlobBuilder::new(pattern)
        .case_insensitive(true)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| BatchError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

fn check_input_dir(input_dir: &Path) -> Result<(), BatchError> {
    let metadata = std::fs::metadata(input_dir).map_err(|source| BatchError::InputDirectory {
        path: input_dir.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(BatchError::InputDirectory {
            path: input_dir.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
        });
    }
    Ok(())
}

fn prepare_output_dir(output_dir: &Path, create: bool) -> Result<(), BatchError> {
    let to_error = |source| BatchError::OutputDirectory {
        path: output_dir.to_path_buf(),
        source,
    };

    if create {
        std::fs::create_dir_all(output_dir).map_err(to_error)?;
    }
    let metadata = std::fs::metadata(output_dir).map_err(to_error)?;
    if !metadata.is_dir() {
        return Err(to_error(std::io::Error::new(
            std::io::ErrorKind::NotADirectory,
            "not a directory",
        )));
    }
    Ok(())
}
