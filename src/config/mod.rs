//! Configuration management for sobel-batch
//!
//! Settings are merged with figment from the embedded `default-config.toml`,
//! user and repository config files, `SOBEL_BATCH_*` environment variables
//! and command-line flags, then extracted into [`Settings`].

pub mod core;
mod settings;

// Re-export main types for easier access
pub use self::core::{BatchOverrides, ConfigOverrides, ExecutionOverrides, SobelConfig};
pub use settings::{BatchSettings, CodecSettings, ExecutionMode, ExecutionSettings, Settings};
