use crate::parallel::ExecutionStrategy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Strategy used to schedule a batch
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionMode {
    /// One item at a time, in input order
    Sequential,
    /// Bounded pool of worker threads
    #[default]
    Parallel,
    /// One async task per image
    FanOut,
}

/// Fully merged configuration, extracted from every figment layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub batch: BatchSettings,
    pub execution: ExecutionSettings,
    pub codec: CodecSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    /// Case-insensitive glob matched against file names in `input_dir`
    pub pattern: String,
    pub output_prefix: String,
    pub create_output_dir: bool,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            input_dir: None,
            output_dir: None,
            pattern: "*.jpg".to_string(),
            output_prefix: "sobeled ".to_string(),
            create_output_dir: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionSettings {
    pub mode: ExecutionMode,
    pub max_threads: usize,    // 0 = no hard limit, use percentage calculation
    pub thread_percentage: u8, // share of available CPU cores for the parallel pool
    pub fan_out_limit: usize,  // 0 = unbounded
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Parallel,
            max_threads: 0,
            thread_percentage: 100,
            fan_out_limit: 0,
        }
    }
}

impl ExecutionSettings {
    /// Turn the configured mode into a concrete strategy.
    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy_for(self.mode)
    }

    /// Strategy for `mode` using this configuration's sizing knobs.
    pub fn strategy_for(&self, mode: ExecutionMode) -> ExecutionStrategy {
        match mode {
            ExecutionMode::Sequential => ExecutionStrategy::Sequential,
            ExecutionMode::Parallel => ExecutionStrategy::Parallel {
                workers: ExecutionStrategy::calculate_optimal_workers(
                    self.max_threads,
                    self.thread_percentage,
                ),
            },
            ExecutionMode::FanOut => ExecutionStrategy::FanOut {
                limit: (self.fan_out_limit > 0).then_some(self.fan_out_limit),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecSettings {
    pub jpeg_quality: u8,
}

impl Default for CodecSettings {
    fn default() -> Self {
        Self { jpeg_quality: 90 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_map_to_strategies() {
        let mut execution = ExecutionSettings {
            max_threads: 2,
            ..Default::default()
        };
        assert_eq!(execution.strategy_for(ExecutionMode::Sequential), ExecutionStrategy::Sequential);
        assert!(matches!(
            execution.strategy(),
            ExecutionStrategy::Parallel { workers } if (1..=2).contains(&workers)
        ));
        assert_eq!(
            execution.strategy_for(ExecutionMode::FanOut),
            ExecutionStrategy::FanOut { limit: None }
        );

        execution.fan_out_limit = 3;
        assert_eq!(
            execution.strategy_for(ExecutionMode::FanOut),
            ExecutionStrategy::FanOut { limit: Some(3) }
        );
    }

    #[test]
    fn mode_uses_kebab_case() {
        let json = serde_json::to_string(&ExecutionMode::FanOut).unwrap();
        assert_eq!(json, "\"fan-out\"");
        let mode: ExecutionMode = serde_json::from_str("\"sequential\"").unwrap();
        assert_eq!(mode, ExecutionMode::Sequential);
    }
}
