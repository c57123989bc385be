use super::{ExecutionMode, Settings};
use crate::errors::BatchError;
use anyhow::{Result, bail};
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
};
use serde::Serialize;
use std::path::{Path, PathBuf};

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

const ENV_PREFIX: &str = "SOBEL_BATCH_";

/// Values given on the command line. Unset fields are not serialized, so they
/// never shadow a lower layer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    pub batch: BatchOverrides,
    pub execution: ExecutionOverrides,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_output_dir: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecutionOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ExecutionMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_threads: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fan_out_limit: Option<usize>,
}

/// Layered configuration.
///
/// Priority, lowest first: embedded defaults, user config, repository config,
/// `--config` file (which replaces the user and repository layers),
/// `SOBEL_BATCH_*` environment variables, command-line overrides.
pub struct SobelConfig {
    figment: Figment,
}

impl SobelConfig {
    pub fn load() -> Result<Self> {
        Self::load_with(None, None)
    }

    pub fn load_with(custom_config: Option<&Path>, cli_overrides: Option<&ConfigOverrides>) -> Result<Self> {
        tracing::trace!("CONFIG LOAD: Starting");

        let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

        if let Some(custom_path) = custom_config {
            if !custom_path.is_file() {
                bail!("config file {} does not exist", custom_path.display());
            }
            figment = Self::merge_file(figment, custom_path);
        } else {
            let user_base = Self::user_config_base_path();
            figment = figment
                .merge(Toml::file(user_base.with_extension("toml")))
                .merge(Json::file(user_base.with_extension("json")))
                .merge(Yaml::file(user_base.with_extension("yaml")))
                .merge(Toml::file("sobel-batch.toml"))
                .merge(Json::file("sobel-batch.json"))
                .merge(Yaml::file("sobel-batch.yaml"));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        if let Some(overrides) = cli_overrides {
            tracing::trace!("CONFIG LOAD: Applying CLI overrides {:?}", overrides);
            figment = figment.merge(Serialized::defaults(overrides));
        }

        Ok(SobelConfig { figment })
    }

    /// Typed view of the merged configuration.
    pub fn settings(&self) -> Result<Settings, BatchError> {
        Ok(self.figment.extract()?)
    }

    /// Get a nested object/section as JSON
    pub fn get_section(&self, path: &str) -> Result<serde_json::Value> {
        Ok(self.figment.extract_inner(path)?)
    }

    /// Get the full merged configuration as a structured value
    pub fn get_full_config(&self) -> Result<serde_json::Value> {
        Ok(self.figment.extract()?)
    }

    fn merge_file(figment: Figment, path: &Path) -> Figment {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => figment.merge(Json::file(path)),
            Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
            _ => figment.merge(Toml::file(path)),
        }
    }

    fn user_config_base_path() -> PathBuf {
        match std::env::var("HOME") {
            Ok(home) => PathBuf::from(home).join(".config/sobel-batch/config"),
            Err(_) => PathBuf::from("~/.config/sobel-batch/config"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_config_loads_defaults() {
        let config = SobelConfig::load_with(None, None).expect("Should load default config");
        let settings = config.settings().unwrap();

        assert_eq!(settings.batch.pattern, "*.jpg");
        assert_eq!(settings.batch.output_prefix, "sobeled ");
        assert_eq!(settings.codec.jpeg_quality, 90);
        assert!(config.get_full_config().is_ok());
        assert_eq!(config.get_section("codec").unwrap()["jpeg_quality"], 90);
    }

    #[test]
    fn test_custom_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(
            &path,
            "[batch]\npattern = \"*.png\"\n\n[execution]\nmode = \"fan-out\"\nfan_out_limit = 4\n",
        )
        .unwrap();

        let settings = SobelConfig::load_with(Some(&path), None).unwrap().settings().unwrap();
        assert_eq!(settings.batch.pattern, "*.png");
        assert_eq!(settings.execution.mode, ExecutionMode::FanOut);
        assert_eq!(settings.execution.fan_out_limit, 4);
        assert_eq!(settings.batch.output_prefix, "sobeled ");
    }

    #[test]
    fn test_custom_json_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(&path, r#"{"codec": {"jpeg_quality": 70}}"#).unwrap();

        let settings = SobelConfig::load_with(Some(&path), None).unwrap().settings().unwrap();
        assert_eq!(settings.codec.jpeg_quality, 70);
    }

    #[test]
    fn test_missing_custom_config_is_an_error() {
        assert!(SobelConfig::load_with(Some(Path::new("non_existent.toml")), None).is_err());
    }

    #[test]
    fn test_cli_overrides_win_and_unset_fields_do_not() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[execution]\nmode = \"sequential\"\nmax_threads = 3\n").unwrap();

        let overrides = ConfigOverrides {
            batch: BatchOverrides {
                input_dir: Some(PathBuf::from("photos")),
                ..Default::default()
            },
            execution: ExecutionOverrides {
                mode: Some(ExecutionMode::Parallel),
                ..Default::default()
            },
        };
        let settings = SobelConfig::load_with(Some(&path), Some(&overrides))
            .unwrap()
            .settings()
            .unwrap();

        assert_eq!(settings.execution.mode, ExecutionMode::Parallel);
        assert_eq!(settings.execution.max_threads, 3);
        assert_eq!(settings.batch.input_dir, Some(PathBuf::from("photos")));
        assert_eq!(settings.batch.output_dir, None);
    }

    #[test]
    fn test_environment_layer() {
        unsafe { std::env::set_var("SOBEL_BATCH_EXECUTION__THREAD_PERCENTAGE", "42") };
        let settings = SobelConfig::load_with(None, None).unwrap().settings();
        unsafe { std::env::remove_var("SOBEL_BATCH_EXECUTION__THREAD_PERCENTAGE") };

        assert_eq!(settings.unwrap().execution.thread_percentage, 42);
    }

    #[test]
    fn test_invalid_value_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[execution]\nmode = \"turbo\"\n").unwrap();

        let result = SobelConfig::load_with(Some(&path), None).unwrap().settings();
        assert!(matches!(result, Err(BatchError::Config(_))));
    }
}
