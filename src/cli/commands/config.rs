use crate::config::SobelConfig;
use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use std::path::Path;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Display current merged configuration
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value = "toml")]
        format: ConfigFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ConfigFormat {
    Toml,
    Json,
}

pub async fn execute(args: ConfigArgs, custom_config: Option<&Path>) -> Result<()> {
    match args.command {
        ConfigCommand::Show { format } => {
            let config = SobelConfig::load_with(custom_config, None)?;
            let settings = config.settings().context("Failed to read configuration")?;

            let rendered = match format {
                ConfigFormat::Toml => toml::to_string_pretty(&settings)?,
                ConfigFormat::Json => serde_json::to_string_pretty(&settings)?,
            };
            println!("{}", rendered);
        }
    }
    Ok(())
}
