use anyhow::Result;
use clap::Args;
use iptracker::lens::utils::OutputFormat;
use iptracker::TrackerConfig;
use serde::Serialize;

/// Arguments for the Config command
#[derive(Args)]
pub struct ConfigArgs {
    /// Fail if no API key is configured
    #[clap(long)]
    pub check: bool,
}

#[derive(Debug, Serialize)]
struct ConfigInfo {
    config_file: String,
    api_key: String,
    api_base_url: String,
    timeout_secs: u64,
}

pub fn run(config: &TrackerConfig, args: ConfigArgs, output_format: OutputFormat) -> Result<()> {
    let ConfigArgs { check } = args;

    let info = ConfigInfo {
        config_file: TrackerConfig::config_file_path()?,
        api_key: config.masked_api_key(),
        api_base_url: config.api_base_url.clone(),
        timeout_secs: config.timeout_secs,
    };

    match output_format {
        OutputFormat::Json | OutputFormat::JsonLine => {
            println!("{}", serde_json::to_string(&info)?);
        }
        OutputFormat::JsonPretty => {
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        OutputFormat::Psv => {
            println!("config_file|api_key|api_base_url|timeout_secs");
            println!(
                "{}|{}|{}|{}",
                info.config_file, info.api_key, info.api_base_url, info.timeout_secs
            );
        }
        OutputFormat::Table | OutputFormat::Markdown => {
            println!("Config File:        {}", info.config_file);
            println!("{}", config.summary());
        }
    }

    if check {
        config.require_api_key()?;
    }

    Ok(())
}
