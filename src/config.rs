use anyhow::{anyhow, Result};
use config::Config;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use crate::lens::geo::request::DEFAULT_API_BASE;
use crate::lens::geo::transport::DEFAULT_TIMEOUT_SECS;

#[derive(Debug, Clone, Serialize)]
pub struct TrackerConfig {
    /// ipify Geo API key
    #[serde(skip_serializing)]
    pub api_key: String,

    /// Geolocation API endpoint
    pub api_base_url: String,

    /// HTTP request timeout in seconds (default: 10)
    pub timeout_secs: u64,
}

const EMPTY_CONFIG: &str = r#"### iptracker configuration file

### ipify Geo API key (https://geo.ipify.org)
# api_key = "at_..."

### geolocation API endpoint
# api_base_url = "https://geo.ipify.org/api/v2/country,city"

### HTTP request timeout (in seconds)
# timeout_secs = 10
"#;

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl TrackerConfig {
    /// Function to create and initialize a new configuration
    pub fn new(path: &Option<String>) -> Result<TrackerConfig> {
        let mut builder = Config::builder();

        // Add in toml configuration file
        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                // By default use $HOME/.iptracker/iptracker.toml as the configuration file path
                let tracker_dir = Self::config_dir()?;
                std::fs::create_dir_all(tracker_dir.as_str())
                    .map_err(|e| anyhow!("Unable to create iptracker directory: {}", e))?;
                let p = Self::config_file_path()?;
                if Path::new(p.as_str()).exists() {
                    builder = builder.add_source(config::File::with_name(p.as_str()));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG).map_err(|e| {
                        anyhow!("Unable to create config file {}: {}", p.as_str(), e)
                    })?;
                }
            }
        }

        // Add in settings from the environment (with a prefix of IPTRACKER)
        // E.g., `IPTRACKER_API_KEY=at_xxx ./iptracker lookup 8.8.8.8` would set the API key
        builder = builder.add_source(config::Environment::with_prefix("IPTRACKER"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_map(&config)
    }

    fn from_map(config: &HashMap<String, String>) -> Result<TrackerConfig> {
        let defaults = TrackerConfig::default();

        let api_key = config
            .get("api_key")
            .map(|s| s.trim().to_string())
            .unwrap_or(defaults.api_key);

        let api_base_url = match config.get("api_base_url").map(|s| s.trim()) {
            Some(url) if url.is_empty() => {
                return Err(anyhow!("api_base_url must not be empty"));
            }
            Some(url) => url.to_string(),
            None => defaults.api_base_url,
        };

        let timeout_secs = match config.get("timeout_secs") {
            Some(s) => s
                .parse()
                .map_err(|e| anyhow!("Invalid timeout_secs '{}': {}", s, e))?,
            None => defaults.timeout_secs,
        };
        if timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be greater than 0"));
        }

        Ok(TrackerConfig {
            api_key,
            api_base_url,
            timeout_secs,
        })
    }

    /// The API key, or an error telling the user how to set one
    pub fn require_api_key(&self) -> Result<&str> {
        if self.api_key.is_empty() {
            return Err(anyhow!(
                "No API key configured. Set api_key in {} or the IPTRACKER_API_KEY environment variable",
                Self::config_file_path().unwrap_or_else(|_| "the config file".to_string())
            ));
        }
        Ok(self.api_key.as_str())
    }

    /// API key with everything but the first few characters hidden
    pub fn masked_api_key(&self) -> String {
        if self.api_key.is_empty() {
            return "(not set)".to_string();
        }
        let shown: String = self.api_key.chars().take(3).collect();
        format!("{}***", shown)
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        [
            format!("API Key:            {}", self.masked_api_key()),
            format!("API Base URL:       {}", self.api_base_url),
            format!("Timeout:            {} seconds", self.timeout_secs),
        ]
        .join("\n")
    }

    fn config_dir() -> Result<String> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| anyhow!("Could not find home directory"))?
            .to_str()
            .ok_or_else(|| anyhow!("Could not convert home directory path to string"))?
            .to_owned();
        Ok(format!("{}/.iptracker", home_dir))
    }

    /// Get the default config file path
    pub fn config_file_path() -> Result<String> {
        Ok(format!("{}/iptracker.toml", Self::config_dir()?))
    }
}
