use crate::options::OptionsMarkers;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_chunk_size() -> usize {
    4
}

/// Settings read from `config.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatStreamConfig {
    /// Tags the agent is prompted to use for its options block
    #[serde(default)]
    pub markers: OptionsMarkers,
    /// Chars per chunk when replaying a message
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for ChatStreamConfig {
    fn default() -> Self {
        Self {
            markers: OptionsMarkers::default(),
            chunk_size: default_chunk_size(),
        }
    }
}

/// Get the path to the configuration file
pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(config_dir.join("chat-stream").join("config.json"))
}

/// Load configuration from `path`, or from the default location if it exists
pub fn load_config(path: Option<&Path>) -> Result<ChatStreamConfig> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default_path = get_config_path()?;
            if !default_path.exists() {
                return Ok(ChatStreamConfig::default());
            }
            default_path
        }
    };

    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid config file {}", config_path.display()))
}
