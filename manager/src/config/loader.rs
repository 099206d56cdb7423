// File: manager/src/config/loader.rs
use std::path::Path;
use tokio::fs;
use tracing::debug;

use super::Config;
use crate::errors::ConfigError;

/// Reads and parses the TOML configuration at `path`.
pub async fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::LoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    let config = parse_config(&content)?;
    debug!(
        "Loaded config {} with {} datasets",
        path.display(),
        config.datasets.len()
    );
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::ParseError {
        reason: e.to_string(),
    })
}
