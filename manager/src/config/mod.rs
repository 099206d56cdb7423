// File: manager/src/config/mod.rs
pub mod loader;

use serde::Deserialize;
use std::collections::HashSet;

use crate::errors::ConfigError;
use crate::logging::LogLevel;
use crate::policy::{PolicyOverrides, RetentionPolicy};

pub use loader::{load_config, parse_config};

/// The configuration file as written.
///
/// Top-level policy keys form the global policy; each dataset entry may
/// override any of them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub policy: PolicyOverrides,
    pub logging: Option<String>,
    #[serde(default, alias = "volumes")]
    pub datasets: Vec<DatasetEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetEntry {
    pub name: Option<String>,
    #[serde(flatten)]
    pub overrides: PolicyOverrides,
}

/// One managed volume and the policy fields it overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeConfig {
    pub name: String,
    pub overrides: PolicyOverrides,
}

impl VolumeConfig {
    /// Effective policy of this volume under `global`.
    pub fn resolve(&self, global: &RetentionPolicy) -> Result<RetentionPolicy, ConfigError> {
        global.resolve(&self.overrides, &self.name)
    }
}

/// Validated configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupConfig {
    pub global: RetentionPolicy,
    /// In configuration order
    pub volumes: Vec<VolumeConfig>,
}

impl Config {
    /// Level from the `logging` key, `None` when unset.
    pub fn log_level(&self) -> Result<Option<LogLevel>, ConfigError> {
        self.logging.as_deref().map(str::parse::<LogLevel>).transpose()
    }

    /// Checks every dataset entry and policy value.
    ///
    /// Each volume's effective policy is resolved once here so that range
    /// errors surface before any storage command runs.
    pub fn validate(&self) -> Result<BackupConfig, ConfigError> {
        let global = RetentionPolicy::default().resolve(&self.policy, "")?;

        let mut seen = HashSet::with_capacity(self.datasets.len());
        let mut volumes = Vec::with_capacity(self.datasets.len());

        for (i, entry) in self.datasets.iter().enumerate() {
            let scope = format!("datasets[{}]", i);

            let name = match entry.name.as_deref().map(str::trim) {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => {
                    return Err(ConfigError::MissingRequired {
                        field: format!("{}.name", scope),
                    })
                }
            };

            if !seen.insert(name.clone()) {
                return Err(ConfigError::InvalidValue {
                    field: format!("{}.name", scope),
                    reason: format!("dataset '{}' is configured more than once", name),
                });
            }

            global.resolve(&entry.overrides, &scope)?;

            volumes.push(VolumeConfig {
                name,
                overrides: entry.overrides.clone(),
            });
        }

        Ok(BackupConfig { global, volumes })
    }
}
