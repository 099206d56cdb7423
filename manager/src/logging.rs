//! Logging setup
//!
//! Levels use the names of the configuration file. `RUST_LOG` still applies
//! to other crates.

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use std::str::FromStr;
use tracing_subscriber::{fmt, EnvFilter};

use crate::errors::ConfigError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    #[value(name = "DEBUG")]
    Debug,
    #[default]
    #[value(name = "INFO")]
    Info,
    #[value(name = "WARNING")]
    Warning,
    #[value(name = "ERROR")]
    Error,
    #[value(name = "CRITICAL")]
    Critical,
}

impl LogLevel {
    /// Directive value understood by `EnvFilter`.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            // tracing has no level above error
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            "CRITICAL" => Ok(LogLevel::Critical),
            _ => Err(ConfigError::UnknownLogLevel {
                value: value.to_string(),
            }),
        }
    }
}

/// Installs the global fmt subscriber writing to stderr.
pub fn init_logging(level: LogLevel) -> Result<()> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive(format!("zfs_backup_manager={}", level.as_filter()).parse()?);

    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialise logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("DEBUG", LogLevel::Debug)]
    #[test_case("info", LogLevel::Info)]
    #[test_case("Warning", LogLevel::Warning)]
    #[test_case("ERROR", LogLevel::Error)]
    #[test_case(" CRITICAL ", LogLevel::Critical)]
    fn test_parse_level(value: &str, expected: LogLevel) {
        assert_eq!(value.parse::<LogLevel>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_level() {
        assert_eq!(
            "TRACE".parse::<LogLevel>(),
            Err(ConfigError::UnknownLogLevel {
                value: "TRACE".to_string()
            })
        );
    }

    #[test]
    fn test_critical_maps_to_error() {
        assert_eq!(LogLevel::Critical.as_filter(), "error");
        assert_eq!(LogLevel::Warning.as_filter(), "warn");
    }
}
