//! Retention policy model
//!
//! The effective policy of a volume is the global policy with every field the
//! volume's entry sets explicitly replaced. The global policy is itself built
//! the same way from the built-in defaults and the top level of the config.

use serde::{Deserialize, Serialize};

use crate::constants::{defaults, limits};
use crate::errors::ConfigError;

/// A fully resolved retention policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetentionPolicy {
    /// Day of month (1-31) whose snapshots are Monthly candidates
    pub day_of_month: u32,
    /// Day of week (0 = Sunday .. 6 = Saturday) whose snapshots are Weekly candidates
    pub day_of_week: u32,
    pub keep_days: u32,
    pub keep_weeks: u32,
    pub keep_months: u32,
    pub recursive: bool,
    pub snapshot_prefix: String,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            day_of_month: defaults::DAY_OF_MONTH,
            day_of_week: defaults::DAY_OF_WEEK,
            keep_days: defaults::KEEP_DAYS,
            keep_weeks: defaults::KEEP_WEEKS,
            keep_months: defaults::KEEP_MONTHS,
            recursive: defaults::RECURSIVE,
            snapshot_prefix: defaults::SNAPSHOT_PREFIX.to_string(),
        }
    }
}

/// Policy fields a config section sets explicitly. Unset fields inherit.
///
/// Field names follow the configuration file keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PolicyOverrides {
    #[serde(default)]
    pub dom: Option<u32>,
    #[serde(default)]
    pub dow: Option<u32>,
    #[serde(default)]
    pub keep_days: Option<u32>,
    #[serde(default)]
    pub keep_weeks: Option<u32>,
    #[serde(default)]
    pub keep_months: Option<u32>,
    #[serde(default)]
    pub recursive: Option<bool>,
    #[serde(default)]
    pub snapshot_prefix: Option<String>,
}

impl RetentionPolicy {
    /// Merges `overrides` onto `self` field by field and validates the result.
    ///
    /// `scope` names the config section for error messages, e.g. `datasets[2]`;
    /// an empty scope denotes the top level.
    pub fn resolve(&self, overrides: &PolicyOverrides, scope: &str) -> Result<Self, ConfigError> {
        let resolved = Self {
            day_of_month: overrides.dom.unwrap_or(self.day_of_month),
            day_of_week: overrides.dow.unwrap_or(self.day_of_week),
            keep_days: overrides.keep_days.unwrap_or(self.keep_days),
            keep_weeks: overrides.keep_weeks.unwrap_or(self.keep_weeks),
            keep_months: overrides.keep_months.unwrap_or(self.keep_months),
            recursive: overrides.recursive.unwrap_or(self.recursive),
            snapshot_prefix: overrides
                .snapshot_prefix
                .clone()
                .unwrap_or_else(|| self.snapshot_prefix.clone()),
        };

        resolved.validate(scope)?;
        Ok(resolved)
    }

    /// Rejects candidate-day values outside their calendar range.
    pub fn validate(&self, scope: &str) -> Result<(), ConfigError> {
        if !(limits::MIN_DAY_OF_MONTH..=limits::MAX_DAY_OF_MONTH).contains(&self.day_of_month) {
            return Err(ConfigError::InvalidValue {
                field: scoped_field(scope, "dom"),
                reason: format!(
                    "must be between {} and {}, got {}",
                    limits::MIN_DAY_OF_MONTH,
                    limits::MAX_DAY_OF_MONTH,
                    self.day_of_month
                ),
            });
        }

        if self.day_of_week > limits::MAX_DAY_OF_WEEK {
            return Err(ConfigError::InvalidValue {
                field: scoped_field(scope, "dow"),
                reason: format!(
                    "must be between 0 (Sunday) and {} (Saturday), got {}",
                    limits::MAX_DAY_OF_WEEK,
                    self.day_of_week
                ),
            });
        }

        Ok(())
    }
}

fn scoped_field(scope: &str, field: &str) -> String {
    if scope.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", scope, field)
    }
}
