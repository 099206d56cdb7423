//! Common test data and constants

use chrono::NaiveDate;
use zfs_backup_manager::naming::{self, SnapshotRecord};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

/// Parses `YYYY-MM-DD`
pub fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

pub fn records(prefix: &str, days: &[&str]) -> Vec<SnapshotRecord> {
    days.iter()
        .map(|d| {
            let created_at = day(d);
            SnapshotRecord {
                name: naming::encode(prefix, created_at),
                created_at,
            }
        })
        .collect()
}

pub fn names(prefix: &str, days: &[&str]) -> Vec<String> {
    records(prefix, days).into_iter().map(|r| r.name).collect()
}

/// Common test volume names
pub mod volumes {
    pub const HOME: &str = "tank/home";
    pub const VM: &str = "tank/vm";
    pub const MEDIA: &str = "backup/media";
}

/// A Sunday that is also the tenth of the month
pub const SUNDAY_MARCH_10: &str = "2024-03-10";
