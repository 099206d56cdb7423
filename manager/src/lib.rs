//! Tiered ZFS snapshot retention
//!
//! Creates one snapshot per volume and day and prunes old ones according to
//! daily, weekly and monthly keep counts.

pub mod config;
pub mod constants;
pub mod errors;
pub mod logging;
pub mod naming;
pub mod orchestrator;
pub mod policy;
pub mod retention;
pub mod zfs;

// Re-export commonly used types
pub use config::{BackupConfig, Config, VolumeConfig};
pub use errors::{ConfigError, ManagerError, StoreError};
pub use orchestrator::{RunOrchestrator, RunReport, VolumeReport};
pub use policy::{PolicyOverrides, RetentionPolicy};
pub use retention::{evaluate, Decision, Tier};
pub use zfs::{SnapshotStore, ZfsCommandStore};
