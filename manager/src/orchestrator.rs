// File: manager/src/orchestrator.rs

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::{BackupConfig, VolumeConfig};
use crate::naming;
use crate::policy::RetentionPolicy;
use crate::retention::{self, Decision};
use crate::zfs::SnapshotStore;

/// What happened to one volume during a run.
#[derive(Debug, Clone, Serialize)]
pub struct VolumeReport {
    pub volume: String,
    pub policy: Option<RetentionPolicy>,
    /// `None` when the volume could not be evaluated
    pub decision: Option<Decision>,
    /// Listed snapshots that do not decode under the volume's prefix
    pub unmanaged: Vec<String>,
    /// Snapshot actually created this run
    pub created: Option<String>,
    /// Snapshots actually destroyed this run
    pub destroyed: Vec<String>,
    pub error: Option<String>,
}

impl VolumeReport {
    fn new(volume: &str) -> Self {
        Self {
            volume: volume.to_string(),
            policy: None,
            decision: None,
            unmanaged: Vec::new(),
            created: None,
            destroyed: Vec::new(),
            error: None,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub today: NaiveDate,
    pub dry_run: bool,
    pub volumes: Vec<VolumeReport>,
}

impl RunReport {
    pub fn failed_volumes(&self) -> usize {
        self.volumes.iter().filter(|v| v.is_failed()).count()
    }

    pub fn created_count(&self) -> usize {
        self.volumes.iter().filter(|v| v.created.is_some()).count()
    }

    pub fn destroyed_count(&self) -> usize {
        self.volumes.iter().map(|v| v.destroyed.len()).sum()
    }
}

/// Applies the retention policy to every configured volume in turn.
///
/// A store failure ends processing of that volume only.
pub struct RunOrchestrator {
    store: Arc<dyn SnapshotStore>,
    dry_run: bool,
}

impl RunOrchestrator {
    pub fn new(store: Arc<dyn SnapshotStore>, dry_run: bool) -> Self {
        Self { store, dry_run }
    }

    pub async fn run(&self, config: &BackupConfig, today: NaiveDate) -> RunReport {
        if config.volumes.is_empty() {
            warn!("No datasets configured");
        }

        let mut volumes = Vec::with_capacity(config.volumes.len());
        for volume in &config.volumes {
            volumes.push(self.process_volume(&config.global, volume, today).await);
        }

        let report = RunReport {
            today,
            dry_run: self.dry_run,
            volumes,
        };

        info!(
            "Run finished{}: {} volumes, {} snapshots created, {} destroyed, {} volumes failed",
            self.dry_run_suffix(),
            report.volumes.len(),
            report.created_count(),
            report.destroyed_count(),
            report.failed_volumes()
        );

        report
    }

    async fn process_volume(
        &self,
        global: &RetentionPolicy,
        volume: &VolumeConfig,
        today: NaiveDate,
    ) -> VolumeReport {
        let mut report = VolumeReport::new(&volume.name);

        let policy = match volume.resolve(global) {
            Ok(policy) => policy,
            Err(e) => {
                error!("Invalid policy for dataset {}: {}", volume.name, e);
                report.error = Some(e.to_string());
                return report;
            }
        };

        let listed = match self.store.list(&volume.name).await {
            Ok(names) => names,
            Err(e) => {
                error!("Failed to list snapshots of {}: {}", volume.name, e);
                report.error = Some(e.to_string());
                report.policy = Some(policy);
                return report;
            }
        };

        let (history, unmanaged) = naming::decode_all(&policy.snapshot_prefix, &listed);
        for name in &unmanaged {
            debug!("Ignoring unmanaged snapshot {}@{}", volume.name, name);
        }
        debug!(
            "Dataset {}: {} managed snapshots, {} unmanaged",
            volume.name,
            history.len(),
            unmanaged.len()
        );

        report.unmanaged = unmanaged;
        let decision = match retention::evaluate(today, &history, &policy) {
            Ok(decision) => decision,
            Err(e) => {
                error!("Invalid policy for dataset {}: {}", volume.name, e);
                report.error = Some(e.to_string());
                report.policy = Some(policy);
                return report;
            }
        };

        let today_full = format!("{}@{}", volume.name, decision.today.name);
        if decision.to_create {
            info!("Creating snapshot {}{}", today_full, self.dry_run_suffix());
            if !self.dry_run {
                match self
                    .store
                    .create(&volume.name, &decision.today.name, policy.recursive)
                    .await
                {
                    Ok(()) => report.created = Some(decision.today.name.clone()),
                    Err(e) => {
                        // pruning assumed today's snapshot exists
                        error!("zfs command failed with error: {}", e);
                        error!("Skipping cleanup of {} after failed snapshot", volume.name);
                        report.error = Some(e.to_string());
                        report.decision = Some(decision);
                        report.policy = Some(policy);
                        return report;
                    }
                }
            }
        } else {
            warn!("Snapshot {} already exists", today_full);
        }

        for name in &decision.to_destroy {
            info!(
                "Destroying snapshot {}@{}{}",
                volume.name,
                name,
                self.dry_run_suffix()
            );
        }

        if !self.dry_run && !decision.to_destroy.is_empty() {
            match self
                .store
                .destroy(&volume.name, &decision.to_destroy, policy.recursive)
                .await
            {
                Ok(()) => report.destroyed = decision.to_destroy.clone(),
                Err(e) => {
                    // left-over snapshots are re-evaluated next run
                    error!("zfs command failed with error: {}", e);
                    let kept = e.undestroyed(&decision.to_destroy);
                    report.destroyed = decision
                        .to_destroy
                        .iter()
                        .filter(|name| !kept.contains(name))
                        .cloned()
                        .collect();
                    report.error = Some(e.to_string());
                }
            }
        }

        report.decision = Some(decision);
        report.policy = Some(policy);
        report
    }

    fn dry_run_suffix(&self) -> &'static str {
        if self.dry_run {
            " (dry run)"
        } else {
            ""
        }
    }
}
