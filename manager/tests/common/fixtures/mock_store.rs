//! In-memory snapshot store for testing
//!
//! Behaves like a pool where every volume exists, records every call it
//! receives, and can be told to fail specific operations on specific volumes.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use zfs_backup_manager::{SnapshotStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    List(String),
    Create {
        volume: String,
        name: String,
        recursive: bool,
    },
    Destroy {
        volume: String,
        names: Vec<String>,
        recursive: bool,
    },
}

#[derive(Default)]
struct Failures {
    list: HashSet<String>,
    create: HashSet<String>,
    destroy: HashSet<(String, String)>,
}

#[derive(Default)]
pub struct MemoryStore {
    snapshots: Mutex<HashMap<String, Vec<String>>>,
    calls: Mutex<Vec<StoreCall>>,
    failures: Mutex<Failures>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `volume` with snapshot names, in listing order
    pub fn with_snapshots<I, S>(self, volume: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.snapshots
            .lock()
            .unwrap()
            .entry(volume.to_string())
            .or_default()
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn fail_list(self, volume: &str) -> Self {
        self.failures.lock().unwrap().list.insert(volume.to_string());
        self
    }

    pub fn fail_create(self, volume: &str) -> Self {
        self.failures.lock().unwrap().create.insert(volume.to_string());
        self
    }

    /// Refuse to destroy `name` of `volume`, like a held or cloned snapshot
    pub fn fail_destroy(self, volume: &str, name: &str) -> Self {
        self.failures
            .lock()
            .unwrap()
            .destroy
            .insert((volume.to_string(), name.to_string()));
        self
    }

    pub fn snapshots_of(&self, volume: &str) -> Vec<String> {
        self.snapshots
            .lock()
            .unwrap()
            .get(volume)
            .cloned()
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than listings
    pub fn mutations(&self) -> Vec<StoreCall> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, StoreCall::List(_)))
            .collect()
    }

    fn failure(command: &str) -> StoreError {
        StoreError::CommandFailed {
            command: command.to_string(),
            status: 1,
            stderr: "injected failure".to_string(),
        }
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn list(&self, volume: &str) -> Result<Vec<String>, StoreError> {
        self.calls
            .lock()
            .unwrap()
            .push(StoreCall::List(volume.to_string()));

        if self.failures.lock().unwrap().list.contains(volume) {
            return Err(Self::failure(&format!("zfs list {}", volume)));
        }
        Ok(self.snapshots_of(volume))
    }

    async fn create(&self, volume: &str, name: &str, recursive: bool) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(StoreCall::Create {
            volume: volume.to_string(),
            name: name.to_string(),
            recursive,
        });

        if self.failures.lock().unwrap().create.contains(volume) {
            return Err(Self::failure(&format!("zfs snapshot {}@{}", volume, name)));
        }
        self.snapshots
            .lock()
            .unwrap()
            .entry(volume.to_string())
            .or_default()
            .push(name.to_string());
        Ok(())
    }

    async fn destroy(&self, volume: &str, names: &[String], recursive: bool) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(StoreCall::Destroy {
            volume: volume.to_string(),
            names: names.to_vec(),
            recursive,
        });

        let failed: Vec<String> = {
            let failures = self.failures.lock().unwrap();
            names
                .iter()
                .filter(|name| failures.destroy.contains(&(volume.to_string(), name.to_string())))
                .cloned()
                .collect()
        };

        if let Some(existing) = self.snapshots.lock().unwrap().get_mut(volume) {
            existing.retain(|n| !names.contains(n) || failed.contains(n));
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(StoreError::DestroyIncomplete {
                volume: volume.to_string(),
                failed,
                reason: "injected failure".to_string(),
            })
        }
    }
}
