// File: manager/src/zfs/mod.rs

//! Snapshot store gateway
//!
//! The retention logic never talks to ZFS directly. Everything it needs from
//! the storage engine goes through [`SnapshotStore`], which is implemented by
//! [`ZfsCommandStore`] for real runs and by in-memory doubles in tests.
//!
//! # Commands
//!
//! - list: `zfs list -H -t snapshot -o name -d 1 <volume>`
//! - create: `zfs snapshot [-r] <volume>@<name>`
//! - destroy: `zfs destroy [-r] <volume>@<name>`, once per snapshot
//!
//! Recursive operations act on the whole dataset subtree. Children are not
//! evaluated against their own history when a parent is managed recursively.

pub mod commands;

use async_trait::async_trait;

use crate::errors::StoreError;

pub use commands::{find_in_path, ZfsCommandStore};

/// Command surface of the storage engine.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Names (without the `volume@` part) of all snapshots of `volume`,
    /// including ones the naming codec does not recognise.
    async fn list(&self, volume: &str) -> Result<Vec<String>, StoreError>;

    async fn create(&self, volume: &str, name: &str, recursive: bool) -> Result<(), StoreError>;

    /// Destroys `names` of `volume`. An empty slice is a no-op.
    ///
    /// A snapshot that cannot be destroyed must not keep the others from
    /// being destroyed; the ones left behind are reported through
    /// [`StoreError::DestroyIncomplete`].
    async fn destroy(&self, volume: &str, names: &[String], recursive: bool) -> Result<(), StoreError>;
}
