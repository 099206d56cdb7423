// File: manager/src/zfs/commands.rs
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command as AsyncCommand;
use tracing::{debug, warn};

use super::SnapshotStore;
use crate::constants::zfs::{BINARY, SNAPSHOT_SEPARATOR};
use crate::errors::StoreError;

/// Runs a program with arguments and returns its stdout.
pub async fn execute_command(program: &str, args: &[String]) -> Result<String, StoreError> {
    let command_line = render_command(program, args);
    debug!("Running command: {}", command_line);

    let output = AsyncCommand::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| StoreError::SpawnFailed {
            command: command_line.clone(),
            reason: e.to_string(),
        })?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if output.status.success() {
        Ok(stdout)
    } else {
        let error_msg = if !stderr.trim().is_empty() { stderr } else { stdout };
        Err(StoreError::CommandFailed {
            command: command_line,
            status: output.status.code().unwrap_or(-1),
            stderr: error_msg.trim().to_string(),
        })
    }
}

fn render_command(program: &str, args: &[String]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves `binary` against the directories in `PATH`.
pub fn find_in_path(binary: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    find_in_dirs(binary, std::env::split_paths(&paths))
}

/// First executable file named `binary` in `dirs`.
pub fn find_in_dirs<I>(binary: &str, dirs: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    dirs.into_iter()
        .map(|dir| dir.join(binary))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

pub fn list_args(volume: &str) -> Vec<String> {
    ["list", "-H", "-t", "snapshot", "-o", "name", "-d", "1", volume]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn snapshot_args(volume: &str, name: &str, recursive: bool) -> Vec<String> {
    let mut args = vec!["snapshot".to_string()];
    if recursive {
        args.push("-r".to_string());
    }
    args.push(format!("{}{}{}", volume, SNAPSHOT_SEPARATOR, name));
    args
}

/// A `vol@a,b,c` batch fails as a whole, so snapshots are destroyed one at a time.
pub fn destroy_args(volume: &str, name: &str, recursive: bool) -> Vec<String> {
    let mut args = vec!["destroy".to_string()];
    if recursive {
        args.push("-r".to_string());
    }
    args.push(format!("{}{}{}", volume, SNAPSHOT_SEPARATOR, name));
    args
}

/// Extracts the snapshot names of `volume` from `zfs list -H -o name` output.
///
/// Lines for other datasets (descendants included) are skipped.
pub fn parse_list_output(volume: &str, stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter_map(|line| line.split_once(SNAPSHOT_SEPARATOR))
        .filter(|(dataset, name)| *dataset == volume && !name.is_empty())
        .map(|(_, name)| name.to_string())
        .collect()
}

/// [`SnapshotStore`] backed by the `zfs` command line tool.
#[derive(Debug, Clone)]
pub struct ZfsCommandStore {
    program: String,
    leading_args: Vec<String>,
}

impl ZfsCommandStore {
    pub fn new() -> Self {
        Self {
            program: BINARY.to_string(),
            leading_args: Vec::new(),
        }
    }

    /// Invokes zfs through another program, e.g. `sudo zfs`.
    pub fn with_command(program: impl Into<String>, leading_args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            leading_args,
        }
    }

    async fn run(&self, args: Vec<String>) -> Result<String, StoreError> {
        let mut full_args = self.leading_args.clone();
        full_args.extend(args);
        execute_command(&self.program, &full_args).await
    }
}

impl Default for ZfsCommandStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotStore for ZfsCommandStore {
    async fn list(&self, volume: &str) -> Result<Vec<String>, StoreError> {
        let stdout = self.run(list_args(volume)).await?;
        Ok(parse_list_output(volume, &stdout))
    }

    async fn create(&self, volume: &str, name: &str, recursive: bool) -> Result<(), StoreError> {
        self.run(snapshot_args(volume, name, recursive)).await?;
        Ok(())
    }

    async fn destroy(&self, volume: &str, names: &[String], recursive: bool) -> Result<(), StoreError> {
        let mut failed = Vec::new();
        let mut reasons = Vec::new();

        for name in names {
            if let Err(e) = self.run(destroy_args(volume, name, recursive)).await {
                warn!("Could not destroy {}{}{}: {}", volume, SNAPSHOT_SEPARATOR, name, e);
                failed.push(name.clone());
                reasons.push(e.to_string());
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(StoreError::DestroyIncomplete {
                volume: volume.to_string(),
                failed,
                reason: reasons.join("; "),
            })
        }
    }
}
