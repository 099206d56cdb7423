// File: manager/src/main.rs
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, info};

use zfs_backup_manager::config::{load_config, Config};
use zfs_backup_manager::constants::{exit_codes, zfs};
use zfs_backup_manager::logging::{init_logging, LogLevel};
use zfs_backup_manager::zfs::find_in_path;
use zfs_backup_manager::{ManagerError, RunOrchestrator, RunReport, ZfsCommandStore};

/// Manages monthly, weekly, and daily backups using ZFS snapshots
#[derive(Debug, Parser)]
#[command(name = "zfs-backup-manager", version, about)]
struct Cli {
    /// Path to configuration file
    config: PathBuf,

    /// Compute and report changes without making them. Best combined with --logging DEBUG
    #[arg(long)]
    dry_run: bool,

    /// Logging level, overrides the config file value
    #[arg(long, value_enum, ignore_case = true)]
    logging: Option<LogLevel>,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli.config).await {
        Ok(config) => config,
        Err(e) => return fail(cli.logging.unwrap_or_default(), e.into()),
    };

    let level = match cli.logging {
        Some(level) => level,
        None => match config.log_level() {
            Ok(level) => level.unwrap_or_default(),
            Err(e) => return fail(LogLevel::Critical, e.into()),
        },
    };

    if let Err(e) = init_logging(level) {
        eprintln!("{}", e);
        return ExitCode::from(exit_codes::CONFIG_LOAD_FAILED);
    }

    let report = match execute(&cli, &config).await {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to serialize run report: {}", e),
        }
    }

    // per-volume store failures are logged, not fatal
    ExitCode::from(exit_codes::SUCCESS)
}

async fn execute(cli: &Cli, config: &Config) -> Result<RunReport, ManagerError> {
    // ZfsCommandStore::new runs this same binary
    if find_in_path(zfs::BINARY).is_none() {
        return Err(ManagerError::ZfsNotFound);
    }

    let backup = config.validate()?;
    for volume in &backup.volumes {
        let policy = volume.resolve(&backup.global)?;
        debug!(
            "Parsed dataset config {}: {}",
            volume.name,
            serde_json::to_string(&policy).unwrap_or_default()
        );
    }

    if cli.dry_run {
        info!("Dry run: no snapshots will be created or destroyed");
    }

    let orchestrator = RunOrchestrator::new(Arc::new(ZfsCommandStore::new()), cli.dry_run);
    let today = Local::now().date_naive();

    Ok(orchestrator.run(&backup, today).await)
}

/// Reports an error that occurred before logging could be configured from the file.
fn fail(level: LogLevel, err: ManagerError) -> ExitCode {
    match init_logging(level) {
        Ok(()) => error!("{}", err),
        Err(_) => eprintln!("{}", err),
    }
    ExitCode::from(err.exit_code())
}
