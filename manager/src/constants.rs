//! Defaults and process exit codes

/// Policy values used when neither the global section nor a dataset entry sets them
pub mod defaults {
    /// Monthly snapshots are taken on the first of the month
    pub const DAY_OF_MONTH: u32 = 1;

    /// Weekly snapshots are taken on Sunday (0 = Sunday .. 6 = Saturday)
    pub const DAY_OF_WEEK: u32 = 0;

    pub const RECURSIVE: bool = true;
    pub const KEEP_DAYS: u32 = 0;
    pub const KEEP_WEEKS: u32 = 0;
    pub const KEEP_MONTHS: u32 = 0;
    pub const SNAPSHOT_PREFIX: &str = "";
}

/// Accepted ranges for the candidate-day fields
pub mod limits {
    pub const MIN_DAY_OF_MONTH: u32 = 1;
    pub const MAX_DAY_OF_MONTH: u32 = 31;
    pub const MAX_DAY_OF_WEEK: u32 = 6;
}

/// Process exit codes of the binary
pub mod exit_codes {
    pub const SUCCESS: u8 = 0;

    /// Config file unreadable, unparsable, or bad logging level
    pub const CONFIG_LOAD_FAILED: u8 = 1;

    /// `zfs` is not on PATH
    pub const ZFS_NOT_FOUND: u8 = 2;

    /// A dataset entry or policy field is missing or out of range
    pub const INVALID_DATASET_CONFIG: u8 = 3;
}

/// Settings for the zfs command interface
pub mod zfs {
    pub const BINARY: &str = "zfs";

    /// Separates the dataset from the snapshot name in a full identifier
    pub const SNAPSHOT_SEPARATOR: char = '@';
}
