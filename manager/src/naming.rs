//! Snapshot naming codec
//!
//! A managed snapshot is named `{prefix}{YYYYMMDD}`, so at most one managed
//! snapshot per volume and calendar day exists under a given prefix. Names
//! carrying any other prefix are never decoded and therefore never touched.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

const DATE_DIGITS: usize = 8;

/// A snapshot name together with the calendar day it encodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotRecord {
    pub name: String,
    pub created_at: NaiveDate,
}

/// Builds the snapshot name for `date` under `prefix`.
pub fn encode(prefix: &str, date: NaiveDate) -> String {
    format!(
        "{}{:04}{:02}{:02}",
        prefix,
        date.year(),
        date.month(),
        date.day()
    )
}

/// Decodes `name` under `prefix`.
///
/// Returns `None` when the prefix does not match literally or the remainder
/// is not exactly eight digits forming a valid calendar date.
pub fn decode(prefix: &str, name: &str) -> Option<SnapshotRecord> {
    let digits = name.strip_prefix(prefix)?;
    if digits.len() != DATE_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let year = digits[0..4].parse::<i32>().ok()?;
    let month = digits[4..6].parse::<u32>().ok()?;
    let day = digits[6..8].parse::<u32>().ok()?;

    NaiveDate::from_ymd_opt(year, month, day).map(|created_at| SnapshotRecord {
        name: name.to_string(),
        created_at,
    })
}

/// Splits a listing into decodable records and names left unmanaged under `prefix`.
///
/// Input order is preserved in both outputs.
pub fn decode_all<I, S>(prefix: &str, names: I) -> (Vec<SnapshotRecord>, Vec<String>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut records = Vec::new();
    let mut unmanaged = Vec::new();

    for name in names {
        let name = name.as_ref();
        match decode(prefix, name) {
            Some(record) => records.push(record),
            None => unmanaged.push(name.to_string()),
        }
    }

    (records, unmanaged)
}
