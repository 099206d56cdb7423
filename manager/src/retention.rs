//! Retention engine
//!
//! Decides, for one volume, whether today's snapshot must be created and
//! which existing managed snapshots must be destroyed.
//!
//! # Tiers
//!
//! Every snapshot is a Daily candidate. Snapshots taken on the configured
//! weekday are also Weekly candidates, and snapshots taken on the configured
//! day of the month are also Monthly candidates. Each tier keeps its newest
//! `keep_*` candidates; counts are in candidates, not in elapsed calendar
//! time. A snapshot survives if any tier keeps it.
//!
//! # Today's snapshot
//!
//! When today's snapshot does not exist yet it is ranked as if it had already
//! been created, so the decision is the one a create-then-prune run reaches.
//! A preview therefore lists the same deletions a real run performs. Today's
//! snapshot, pending or existing, is never scheduled for destruction.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::errors::ConfigError;
use crate::naming::{self, SnapshotRecord};
use crate::policy::RetentionPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Daily,
    Weekly,
    Monthly,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Daily, Tier::Weekly, Tier::Monthly];

    /// Whether a snapshot taken on `date` is a candidate for this tier.
    pub fn qualifies(self, date: NaiveDate, policy: &RetentionPolicy) -> bool {
        match self {
            Tier::Daily => true,
            Tier::Weekly => date.weekday().num_days_from_sunday() == policy.day_of_week,
            Tier::Monthly => date.day() == policy.day_of_month,
        }
    }

    pub fn keep_count(self, policy: &RetentionPolicy) -> usize {
        let count = match self {
            Tier::Daily => policy.keep_days,
            Tier::Weekly => policy.keep_weeks,
            Tier::Monthly => policy.keep_months,
        };
        count as usize
    }
}

/// Names kept by each tier, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TierSurvivors {
    pub daily: Vec<String>,
    pub weekly: Vec<String>,
    pub monthly: Vec<String>,
}

impl TierSurvivors {
    pub fn get(&self, tier: Tier) -> &[String] {
        match tier {
            Tier::Daily => &self.daily,
            Tier::Weekly => &self.weekly,
            Tier::Monthly => &self.monthly,
        }
    }

    fn slot_mut(&mut self, tier: Tier) -> &mut Vec<String> {
        match tier {
            Tier::Daily => &mut self.daily,
            Tier::Weekly => &mut self.weekly,
            Tier::Monthly => &mut self.monthly,
        }
    }

    /// Whether any tier keeps `name`.
    pub fn contains(&self, name: &str) -> bool {
        Tier::ALL
            .iter()
            .any(|tier| self.get(*tier).iter().any(|kept| kept == name))
    }
}

/// Outcome of evaluating one volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    /// Today's managed snapshot under the policy prefix
    pub today: SnapshotRecord,
    /// True when `today` is not in the history yet
    pub to_create: bool,
    /// Snapshots to destroy, in history order
    pub to_destroy: Vec<String>,
    pub survivors: TierSurvivors,
}

/// Evaluates the retention policy for one volume.
///
/// `history` must contain only records decoded under `policy.snapshot_prefix`;
/// the engine never sees snapshots it does not manage. Records sharing a
/// creation day are ranked in input order.
///
/// A policy with an out-of-range candidate day is rejected: a weekday no
/// date falls on would leave every Weekly-only snapshot unprotected.
pub fn evaluate(
    today: NaiveDate,
    history: &[SnapshotRecord],
    policy: &RetentionPolicy,
) -> Result<Decision, ConfigError> {
    policy.validate("")?;

    let today_record = SnapshotRecord {
        name: naming::encode(&policy.snapshot_prefix, today),
        created_at: today,
    };
    let to_create = !history.iter().any(|record| record.created_at == today);

    let mut candidates: Vec<&SnapshotRecord> = history.iter().collect();
    if to_create {
        candidates.push(&today_record);
    }

    // stable: equal days keep input order
    let mut ranked: Vec<usize> = (0..candidates.len()).collect();
    ranked.sort_by(|&a, &b| candidates[b].created_at.cmp(&candidates[a].created_at));

    let mut survives = vec![false; candidates.len()];
    let mut survivors = TierSurvivors::default();

    for tier in Tier::ALL {
        let kept = ranked
            .iter()
            .copied()
            .filter(|&idx| tier.qualifies(candidates[idx].created_at, policy))
            .take(tier.keep_count(policy));

        let slot = survivors.slot_mut(tier);
        for idx in kept {
            survives[idx] = true;
            slot.push(candidates[idx].name.clone());
        }
    }

    let to_destroy = history
        .iter()
        .enumerate()
        .filter(|(idx, record)| !survives[*idx] && record.created_at != today)
        .map(|(_, record)| record.name.clone())
        .collect();

    Ok(Decision {
        today: today_record,
        to_create,
        to_destroy,
        survivors,
    })
}
