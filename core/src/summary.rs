//! Facility rollup of reconciled records.
//!
//! Archived records are left out. A facility is in deficit if any of its
//! lines is, otherwise in surplus if any line is, otherwise balanced.
//! Facilities sort by that status (deficit first) and then by name.

use crate::model::{ReconciliationRecord, StaffingStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilitySummary {
    pub facility_name: String,
    pub target: u64,
    pub active: u64,
    pub inactive: u64,
    pub status: StaffingStatus,
    pub lines: usize,
    pub deficit_lines: usize,
}

impl FacilitySummary {
    pub fn balance(&self) -> i64 {
        (self.active + self.inactive) as i64 - self.target as i64
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub target: u64,
    pub active: u64,
    pub inactive: u64,
}

impl Totals {
    pub fn balance(&self) -> i64 {
        (self.active + self.inactive) as i64 - self.target as i64
    }
}

pub fn summarize_by_facility<'r, I>(records: I) -> Vec<FacilitySummary>
where
    I: IntoIterator<Item = &'r ReconciliationRecord>,
{
    let mut by_facility: BTreeMap<&str, Vec<&ReconciliationRecord>> = BTreeMap::new();
    for record in records.into_iter().filter(|r| !r.archived) {
        by_facility
            .entry(record.facility_name.as_str())
            .or_default()
            .push(record);
    }

    let mut summaries: Vec<FacilitySummary> = by_facility
        .into_iter()
        .map(|(facility, lines)| FacilitySummary {
            facility_name: facility.to_string(),
            target: lines.iter().map(|r| u64::from(r.target)).sum(),
            active: lines.iter().map(|r| u64::from(r.active_count)).sum(),
            inactive: lines.iter().map(|r| u64::from(r.inactive_count)).sum(),
            status: worst_status(lines.iter().map(|r| r.status)),
            lines: lines.len(),
            deficit_lines: lines
                .iter()
                .filter(|r| r.status == StaffingStatus::Deficit)
                .count(),
        })
        .collect();

    summaries.sort_by(|a, b| {
        a.status
            .rank()
            .cmp(&b.status.rank())
            .then_with(|| a.facility_name.cmp(&b.facility_name))
    });
    summaries
}

fn worst_status(statuses: impl Iterator<Item = StaffingStatus>) -> StaffingStatus {
    statuses
        .min_by_key(|s| s.rank())
        .unwrap_or(StaffingStatus::Balanced)
}

pub fn totals(summaries: &[FacilitySummary]) -> Totals {
    summaries.iter().fold(Totals::default(), |acc, s| Totals {
        target: acc.target + s.target,
        active: acc.active + s.active,
        inactive: acc.inactive + s.inactive,
    })
}

/// Narrow a rollup by status and by a case-insensitive substring of the
/// facility name. An empty search matches everything.
pub fn filter_summaries<'s>(
    summaries: &'s [FacilitySummary],
    status: Option<StaffingStatus>,
    search: &str,
) -> Vec<&'s FacilitySummary> {
    let needle = search.trim().to_lowercase();
    summaries
        .iter()
        .filter(|s| status.map_or(true, |st| s.status == st))
        .filter(|s| s.facility_name.to_lowercase().contains(&needle))
        .collect()
}
