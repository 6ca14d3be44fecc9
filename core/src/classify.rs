//! Headcount classification of matched quota lines.

use crate::{
    config::StaffingConfig,
    hours::normalize_hours,
    matcher::QuotaMatch,
    model::{EmployeeRecord, QuotaLine, RecordOrigin, ReconciliationRecord, StaffingStatus},
};

/// Active / inactive split of a group's members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Headcount {
    pub active: u32,
    pub inactive: u32,
}

impl Headcount {
    /// Members whose status carries the active token are active;
    /// everyone else, including a missing status, is inactive.
    pub fn count(members: &[&EmployeeRecord], config: &StaffingConfig) -> Self {
        members.iter().fold(Headcount::default(), |mut acc, e| {
            if config.is_active_status(e.employment_status.as_deref()) {
                acc.active += 1;
            } else {
                acc.inactive += 1;
            }
            acc
        })
    }

    pub fn total(&self) -> u32 {
        self.active + self.inactive
    }

    /// Signed difference between occupied seats and the target.
    pub fn balance(&self, target: u32) -> i64 {
        i64::from(self.total()) - i64::from(target)
    }
}

/// What happens to a classified record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Emit,
    /// The facility is on the exclusion list.
    ExcludedFacility,
    /// The quota line is archived and archived lines are not emitted.
    Archived,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub record: ReconciliationRecord,
    pub disposition: Disposition,
}

/// First member's facility, else the fallback (trimmed, non-blank),
/// else the configured unknown-unit label.
pub fn resolve_facility(
    members: &[&EmployeeRecord],
    fallback: Option<&str>,
    config: &StaffingConfig,
) -> String {
    members
        .first()
        .and_then(|e| e.facility_name.as_deref())
        .filter(|f| !f.trim().is_empty())
        .or_else(|| fallback.map(str::trim).filter(|f| !f.is_empty()))
        .unwrap_or(config.unknown_unit_label.as_str())
        .to_string()
}

/// Build the record for one quota line and the members it matched
/// (empty when the line matched nothing).
pub fn classify_quota(
    quota: &QuotaLine,
    quota_match: &QuotaMatch,
    members: &[&EmployeeRecord],
    config: &StaffingConfig,
) -> Classified {
    let headcount = Headcount::count(members, config);
    let target = quota.target_active_count;
    let balance = headcount.balance(target);
    let facility_name = resolve_facility(members, Some(&quota.cost_center), config);

    // Quota hours when known, else whatever the matched members work.
    let display_hours = match quota_match.quota_hours.known() {
        Some(h) => Some(h.to_string()),
        None => members
            .first()
            .map(|e| normalize_hours(e.weekly_hours.as_ref()))
            .and_then(|h| h.known().map(str::to_string)),
    };

    let disposition = if config.is_excluded(&facility_name) {
        Disposition::ExcludedFacility
    } else if quota.archived && !config.include_archived {
        Disposition::Archived
    } else {
        Disposition::Emit
    };

    Classified {
        record: ReconciliationRecord {
            quota_id: quota.id,
            role: quota.role.clone(),
            facility_name,
            cost_center: quota.cost_center.clone(),
            target,
            active_count: headcount.active,
            inactive_count: headcount.inactive,
            balance,
            status: StaffingStatus::from_balance(balance),
            display_hours,
            member_employees: members.iter().map(|e| (*e).clone()).collect(),
            notes: quota.notes.clone(),
            archived: quota.archived,
            origin: RecordOrigin::Quota,
        },
        disposition,
    }
}
