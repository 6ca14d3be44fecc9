//! Residual groups: roster groups no quota line claimed.
//!
//! Each one becomes a synthetic line with a zero target. Any staffed
//! group is above a zero target, so residuals are always surplus.

use crate::{
    classify::{resolve_facility, Classified, Disposition, Headcount},
    config::StaffingConfig,
    matcher::ConsumedKeys,
    model::{RecordOrigin, ReconciliationRecord, StaffingStatus},
    roster::RosterIndex,
};

/// Emit a record for every group not in `consumed`, in key order.
pub fn surface_residuals(
    index: &RosterIndex<'_>,
    consumed: &ConsumedKeys,
    config: &StaffingConfig,
) -> Vec<Classified> {
    index
        .iter()
        .filter(|(key, _)| !consumed.is_consumed(key))
        .map(|(key, members)| {
            let headcount = Headcount::count(members, config);
            let balance = headcount.balance(0);
            let facility_name = resolve_facility(members, None, config);
            let disposition = if config.is_excluded(&facility_name) {
                Disposition::ExcludedFacility
            } else {
                Disposition::Emit
            };

            let role = or_label(&key.role, &config.unknown_role_label);
            let cost_center = or_label(&key.cost_center, &config.unknown_cost_center_label);

            Classified {
                record: ReconciliationRecord {
                    quota_id: None,
                    role,
                    facility_name,
                    cost_center,
                    target: 0,
                    active_count: headcount.active,
                    inactive_count: headcount.inactive,
                    balance,
                    status: StaffingStatus::Surplus,
                    display_hours: key.hours.known().map(str::to_string),
                    member_employees: members.iter().map(|e| (*e).clone()).collect(),
                    notes: None,
                    archived: false,
                    origin: RecordOrigin::Residual,
                },
                disposition,
            }
        })
        .collect()
}

fn or_label(value: &str, label: &str) -> String {
    if value.is_empty() {
        label.to_string()
    } else {
        value.to_string()
    }
}
