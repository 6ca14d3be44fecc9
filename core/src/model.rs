//! Input and output records of a reconciliation run.

use crate::{
    hours::HoursValue,
    types::QuotaId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One employee as fetched from the roster source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub name: String,
    pub role: Option<String>,
    pub cost_center: Option<String>,
    pub facility_name: Option<String>,
    pub admission_date: Option<NaiveDate>,
    /// Free text, e.g. "01-ATIVO" or "AFASTADO".
    pub employment_status: Option<String>,
    pub weekly_hours: Option<HoursValue>,
}

/// A staffing target for a role in a cost center, optionally per shift length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotaLine {
    /// `None` until the line has been persisted.
    pub id: Option<QuotaId>,
    pub role: String,
    pub cost_center: String,
    pub target_active_count: u32,
    pub weekly_hours: Option<HoursValue>,
    pub notes: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

impl QuotaLine {
    /// How this line is addressed when writing back to the store.
    pub fn identity(&self) -> QuotaIdentity {
        match self.id {
            Some(id) => QuotaIdentity::Id(id),
            None => QuotaIdentity::natural(&self.role, &self.cost_center),
        }
    }
}

/// Address of a quota line in the store: by primary key, or by the
/// natural (role, cost center) pair for lines not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaIdentity {
    Id(QuotaId),
    Natural { role: String, cost_center: String },
}

impl QuotaIdentity {
    /// Natural identity with both parts trimmed.
    pub fn natural(role: &str, cost_center: &str) -> Self {
        QuotaIdentity::Natural {
            role: role.trim().to_string(),
            cost_center: cost_center.trim().to_string(),
        }
    }

    /// Whether a reconciled record is the one this identity addresses.
    pub fn addresses(&self, record: &ReconciliationRecord) -> bool {
        match self {
            QuotaIdentity::Id(id) => record.quota_id == Some(*id),
            QuotaIdentity::Natural { role, cost_center } => {
                record.quota_id.is_none()
                    && record.role.trim() == role
                    && record.cost_center.trim() == cost_center
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffingStatus {
    Deficit,
    Surplus,
    Balanced,
}

impl StaffingStatus {
    /// Status is fully determined by the sign of the balance.
    pub fn from_balance(balance: i64) -> Self {
        match balance.signum() {
            -1 => StaffingStatus::Deficit,
            1 => StaffingStatus::Surplus,
            _ => StaffingStatus::Balanced,
        }
    }

    /// Display urgency: deficits first, balanced last.
    pub fn rank(self) -> u8 {
        match self {
            StaffingStatus::Deficit => 0,
            StaffingStatus::Surplus => 1,
            StaffingStatus::Balanced => 2,
        }
    }
}

impl fmt::Display for StaffingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaffingStatus::Deficit => write!(f, "DEFICIT"),
            StaffingStatus::Surplus => write!(f, "SURPLUS"),
            StaffingStatus::Balanced => write!(f, "OK"),
        }
    }
}

/// One line of reconciled output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationRecord {
    /// `None` for residual groups and for quota lines not yet persisted.
    pub quota_id: Option<QuotaId>,
    pub role: String,
    pub facility_name: String,
    pub cost_center: String,
    pub target: u32,
    pub active_count: u32,
    pub inactive_count: u32,
    pub balance: i64,
    pub status: StaffingStatus,
    /// Normalized hours shown for the line; `None` when unknown.
    pub display_hours: Option<String>,
    pub member_employees: Vec<EmployeeRecord>,
    pub notes: Option<String>,
    pub archived: bool,
    pub origin: RecordOrigin,
}

/// Where a reconciled record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrigin {
    /// A quota line, matched to a roster group or to nobody.
    Quota,
    /// A roster group no quota line claimed.
    Residual,
}

impl ReconciliationRecord {
    pub fn headcount(&self) -> u32 {
        self.active_count + self.inactive_count
    }

    /// Replace the target and re-derive balance and status.
    pub fn retarget(&mut self, target: u32) {
        self.target = target;
        self.balance = i64::from(self.headcount()) - i64::from(target);
        self.status = StaffingStatus::from_balance(self.balance);
    }

    pub fn is_residual(&self) -> bool {
        self.origin == RecordOrigin::Residual
    }
}
