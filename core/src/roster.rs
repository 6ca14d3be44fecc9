//! Roster grouping.
//!
//! Partitions the roster by (cost center, role, normalized hours) in a
//! single pass. Every record lands in exactly one group and keeps its
//! roster order inside the group. Groups iterate in key order, so any
//! walk over the index is deterministic regardless of input order.

use crate::{
    hours::{normalize_hours, HoursToken},
    model::EmployeeRecord,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Composite matching key. Cost center and role are stored trimmed;
/// a missing value is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub cost_center: String,
    pub role: String,
    pub hours: HoursToken,
}

impl GroupKey {
    pub fn new(cost_center: Option<&str>, role: Option<&str>, hours: HoursToken) -> Self {
        Self {
            cost_center: cost_center.map(str::trim).unwrap_or_default().to_string(),
            role: role.map(str::trim).unwrap_or_default().to_string(),
            hours,
        }
    }

    pub fn for_employee(employee: &EmployeeRecord) -> Self {
        Self::new(
            employee.cost_center.as_deref(),
            employee.role.as_deref(),
            normalize_hours(employee.weekly_hours.as_ref()),
        )
    }

    /// Same cost center and role, any hours.
    pub fn same_position(&self, cost_center: &str, role: &str) -> bool {
        self.cost_center == cost_center && self.role == role
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.cost_center, self.role, self.hours)
    }
}

/// The group index for one reconciliation run. Borrows the roster.
#[derive(Debug, Default)]
pub struct RosterIndex<'a> {
    groups: BTreeMap<GroupKey, Vec<&'a EmployeeRecord>>,
}

impl<'a> RosterIndex<'a> {
    pub fn build(roster: &'a [EmployeeRecord]) -> Self {
        let mut groups: BTreeMap<GroupKey, Vec<&'a EmployeeRecord>> = BTreeMap::new();
        for employee in roster {
            groups
                .entry(GroupKey::for_employee(employee))
                .or_default()
                .push(employee);
        }
        log::debug!(
            "roster index: {} employees in {} groups",
            roster.len(),
            groups.len()
        );
        Self { groups }
    }

    pub fn get(&self, key: &GroupKey) -> Option<&[&'a EmployeeRecord]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &GroupKey) -> bool {
        self.groups.contains_key(key)
    }

    /// All groups for a (cost center, role) pair, in key order.
    /// Inputs are expected trimmed.
    pub fn same_position<'s>(
        &'s self,
        cost_center: &'s str,
        role: &'s str,
    ) -> impl Iterator<Item = (&'s GroupKey, &'s [&'a EmployeeRecord])> + 's {
        let floor = GroupKey {
            cost_center: cost_center.to_string(),
            role: role.to_string(),
            hours: HoursToken::lowest(),
        };
        self.groups
            .range(floor..)
            .take_while(move |(key, _)| key.same_position(cost_center, role))
            .map(|(key, members)| (key, members.as_slice()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &[&'a EmployeeRecord])> {
        self.groups
            .iter()
            .map(|(key, members)| (key, members.as_slice()))
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of employees across all groups.
    pub fn member_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}
