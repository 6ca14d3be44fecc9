//! In-memory reconciled view with optimistic write-back.
//!
//! Every change follows the same scoped sequence:
//!   1. snapshot the records
//!   2. apply the change in memory
//!   3. commit through the `QuotaWriter`
//!   4. on error restore the snapshot and return the error
//! Callers never observe a half-applied change.

use crate::{
    error::StaffingResult,
    model::{QuotaIdentity, ReconciliationRecord},
    source::QuotaWriter,
};

#[derive(Debug, Clone, Default)]
pub struct StaffingBoard {
    records: Vec<ReconciliationRecord>,
}

impl StaffingBoard {
    pub fn new(records: Vec<ReconciliationRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ReconciliationRecord] {
        &self.records
    }

    /// Records not archived, the dashboard's default view.
    pub fn active_records(&self) -> impl Iterator<Item = &ReconciliationRecord> {
        self.records.iter().filter(|r| !r.archived)
    }

    /// Swap in the output of a fresh run.
    pub fn replace(&mut self, records: Vec<ReconciliationRecord>) {
        self.records = records;
    }

    pub fn into_records(self) -> Vec<ReconciliationRecord> {
        self.records
    }

    /// Set a new target on every record the identity addresses, then
    /// persist it. Returns how many records changed.
    ///
    /// A natural identity addresses every id-less record of the (role,
    /// cost center) pair, whatever its hours, and the store keeps one
    /// hours-less line for it. After a reload that line claims only the
    /// group the fallback match picks; sibling shifts return as
    /// zero-target residuals.
    pub fn update_target<W: QuotaWriter + ?Sized>(
        &mut self,
        writer: &W,
        identity: &QuotaIdentity,
        target: u32,
    ) -> StaffingResult<usize> {
        self.optimistic(
            |record| {
                if !identity.addresses(record) {
                    return false;
                }
                record.retarget(target);
                true
            },
            || writer.upsert_quota_target(identity, target),
        )
    }

    /// Flag a line archived. `hours` picks the line among natural-identity
    /// siblings; it is ignored when the identity is an id.
    pub fn archive<W: QuotaWriter + ?Sized>(
        &mut self,
        writer: &W,
        identity: &QuotaIdentity,
        hours: Option<&str>,
    ) -> StaffingResult<usize> {
        self.set_archived(writer, identity, hours, true)
    }

    pub fn unarchive<W: QuotaWriter + ?Sized>(
        &mut self,
        writer: &W,
        identity: &QuotaIdentity,
        hours: Option<&str>,
    ) -> StaffingResult<usize> {
        self.set_archived(writer, identity, hours, false)
    }

    fn set_archived<W: QuotaWriter + ?Sized>(
        &mut self,
        writer: &W,
        identity: &QuotaIdentity,
        hours: Option<&str>,
        archived: bool,
    ) -> StaffingResult<usize> {
        let by_id = matches!(identity, QuotaIdentity::Id(_));
        self.optimistic(
            |record| {
                let same_line = identity.addresses(record)
                    && (by_id || record.display_hours.as_deref() == hours);
                if !same_line {
                    return false;
                }
                record.archived = archived;
                true
            },
            || writer.set_archived(identity, hours, archived),
        )
    }

    fn optimistic<A, C>(&mut self, mut apply: A, commit: C) -> StaffingResult<usize>
    where
        A: FnMut(&mut ReconciliationRecord) -> bool,
        C: FnOnce() -> StaffingResult<()>,
    {
        let snapshot = self.records.clone();
        let touched = self
            .records
            .iter_mut()
            .fold(0, |n, record| if apply(record) { n + 1 } else { n });

        match commit() {
            Ok(()) => Ok(touched),
            Err(e) => {
                log::warn!("write-back failed, reverting {touched} record(s): {e}");
                self.records = snapshot;
                Err(e)
            }
        }
    }
}
