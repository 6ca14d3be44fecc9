//! Seams to the systems the engine reads from and writes back to.
//!
//! RULE: the engine never talks to a store. Callers fetch through these
//! traits, run `reconcile`, and write changes back through `QuotaWriter`.

use crate::{
    error::{StaffingError, StaffingResult},
    model::{EmployeeRecord, QuotaIdentity, QuotaLine},
};

pub trait RosterSource {
    /// Current roster, terminated employees already removed.
    fn fetch_roster(&self, facility_filter: Option<&str>) -> StaffingResult<Vec<EmployeeRecord>>;
}

pub trait QuotaSource {
    fn fetch_quota_lines(&self, cost_center_filter: Option<&str>) -> StaffingResult<Vec<QuotaLine>>;
}

pub trait QuotaWriter {
    /// Set the target of a quota line: update by id, or by the natural
    /// (role, cost center) pair, inserting when no line exists yet.
    /// Repeating a call leaves the store unchanged.
    fn upsert_quota_target(&self, identity: &QuotaIdentity, target: u32) -> StaffingResult<()>;

    /// Flag a quota line archived or not. For a natural identity the
    /// line is told apart from its siblings by its normalized hours.
    fn set_archived(
        &self,
        identity: &QuotaIdentity,
        hours: Option<&str>,
        archived: bool,
    ) -> StaffingResult<()>;
}

/// Optional narrowing applied at fetch time.
#[derive(Debug, Clone, Default)]
pub struct FetchFilter {
    pub facility: Option<String>,
    pub cost_center: Option<String>,
}

/// Fetch roster and quota lines concurrently. Both must succeed; the
/// first error is returned as-is and nothing is reconciled.
///
/// The roster source is borrowed exclusively so it can move to the
/// fetch thread without being `Sync` (a SQLite connection is not).
pub fn fetch_inputs<R, Q>(
    roster_source: &mut R,
    quota_source: &Q,
    filter: &FetchFilter,
) -> StaffingResult<(Vec<EmployeeRecord>, Vec<QuotaLine>)>
where
    R: RosterSource + Send,
    Q: QuotaSource,
{
    std::thread::scope(|scope| {
        let roster_handle =
            scope.spawn(move || roster_source.fetch_roster(filter.facility.as_deref()));
        let quota_lines = quota_source.fetch_quota_lines(filter.cost_center.as_deref());
        let roster = roster_handle
            .join()
            .map_err(|_| StaffingError::FetchFailed {
                source_name: "roster".into(),
                reason: "fetch thread panicked".into(),
            })??;
        let quota_lines = quota_lines?;
        log::debug!(
            "fetched {} employees and {} quota lines",
            roster.len(),
            quota_lines.len()
        );
        Ok((roster, quota_lines))
    })
}
