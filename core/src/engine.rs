//! The reconciliation engine — quota lines against the roster.
//!
//! PIPELINE (fixed order, one pass each):
//!   1. Roster grouper   builds the group index
//!   2. Quota matcher    claims one group per quota line
//!   3. Classifier       counts, balance and status per quota line
//!   4. Residual pass    every unclaimed group becomes a zero-target line
//!
//! RULES:
//!   - The engine is pure: no I/O, inputs are never mutated.
//!   - Bad domain data never fails a run; it takes the unmatched path.
//!   - Every roster record ends up in exactly one record, emitted or
//!     withheld.

use crate::{
    classify::{classify_quota, Classified, Disposition},
    config::StaffingConfig,
    matcher::{match_quotas, MatchKind},
    model::{EmployeeRecord, QuotaLine, ReconciliationRecord},
    residual::surface_residuals,
    roster::RosterIndex,
};
use serde::{Deserialize, Serialize};

/// Counters describing one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub roster_size: usize,
    pub groups: usize,
    pub quota_lines: usize,
    pub exact_matches: usize,
    pub fallback_matches: usize,
    pub unmatched_quotas: usize,
    pub claim_conflicts: usize,
    pub residual_groups: usize,
    pub withheld: usize,
}

/// Full result of a run: emitted records plus the ones withheld by the
/// exclusion list or the archive filter.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationRun {
    pub records: Vec<ReconciliationRecord>,
    pub withheld: Vec<Classified>,
    pub stats: RunStats,
}

impl ReconciliationRun {
    /// All records, emitted first then withheld.
    pub fn all_records(&self) -> impl Iterator<Item = &ReconciliationRecord> {
        self.records
            .iter()
            .chain(self.withheld.iter().map(|c| &c.record))
    }
}

pub struct ReconciliationEngine {
    config: StaffingConfig,
}

impl ReconciliationEngine {
    pub fn new(config: StaffingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StaffingConfig {
        &self.config
    }

    pub fn run(&self, roster: &[EmployeeRecord], quotas: &[QuotaLine]) -> ReconciliationRun {
        if quotas.is_empty() {
            log::warn!("no quota lines; every roster group will surface as residual");
        }

        let index = RosterIndex::build(roster);
        let (matches, consumed) = match_quotas(&index, quotas);

        let mut stats = RunStats {
            roster_size: roster.len(),
            groups: index.len(),
            quota_lines: quotas.len(),
            ..RunStats::default()
        };
        let mut run = ReconciliationRun::default();

        for (quota, quota_match) in quotas.iter().zip(&matches) {
            match quota_match.kind {
                MatchKind::Exact => stats.exact_matches += 1,
                MatchKind::SoleCandidate | MatchKind::MostPopulous { .. } => {
                    stats.fallback_matches += 1
                }
                MatchKind::AlreadyClaimed => stats.claim_conflicts += 1,
                MatchKind::Unmatched => stats.unmatched_quotas += 1,
            }
            let members = quota_match
                .key
                .as_ref()
                .and_then(|key| index.get(key))
                .unwrap_or(&[]);
            route(&mut run, classify_quota(quota, quota_match, members, &self.config));
        }

        for classified in surface_residuals(&index, &consumed, &self.config) {
            stats.residual_groups += 1;
            route(&mut run, classified);
        }

        stats.withheld = run.withheld.len();
        log::debug!(
            "reconciled {} employees / {} quota lines: {} records, {} withheld, {} residual",
            stats.roster_size,
            stats.quota_lines,
            run.records.len(),
            stats.withheld,
            stats.residual_groups
        );
        run.stats = stats;
        run
    }
}

fn route(run: &mut ReconciliationRun, classified: Classified) {
    match classified.disposition {
        Disposition::Emit => run.records.push(classified.record),
        Disposition::ExcludedFacility | Disposition::Archived => run.withheld.push(classified),
    }
}

/// Reconcile a roster against quota lines and return the emitted records.
pub fn reconcile(
    roster: &[EmployeeRecord],
    quotas: &[QuotaLine],
    config: &StaffingConfig,
) -> Vec<ReconciliationRecord> {
    ReconciliationEngine::new(config.clone())
        .run(roster, quotas)
        .records
}
