//! Quota line → roster group matching.
//!
//! A quota line with known hours claims the group with exactly its key.
//! A quota line without hours falls back to the groups that share its
//! (cost center, role) and claims the most populous one; equal sizes are
//! broken by key order, lowest first.
//!
//! A group is claimed at most once per run. Lines with known hours are
//! matched before lines without, so a fallback can never take a group
//! that some line names exactly. Within each pass lines are matched in
//! input order. A line whose group is already claimed gets no roster.

use crate::{
    hours::{normalize_hours, HoursToken},
    model::QuotaLine,
    roster::{GroupKey, RosterIndex},
};
use std::collections::BTreeSet;

/// How a quota line found (or failed to find) its group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchKind {
    /// The quota's hours named an existing group.
    Exact,
    /// Hours unknown; exactly one group shares the position.
    SoleCandidate,
    /// Hours unknown; the largest of several candidate groups.
    MostPopulous { candidates: usize },
    /// The named group exists but an earlier line claimed it.
    AlreadyClaimed,
    /// No group qualifies.
    Unmatched,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaMatch {
    /// The quota line's own normalized hours.
    pub quota_hours: HoursToken,
    pub key: Option<GroupKey>,
    pub kind: MatchKind,
}

impl QuotaMatch {
    fn none(quota_hours: HoursToken, kind: MatchKind) -> Self {
        Self {
            quota_hours,
            key: None,
            kind,
        }
    }
}

/// Group keys claimed by quota lines during a run.
#[derive(Debug, Clone, Default)]
pub struct ConsumedKeys(BTreeSet<GroupKey>);

impl ConsumedKeys {
    /// Returns false if the key was already claimed.
    pub fn mark(&mut self, key: GroupKey) -> bool {
        self.0.insert(key)
    }

    pub fn is_consumed(&self, key: &GroupKey) -> bool {
        self.0.contains(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Matches quota lines against one roster index, tracking claims.
pub struct Matcher<'i, 'a> {
    index: &'i RosterIndex<'a>,
    consumed: ConsumedKeys,
}

impl<'i, 'a> Matcher<'i, 'a> {
    pub fn new(index: &'i RosterIndex<'a>) -> Self {
        Self {
            index,
            consumed: ConsumedKeys::default(),
        }
    }

    /// Resolve one quota line and claim its group.
    pub fn match_quota(&mut self, quota: &QuotaLine) -> QuotaMatch {
        let index = self.index;
        let hours = normalize_hours(quota.weekly_hours.as_ref());
        let cost_center = quota.cost_center.trim();
        let role = quota.role.trim();

        if hours.is_known() {
            let key = GroupKey::new(Some(cost_center), Some(role), hours.clone());
            if !index.contains(&key) {
                return QuotaMatch::none(hours, MatchKind::Unmatched);
            }
            if !self.consumed.mark(key.clone()) {
                log::debug!("quota {:?}: group {key} already claimed", quota.id);
                return QuotaMatch::none(hours, MatchKind::AlreadyClaimed);
            }
            return QuotaMatch {
                quota_hours: hours,
                key: Some(key),
                kind: MatchKind::Exact,
            };
        }

        let mut candidates: Vec<(&GroupKey, usize)> = index
            .same_position(cost_center, role)
            .filter(|(key, _)| !self.consumed.is_consumed(key))
            .map(|(key, members)| (key, members.len()))
            .collect();
        // Largest first; key order breaks ties.
        candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        let kind = match candidates.len() {
            0 => {
                let any_claimed = index.same_position(cost_center, role).next().is_some();
                let kind = if any_claimed {
                    MatchKind::AlreadyClaimed
                } else {
                    MatchKind::Unmatched
                };
                return QuotaMatch::none(hours, kind);
            }
            1 => MatchKind::SoleCandidate,
            n => MatchKind::MostPopulous { candidates: n },
        };
        let key = candidates[0].0.clone();
        self.consumed.mark(key.clone());
        QuotaMatch {
            quota_hours: hours,
            key: Some(key),
            kind,
        }
    }

    pub fn consumed(&self) -> &ConsumedKeys {
        &self.consumed
    }

    pub fn into_consumed(self) -> ConsumedKeys {
        self.consumed
    }
}

/// Match every quota line. The returned matches are aligned with
/// `quotas` by position.
pub fn match_quotas(index: &RosterIndex<'_>, quotas: &[QuotaLine]) -> (Vec<QuotaMatch>, ConsumedKeys) {
    let mut matcher = Matcher::new(index);
    let mut matches: Vec<Option<QuotaMatch>> = vec![None; quotas.len()];

    let (known, unknown): (Vec<usize>, Vec<usize>) = (0..quotas.len())
        .partition(|&i| normalize_hours(quotas[i].weekly_hours.as_ref()).is_known());

    for i in known.into_iter().chain(unknown) {
        matches[i] = Some(matcher.match_quota(&quotas[i]));
    }

    let matches = matches.into_iter().flatten().collect();
    (matches, matcher.into_consumed())
}
