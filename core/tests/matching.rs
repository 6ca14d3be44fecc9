//! Quota line → roster group matching.
//!
//! 1. Known hours match exactly, whatever spelling either side used
//! 2. Unknown hours fall back to the most populous group of the position
//! 3. Equal-size candidates break ties by key order
//! 4. A group is claimed once; exact lines win over fallbacks

use staffing_core::{
    config::StaffingConfig,
    hours::{normalize_text, HoursValue},
    matcher::{match_quotas, MatchKind},
    model::{EmployeeRecord, QuotaLine},
    reconcile,
    roster::{GroupKey, RosterIndex},
};

fn emp(name: &str, role: &str, cc: &str, hours: HoursValue) -> EmployeeRecord {
    EmployeeRecord {
        name: name.into(),
        role: Some(role.into()),
        cost_center: Some(cc.into()),
        facility_name: Some("HOSPITAL MUNICIPAL NORTE".into()),
        admission_date: None,
        employment_status: Some("01-ATIVO".into()),
        weekly_hours: Some(hours),
    }
}

fn group(prefix: &str, n: usize, role: &str, cc: &str, hours: &str) -> Vec<EmployeeRecord> {
    (0..n)
        .map(|i| emp(&format!("{prefix}{i}"), role, cc, HoursValue::from(hours)))
        .collect()
}

fn quota(id: i64, role: &str, cc: &str, hours: Option<HoursValue>) -> QuotaLine {
    QuotaLine {
        id: Some(id),
        role: role.into(),
        cost_center: cc.into(),
        target_active_count: 1,
        weekly_hours: hours,
        notes: None,
        archived: false,
    }
}

fn key(cc: &str, role: &str, hours: &str) -> GroupKey {
    GroupKey::new(Some(cc), Some(role), normalize_text(hours))
}

// ─────────────────────────────────────────────────────────────────────────────
// Exact matching
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn hour_spellings_meet_on_one_key() {
    let roster = vec![
        emp("a", "Enfermeiro", "100", HoursValue::Number(40.0)),
        emp("b", "Enfermeiro", "100", HoursValue::from("40,0")),
        emp("c", " Enfermeiro ", "100 ", HoursValue::from("40h")),
    ];
    let index = RosterIndex::build(&roster);
    assert_eq!(index.len(), 1, "all three spellings normalize to the same group");

    let (matches, consumed) = match_quotas(&index, &[quota(1, "Enfermeiro", "100", Some(HoursValue::from("40")))]);
    assert_eq!(matches[0].kind, MatchKind::Exact);
    assert_eq!(matches[0].key, Some(key("100", "Enfermeiro", "40")));
    assert_eq!(consumed.len(), 1);
}

#[test]
fn exact_miss_does_not_fall_back() {
    let roster = group("n", 3, "Enfermeiro", "100", "40");
    let index = RosterIndex::build(&roster);
    let (matches, consumed) = match_quotas(&index, &[quota(1, "Enfermeiro", "100", Some(HoursValue::from("36")))]);
    assert_eq!(matches[0].kind, MatchKind::Unmatched);
    assert!(consumed.is_empty());
}

#[test]
fn zero_hours_behave_as_unknown() {
    let mut roster = group("n", 2, "Enfermeiro", "100", "40");
    roster.extend(group("m", 5, "Enfermeiro", "100", "30"));
    let index = RosterIndex::build(&roster);
    let (matches, _) = match_quotas(&index, &[quota(1, "Enfermeiro", "100", Some(HoursValue::Number(0.0)))]);
    assert_eq!(matches[0].kind, MatchKind::MostPopulous { candidates: 2 });
    assert_eq!(matches[0].key, Some(key("100", "Enfermeiro", "30")));
}

// ─────────────────────────────────────────────────────────────────────────────
// Fallback matching
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn unknown_hours_picks_most_populous_group() {
    let mut roster = group("small", 3, "Tecnico de Enfermagem", "200", "36");
    roster.extend(group("big", 5, "Tecnico de Enfermagem", "200", "44"));
    let config = StaffingConfig::default_test();

    let records = reconcile(&roster, &[quota(1, "Tecnico de Enfermagem", "200", None)], &config);

    let matched = records.iter().find(|r| r.quota_id == Some(1)).unwrap();
    assert_eq!(matched.active_count, 5);
    assert_eq!(matched.display_hours.as_deref(), Some("44"), "hours taken from the members");
    let residual = records.iter().find(|r| r.is_residual()).unwrap();
    assert_eq!(residual.active_count, 3);
}

#[test]
fn equal_candidates_break_ties_by_key_order() {
    let mut roster = group("x", 4, "Recepcionista", "300", "44");
    roster.extend(group("y", 4, "Recepcionista", "300", "30"));
    let index = RosterIndex::build(&roster);

    let (matches, _) = match_quotas(&index, &[quota(1, "Recepcionista", "300", None)]);
    assert_eq!(matches[0].key, Some(key("300", "Recepcionista", "30")));

    // Input order does not matter.
    roster.reverse();
    let index = RosterIndex::build(&roster);
    let (matches, _) = match_quotas(&index, &[quota(1, "Recepcionista", "300", None)]);
    assert_eq!(matches[0].key, Some(key("300", "Recepcionista", "30")));
}

#[test]
fn single_candidate_is_reported_as_such() {
    let roster = group("n", 2, "Farmaceutico", "400", "40");
    let index = RosterIndex::build(&roster);
    let (matches, _) = match_quotas(&index, &[quota(1, "Farmaceutico", "400", None)]);
    assert_eq!(matches[0].kind, MatchKind::SoleCandidate);
}

#[test]
fn fallback_ignores_other_positions() {
    let roster = group("n", 2, "Farmaceutico", "400", "40");
    let index = RosterIndex::build(&roster);
    let (matches, _) = match_quotas(&index, &[quota(1, "Farmaceutico", "401", None)]);
    assert_eq!(matches[0].kind, MatchKind::Unmatched);
}

// ─────────────────────────────────────────────────────────────────────────────
// Claims
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn exact_match_beats_a_larger_sibling_group() {
    let mut roster = group("day", 2, "Enfermeiro", "100", "40");
    roster.extend(group("night", 5, "Enfermeiro", "100", "36"));
    let config = StaffingConfig::default_test();

    let records = reconcile(&roster, &[quota(1, "Enfermeiro", "100", Some(HoursValue::from("40")))], &config);

    let matched = records.iter().find(|r| r.quota_id == Some(1)).unwrap();
    assert_eq!(matched.headcount(), 2);
    assert_eq!(matched.display_hours.as_deref(), Some("40"));
    let residual = records.iter().find(|r| r.is_residual()).unwrap();
    assert_eq!(residual.headcount(), 5);
    assert_eq!(residual.display_hours.as_deref(), Some("36"));
}

#[test]
fn exact_line_wins_over_earlier_fallback_line() {
    let mut roster = group("big", 5, "Enfermeiro", "100", "40");
    roster.extend(group("small", 2, "Enfermeiro", "100", "30"));
    let index = RosterIndex::build(&roster);

    // The fallback line comes first in the input but is resolved after.
    let quotas = vec![
        quota(1, "Enfermeiro", "100", None),
        quota(2, "Enfermeiro", "100", Some(HoursValue::from("40"))),
    ];
    let (matches, consumed) = match_quotas(&index, &quotas);

    assert_eq!(matches[1].kind, MatchKind::Exact);
    assert_eq!(matches[1].key, Some(key("100", "Enfermeiro", "40")));
    assert_eq!(matches[0].kind, MatchKind::SoleCandidate);
    assert_eq!(matches[0].key, Some(key("100", "Enfermeiro", "30")));
    assert_eq!(consumed.len(), 2);
}

#[test]
fn duplicate_exact_lines_claim_once() {
    let roster = group("n", 3, "Enfermeiro", "100", "40");
    let config = StaffingConfig::default_test();
    let quotas = vec![
        quota(1, "Enfermeiro", "100", Some(HoursValue::from("40"))),
        quota(2, "Enfermeiro", "100", Some(HoursValue::Number(40.0))),
    ];

    let index = RosterIndex::build(&roster);
    let (matches, _) = match_quotas(&index, &quotas);
    assert_eq!(matches[0].kind, MatchKind::Exact);
    assert_eq!(matches[1].kind, MatchKind::AlreadyClaimed);

    let records = reconcile(&roster, &quotas, &config);
    let headcounts: Vec<u32> = records.iter().map(|r| r.headcount()).collect();
    assert_eq!(headcounts, vec![3, 0], "members are counted once");
}

#[test]
fn fallback_after_all_groups_claimed_reports_conflict() {
    let roster = group("n", 3, "Enfermeiro", "100", "40");
    let index = RosterIndex::build(&roster);
    let quotas = vec![
        quota(1, "Enfermeiro", "100", Some(HoursValue::from("40"))),
        quota(2, "Enfermeiro", "100", None),
    ];
    let (matches, _) = match_quotas(&index, &quotas);
    assert_eq!(matches[1].kind, MatchKind::AlreadyClaimed);
    assert_eq!(matches[1].key, None);
}
