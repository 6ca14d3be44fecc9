//! Integration tests for the reconciliation engine.
//!
//! Tests verify the engine's core behaviours:
//! 1. Quota lines against matched groups: deficit, surplus, balanced
//! 2. Unclaimed groups surface as zero-target residual lines
//! 3. Excluded facilities and archived lines are withheld, not lost
//! 4. Facility falls back to the quota's cost center, then a label
//! 5. Status always agrees with the sign of the balance

use staffing_core::{
    classify::Disposition,
    config::StaffingConfig,
    hours::HoursValue,
    model::{EmployeeRecord, QuotaLine, RecordOrigin, StaffingStatus},
    reconcile, ReconciliationEngine,
};

fn emp(name: &str, role: &str, cc: &str, facility: &str, status: &str, hours: &str) -> EmployeeRecord {
    EmployeeRecord {
        name: name.into(),
        role: Some(role.into()),
        cost_center: Some(cc.into()),
        facility_name: Some(facility.into()),
        admission_date: None,
        employment_status: Some(status.into()),
        weekly_hours: Some(HoursValue::from(hours)),
    }
}

fn quota(id: i64, role: &str, cc: &str, hours: Option<&str>, target: u32) -> QuotaLine {
    QuotaLine {
        id: Some(id),
        role: role.into(),
        cost_center: cc.into(),
        target_active_count: target,
        weekly_hours: hours.map(HoursValue::from),
        notes: None,
        archived: false,
    }
}

/// Three active nurses and one on leave, 40h, cost center 100.
fn nurses() -> Vec<EmployeeRecord> {
    vec![
        emp("Ana", "Enfermeiro", "100", "UPA CENTRO", "ATIVO", "40"),
        emp("Bruno", "Enfermeiro", "100", "UPA CENTRO", "ATIVO", "40"),
        emp("Camila", "Enfermeiro", "100", "UPA CENTRO", "ATIVO", "40"),
        emp("Diego", "Enfermeiro", "100", "UPA CENTRO", "AFASTADO", "40"),
    ]
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: deficit, surplus, balanced
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn matched_group_below_target_is_deficit() {
    let config = StaffingConfig::default_test();
    let records = reconcile(&nurses(), &[quota(1, "Enfermeiro", "100", Some("40"), 5)], &config);

    assert_eq!(records.len(), 1, "one quota line, one group, no residual");
    let r = &records[0];
    assert_eq!(r.quota_id, Some(1));
    assert_eq!(r.active_count, 3);
    assert_eq!(r.inactive_count, 1);
    assert_eq!(r.balance, -1);
    assert_eq!(r.status, StaffingStatus::Deficit);
    assert_eq!(r.facility_name, "UPA CENTRO");
    assert_eq!(r.display_hours.as_deref(), Some("40"));
    assert_eq!(r.member_employees.len(), 4);
    assert_eq!(r.origin, RecordOrigin::Quota);
}

#[test]
fn roster_without_quotas_is_one_residual_surplus() {
    let config = StaffingConfig::default_test();
    let records = reconcile(&nurses(), &[], &config);

    assert_eq!(records.len(), 1);
    let r = &records[0];
    assert!(r.is_residual());
    assert_eq!(r.quota_id, None);
    assert_eq!(r.target, 0);
    assert_eq!(r.active_count, 3);
    assert_eq!(r.inactive_count, 1);
    assert_eq!(r.balance, 4);
    assert_eq!(r.status, StaffingStatus::Surplus);
}

#[test]
fn headcount_equal_to_target_is_balanced() {
    let config = StaffingConfig::default_test();
    let records = reconcile(&nurses(), &[quota(1, "Enfermeiro", "100", Some("40"), 4)], &config);

    assert_eq!(records[0].balance, 0);
    assert_eq!(records[0].status, StaffingStatus::Balanced);
    assert_eq!(records[0].status.to_string(), "OK");
}

#[test]
fn quota_with_no_roster_is_full_deficit_at_cost_center() {
    let config = StaffingConfig::default_test();
    let records = reconcile(&[], &[quota(7, "Nutricionista", " 300 ", Some("30"), 2)], &config);

    assert_eq!(records.len(), 1);
    let r = &records[0];
    assert_eq!(r.active_count + r.inactive_count, 0);
    assert_eq!(r.balance, -2);
    assert_eq!(r.status, StaffingStatus::Deficit);
    assert_eq!(r.facility_name, "300", "facility falls back to the trimmed cost center");
    assert!(r.member_employees.is_empty());
}

#[test]
fn blank_cost_center_falls_back_to_unknown_unit() {
    let config = StaffingConfig::default_test();
    let records = reconcile(&[], &[quota(7, "Nutricionista", "  ", None, 1)], &config);
    assert_eq!(records[0].facility_name, config.unknown_unit_label);
    assert_eq!(records[0].display_hours, None);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: residuals
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn unclaimed_shift_surfaces_next_to_claimed_one() {
    let config = StaffingConfig::default_test();
    let mut roster = nurses();
    roster.push(emp("Eduarda", "Enfermeiro", "100", "UPA CENTRO", "ATIVO", "30"));

    let records = reconcile(&roster, &[quota(1, "Enfermeiro", "100", Some("40"), 4)], &config);

    assert_eq!(records.len(), 2);
    let residual = records.iter().find(|r| r.is_residual()).unwrap();
    assert_eq!(residual.display_hours.as_deref(), Some("30"));
    assert_eq!(residual.active_count, 1);
    assert_eq!(residual.status, StaffingStatus::Surplus);
    assert_eq!(residual.member_employees[0].name, "Eduarda");
}

#[test]
fn residual_with_blank_keys_gets_labels() {
    let config = StaffingConfig::default_test();
    let mut e = emp("Felipe", "", "", "UPA CENTRO", "ATIVO", "40");
    e.role = None;
    let records = reconcile(&[e], &[], &config);

    assert_eq!(records[0].role, config.unknown_role_label);
    assert_eq!(records[0].cost_center, config.unknown_cost_center_label);
    assert_eq!(records[0].facility_name, "UPA CENTRO");
}

#[test]
fn missing_status_counts_as_inactive() {
    let config = StaffingConfig::default_test();
    let mut e = emp("Gabriela", "Enfermeiro", "100", "UPA CENTRO", "", "40");
    e.employment_status = None;
    let records = reconcile(&[e], &[], &config);
    assert_eq!(records[0].active_count, 0);
    assert_eq!(records[0].inactive_count, 1);
}

#[test]
fn active_token_is_a_case_insensitive_substring() {
    let config = StaffingConfig::default_test();
    let roster = vec![
        emp("Ana", "Enfermeiro", "100", "UPA CENTRO", "01-ativo", "40"),
        emp("Bruno", "Enfermeiro", "100", "UPA CENTRO", "FERIAS", "40"),
    ];
    let records = reconcile(&roster, &[], &config);
    assert_eq!(records[0].active_count, 1);
    assert_eq!(records[0].inactive_count, 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: withheld records
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn excluded_facility_is_withheld_and_keeps_group_claimed() {
    let config = StaffingConfig::default_test();
    let roster = vec![
        emp("Ana", "Medico Clinico", "900", "SBCD - HMI", "ATIVO", "20"),
        emp("Bruno", "Medico Clinico", "900", "SBCD - HMI", "ATIVO", "20"),
    ];
    let engine = ReconciliationEngine::new(config);
    let run = engine.run(&roster, &[quota(3, "Medico Clinico", "900", Some("20"), 1)]);

    assert!(run.records.is_empty(), "excluded facility must not be emitted");
    assert_eq!(run.withheld.len(), 1, "group claimed, so no residual either");
    assert_eq!(run.withheld[0].disposition, Disposition::ExcludedFacility);
    assert_eq!(run.stats.residual_groups, 0);
    assert_eq!(run.stats.withheld, 1);
}

#[test]
fn excluded_residual_is_withheld() {
    let config = StaffingConfig::default_test();
    let roster = vec![emp("Ana", "Maqueiro", "910", "SBCD - PROJETO POA", "ATIVO", "44")];
    let run = ReconciliationEngine::new(config).run(&roster, &[]);
    assert!(run.records.is_empty());
    assert_eq!(run.withheld[0].disposition, Disposition::ExcludedFacility);
    assert!(run.withheld[0].record.is_residual());
}

#[test]
fn archived_line_is_withheld_but_still_consumes_its_group() {
    let config = StaffingConfig::default_test();
    let mut q = quota(1, "Enfermeiro", "100", Some("40"), 4);
    q.archived = true;

    let run = ReconciliationEngine::new(config).run(&nurses(), &[q]);
    assert!(run.records.is_empty());
    assert_eq!(run.withheld.len(), 1);
    assert_eq!(run.withheld[0].disposition, Disposition::Archived);
    assert!(run.withheld[0].record.archived);
}

#[test]
fn include_archived_emits_flagged_record() {
    let mut config = StaffingConfig::default_test();
    config.include_archived = true;
    let mut q = quota(1, "Enfermeiro", "100", Some("40"), 4);
    q.archived = true;

    let records = reconcile(&nurses(), &[q], &config);
    assert_eq!(records.len(), 1);
    assert!(records[0].archived);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: status / balance agreement and coverage on a mixed roster
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn every_record_status_matches_balance_sign() {
    let config = StaffingConfig::default_test();
    let mut roster = nurses();
    roster.push(emp("Henrique", "Recepcionista", "200", "UBS JARDIM AMERICA", "ATIVO", "44h"));
    roster.push(emp("Isabela", "Recepcionista", "200", "UBS JARDIM AMERICA", "ATIVO", "30"));
    let quotas = vec![
        quota(1, "Enfermeiro", "100", Some("40"), 6),
        quota(2, "Recepcionista", "200", Some("44"), 1),
        quota(3, "Farmaceutico", "200", None, 1),
    ];

    let run = ReconciliationEngine::new(config).run(&roster, &quotas);
    for r in run.all_records() {
        assert_eq!(r.status, StaffingStatus::from_balance(r.balance), "{r:?}");
        assert_eq!(r.balance, i64::from(r.headcount()) - i64::from(r.target));
    }
    let covered: usize = run.all_records().map(|r| r.member_employees.len()).sum();
    assert_eq!(covered, roster.len(), "each employee lands in exactly one record");
}

#[test]
fn stats_count_match_kinds() {
    let config = StaffingConfig::default_test();
    let quotas = vec![
        quota(1, "Enfermeiro", "100", Some("40"), 4),
        quota(2, "Enfermeiro", "100", Some("36"), 1),
    ];
    let run = ReconciliationEngine::new(config).run(&nurses(), &quotas);
    assert_eq!(run.stats.exact_matches, 1);
    assert_eq!(run.stats.unmatched_quotas, 1);
    assert_eq!(run.stats.quota_lines, 2);
    assert_eq!(run.stats.roster_size, 4);
    assert_eq!(run.stats.groups, 1);
}
