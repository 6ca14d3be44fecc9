//! Deterministic synthetic staffing datasets.
//!
//! Produces a roster, a quota table and a termination history with the
//! kind of inconsistency real HR exports have: hours typed as "40",
//! "40,0" or "44h", quota lines without hours, positions nobody set a
//! quota for, and quota lines for positions nobody fills.
//! Same seed + same shape = same dataset.

use crate::{
    cache::TerminationRecord,
    hours::HoursValue,
    model::{EmployeeRecord, QuotaLine},
    rng::{DatasetRng, DatasetStream},
};
use chrono::{Duration, NaiveDate};

#[derive(Debug, Clone)]
pub struct DemoShape {
    pub facilities: usize,
    pub positions_per_facility: usize,
    /// Largest number of employees sharing one (position, hours) group.
    pub max_group_size: usize,
    /// Probability that a staffed position has a quota line.
    pub quota_coverage: f64,
    /// Probability that a quota line leaves its hours blank.
    pub blank_hours_rate: f64,
}

impl Default for DemoShape {
    fn default() -> Self {
        Self {
            facilities: 5,
            positions_per_facility: 6,
            max_group_size: 8,
            quota_coverage: 0.75,
            blank_hours_rate: 0.35,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DemoDataset {
    /// Includes terminated employees; the store fetch filters them out.
    pub roster: Vec<EmployeeRecord>,
    /// Lines with `id: None`; the store assigns ids on insert.
    pub quotas: Vec<QuotaLine>,
    pub terminations: Vec<TerminationRecord>,
}

const FACILITIES: &[&str] = &[
    "HOSPITAL MUNICIPAL NORTE",
    "UPA CENTRO",
    "UBS JARDIM AMERICA",
    "CAPS VILA NOVA",
    "HOSPITAL REGIONAL SUL",
    "SBCD - HMI",
    "PRONTO SOCORRO LESTE",
    "AMBULATORIO CENTRAL",
];

const ROLES: &[&str] = &[
    "Enfermeiro",
    "Tecnico de Enfermagem",
    "Medico Clinico",
    "Auxiliar Administrativo",
    "Recepcionista",
    "Farmaceutico",
    "Fisioterapeuta",
    "Assistente Social",
    "Maqueiro",
    "Auxiliar de Limpeza",
];

const SHIFT_HOURS: &[f64] = &[20.0, 30.0, 36.0, 40.0, 44.0, 37.5];

const INACTIVE_STATUSES: &[&str] = &["AFASTADO", "LICENCA MATERNIDADE", "FERIAS", "AUXILIO DOENCA"];

const FIRST_NAMES: &[&str] = &[
    "Ana", "Bruno", "Camila", "Diego", "Eduarda", "Felipe", "Gabriela", "Henrique",
    "Isabela", "Joao", "Larissa", "Marcos", "Natalia", "Otavio", "Paula", "Rafael",
    "Sabrina", "Thiago", "Vanessa", "Wagner",
];

const LAST_NAMES: &[&str] = &[
    "Silva", "Santos", "Oliveira", "Souza", "Rodrigues", "Ferreira", "Alves", "Pereira",
    "Lima", "Gomes", "Costa", "Ribeiro", "Martins", "Carvalho", "Almeida", "Lopes",
];

const TERMINATED_STATUS: &str = "99-Demitido";

pub fn generate(seed: u64, shape: &DemoShape) -> DemoDataset {
    let mut roster_rng = DatasetRng::new(seed, DatasetStream::Roster);
    let mut quota_rng = DatasetRng::new(seed, DatasetStream::Quota);
    let mut history_rng = DatasetRng::new(seed, DatasetStream::History);
    let epoch = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or(NaiveDate::MIN);

    let mut dataset = DemoDataset::default();

    for f in 0..shape.facilities.min(FACILITIES.len()) {
        let facility = FACILITIES[f];
        let cost_center = format!("{}", 1000 + f * 10);
        let roles = pick_distinct(&mut roster_rng, ROLES, shape.positions_per_facility);

        for role in roles {
            let variants = roster_rng.range_inclusive(1, 2);
            let hours = pick_distinct(&mut roster_rng, SHIFT_HOURS, variants);
            let mut staffed = 0usize;

            for &h in &hours {
                let size = roster_rng.range_inclusive(1, shape.max_group_size.max(1));
                staffed += size;
                for _ in 0..size {
                    let employee = generate_employee(&mut roster_rng, facility, &cost_center, role, h, epoch);
                    if employee.employment_status.as_deref() == Some(TERMINATED_STATUS) {
                        dataset.terminations.push(TerminationRecord {
                            name: employee.name.clone(),
                            role: employee.role.clone(),
                            cost_center: employee.cost_center.clone(),
                            facility_name: employee.facility_name.clone(),
                            terminated_on: Some(
                                epoch + Duration::days(history_rng.range_inclusive(3000, 4000) as i64),
                            ),
                            termination_type: Some(
                                history_rng.pick(&["SEM JUSTA CAUSA", "PEDIDO DE DEMISSAO"]).to_string(),
                            ),
                        });
                    }
                    dataset.roster.push(employee);
                }
            }

            if !quota_rng.chance(shape.quota_coverage) {
                continue;
            }
            let weekly_hours = if quota_rng.chance(shape.blank_hours_rate) {
                None
            } else {
                Some(render_hours(&mut quota_rng, hours[0]))
            };
            dataset.quotas.push(QuotaLine {
                id: None,
                role: role.to_string(),
                cost_center: cost_center.clone(),
                target_active_count: quota_rng.range_inclusive(0, staffed + 2) as u32,
                weekly_hours,
                notes: None,
                archived: quota_rng.chance(0.05),
            });
        }

        // A quota for a position nobody at this facility fills.
        if quota_rng.chance(0.3) {
            dataset.quotas.push(QuotaLine {
                id: None,
                role: "Nutricionista".into(),
                cost_center: cost_center.clone(),
                target_active_count: quota_rng.range_inclusive(1, 3) as u32,
                weekly_hours: Some(HoursValue::Number(30.0)),
                notes: Some("vaga em aberto".into()),
                archived: false,
            });
        }
    }

    log::debug!(
        "demo dataset seed={seed}: {} employees, {} quota lines, {} terminations",
        dataset.roster.len(),
        dataset.quotas.len(),
        dataset.terminations.len()
    );
    dataset
}

fn generate_employee(
    rng: &mut DatasetRng,
    facility: &str,
    cost_center: &str,
    role: &str,
    hours: f64,
    epoch: NaiveDate,
) -> EmployeeRecord {
    let name = format!("{} {} {}", rng.pick(FIRST_NAMES), rng.pick(LAST_NAMES), rng.pick(LAST_NAMES));
    let roll = rng.next_f64();
    let employment_status = if roll < 0.75 {
        Some("01-ATIVO".to_string())
    } else if roll < 0.92 {
        Some(rng.pick(INACTIVE_STATUSES).to_string())
    } else if roll < 0.96 {
        Some(TERMINATED_STATUS.to_string())
    } else {
        None
    };
    // Stray whitespace around the keys, as exports often have.
    let role = if rng.chance(0.1) { format!("{role} ") } else { role.to_string() };
    EmployeeRecord {
        name,
        role: Some(role),
        cost_center: Some(cost_center.to_string()),
        facility_name: Some(facility.to_string()),
        admission_date: Some(epoch + Duration::days(rng.range_inclusive(0, 3650) as i64)),
        employment_status,
        weekly_hours: Some(render_hours(rng, hours)),
    }
}

/// The same shift length in one of the spellings found in HR exports.
fn render_hours(rng: &mut DatasetRng, hours: f64) -> HoursValue {
    let comma = format!("{hours}").replace('.', ",");
    match rng.next_u64_below(5) {
        0 => HoursValue::Number(hours),
        1 => HoursValue::Text(format!("{hours}")),
        2 if hours.fract() == 0.0 => HoursValue::Text(format!("{hours},0")),
        3 => HoursValue::Text(format!("{hours}h")),
        _ => HoursValue::Text(comma),
    }
}

fn pick_distinct<T: Copy>(rng: &mut DatasetRng, items: &[T], n: usize) -> Vec<T> {
    let mut pool: Vec<T> = items.to_vec();
    let mut picked = Vec::with_capacity(n.min(pool.len()));
    while picked.len() < n && !pool.is_empty() {
        let i = rng.next_u64_below(pool.len() as u64) as usize;
        picked.push(pool.swap_remove(i));
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hours::normalize_hours;

    #[test]
    fn same_seed_produces_identical_datasets() {
        let a = generate(12345, &DemoShape::default());
        let b = generate(12345, &DemoShape::default());
        assert_eq!(a.roster, b.roster, "Same seed should produce same roster");
        assert_eq!(a.quotas, b.quotas, "Same seed should produce same quotas");
    }

    #[test]
    fn different_seeds_diverge() {
        let a = generate(1, &DemoShape::default());
        let b = generate(2, &DemoShape::default());
        assert_ne!(a.roster, b.roster);
    }

    #[test]
    fn rendered_hours_normalize_back_to_the_shift() {
        let mut rng = DatasetRng::new(7, DatasetStream::Roster);
        for _ in 0..200 {
            let h = *rng.pick(SHIFT_HOURS);
            let token = normalize_hours(Some(&render_hours(&mut rng, h)));
            assert_eq!(token.as_str(), format!("{h}"), "hours {h} rendered unreadably");
        }
    }

    #[test]
    fn terminations_mirror_terminated_roster_entries() {
        let data = generate(99, &DemoShape::default());
        let terminated = data
            .roster
            .iter()
            .filter(|e| e.employment_status.as_deref() == Some(TERMINATED_STATUS))
            .count();
        assert_eq!(terminated, data.terminations.len());
    }
}
