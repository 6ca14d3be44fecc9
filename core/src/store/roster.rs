use super::{hours_from_sql, hours_to_sql, SqliteStore};
use crate::{
    error::StaffingResult,
    model::EmployeeRecord,
    source::RosterSource,
};
use chrono::NaiveDate;
use rusqlite::params;

impl SqliteStore {
    pub fn insert_employee(&self, e: &EmployeeRecord) -> StaffingResult<i64> {
        self.conn.execute(
            "INSERT INTO employee
             (name, role, cost_center, facility_name, admission_date,
              employment_status, weekly_hours)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                e.name,
                e.role,
                e.cost_center,
                e.facility_name,
                e.admission_date.map(|d| d.format("%Y-%m-%d").to_string()),
                e.employment_status,
                hours_to_sql(e.weekly_hours.as_ref()),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn employee_count(&self) -> StaffingResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM employee", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl RosterSource for SqliteStore {
    /// Every employee whose status is not the terminated status.
    /// A missing status is kept (it counts as inactive downstream).
    fn fetch_roster(&self, facility_filter: Option<&str>) -> StaffingResult<Vec<EmployeeRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, role, cost_center, facility_name, admission_date,
                    employment_status, weekly_hours
             FROM employee
             WHERE (employment_status IS NULL OR employment_status <> ?1)
               AND (?2 IS NULL OR facility_name = ?2)
             ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map(params![self.terminated_status, facility_filter], |row| {
                let admission: Option<String> = row.get(4)?;
                Ok(EmployeeRecord {
                    name: row.get(0)?,
                    role: row.get(1)?,
                    cost_center: row.get(2)?,
                    facility_name: row.get(3)?,
                    admission_date: admission.as_deref().and_then(parse_date),
                    employment_status: row.get(5)?,
                    weekly_hours: hours_from_sql(row.get(6)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

/// ISO dates, or the dd/mm/yyyy form the HR exports use. Anything else
/// is treated as missing.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .map_err(|_| log::debug!("unparseable admission date {s:?}"))
        .ok()
}
