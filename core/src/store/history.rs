use super::SqliteStore;
use crate::{
    cache::{EmployeeHistory, HistoryLoader, TerminationRecord},
    error::StaffingResult,
};
use chrono::NaiveDate;
use rusqlite::params;

impl SqliteStore {
    pub fn insert_termination(&self, t: &TerminationRecord) -> StaffingResult<()> {
        self.conn.execute(
            "INSERT INTO termination
             (name, role, cost_center, facility_name, terminated_on, termination_type)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                t.name,
                t.role,
                t.cost_center,
                t.facility_name,
                t.terminated_on.map(|d| d.format("%Y-%m-%d").to_string()),
                t.termination_type,
            ],
        )?;
        Ok(())
    }
}

impl HistoryLoader for SqliteStore {
    /// Most recent terminations first.
    fn load_history(&self) -> StaffingResult<EmployeeHistory> {
        let mut stmt = self.conn.prepare(
            "SELECT name, role, cost_center, facility_name, terminated_on, termination_type
             FROM termination
             ORDER BY terminated_on DESC, id DESC",
        )?;
        let records = stmt
            .query_map([], |row| {
                let terminated_on: Option<String> = row.get(4)?;
                Ok(TerminationRecord {
                    name: row.get(0)?,
                    role: row.get(1)?,
                    cost_center: row.get(2)?,
                    facility_name: row.get(3)?,
                    terminated_on: terminated_on
                        .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
                    termination_type: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EmployeeHistory::new(records))
    }
}
