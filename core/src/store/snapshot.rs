//! Reconciliation run snapshots: the emitted records of a run as JSON,
//! kept for later inspection.

use super::SqliteStore;
use crate::{error::StaffingResult, model::ReconciliationRecord, types::RunId};
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct RunSnapshot {
    pub run_id: RunId,
    pub created_at: DateTime<Utc>,
    pub records: Vec<ReconciliationRecord>,
}

impl RunSnapshot {
    /// Snapshot of a fresh run, stamped now with a random run id.
    pub fn new(records: Vec<ReconciliationRecord>) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            records,
        }
    }
}

impl SqliteStore {
    pub fn save_run_snapshot(&self, snapshot: &RunSnapshot) -> StaffingResult<()> {
        let json = serde_json::to_string(&snapshot.records)?;
        self.conn.execute(
            "INSERT INTO reconciliation_run (run_id, created_at, record_count, records_json)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                snapshot.run_id,
                snapshot.created_at.to_rfc3339(),
                snapshot.records.len() as i64,
                json,
            ],
        )?;
        Ok(())
    }

    pub fn latest_run_snapshot(&self) -> StaffingResult<Option<RunSnapshot>> {
        let row: Option<(String, String, String)> = self
            .conn
            .query_row(
                "SELECT run_id, created_at, records_json FROM reconciliation_run
                 ORDER BY created_at DESC, rowid DESC LIMIT 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let Some((run_id, created_at, json)) = row else {
            return Ok(None);
        };
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| anyhow::anyhow!("run {run_id}: bad created_at {created_at:?}: {e}"))?
            .with_timezone(&Utc);
        Ok(Some(RunSnapshot {
            run_id,
            created_at,
            records: serde_json::from_str(&json)?,
        }))
    }
}
