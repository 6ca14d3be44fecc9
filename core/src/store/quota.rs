use super::{hours_from_sql, hours_to_sql, SqliteStore};
use crate::{
    error::{StaffingError, StaffingResult},
    hours::normalize_hours,
    model::{QuotaIdentity, QuotaLine},
    source::{QuotaSource, QuotaWriter},
    types::QuotaId,
};
use rusqlite::{params, Connection};

impl SqliteStore {
    pub fn insert_quota_line(&self, q: &QuotaLine) -> StaffingResult<QuotaId> {
        self.conn.execute(
            "INSERT INTO quota_line
             (role, cost_center, target_active_count, weekly_hours, notes, archived)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                q.role,
                q.cost_center,
                q.target_active_count,
                hours_to_sql(q.weekly_hours.as_ref()),
                q.notes,
                q.archived,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn get_quota_line(&self, id: QuotaId) -> StaffingResult<Option<QuotaLine>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, role, cost_center, target_active_count, weekly_hours, notes, archived
             FROM quota_line WHERE id = ?1",
        )?;
        let mut rows = stmt.query_map(params![id], map_quota_row)?;
        Ok(rows.next().transpose()?)
    }

    pub fn quota_line_count(&self) -> StaffingResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM quota_line", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn map_quota_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<QuotaLine> {
    Ok(QuotaLine {
        id: Some(row.get(0)?),
        role: row.get(1)?,
        cost_center: row.get(2)?,
        target_active_count: row.get(3)?,
        weekly_hours: hours_from_sql(row.get(4)?),
        notes: row.get(5)?,
        archived: row.get(6)?,
    })
}

/// Rows sharing a natural (role, cost center) pair, with their hours.
/// `live_only` skips archived rows.
fn natural_rows(
    conn: &Connection,
    role: &str,
    cost_center: &str,
    live_only: bool,
) -> StaffingResult<Vec<(QuotaId, Option<String>)>> {
    let mut stmt = conn.prepare(
        "SELECT id, weekly_hours FROM quota_line
         WHERE TRIM(role) = ?1 AND TRIM(cost_center) = ?2
           AND (?3 = 0 OR archived = 0)
         ORDER BY id ASC",
    )?;
    let rows = stmt
        .query_map(params![role, cost_center, live_only], |row| {
            let id: QuotaId = row.get(0)?;
            Ok((id, hours_from_sql(row.get(1)?)))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows
        .into_iter()
        .map(|(id, hours)| {
            let token = normalize_hours(hours.as_ref());
            (id, token.known().map(str::to_string))
        })
        .collect())
}

impl QuotaSource for SqliteStore {
    fn fetch_quota_lines(&self, cost_center_filter: Option<&str>) -> StaffingResult<Vec<QuotaLine>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, role, cost_center, target_active_count, weekly_hours, notes, archived
             FROM quota_line
             WHERE ?1 IS NULL OR cost_center = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map(params![cost_center_filter], map_quota_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

impl QuotaWriter for SqliteStore {
    fn upsert_quota_target(&self, identity: &QuotaIdentity, target: u32) -> StaffingResult<()> {
        match identity {
            QuotaIdentity::Id(id) => {
                let changed = self.conn.execute(
                    "UPDATE quota_line SET target_active_count = ?1 WHERE id = ?2",
                    params![target, id],
                )?;
                if changed == 0 {
                    return Err(StaffingError::QuotaNotFound { id: *id });
                }
            }
            QuotaIdentity::Natural { role, cost_center } => {
                let tx = self.conn.unchecked_transaction()?;
                // Archived siblings keep their own target; a live line is
                // inserted next to them.
                let existing = natural_rows(&tx, role, cost_center, true)?;
                match existing.as_slice() {
                    [] => {
                        tx.execute(
                            "INSERT INTO quota_line (role, cost_center, target_active_count)
                             VALUES (?1, ?2, ?3)",
                            params![role, cost_center, target],
                        )?;
                    }
                    [(id, _)] => {
                        tx.execute(
                            "UPDATE quota_line SET target_active_count = ?1 WHERE id = ?2",
                            params![target, id],
                        )?;
                    }
                    many => {
                        return Err(StaffingError::AmbiguousQuota {
                            role: role.clone(),
                            cost_center: cost_center.clone(),
                            count: many.len(),
                        });
                    }
                }
                tx.commit()?;
            }
        }
        log::debug!("quota {identity:?} target set to {target}");
        Ok(())
    }

    fn set_archived(
        &self,
        identity: &QuotaIdentity,
        hours: Option<&str>,
        archived: bool,
    ) -> StaffingResult<()> {
        match identity {
            QuotaIdentity::Id(id) => {
                let changed = self.conn.execute(
                    "UPDATE quota_line SET archived = ?1 WHERE id = ?2",
                    params![archived, id],
                )?;
                if changed == 0 {
                    return Err(StaffingError::QuotaNotFound { id: *id });
                }
            }
            QuotaIdentity::Natural { role, cost_center } => {
                let tx = self.conn.unchecked_transaction()?;
                let same_hours: Vec<QuotaId> = natural_rows(&tx, role, cost_center, false)?
                    .into_iter()
                    .filter(|(_, h)| h.as_deref() == hours)
                    .map(|(id, _)| id)
                    .collect();
                if same_hours.is_empty() {
                    // Nothing to unarchive. Archiving inserts a zero-target
                    // line with the group's hours so it claims the same
                    // group on the next run.
                    if archived {
                        tx.execute(
                            "INSERT INTO quota_line
                             (role, cost_center, target_active_count, weekly_hours, archived)
                             VALUES (?1, ?2, 0, ?3, 1)",
                            params![role, cost_center, hours],
                        )?;
                    }
                } else {
                    for id in same_hours {
                        tx.execute(
                            "UPDATE quota_line SET archived = ?1 WHERE id = ?2",
                            params![archived, id],
                        )?;
                    }
                }
                tx.commit()?;
            }
        }
        log::debug!("quota {identity:?} archived={archived}");
        Ok(())
    }
}
