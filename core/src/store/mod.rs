//! SQLite persistence layer.
//!
//! RULE: Only store/ talks to the database.
//! The engine never sees SQL; callers reach the store through the
//! traits in source.rs and cache.rs.

use crate::{error::StaffingResult, hours::HoursValue};
mod history;
mod quota;
mod roster;
mod snapshot;
use rusqlite::{types::Value, Connection};

pub use snapshot::RunSnapshot;

pub struct SqliteStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
    terminated_status: String,
}

impl SqliteStore {
    pub fn open(path: &str) -> StaffingResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self {
            conn,
            path: Some(path.to_string()),
            terminated_status: "99-Demitido".into(),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> StaffingResult<Self> {
        let conn = Connection::open(":memory:")?;
        Ok(Self {
            conn,
            path: None,
            terminated_status: "99-Demitido".into(),
        })
    }

    /// Status value the roster fetch treats as terminated.
    pub fn with_terminated_status(mut self, status: &str) -> Self {
        self.terminated_status = status.to_string();
        self
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases, this returns a new in-memory database (isolated).
    /// For file-based databases, this opens the same file.
    pub fn reopen(&self) -> StaffingResult<Self> {
        let store = match &self.path {
            Some(p) => Self::open(p)?,
            None => Self::in_memory()?,
        };
        Ok(store.with_terminated_status(&self.terminated_status))
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> StaffingResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_staffing.sql"))?;
        log::info!("store migrated ({})", self.path.as_deref().unwrap_or(":memory:"));
        Ok(())
    }
}

// ── Column helpers ─────────────────────────────────────────────────

/// Hours are stored as entered: REAL/INTEGER for numbers, TEXT otherwise.
fn hours_to_sql(hours: Option<&HoursValue>) -> Value {
    match hours {
        None => Value::Null,
        Some(HoursValue::Number(n)) => Value::Real(*n),
        Some(HoursValue::Text(s)) => Value::Text(s.clone()),
    }
}

fn hours_from_sql(value: Value) -> Option<HoursValue> {
    match value {
        Value::Integer(i) => Some(HoursValue::Number(i as f64)),
        Value::Real(r) => Some(HoursValue::Number(r)),
        Value::Text(s) => Some(HoursValue::Text(s)),
        Value::Null | Value::Blob(_) => None,
    }
}
