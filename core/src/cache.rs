//! Read-through cache for the termination history dataset.
//!
//! The history is large, rarely changes, and is consulted on every
//! employee lookup, so it is loaded once per process and shared. A new
//! upload must call `invalidate()`; the next `get()` reloads.

use crate::error::StaffingResult;
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminationRecord {
    pub name: String,
    pub role: Option<String>,
    pub cost_center: Option<String>,
    pub facility_name: Option<String>,
    pub terminated_on: Option<NaiveDate>,
    pub termination_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeHistory {
    records: Vec<TerminationRecord>,
}

impl EmployeeHistory {
    pub fn new(records: Vec<TerminationRecord>) -> Self {
        Self { records }
    }

    /// Records for an employee name, compared trimmed and case-insensitively.
    pub fn by_name(&self, name: &str) -> Vec<&TerminationRecord> {
        let wanted = name.trim().to_lowercase();
        self.records
            .iter()
            .filter(|r| r.name.trim().to_lowercase() == wanted)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Produces a fresh copy of the dataset.
pub trait HistoryLoader {
    fn load_history(&self) -> StaffingResult<EmployeeHistory>;
}

struct CacheSlot<L> {
    loader: L,
    cached: Option<Arc<EmployeeHistory>>,
    loads: u64,
}

/// Shared, lazily loaded history. Concurrent `get()` calls during a load
/// wait for it instead of loading twice.
pub struct ReadThroughCache<L> {
    slot: Mutex<CacheSlot<L>>,
}

impl<L: HistoryLoader> ReadThroughCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            slot: Mutex::new(CacheSlot {
                loader,
                cached: None,
                loads: 0,
            }),
        }
    }

    /// The cached dataset, loading it first if needed. A failed load
    /// leaves the cache empty so the next call retries.
    pub fn get(&self) -> StaffingResult<Arc<EmployeeHistory>> {
        let mut slot = self.slot.lock();
        if let Some(history) = &slot.cached {
            return Ok(Arc::clone(history));
        }
        let history = Arc::new(slot.loader.load_history()?);
        slot.loads += 1;
        slot.cached = Some(Arc::clone(&history));
        log::debug!("history cache loaded {} records", history.len());
        Ok(history)
    }

    pub fn invalidate(&self) {
        self.slot.lock().cached = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.slot.lock().cached.is_some()
    }

    /// How many times the loader has run.
    pub fn load_count(&self) -> u64 {
        self.slot.lock().loads
    }
}
