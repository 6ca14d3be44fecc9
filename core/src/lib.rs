//! Workforce quota reconciliation.
//!
//! Compares a table of staffing quotas (role × cost center × weekly
//! hours) against the employee roster and reports, per quota line, how
//! many active and inactive employees occupy it and whether the line is
//! in deficit, in surplus or balanced. Roster groups no quota line claims
//! are reported as zero-target surplus lines.

pub mod board;
pub mod cache;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod hours;
pub mod matcher;
pub mod model;
pub mod residual;
pub mod rng;
pub mod roster;
pub mod source;
pub mod store;
pub mod summary;
pub mod types;

pub use engine::{reconcile, ReconciliationEngine, ReconciliationRun};
pub use error::{StaffingError, StaffingResult};
