//! Shared primitive types used across the reconciliation engine.

/// Primary key of a persisted quota line.
pub type QuotaId = i64;

/// The identifier of one reconciliation run (a UUID v4 string).
pub type RunId = String;

/// Token used wherever a shift-hours value is absent or unparseable.
pub const UNKNOWN_HOURS: &str = "N/A";
