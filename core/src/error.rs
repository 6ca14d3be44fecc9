use thiserror::Error;

#[derive(Error, Debug)]
pub enum StaffingError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Quota line {id} not found")]
    QuotaNotFound { id: i64 },

    #[error("Quota line for role '{role}' in cost center '{cost_center}' is ambiguous: {count} rows")]
    AmbiguousQuota {
        role: String,
        cost_center: String,
        count: usize,
    },

    #[error("Fetch from '{source_name}' failed: {reason}")]
    FetchFailed { source_name: String, reason: String },

    #[error("Write-back failed: {reason}")]
    WriteBack { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StaffingResult<T> = Result<T, StaffingError>;
