use async_trait::async_trait;

use crate::domain::foundation::{CaseId, UserId};
use crate::domain::lifecycle::CaseSnapshot;

/// Read-only port producing fresh case snapshots from the store.
#[async_trait]
pub trait CaseSnapshotReader: Send + Sync {
    /// Loads one case with its audit log, latest opinion version and
    /// pending clarification / document counts.
    async fn get_snapshot(&self, id: &CaseId) -> Result<CaseSnapshot, SnapshotReadError>;

    /// Loads every case owned by a client, most recently updated first.
    async fn list_for_client(&self, client_id: &UserId)
        -> Result<Vec<CaseSnapshot>, SnapshotReadError>;
}

/// Errors that can occur while reading snapshots
#[derive(Debug, thiserror::Error)]
pub enum SnapshotReadError {
    #[error("Case not found: {0}")]
    NotFound(CaseId),

    #[error("Invalid case data: {0}")]
    InvalidData(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for SnapshotReadError {
    fn from(err: sqlx::Error) -> Self {
        SnapshotReadError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for SnapshotReadError {
    fn from(err: serde_json::Error) -> Self {
        SnapshotReadError::InvalidData(err.to_string())
    }
}
