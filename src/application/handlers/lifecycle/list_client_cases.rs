//! ListClientCasesHandler - Query handler for a client's case dashboard.

use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::lifecycle::{LifecycleResolver, LifecycleSummary};
use crate::ports::{CaseSnapshotReader, SnapshotReadError};

/// Query to list every case owned by a client.
#[derive(Debug, Clone)]
pub struct ListClientCasesQuery {
    pub client_id: UserId,
    pub now: Timestamp,
}

/// Summaries sorted most urgent first.
pub type ListClientCasesResult = Vec<LifecycleSummary>;

pub struct ListClientCasesHandler {
    reader: Arc<dyn CaseSnapshotReader>,
    resolver: LifecycleResolver,
}

impl ListClientCasesHandler {
    pub fn new(reader: Arc<dyn CaseSnapshotReader>, resolver: LifecycleResolver) -> Self {
        Self { reader, resolver }
    }

    pub async fn handle(
        &self,
        query: ListClientCasesQuery,
    ) -> Result<ListClientCasesResult, SnapshotReadError> {
        let snapshots = self.reader.list_for_client(&query.client_id).await?;
        let summaries = self.resolver.resolve_batch(&snapshots, query.now);

        debug!(
            client_id = %query.client_id,
            cases = summaries.len(),
            "Resolved client cases"
        );

        Ok(summaries)
    }
}
