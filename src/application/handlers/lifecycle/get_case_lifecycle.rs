//! GetCaseLifecycleHandler - Query handler for one case's resolved lifecycle.
//!
//! Reads a fresh snapshot, resolves it, and optionally attaches stage
//! duration metrics from the audit log.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::domain::foundation::{CaseId, Timestamp};
use crate::domain::lifecycle::{
    CaseHealth, LifecycleResolver, LifecycleState, LifecycleSummary, StageMetrics,
};
use crate::ports::{CaseSnapshotReader, SnapshotReadError};

/// Query to resolve a single case.
#[derive(Debug, Clone)]
pub struct GetCaseLifecycleQuery {
    pub case_id: CaseId,
    /// Previously resolved state held by the caller, if any.
    pub prior_state: Option<LifecycleState>,
    pub include_metrics: bool,
    /// Evaluation instant.
    pub now: Timestamp,
}

/// Resolved lifecycle with detail-view extras.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseLifecycleDetail {
    #[serde(flatten)]
    pub summary: LifecycleSummary,
    pub health: CaseHealth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<StageMetrics>,
}

pub type GetCaseLifecycleResult = CaseLifecycleDetail;

pub struct GetCaseLifecycleHandler {
    reader: Arc<dyn CaseSnapshotReader>,
    resolver: LifecycleResolver,
}

impl GetCaseLifecycleHandler {
    pub fn new(reader: Arc<dyn CaseSnapshotReader>, resolver: LifecycleResolver) -> Self {
        Self { reader, resolver }
    }

    pub async fn handle(
        &self,
        query: GetCaseLifecycleQuery,
    ) -> Result<GetCaseLifecycleResult, SnapshotReadError> {
        let snapshot = self.reader.get_snapshot(&query.case_id).await?;

        let summary = self.resolver.resolve(&snapshot, query.now, query.prior_state);
        let health = CaseHealth::assess(&snapshot, summary.lifecycle_state);
        let metrics = if query.include_metrics {
            StageMetrics::from_events(&snapshot.audit_events, query.now)
        } else {
            None
        };

        debug!(
            case_id = %query.case_id,
            blocked = health.is_blocked,
            "Loaded case lifecycle"
        );

        Ok(CaseLifecycleDetail {
            summary,
            health,
            metrics,
        })
    }
}
