//! Request and response DTOs for lifecycle endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::lifecycle::{CaseSnapshot, DashboardBucket, LifecycleSummary};

pub use crate::application::handlers::CaseLifecycleDetail;

/// Standard error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: format!("{} not found: {}", resource_type, id),
            details: None,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            code: "UNAUTHORIZED".to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

/// Query parameters for the single-case summary.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleSummaryParams {
    /// Previously resolved state; unknown values are ignored.
    pub prior_state: Option<String>,
    #[serde(default)]
    pub include_metrics: bool,
}

/// Number of cases per dashboard bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketCounts {
    pub active: usize,
    pub action_needed: usize,
    pub sla_risk: usize,
    pub completed: usize,
}

impl BucketCounts {
    pub fn tally(summaries: &[LifecycleSummary]) -> Self {
        summaries.iter().fold(Self::default(), |mut counts, s| {
            match s.dashboard_bucket {
                DashboardBucket::Active => counts.active += 1,
                DashboardBucket::ActionNeeded => counts.action_needed += 1,
                DashboardBucket::SlaRisk => counts.sla_risk += 1,
                DashboardBucket::Completed => counts.completed += 1,
            }
            counts
        })
    }
}

/// Response for the client dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCasesResponse {
    pub cases: Vec<LifecycleSummary>,
    pub counts: BucketCounts,
    pub evaluated_at: Timestamp,
}

/// Body of the stateless batch resolution endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveBatchRequest {
    pub snapshots: Vec<CaseSnapshot>,
    /// Evaluation instant; defaults to the server clock.
    #[serde(default)]
    pub now: Option<Timestamp>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveBatchResponse {
    pub summaries: Vec<LifecycleSummary>,
    pub evaluated_at: Timestamp,
}
