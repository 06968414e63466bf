//! LifecycleSummary - the resolved view of one case consumed by list and detail views.

use serde::{Deserialize, Serialize};

use super::authority::AuthoritySource;
use super::next_action::NextStep;
use super::progress::Progress;
use super::sla::SlaInfo;
use super::state::{LifecycleState, Tone, Track};
use crate::domain::foundation::{CaseId, Timestamp};

/// Dashboard category. Buckets are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashboardBucket {
    Active,
    ActionNeeded,
    SlaRisk,
    Completed,
}

/// Resolved lifecycle of a single case.
///
/// Never stored: it is reproducible from the snapshot, the evaluation time
/// and the prior resolved state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleSummary {
    pub case_id: CaseId,
    pub request_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub lifecycle_state: LifecycleState,
    pub display_label: String,
    pub tone: Tone,
    pub track: Track,
    pub dashboard_bucket: DashboardBucket,
    pub urgency_score: u32,
    pub sla: SlaInfo,
    pub progress: Progress,
    pub next_step: NextStep,
    pub is_terminal: bool,
    pub resolved_from: AuthoritySource,
    pub updated_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_serialize_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&DashboardBucket::ActionNeeded).unwrap(),
            "\"ACTION_NEEDED\""
        );
        assert_eq!(
            serde_json::to_string(&DashboardBucket::SlaRisk).unwrap(),
            "\"SLA_RISK\""
        );
    }
}
