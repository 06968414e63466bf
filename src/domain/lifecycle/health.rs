//! CaseHealth - whether the case is blocked waiting on the client.

use serde::{Deserialize, Serialize};

use super::snapshot::CaseSnapshot;
use super::state::LifecycleState;
use crate::domain::foundation::StateMachine;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseHealth {
    pub is_blocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
    pub pending_clarifications_count: u32,
    pub pending_document_requests_count: u32,
}

impl CaseHealth {
    /// Clarifications take precedence over document requests. Terminal cases
    /// are never blocked.
    pub fn assess(snapshot: &CaseSnapshot, state: LifecycleState) -> Self {
        let clarifications = snapshot.pending_clarification_count;
        let documents = snapshot.pending_document_request_count;

        let block_reason = if state.is_terminal() {
            None
        } else if clarifications > 0 {
            Some(format!(
                "{} {} need your response",
                clarifications,
                if clarifications > 1 { "clarifications" } else { "clarification" }
            ))
        } else if documents > 0 {
            Some(format!(
                "{} {} requested",
                documents,
                if documents > 1 { "documents" } else { "document" }
            ))
        } else {
            None
        };

        Self {
            is_blocked: block_reason.is_some(),
            block_reason,
            pending_clarifications_count: clarifications,
            pending_document_requests_count: documents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{CaseId, Timestamp};

    fn snapshot() -> CaseSnapshot {
        CaseSnapshot::new(CaseId::new(), "REQ-9", "in_review", Timestamp::now())
    }

    #[test]
    fn healthy_case_is_not_blocked() {
        let health = CaseHealth::assess(&snapshot(), LifecycleState::UnderReview);
        assert!(!health.is_blocked);
        assert_eq!(health.block_reason, None);
    }

    #[test]
    fn single_clarification_uses_singular() {
        let s = snapshot().with_pending_clarifications(1);
        let health = CaseHealth::assess(&s, LifecycleState::UnderReview);
        assert!(health.is_blocked);
        assert_eq!(
            health.block_reason.as_deref(),
            Some("1 clarification need your response")
        );
    }

    #[test]
    fn clarifications_take_precedence_over_documents() {
        let s = snapshot()
            .with_pending_clarifications(3)
            .with_pending_document_requests(2);
        let health = CaseHealth::assess(&s, LifecycleState::UnderReview);
        assert_eq!(
            health.block_reason.as_deref(),
            Some("3 clarifications need your response")
        );
        assert_eq!(health.pending_document_requests_count, 2);
    }

    #[test]
    fn document_requests_block() {
        let s = snapshot().with_pending_document_requests(2);
        let health = CaseHealth::assess(&s, LifecycleState::Assigned);
        assert_eq!(health.block_reason.as_deref(), Some("2 documents requested"));
    }

    #[test]
    fn terminal_case_is_never_blocked() {
        let s = snapshot().with_pending_clarifications(2);
        let health = CaseHealth::assess(&s, LifecycleState::Closed);
        assert!(!health.is_blocked);
        assert_eq!(health.pending_clarifications_count, 2);
    }
}
