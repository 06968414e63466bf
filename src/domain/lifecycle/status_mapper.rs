//! StatusMapper - raw status column to a candidate lifecycle state.

use super::snapshot::{PublicStatus, RawStatus, Visibility};
use super::state::LifecycleState;

/// Maps persisted status values onto the canonical lifecycle.
///
/// Pure and total: unknown input lands on the first private step.
pub struct StatusMapper;

impl StatusMapper {
    /// Candidate state for a raw status, public track first.
    pub fn map(
        raw: &RawStatus,
        visibility: Visibility,
        public_status: Option<&PublicStatus>,
    ) -> LifecycleState {
        if visibility == Visibility::Public {
            if let Some(state) = Self::map_public(raw, public_status) {
                return state;
            }
        }
        Self::map_private(raw)
    }

    fn map_public(raw: &RawStatus, public_status: Option<&PublicStatus>) -> Option<LifecycleState> {
        match raw {
            RawStatus::Completed => Some(LifecycleState::Completed),
            RawStatus::OpinionReady => Some(LifecycleState::Submitted),
            RawStatus::Submitted => match public_status {
                Some(PublicStatus::PublicOpen) => Some(LifecycleState::Open),
                _ => Some(LifecycleState::Posted),
            },
            RawStatus::Assigned | RawStatus::Claimed => Some(LifecycleState::Claimed),
            _ => None,
        }
    }

    fn map_private(raw: &RawStatus) -> LifecycleState {
        match raw {
            RawStatus::Submitted => LifecycleState::Requested,
            RawStatus::Assigned => LifecycleState::Assigned,
            // Clarification pauses the review; it never moves the case back.
            RawStatus::InReview | RawStatus::ClarificationRequested => LifecycleState::UnderReview,
            RawStatus::OpinionReady | RawStatus::Delivered => LifecycleState::Submitted,
            RawStatus::Completed
            | RawStatus::CaseClosed
            | RawStatus::ClientAcknowledged
            | RawStatus::NoFurtherQueriesConfirmed => LifecycleState::Completed,
            RawStatus::Cancelled | RawStatus::Archived => LifecycleState::Closed,
            RawStatus::Claimed | RawStatus::Other(_) => LifecycleState::Requested,
        }
    }

    /// A delivered opinion shown to the client is displayed as "client review"
    /// on top of the submitted step.
    pub fn is_client_review(raw: &RawStatus, state: LifecycleState) -> bool {
        *raw == RawStatus::Delivered && state == LifecycleState::Submitted
    }
}
