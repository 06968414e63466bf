//! NextActionResolver - the single most relevant thing someone should do next.
//!
//! Rules are evaluated in order and the first match wins. Blocking client
//! work comes first, then ready deliverables, then rating prompts, then
//! status-only messages.

use serde::{Deserialize, Serialize};

use super::snapshot::{CaseSnapshot, RawStatus};
use super::state::LifecycleState;
use crate::domain::foundation::StateMachine;

/// Who is expected to act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorType {
    Client,
    Lawyer,
    System,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionPriority {
    Low,
    Medium,
    High,
}

/// Identifies which rule produced the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextActionKind {
    RespondToClarification,
    ReviewOpinion,
    RateService,
    WaitingForAssignment,
    WaitingForClaims,
    LawyerReviewing,
    DraftingOpinion,
    NoActionNeeded,
}

impl NextActionKind {
    pub fn title(&self) -> &'static str {
        match self {
            NextActionKind::RespondToClarification => "Respond to Clarification",
            NextActionKind::ReviewOpinion => "Review Opinion",
            NextActionKind::RateService => "Rate Service",
            NextActionKind::WaitingForAssignment => "Waiting for Assignment",
            NextActionKind::WaitingForClaims => "Waiting for Claims",
            NextActionKind::LawyerReviewing => "Lawyer Reviewing",
            NextActionKind::DraftingOpinion => "Drafting Opinion",
            NextActionKind::NoActionNeeded => "No Action Needed",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            NextActionKind::RespondToClarification => "Your lawyer needs additional information.",
            NextActionKind::ReviewOpinion => "Your legal opinion is ready for review.",
            NextActionKind::RateService => "Let us know how your lawyer did.",
            NextActionKind::WaitingForAssignment => "We are finding the best lawyer for your case.",
            NextActionKind::WaitingForClaims => "Lawyers are reviewing your request.",
            NextActionKind::LawyerReviewing => "Your lawyer is reviewing the case details.",
            NextActionKind::DraftingOpinion => "Your lawyer is preparing the legal opinion.",
            NextActionKind::NoActionNeeded => "Current status does not require action.",
        }
    }

    pub fn actor(&self) -> ActorType {
        match self {
            NextActionKind::RespondToClarification
            | NextActionKind::ReviewOpinion
            | NextActionKind::RateService => ActorType::Client,
            NextActionKind::WaitingForAssignment | NextActionKind::WaitingForClaims => {
                ActorType::System
            }
            NextActionKind::LawyerReviewing | NextActionKind::DraftingOpinion => ActorType::Lawyer,
            NextActionKind::NoActionNeeded => ActorType::None,
        }
    }

    pub fn is_urgent(&self) -> bool {
        matches!(
            self,
            NextActionKind::RespondToClarification | NextActionKind::ReviewOpinion
        )
    }

    pub fn priority(&self) -> ActionPriority {
        if self.is_urgent() {
            return ActionPriority::High;
        }
        match self.actor() {
            ActorType::Client | ActorType::Lawyer => ActionPriority::Medium,
            ActorType::System | ActorType::None => ActionPriority::Low,
        }
    }

    /// Call to action shown on client-facing actions.
    fn action(&self) -> Option<(&'static str, &'static str)> {
        match self {
            NextActionKind::RespondToClarification => Some(("Respond", "?tab=clarifications")),
            NextActionKind::ReviewOpinion => Some(("View Opinion", "?tab=opinion")),
            NextActionKind::RateService => Some(("Rate Lawyer", "?tab=review")),
            _ => None,
        }
    }
}

/// Recommended next step for a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextStep {
    pub kind: NextActionKind,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    #[serde(rename = "type")]
    pub actor: ActorType,
    pub priority: ActionPriority,
    pub urgent: bool,
}

impl From<NextActionKind> for NextStep {
    fn from(kind: NextActionKind) -> Self {
        let action = kind.action();
        Self {
            kind,
            title: kind.title().to_string(),
            description: kind.description().to_string(),
            action_label: action.map(|(label, _)| label.to_string()),
            action_url: action.map(|(_, url)| url.to_string()),
            actor: kind.actor(),
            priority: kind.priority(),
            urgent: kind.is_urgent(),
        }
    }
}

impl NextStep {
    /// Urgent work waiting on the client.
    pub fn is_client_urgent(&self) -> bool {
        self.actor == ActorType::Client && self.urgent
    }
}

pub struct NextActionResolver;

impl NextActionResolver {
    pub fn resolve(state: LifecycleState, snapshot: &CaseSnapshot) -> NextStep {
        Self::kind(state, snapshot).into()
    }

    pub fn kind(state: LifecycleState, snapshot: &CaseSnapshot) -> NextActionKind {
        let terminal = state.is_terminal();

        if !terminal
            && (snapshot.raw_status == RawStatus::ClarificationRequested
                || snapshot.has_pending_clarifications)
        {
            return NextActionKind::RespondToClarification;
        }
        if state == LifecycleState::Submitted
            || (snapshot.raw_status == RawStatus::OpinionReady && !terminal)
        {
            return NextActionKind::ReviewOpinion;
        }

        match state {
            LifecycleState::Completed if !snapshot.rated => NextActionKind::RateService,
            LifecycleState::Requested | LifecycleState::Posted => {
                NextActionKind::WaitingForAssignment
            }
            LifecycleState::Open => NextActionKind::WaitingForClaims,
            LifecycleState::Assigned | LifecycleState::Claimed => NextActionKind::LawyerReviewing,
            LifecycleState::UnderReview => NextActionKind::DraftingOpinion,
            _ => NextActionKind::NoActionNeeded,
        }
    }
}
