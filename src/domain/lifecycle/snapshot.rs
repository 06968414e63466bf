//! CaseSnapshot - read-only view of a legal request as persisted.
//!
//! Snapshots are built fresh from the external store on every read. Every
//! field tolerates missing or unexpected values so that resolution never has
//! to fail on bad historical data.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{CaseId, LawyerId, Timestamp};

use super::state::Track;

/// Persisted workflow status column.
///
/// Unrecognised values are preserved in `Other` rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RawStatus {
    Submitted,
    Assigned,
    Claimed,
    InReview,
    ClarificationRequested,
    OpinionReady,
    Delivered,
    Completed,
    CaseClosed,
    ClientAcknowledged,
    NoFurtherQueriesConfirmed,
    Cancelled,
    Archived,
    Other(String),
}

impl RawStatus {
    /// Parses a status column value. Never fails.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "submitted" => RawStatus::Submitted,
            "assigned" => RawStatus::Assigned,
            "claimed" => RawStatus::Claimed,
            "in_review" => RawStatus::InReview,
            "clarification_requested" => RawStatus::ClarificationRequested,
            "opinion_ready" => RawStatus::OpinionReady,
            "delivered" => RawStatus::Delivered,
            "completed" => RawStatus::Completed,
            "case_closed" => RawStatus::CaseClosed,
            "client_acknowledged" => RawStatus::ClientAcknowledged,
            "no_further_queries_confirmed" => RawStatus::NoFurtherQueriesConfirmed,
            "cancelled" => RawStatus::Cancelled,
            "archived" => RawStatus::Archived,
            other => RawStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RawStatus::Submitted => "submitted",
            RawStatus::Assigned => "assigned",
            RawStatus::Claimed => "claimed",
            RawStatus::InReview => "in_review",
            RawStatus::ClarificationRequested => "clarification_requested",
            RawStatus::OpinionReady => "opinion_ready",
            RawStatus::Delivered => "delivered",
            RawStatus::Completed => "completed",
            RawStatus::CaseClosed => "case_closed",
            RawStatus::ClientAcknowledged => "client_acknowledged",
            RawStatus::NoFurtherQueriesConfirmed => "no_further_queries_confirmed",
            RawStatus::Cancelled => "cancelled",
            RawStatus::Archived => "archived",
            RawStatus::Other(s) => s,
        }
    }

    /// Returns true unless the value fell through to `Other`.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, RawStatus::Other(_))
    }

    /// The opinion has reached the client; the SLA clock stops here.
    pub fn is_delivered(&self) -> bool {
        matches!(
            self,
            RawStatus::Completed | RawStatus::OpinionReady | RawStatus::Delivered
        )
    }
}

impl From<String> for RawStatus {
    fn from(s: String) -> Self {
        RawStatus::parse(&s)
    }
}

impl From<&str> for RawStatus {
    fn from(s: &str) -> Self {
        RawStatus::parse(s)
    }
}

impl From<RawStatus> for String {
    fn from(status: RawStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for RawStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who can see and pick up the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

impl Visibility {
    /// Track the case travels on.
    pub fn track(&self) -> Track {
        match self {
            Visibility::Private => Track::Private,
            Visibility::Public => Track::Public,
        }
    }
}

impl From<String> for Visibility {
    fn from(s: String) -> Self {
        if s.trim().eq_ignore_ascii_case("public") {
            Visibility::Public
        } else {
            Visibility::Private
        }
    }
}

/// Marketplace sub-state of a public request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PublicStatus {
    PublicOpen,
    LawyersInterested,
    Assigned,
    Expired,
    Other(String),
}

impl PublicStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PublicStatus::PublicOpen => "PUBLIC_OPEN",
            PublicStatus::LawyersInterested => "LAWYERS_INTERESTED",
            PublicStatus::Assigned => "ASSIGNED",
            PublicStatus::Expired => "EXPIRED",
            PublicStatus::Other(s) => s,
        }
    }
}

impl From<String> for PublicStatus {
    fn from(s: String) -> Self {
        match s.trim() {
            "PUBLIC_OPEN" => PublicStatus::PublicOpen,
            "LAWYERS_INTERESTED" => PublicStatus::LawyersInterested,
            "ASSIGNED" => PublicStatus::Assigned,
            "EXPIRED" => PublicStatus::Expired,
            _ => PublicStatus::Other(s),
        }
    }
}

impl From<PublicStatus> for String {
    fn from(status: PublicStatus) -> Self {
        status.as_str().to_string()
    }
}

/// Client-chosen urgency of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Priority::Low,
            "high" => Priority::High,
            "urgent" => Priority::Urgent,
            _ => Priority::Medium,
        }
    }
}

/// One row of the case audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub action: String,
    pub created_at: Timestamp,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
    /// Monotonic writer sequence, when the store provides one.
    #[serde(default)]
    pub sequence: Option<i64>,
}

impl AuditEvent {
    pub fn new(action: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            action: action.into(),
            created_at,
            details: None,
            sequence: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_sequence(mut self, sequence: i64) -> Self {
        self.sequence = Some(sequence);
        self
    }

    /// Target status of a `status_changed` event (`new_status`, else `status`).
    pub fn status_detail(&self) -> Option<&str> {
        let details = self.details.as_ref()?;
        details
            .get("new_status")
            .and_then(|v| v.as_str())
            .or_else(|| details.get("status").and_then(|v| v.as_str()))
    }
}

/// Latest version of the case's legal opinion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpinionVersion {
    pub is_draft: bool,
    #[serde(default)]
    pub submitted_at: Option<Timestamp>,
}

impl OpinionVersion {
    pub fn draft() -> Self {
        Self {
            is_draft: true,
            submitted_at: None,
        }
    }

    pub fn submitted(at: Timestamp) -> Self {
        Self {
            is_draft: false,
            submitted_at: Some(at),
        }
    }

    /// Final and stamped with a submission time.
    pub fn is_submitted(&self) -> bool {
        !self.is_draft && self.submitted_at.is_some()
    }
}

/// Lawyer attached to the case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LawyerRef {
    pub id: LawyerId,
    pub name: String,
}

/// SLA clock pauses recorded by the lawyer workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SlaPause {
    /// Start of the pause currently in progress, if any.
    #[serde(default)]
    pub paused_at: Option<Timestamp>,
    /// Total length of completed pauses.
    #[serde(default)]
    pub accumulated_secs: i64,
}

impl SlaPause {
    pub fn is_active(&self) -> bool {
        self.paused_at.is_some()
    }
}

/// Read-only view of one request, as consumed by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSnapshot {
    pub id: CaseId,
    pub request_number: String,
    #[serde(default)]
    pub title: Option<String>,
    pub raw_status: RawStatus,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub public_status: Option<PublicStatus>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub sla_deadline: Option<Timestamp>,
    #[serde(default)]
    pub sla_pause: Option<SlaPause>,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
    #[serde(default)]
    pub opinion_submitted_at: Option<Timestamp>,
    #[serde(default)]
    pub audit_events: Vec<AuditEvent>,
    #[serde(default)]
    pub latest_opinion_version: Option<OpinionVersion>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub has_pending_clarifications: bool,
    #[serde(default)]
    pub pending_clarification_count: u32,
    #[serde(default)]
    pub pending_document_request_count: u32,
    #[serde(default)]
    pub has_unread_messages: bool,
    #[serde(default)]
    pub rated: bool,
    #[serde(default)]
    pub lawyer: Option<LawyerRef>,
}

impl CaseSnapshot {
    /// Creates a private snapshot with no history, stamped at `created_at`.
    pub fn new(
        id: CaseId,
        request_number: impl Into<String>,
        raw_status: impl Into<RawStatus>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            request_number: request_number.into(),
            title: None,
            raw_status: raw_status.into(),
            visibility: Visibility::Private,
            public_status: None,
            created_at,
            updated_at: created_at,
            sla_deadline: None,
            sla_pause: None,
            completed_at: None,
            opinion_submitted_at: None,
            audit_events: Vec::new(),
            latest_opinion_version: None,
            priority: Priority::Medium,
            has_pending_clarifications: false,
            pending_clarification_count: 0,
            pending_document_request_count: 0,
            has_unread_messages: false,
            rated: false,
            lawyer: None,
        }
    }

    pub fn public(mut self, public_status: Option<PublicStatus>) -> Self {
        self.visibility = Visibility::Public;
        self.public_status = public_status;
        self
    }

    pub fn with_deadline(mut self, deadline: Timestamp) -> Self {
        self.sla_deadline = Some(deadline);
        self
    }

    pub fn with_pause(mut self, pause: SlaPause) -> Self {
        self.sla_pause = Some(pause);
        self
    }

    pub fn with_event(mut self, event: AuditEvent) -> Self {
        self.audit_events.push(event);
        self
    }

    pub fn with_opinion(mut self, opinion: OpinionVersion) -> Self {
        self.latest_opinion_version = Some(opinion);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_lawyer(mut self, lawyer: LawyerRef) -> Self {
        self.lawyer = Some(lawyer);
        self
    }

    pub fn with_pending_clarifications(mut self, count: u32) -> Self {
        self.pending_clarification_count = count;
        self.has_pending_clarifications = count > 0;
        self
    }

    pub fn with_pending_document_requests(mut self, count: u32) -> Self {
        self.pending_document_request_count = count;
        self
    }

    pub fn rated(mut self, rated: bool) -> Self {
        self.rated = rated;
        self
    }

    pub fn track(&self) -> Track {
        self.visibility.track()
    }
}
