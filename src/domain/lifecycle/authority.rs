//! AuthorityResolver - picks the most trustworthy of the conflicting signals.
//!
//! Priority, highest first:
//! 1. Terminal audit-log events, scanned most recent first.
//! 2. A terminal status column (explicit close recorded on the row itself).
//! 3. Opinion version state.
//! 4. The status column through [`StatusMapper`].

use std::cmp::Ordering;

use serde::Serialize;

use super::snapshot::{AuditEvent, CaseSnapshot, OpinionVersion};
use super::state::LifecycleState;
use super::status_mapper::StatusMapper;
use crate::domain::foundation::StateMachine;

/// Audit actions that complete a case outright.
pub const COMPLETING_ACTIONS: &[&str] = &["case_closed", "completed"];

/// Audit actions that close a case without completing it.
pub const CLOSING_ACTIONS: &[&str] = &["cancelled", "archived"];

/// `status_changed` targets that count as completion.
pub const COMPLETING_STATUS_CHANGES: &[&str] = &["completed", "case_closed", "client_acknowledged"];

/// Which signal decided the resolved state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthoritySource {
    AuditLog,
    StatusColumnTerminal,
    Opinion,
    StatusColumn,
}

/// Resolved state together with the tier that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorityDecision {
    pub state: LifecycleState,
    pub source: AuthoritySource,
}

pub struct AuthorityResolver;

impl AuthorityResolver {
    /// Resolves the authoritative state of a snapshot.
    pub fn resolve(snapshot: &CaseSnapshot) -> AuthorityDecision {
        if let Some(state) = Self::from_audit_log(&snapshot.audit_events) {
            return AuthorityDecision {
                state,
                source: AuthoritySource::AuditLog,
            };
        }

        let mapped = StatusMapper::map(
            &snapshot.raw_status,
            snapshot.visibility,
            snapshot.public_status.as_ref(),
        );
        if mapped.is_terminal() {
            return AuthorityDecision {
                state: mapped,
                source: AuthoritySource::StatusColumnTerminal,
            };
        }

        if let Some(state) = Self::from_opinion(snapshot.latest_opinion_version.as_ref()) {
            return AuthorityDecision {
                state,
                source: AuthoritySource::Opinion,
            };
        }

        AuthorityDecision {
            state: mapped,
            source: AuthoritySource::StatusColumn,
        }
    }

    /// First terminal signal found walking the log most recent first.
    pub fn from_audit_log(events: &[AuditEvent]) -> Option<LifecycleState> {
        Self::most_recent_first(events)
            .into_iter()
            .find_map(Self::terminal_state_of)
    }

    fn terminal_state_of(event: &AuditEvent) -> Option<LifecycleState> {
        let action = event.action.as_str();
        if COMPLETING_ACTIONS.contains(&action) {
            return Some(LifecycleState::Completed);
        }
        if CLOSING_ACTIONS.contains(&action) {
            return Some(LifecycleState::Closed);
        }
        if action == "status_changed" {
            if let Some(target) = event.status_detail() {
                if COMPLETING_STATUS_CHANGES.contains(&target) {
                    return Some(LifecycleState::Completed);
                }
            }
        }
        None
    }

    /// Orders events newest first.
    ///
    /// When every event carries a writer sequence number that sequence is the
    /// only key; otherwise `created_at` leads and the sequence breaks ties.
    pub fn most_recent_first(events: &[AuditEvent]) -> Vec<&AuditEvent> {
        let mut ordered: Vec<&AuditEvent> = events.iter().collect();
        let fully_sequenced = !events.is_empty() && events.iter().all(|e| e.sequence.is_some());

        if fully_sequenced {
            ordered.sort_by(|a, b| b.sequence.cmp(&a.sequence));
        } else {
            ordered.sort_by(|a, b| match b.created_at.cmp(&a.created_at) {
                Ordering::Equal => b.sequence.cmp(&a.sequence),
                other => other,
            });
        }
        ordered
    }

    /// State implied by the latest opinion version, if any.
    pub fn from_opinion(opinion: Option<&OpinionVersion>) -> Option<LifecycleState> {
        let opinion = opinion?;
        if opinion.is_submitted() {
            Some(LifecycleState::Submitted)
        } else if opinion.is_draft {
            Some(LifecycleState::UnderReview)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{CaseId, Timestamp};
    use serde_json::json;

    fn base() -> Timestamp {
        Timestamp::parse_rfc3339("2024-03-01T09:00:00Z").unwrap()
    }

    fn snapshot(raw: &str) -> CaseSnapshot {
        CaseSnapshot::new(CaseId::new(), "REQ-1", raw, base())
    }

    #[test]
    fn case_closed_event_beats_in_review_status() {
        let s = snapshot("in_review").with_event(AuditEvent::new("case_closed", base().plus_hours(2)));
        let decision = AuthorityResolver::resolve(&s);
        assert_eq!(decision.state, LifecycleState::Completed);
        assert_eq!(decision.source, AuthoritySource::AuditLog);
    }

    #[test]
    fn client_acknowledged_status_change_completes() {
        let s = snapshot("opinion_ready").with_event(
            AuditEvent::new("status_changed", base().plus_hours(1))
                .with_details(json!({"new_status": "client_acknowledged"})),
        );
        assert_eq!(AuthorityResolver::resolve(&s).state, LifecycleState::Completed);
    }

    #[test]
    fn legacy_status_key_is_honoured() {
        let s = snapshot("in_review").with_event(
            AuditEvent::new("status_changed", base()).with_details(json!({"status": "case_closed"})),
        );
        assert_eq!(AuthorityResolver::resolve(&s).state, LifecycleState::Completed);
    }

    #[test]
    fn non_terminal_events_fall_through_to_lower_tiers() {
        let s = snapshot("assigned")
            .with_event(AuditEvent::new("document_uploaded", base()))
            .with_event(
                AuditEvent::new("status_changed", base().plus_hours(1))
                    .with_details(json!({"new_status": "in_review"})),
            );
        let decision = AuthorityResolver::resolve(&s);
        assert_eq!(decision.state, LifecycleState::Assigned);
        assert_eq!(decision.source, AuthoritySource::StatusColumn);
    }

    #[test]
    fn most_recent_terminal_event_wins() {
        let s = snapshot("in_review")
            .with_event(AuditEvent::new("completed", base()))
            .with_event(AuditEvent::new("cancelled", base().plus_hours(5)));
        assert_eq!(AuthorityResolver::resolve(&s).state, LifecycleState::Closed);
    }

    #[test]
    fn sequence_numbers_override_skewed_timestamps() {
        // Writer clocks disagree: the later sequence carries the older timestamp.
        let events = vec![
            AuditEvent::new("completed", base().plus_hours(3)).with_sequence(1),
            AuditEvent::new("archived", base()).with_sequence(2),
        ];
        assert_eq!(
            AuthorityResolver::from_audit_log(&events),
            Some(LifecycleState::Closed)
        );
    }

    #[test]
    fn sequence_breaks_timestamp_ties_when_partially_sequenced() {
        let events = vec![
            AuditEvent::new("note_added", base()),
            AuditEvent::new("completed", base().plus_hours(1)).with_sequence(4),
            AuditEvent::new("cancelled", base().plus_hours(1)).with_sequence(9),
        ];
        let ordered = AuthorityResolver::most_recent_first(&events);
        assert_eq!(ordered[0].action, "cancelled");
        assert_eq!(ordered[2].action, "note_added");
    }

    #[test]
    fn empty_audit_log_skips_tier() {
        assert_eq!(AuthorityResolver::from_audit_log(&[]), None);
    }

    #[test]
    fn submitted_opinion_beats_status_column() {
        let s = snapshot("in_review").with_opinion(OpinionVersion::submitted(base()));
        let decision = AuthorityResolver::resolve(&s);
        assert_eq!(decision.state, LifecycleState::Submitted);
        assert_eq!(decision.source, AuthoritySource::Opinion);
    }

    #[test]
    fn draft_opinion_means_under_review() {
        let s = snapshot("assigned").with_opinion(OpinionVersion::draft());
        assert_eq!(AuthorityResolver::resolve(&s).state, LifecycleState::UnderReview);
    }

    #[test]
    fn unstamped_final_opinion_is_ignored() {
        let opinion = OpinionVersion {
            is_draft: false,
            submitted_at: None,
        };
        assert_eq!(AuthorityResolver::from_opinion(Some(&opinion)), None);
    }

    #[test]
    fn terminal_status_column_is_not_downgraded_by_opinion() {
        let s = snapshot("completed").with_opinion(OpinionVersion::submitted(base()));
        let decision = AuthorityResolver::resolve(&s);
        assert_eq!(decision.state, LifecycleState::Completed);
        assert_eq!(decision.source, AuthoritySource::StatusColumnTerminal);
    }
}
