//! LifecycleResolver - runs the full resolution pipeline for one or many cases.
//!
//! authority -> regression guard -> progress / SLA / next action -> summary.
//! Every step is pure; the only input besides the snapshot is the
//! evaluation instant and an optional previously resolved state.

use tracing::{debug, warn};

use super::authority::AuthorityResolver;
use super::next_action::{NextActionKind, NextActionResolver, NextStep};
use super::progress::ProgressCalculator;
use super::regression_guard::RegressionGuard;
use super::sla::{SlaEvaluator, SlaInfo, SlaPauseMode, SlaStatus};
use super::snapshot::{CaseSnapshot, Priority};
use super::state::{LifecycleState, CLIENT_REVIEW_LABEL};
use super::status_mapper::StatusMapper;
use super::summary::{DashboardBucket, LifecycleSummary};
use crate::domain::foundation::{StateMachine, Timestamp};

#[derive(Debug, Clone, Copy, Default)]
pub struct LifecycleResolver {
    sla: SlaEvaluator,
}

impl LifecycleResolver {
    pub fn new(pause_mode: SlaPauseMode) -> Self {
        Self {
            sla: SlaEvaluator::new(pause_mode),
        }
    }

    pub fn pause_mode(&self) -> SlaPauseMode {
        self.sla.pause_mode()
    }

    /// Resolves one snapshot.
    pub fn resolve(
        &self,
        snapshot: &CaseSnapshot,
        now: Timestamp,
        prior: Option<LifecycleState>,
    ) -> LifecycleSummary {
        if !snapshot.raw_status.is_recognized() {
            warn!(
                case_id = %snapshot.id,
                raw_status = %snapshot.raw_status,
                "Unrecognized status, defaulting to first step"
            );
        }

        let decision = AuthorityResolver::resolve(snapshot);
        let state = RegressionGuard::apply(prior, decision.state);
        if RegressionGuard::holds(prior, decision.state) {
            debug!(
                case_id = %snapshot.id,
                prior = %state,
                candidate = %decision.state,
                "Terminal prior state held"
            );
        } else if let Some(prior) = prior {
            if prior != state && !prior.can_transition_to(&state) {
                debug!(
                    case_id = %snapshot.id,
                    prior = %prior,
                    resolved = %state,
                    "Resolved state moved outside the forward transition set"
                );
            }
        }

        let track = snapshot.track();
        let progress = ProgressCalculator::calculate(state, track);
        let sla = self.sla.evaluate(snapshot, state, now);
        let next_step = NextActionResolver::resolve(state, snapshot);
        let is_terminal = state.is_terminal();

        let display_label = if StatusMapper::is_client_review(&snapshot.raw_status, state) {
            CLIENT_REVIEW_LABEL.to_string()
        } else {
            state.label().to_string()
        };

        let dashboard_bucket = Self::bucket(&sla, &next_step, state);
        let urgency_score = Self::urgency_score(snapshot.priority, &sla, next_step.kind, state);

        debug!(
            case_id = %snapshot.id,
            state = %state,
            source = ?decision.source,
            bucket = ?dashboard_bucket,
            urgency_score,
            "Resolved case lifecycle"
        );

        LifecycleSummary {
            case_id: snapshot.id,
            request_number: snapshot.request_number.clone(),
            title: snapshot.title.clone(),
            lifecycle_state: state,
            display_label,
            tone: state.tone(),
            track,
            dashboard_bucket,
            urgency_score,
            sla,
            progress,
            next_step,
            is_terminal,
            resolved_from: decision.source,
            updated_at: snapshot.updated_at,
        }
    }

    /// Resolves every snapshot independently, most urgent first.
    ///
    /// Ties break on `updated_at`, newest first.
    pub fn resolve_batch(&self, snapshots: &[CaseSnapshot], now: Timestamp) -> Vec<LifecycleSummary> {
        let mut summaries: Vec<LifecycleSummary> = snapshots
            .iter()
            .map(|s| self.resolve(s, now, None))
            .collect();
        Self::sort_by_urgency(&mut summaries);
        summaries
    }

    pub fn sort_by_urgency(summaries: &mut [LifecycleSummary]) {
        summaries.sort_by(|a, b| {
            b.urgency_score
                .cmp(&a.urgency_score)
                .then_with(|| b.updated_at.cmp(&a.updated_at))
        });
    }

    /// Dashboard bucket, first match wins.
    pub fn bucket(sla: &SlaInfo, next_step: &NextStep, state: LifecycleState) -> DashboardBucket {
        if sla.status.is_risk() {
            DashboardBucket::SlaRisk
        } else if next_step.is_client_urgent() {
            DashboardBucket::ActionNeeded
        } else if state.is_terminal() {
            DashboardBucket::Completed
        } else {
            DashboardBucket::Active
        }
    }

    /// Sort key: higher is more urgent. Terminal cases always score zero.
    pub fn urgency_score(
        priority: Priority,
        sla: &SlaInfo,
        action: NextActionKind,
        state: LifecycleState,
    ) -> u32 {
        if state.is_terminal() {
            return 0;
        }

        let base = match priority {
            Priority::Low => 25,
            Priority::Medium => 50,
            Priority::High => 75,
            Priority::Urgent => 100,
        };
        let sla_term = match sla.status {
            SlaStatus::Overdue => 200,
            SlaStatus::AtRisk => 150,
            _ => 0,
        };
        let action_term = match action {
            NextActionKind::RespondToClarification => 100,
            NextActionKind::ReviewOpinion => 50,
            _ => 0,
        };

        base + sla_term + action_term
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::CaseId;
    use crate::domain::lifecycle::authority::AuthoritySource;
    use crate::domain::lifecycle::next_action::ActorType;
    use crate::domain::lifecycle::snapshot::{AuditEvent, OpinionVersion, PublicStatus};
    use proptest::prelude::*;
    use serde_json::json;

    fn now() -> Timestamp {
        Timestamp::parse_rfc3339("2024-05-20T10:00:00Z").unwrap()
    }

    fn snapshot(raw: &str) -> CaseSnapshot {
        CaseSnapshot::new(CaseId::new(), "REQ-100", raw, now().minus_days(2))
    }

    fn resolver() -> LifecycleResolver {
        LifecycleResolver::default()
    }

    // ───────────────────────────────────────────────────────────────
    // Scenarios
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn private_assigned_case() {
        let summary = resolver().resolve(&snapshot("assigned"), now(), None);
        assert_eq!(summary.lifecycle_state, LifecycleState::Assigned);
        assert_eq!(summary.progress.current_step, 2);
        assert_eq!(summary.progress.total_steps, 5);
        assert_eq!(summary.progress.percentage.value(), 40);
        assert_eq!(summary.next_step.title, "Lawyer Reviewing");
        assert_eq!(summary.next_step.actor, ActorType::Lawyer);
        assert!(!summary.next_step.urgent);
    }

    #[test]
    fn public_open_case() {
        let s = snapshot("submitted").public(Some(PublicStatus::PublicOpen));
        let summary = resolver().resolve(&s, now(), None);
        assert_eq!(summary.lifecycle_state, LifecycleState::Open);
        assert_eq!(summary.progress.current_step, 2);
        assert_eq!(summary.progress.total_steps, 6);
        assert_eq!(summary.progress.percentage.value(), 33);
        assert_eq!(summary.dashboard_bucket, DashboardBucket::Active);
    }

    #[test]
    fn deadline_five_hours_out_is_sla_risk() {
        let s = snapshot("in_review").with_deadline(now().plus_hours(5));
        let summary = resolver().resolve(&s, now(), None);
        assert_eq!(summary.sla.status, SlaStatus::AtRisk);
        assert_eq!(summary.sla.text, "Due in 5h");
        assert_eq!(summary.dashboard_bucket, DashboardBucket::SlaRisk);
    }

    #[test]
    fn acknowledged_in_audit_log_completes_case() {
        let s = snapshot("opinion_ready").with_event(
            AuditEvent::new("status_changed", now().plus_hours(-1))
                .with_details(json!({"new_status": "client_acknowledged"})),
        );
        let summary = resolver().resolve(&s, now(), None);
        assert_eq!(summary.lifecycle_state, LifecycleState::Completed);
        assert_eq!(summary.dashboard_bucket, DashboardBucket::Completed);
        assert_eq!(summary.sla.status, SlaStatus::Completed);
        assert_eq!(summary.sla.text, "Delivered");
        assert_eq!(summary.resolved_from, AuthoritySource::AuditLog);
    }

    #[test]
    fn unrated_completed_case_prompts_rating() {
        let summary = resolver().resolve(&snapshot("completed"), now(), None);
        assert_eq!(summary.next_step.title, "Rate Service");
        assert_eq!(summary.next_step.actor, ActorType::Client);
        assert!(!summary.next_step.urgent);
        assert_eq!(summary.dashboard_bucket, DashboardBucket::Completed);
        assert_eq!(summary.urgency_score, 0);
    }

    // ───────────────────────────────────────────────────────────────
    // Ordering rules
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn audit_close_beats_in_review_status() {
        let s = snapshot("in_review").with_event(AuditEvent::new("case_closed", now()));
        assert_eq!(
            resolver().resolve(&s, now(), None).lifecycle_state,
            LifecycleState::Completed
        );
    }

    #[test]
    fn audit_close_beats_stale_clarification_status() {
        let s = snapshot("clarification_requested")
            .with_event(AuditEvent::new("case_closed", now()));
        let summary = resolver().resolve(&s, now(), None);
        assert_eq!(summary.lifecycle_state, LifecycleState::Completed);
        assert_eq!(summary.resolved_from, AuthoritySource::AuditLog);
        assert_eq!(summary.next_step.kind, NextActionKind::RateService);
        assert_eq!(summary.dashboard_bucket, DashboardBucket::Completed);
        assert_eq!(summary.urgency_score, 0);
    }

    #[test]
    fn terminal_prior_with_stale_clarification_status_stays_completed() {
        let summary = resolver().resolve(
            &snapshot("clarification_requested"),
            now(),
            Some(LifecycleState::Completed),
        );
        assert_eq!(summary.lifecycle_state, LifecycleState::Completed);
        assert!(!summary.next_step.urgent);
        assert_eq!(summary.dashboard_bucket, DashboardBucket::Completed);
        assert_eq!(summary.urgency_score, 0);
    }

    #[test]
    fn clarification_request_beats_ready_opinion() {
        let s = snapshot("clarification_requested").with_opinion(OpinionVersion::submitted(now()));
        let summary = resolver().resolve(&s, now(), None);
        assert_eq!(summary.lifecycle_state, LifecycleState::Submitted);
        assert_eq!(summary.next_step.title, "Respond to Clarification");
        assert_eq!(summary.dashboard_bucket, DashboardBucket::ActionNeeded);
    }

    #[test]
    fn terminal_prior_is_never_regressed() {
        let summary = resolver().resolve(&snapshot("in_review"), now(), Some(LifecycleState::Completed));
        assert_eq!(summary.lifecycle_state, LifecycleState::Completed);
        assert!(summary.is_terminal);
    }

    #[test]
    fn delivered_opinion_shows_client_review_label() {
        let summary = resolver().resolve(&snapshot("delivered"), now(), None);
        assert_eq!(summary.lifecycle_state, LifecycleState::Submitted);
        assert_eq!(summary.display_label, CLIENT_REVIEW_LABEL);
        assert_eq!(summary.display_label, "In Review");
        assert_eq!(summary.progress.label, "Opinion Ready");
    }

    #[test]
    fn sla_risk_outranks_action_needed() {
        let s = snapshot("opinion_ready")
            .with_pending_clarifications(1)
            .with_deadline(now().plus_hours(-3));
        let summary = resolver().resolve(&s, now(), None);
        // delivered status stops the clock, so the action bucket applies
        assert_eq!(summary.dashboard_bucket, DashboardBucket::ActionNeeded);

        let s = snapshot("in_review")
            .with_pending_clarifications(1)
            .with_deadline(now().plus_hours(-3));
        let summary = resolver().resolve(&s, now(), None);
        assert_eq!(summary.dashboard_bucket, DashboardBucket::SlaRisk);
    }

    // ───────────────────────────────────────────────────────────────
    // Urgency
    // ───────────────────────────────────────────────────────────────

    #[test]
    fn urgency_combines_priority_sla_and_action() {
        let s = snapshot("clarification_requested")
            .with_priority(Priority::Urgent)
            .with_deadline(now().plus_hours(-1));
        assert_eq!(resolver().resolve(&s, now(), None).urgency_score, 100 + 200 + 100);

        let s = snapshot("opinion_ready").with_priority(Priority::Low);
        assert_eq!(resolver().resolve(&s, now(), None).urgency_score, 25 + 50);

        let s = snapshot("assigned").with_deadline(now().plus_hours(10));
        assert_eq!(resolver().resolve(&s, now(), None).urgency_score, 50 + 150);
    }

    #[test]
    fn batch_sorts_by_urgency_then_recency() {
        let mut calm_old = snapshot("assigned");
        calm_old.updated_at = now().minus_days(5);
        let mut calm_new = snapshot("assigned");
        calm_new.updated_at = now().minus_days(1);
        let hot = snapshot("in_review").with_deadline(now().plus_hours(-2));
        let done = snapshot("completed");

        let summaries = resolver().resolve_batch(
            &[calm_old.clone(), done.clone(), hot.clone(), calm_new.clone()],
            now(),
        );
        let ids: Vec<_> = summaries.iter().map(|s| s.case_id).collect();
        assert_eq!(ids, vec![hot.id, calm_new.id, calm_old.id, done.id]);
    }

    #[test]
    fn batch_of_nothing_is_empty() {
        assert!(resolver().resolve_batch(&[], now()).is_empty());
    }

    // ───────────────────────────────────────────────────────────────
    // Properties
    // ───────────────────────────────────────────────────────────────

    fn any_state() -> impl Strategy<Value = LifecycleState> {
        prop::sample::select(LifecycleState::ALL.to_vec())
    }

    fn any_raw_status() -> impl Strategy<Value = String> {
        prop::sample::select(vec![
            "submitted",
            "assigned",
            "claimed",
            "in_review",
            "clarification_requested",
            "opinion_ready",
            "delivered",
            "completed",
            "case_closed",
            "cancelled",
            "archived",
            "mystery",
        ])
        .prop_map(str::to_string)
    }

    fn any_snapshot() -> impl Strategy<Value = CaseSnapshot> {
        (
            any_raw_status(),
            any::<bool>(),
            prop::option::of(-72i64..240),
            prop::option::of(prop::sample::select(vec![
                "case_closed",
                "completed",
                "cancelled",
                "note_added",
            ])),
            prop::option::of(any::<bool>()),
            0u32..3,
        )
            .prop_map(|(raw, public, deadline, action, draft, clarifications)| {
                let mut s = CaseSnapshot::new(CaseId::new(), "REQ-P", raw.as_str(), now().minus_days(1));
                if public {
                    s = s.public(Some(PublicStatus::PublicOpen));
                }
                if let Some(h) = deadline {
                    s = s.with_deadline(now().plus_hours(h));
                }
                if let Some(action) = action {
                    s = s.with_event(AuditEvent::new(action, now().plus_hours(-1)));
                }
                if let Some(draft) = draft {
                    s = s.with_opinion(if draft {
                        OpinionVersion::draft()
                    } else {
                        OpinionVersion::submitted(now())
                    });
                }
                s.with_pending_clarifications(clarifications)
            })
    }

    proptest! {
        #[test]
        fn resolution_is_idempotent(s in any_snapshot(), prior in prop::option::of(any_state())) {
            let r = resolver();
            prop_assert_eq!(r.resolve(&s, now(), prior), r.resolve(&s, now(), prior));
        }

        #[test]
        fn terminal_prior_survives_recomputation(s in any_snapshot(), closed in any::<bool>()) {
            let prior = if closed { LifecycleState::Closed } else { LifecycleState::Completed };
            let summary = resolver().resolve(&s, now(), Some(prior));
            prop_assert_eq!(summary.lifecycle_state, prior);
            prop_assert_eq!(summary.dashboard_bucket, DashboardBucket::Completed);
        }

        #[test]
        fn terminal_summaries_score_zero(s in any_snapshot()) {
            let summary = resolver().resolve(&s, now(), None);
            if summary.is_terminal {
                prop_assert_eq!(summary.urgency_score, 0);
                prop_assert_eq!(summary.sla.status, SlaStatus::Completed);
            }
        }

        #[test]
        fn resolved_state_feeds_back_as_stable_prior(s in any_snapshot()) {
            let r = resolver();
            let first = r.resolve(&s, now(), None);
            let second = r.resolve(&s, now(), Some(first.lifecycle_state));
            prop_assert_eq!(first.lifecycle_state, second.lifecycle_state);
        }
    }
}
