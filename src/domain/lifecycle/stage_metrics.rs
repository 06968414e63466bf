//! StageMetrics - time spent in each workflow stage, derived from the audit log.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::snapshot::AuditEvent;
use crate::domain::foundation::Timestamp;

/// Stage a case is in before its first recorded status change.
pub const INITIAL_STAGE: &str = "requested";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDuration {
    pub stage: String,
    pub seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageMetrics {
    /// Stages in order of first entry. Re-entered stages accumulate.
    pub stages: Vec<StageDuration>,
    pub current_stage: String,
    pub total_seconds: i64,
}

impl StageMetrics {
    /// Computes stage durations, measuring the open stage up to `now`.
    ///
    /// Returns `None` for an empty audit log.
    pub fn from_events(events: &[AuditEvent], now: Timestamp) -> Option<Self> {
        let mut ordered: Vec<&AuditEvent> = events.iter().collect();
        ordered.sort_by(|a, b| match a.created_at.cmp(&b.created_at) {
            Ordering::Equal => a.sequence.cmp(&b.sequence),
            other => other,
        });

        let first = ordered.first()?;
        let mut metrics = Self {
            stages: Vec::new(),
            current_stage: INITIAL_STAGE.to_string(),
            total_seconds: 0,
        };
        let mut stage_start = first.created_at;

        for event in ordered.iter().filter(|e| e.action == "status_changed") {
            let next_stage = event
                .details
                .as_ref()
                .and_then(|d| d.get("new_status"))
                .and_then(|v| v.as_str());
            let Some(next_stage) = next_stage else {
                continue;
            };
            let elapsed = event.created_at.duration_since(&stage_start).num_seconds();
            metrics.record(elapsed);
            metrics.current_stage = next_stage.to_string();
            stage_start = event.created_at;
        }

        let open = now.duration_since(&stage_start).num_seconds().max(0);
        metrics.record(open);
        Some(metrics)
    }

    fn record(&mut self, seconds: i64) {
        let seconds = seconds.max(0);
        self.total_seconds += seconds;
        let current = &self.current_stage;
        match self.stages.iter().position(|s| &s.stage == current) {
            Some(idx) => self.stages[idx].seconds += seconds,
            None => self.stages.push(StageDuration {
                stage: current.clone(),
                seconds,
            }),
        }
    }

    pub fn seconds_in(&self, stage: &str) -> i64 {
        self.stages
            .iter()
            .find(|s| s.stage == stage)
            .map(|s| s.seconds)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn t0() -> Timestamp {
        Timestamp::parse_rfc3339("2024-02-01T08:00:00Z").unwrap()
    }

    fn change(to: &str, hours: i64) -> AuditEvent {
        AuditEvent::new("status_changed", t0().plus_hours(hours)).with_details(json!({"new_status": to}))
    }

    #[test]
    fn empty_log_has_no_metrics() {
        assert_eq!(StageMetrics::from_events(&[], t0()), None);
    }

    #[test]
    fn durations_follow_status_changes() {
        let events = vec![
            change("in_review", 5),
            AuditEvent::new("request_created", t0()),
            change("assigned", 2),
        ];
        let metrics = StageMetrics::from_events(&events, t0().plus_hours(8)).unwrap();

        assert_eq!(metrics.seconds_in("requested"), 2 * 3600);
        assert_eq!(metrics.seconds_in("assigned"), 3 * 3600);
        assert_eq!(metrics.seconds_in("in_review"), 3 * 3600);
        assert_eq!(metrics.current_stage, "in_review");
        assert_eq!(metrics.total_seconds, 8 * 3600);
        assert_eq!(metrics.stages[0].stage, "requested");
    }

    #[test]
    fn re_entered_stage_accumulates() {
        let events = vec![
            AuditEvent::new("request_created", t0()),
            change("in_review", 1),
            change("opinion_ready", 3),
            change("in_review", 4),
        ];
        let metrics = StageMetrics::from_events(&events, t0().plus_hours(6)).unwrap();
        assert_eq!(metrics.seconds_in("in_review"), 4 * 3600);
        assert_eq!(metrics.stages.len(), 3);
    }

    #[test]
    fn changes_without_target_are_skipped() {
        let events = vec![
            AuditEvent::new("request_created", t0()),
            AuditEvent::new("status_changed", t0().plus_hours(1)),
        ];
        let metrics = StageMetrics::from_events(&events, t0().plus_hours(2)).unwrap();
        assert_eq!(metrics.current_stage, INITIAL_STAGE);
        assert_eq!(metrics.seconds_in(INITIAL_STAGE), 2 * 3600);
    }
}
