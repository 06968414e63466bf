//! SlaEvaluator - classifies deadline risk and renders the countdown text.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::snapshot::{CaseSnapshot, SlaPause};
use super::state::{LifecycleState, Tone};
use crate::domain::foundation::{StateMachine, Timestamp};

/// Cases due within this many hours are at risk.
pub const AT_RISK_WINDOW_HOURS: f64 = 24.0;

/// How a paused SLA clock affects the deadline computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SlaPauseMode {
    /// The clock is read at the pause instant; the stored deadline is
    /// extended by whoever resumes the pause.
    #[default]
    FreezeDeadline,
    /// The stored deadline stays fixed and is shifted by all pause time,
    /// including a pause still in progress.
    AccumulatedOffset,
}

/// SLA classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlaStatus {
    Completed,
    None,
    Overdue,
    AtRisk,
    OnTrack,
}

impl SlaStatus {
    pub fn tone(&self) -> Tone {
        match self {
            SlaStatus::Completed | SlaStatus::OnTrack => Tone::Success,
            SlaStatus::None => Tone::Neutral,
            SlaStatus::AtRisk => Tone::Warning,
            SlaStatus::Overdue => Tone::Danger,
        }
    }

    /// Overdue or at risk.
    pub fn is_risk(&self) -> bool {
        matches!(self, SlaStatus::Overdue | SlaStatus::AtRisk)
    }
}

/// SLA record attached to a lifecycle summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaInfo {
    pub status: SlaStatus,
    pub text: String,
    pub is_overdue: bool,
    pub is_at_risk: bool,
    pub is_paused: bool,
    pub due_date: Option<Timestamp>,
    pub delivered_at: Option<Timestamp>,
    pub tone: Tone,
}

impl SlaInfo {
    fn new(status: SlaStatus, text: impl Into<String>) -> Self {
        Self {
            status,
            text: text.into(),
            is_overdue: status == SlaStatus::Overdue,
            is_at_risk: status == SlaStatus::AtRisk,
            is_paused: false,
            due_date: None,
            delivered_at: None,
            tone: status.tone(),
        }
    }
}

/// Evaluates SLA risk under a configured pause policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlaEvaluator {
    pause_mode: SlaPauseMode,
}

impl SlaEvaluator {
    pub fn new(pause_mode: SlaPauseMode) -> Self {
        Self { pause_mode }
    }

    pub fn pause_mode(&self) -> SlaPauseMode {
        self.pause_mode
    }

    pub fn evaluate(&self, snapshot: &CaseSnapshot, state: LifecycleState, now: Timestamp) -> SlaInfo {
        if snapshot.raw_status.is_delivered() || state.is_terminal() {
            let mut info = SlaInfo::new(SlaStatus::Completed, "Delivered");
            info.due_date = snapshot.sla_deadline;
            info.delivered_at = snapshot.completed_at.or(snapshot.opinion_submitted_at);
            return info;
        }

        let Some(deadline) = snapshot.sla_deadline else {
            return SlaInfo::new(SlaStatus::None, "No Deadline");
        };

        let pause = snapshot.sla_pause.unwrap_or_default();
        let (deadline, clock) = self.effective_clock(deadline, &pause, now);

        let mut info = Self::classify(deadline, clock);
        info.due_date = Some(deadline);
        info.is_paused = pause.is_active();
        info
    }

    /// Deadline and evaluation instant after applying the pause policy.
    fn effective_clock(
        &self,
        deadline: Timestamp,
        pause: &SlaPause,
        now: Timestamp,
    ) -> (Timestamp, Timestamp) {
        match self.pause_mode {
            SlaPauseMode::FreezeDeadline => match pause.paused_at {
                Some(paused_at) if paused_at.is_before(&now) => (deadline, paused_at),
                _ => (deadline, now),
            },
            SlaPauseMode::AccumulatedOffset => {
                let in_progress = pause
                    .paused_at
                    .map(|p| now.duration_since(&p).num_seconds().max(0))
                    .unwrap_or(0);
                let offset = pause.accumulated_secs.max(0) + in_progress;
                (deadline.plus_secs(offset), now)
            }
        }
    }

    /// Classifies a deadline against an evaluation instant.
    pub fn classify(deadline: Timestamp, now: Timestamp) -> SlaInfo {
        let hours_left = deadline.hours_since(&now);

        if hours_left < 0.0 {
            let text = format!("Overdue by {}", humanize(now.duration_since(&deadline)));
            SlaInfo::new(SlaStatus::Overdue, text)
        } else if hours_left < AT_RISK_WINDOW_HOURS {
            SlaInfo::new(SlaStatus::AtRisk, format!("Due in {}h", hours_left.ceil() as i64))
        } else {
            let days = (hours_left / 24.0).ceil() as i64;
            SlaInfo::new(SlaStatus::OnTrack, format!("Due in {}d", days))
        }
    }
}

fn humanize(elapsed: Duration) -> String {
    let minutes = elapsed.num_minutes();
    if minutes < 1 {
        return "less than a minute".to_string();
    }
    if minutes < 60 {
        return plural(minutes, "minute");
    }
    let hours = elapsed.num_hours();
    if hours < 24 {
        return plural(hours, "hour");
    }
    plural(elapsed.num_days(), "day")
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}
