//! ProgressCalculator - places a resolved state on its track's step sequence.

use serde::{Deserialize, Serialize};

use super::state::{LifecycleState, Track};
use crate::domain::foundation::Percentage;

/// Steps shown for private (assigned-lawyer) requests.
pub const PRIVATE_STEPS: [LifecycleState; 5] = [
    LifecycleState::Requested,
    LifecycleState::Assigned,
    LifecycleState::UnderReview,
    LifecycleState::Submitted,
    LifecycleState::Completed,
];

/// Steps shown for public (marketplace) requests.
pub const PUBLIC_STEPS: [LifecycleState; 6] = [
    LifecycleState::Posted,
    LifecycleState::Open,
    LifecycleState::Claimed,
    LifecycleState::UnderReview,
    LifecycleState::Submitted,
    LifecycleState::Completed,
];

/// One step of the progress bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStep {
    pub id: String,
    pub label: String,
    pub completed: bool,
    pub current: bool,
}

/// Progress of a case through its track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// 1-indexed position of the current step.
    pub current_step: usize,
    pub total_steps: usize,
    pub percentage: Percentage,
    pub label: String,
    pub steps: Vec<ProgressStep>,
}

pub struct ProgressCalculator;

impl ProgressCalculator {
    /// Step sequence for a track.
    pub fn sequence(track: Track) -> &'static [LifecycleState] {
        match track {
            Track::Private => &PRIVATE_STEPS,
            Track::Public => &PUBLIC_STEPS,
        }
    }

    /// Builds the progress record for `state` on `track`.
    pub fn calculate(state: LifecycleState, track: Track) -> Progress {
        let sequence = Self::sequence(track);
        let index = Self::step_index(state, track);
        let current_step = index + 1;

        let steps = sequence
            .iter()
            .enumerate()
            .map(|(i, step)| ProgressStep {
                id: step.as_str().to_string(),
                label: step.label().to_string(),
                completed: i <= index,
                current: i == index,
            })
            .collect();

        Progress {
            current_step,
            total_steps: sequence.len(),
            percentage: Percentage::of(current_step, sequence.len()),
            label: state.label().to_string(),
            steps,
        }
    }

    /// Zero-based position of `state`, aliasing states the track does not show.
    pub fn step_index(state: LifecycleState, track: Track) -> usize {
        let sequence = Self::sequence(track);
        let target = Self::alias(state, track);
        sequence.iter().position(|s| *s == target).unwrap_or(0)
    }

    fn alias(state: LifecycleState, track: Track) -> LifecycleState {
        use LifecycleState::*;
        match (track, state) {
            (_, Closed) => Completed,
            (Track::Private, Posted | Open) => Requested,
            (Track::Private, Claimed) => Assigned,
            (Track::Public, Requested) => Posted,
            (Track::Public, Assigned) => Claimed,
            (_, other) => other,
        }
    }
}
