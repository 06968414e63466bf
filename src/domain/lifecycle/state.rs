//! Canonical lifecycle states and their presentation metadata.
//!
//! One table owns the label, tone, track membership and terminal flag of every
//! state. Presentation code queries it instead of keeping its own string maps.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// Workflow track a case travels on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    /// Client request routed to an assigned lawyer.
    #[default]
    Private,
    /// Request posted to the marketplace for lawyers to claim.
    Public,
}

/// Visual tone used by list and detail views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Neutral,
    Info,
    Warning,
    Success,
    Danger,
}

/// Canonical lifecycle state of a case.
///
/// `Completed` and `Closed` are terminal and shared by both tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Requested,
    Posted,
    Open,
    Claimed,
    Assigned,
    UnderReview,
    Submitted,
    Completed,
    Closed,
}

/// Presentation metadata for a lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateMetadata {
    pub state: LifecycleState,
    pub id: &'static str,
    pub label: &'static str,
    pub tone: Tone,
    pub tracks: &'static [Track],
}

const BOTH: &[Track] = &[Track::Private, Track::Public];
const PRIVATE_ONLY: &[Track] = &[Track::Private];
const PUBLIC_ONLY: &[Track] = &[Track::Public];

static STATE_TABLE: [StateMetadata; 9] = [
    StateMetadata {
        state: LifecycleState::Requested,
        id: "requested",
        label: "Requested",
        tone: Tone::Neutral,
        tracks: PRIVATE_ONLY,
    },
    StateMetadata {
        state: LifecycleState::Posted,
        id: "posted",
        label: "Posted",
        tone: Tone::Neutral,
        tracks: PUBLIC_ONLY,
    },
    StateMetadata {
        state: LifecycleState::Open,
        id: "open",
        label: "Open for Lawyers",
        tone: Tone::Info,
        tracks: PUBLIC_ONLY,
    },
    StateMetadata {
        state: LifecycleState::Claimed,
        id: "claimed",
        label: "Claimed",
        tone: Tone::Info,
        tracks: PUBLIC_ONLY,
    },
    StateMetadata {
        state: LifecycleState::Assigned,
        id: "assigned",
        label: "Assigned",
        tone: Tone::Info,
        tracks: PRIVATE_ONLY,
    },
    StateMetadata {
        state: LifecycleState::UnderReview,
        id: "under_review",
        label: "Under Review",
        tone: Tone::Warning,
        tracks: BOTH,
    },
    StateMetadata {
        state: LifecycleState::Submitted,
        id: "submitted",
        label: "Opinion Ready",
        tone: Tone::Success,
        tracks: BOTH,
    },
    StateMetadata {
        state: LifecycleState::Completed,
        id: "completed",
        label: "Completed",
        tone: Tone::Success,
        tracks: BOTH,
    },
    StateMetadata {
        state: LifecycleState::Closed,
        id: "closed",
        label: "Closed",
        tone: Tone::Neutral,
        tracks: BOTH,
    },
];

/// Label shown for a delivered opinion awaiting client acknowledgement.
pub const CLIENT_REVIEW_LABEL: &str = "In Review";

impl LifecycleState {
    /// Every state, in table order.
    pub const ALL: [LifecycleState; 9] = [
        LifecycleState::Requested,
        LifecycleState::Posted,
        LifecycleState::Open,
        LifecycleState::Claimed,
        LifecycleState::Assigned,
        LifecycleState::UnderReview,
        LifecycleState::Submitted,
        LifecycleState::Completed,
        LifecycleState::Closed,
    ];

    /// Returns this state's row in the canonical metadata table.
    pub fn metadata(&self) -> &'static StateMetadata {
        let idx = match self {
            LifecycleState::Requested => 0,
            LifecycleState::Posted => 1,
            LifecycleState::Open => 2,
            LifecycleState::Claimed => 3,
            LifecycleState::Assigned => 4,
            LifecycleState::UnderReview => 5,
            LifecycleState::Submitted => 6,
            LifecycleState::Completed => 7,
            LifecycleState::Closed => 8,
        };
        &STATE_TABLE[idx]
    }

    /// Wire identifier (snake_case).
    pub fn as_str(&self) -> &'static str {
        self.metadata().id
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        self.metadata().label
    }

    pub fn tone(&self) -> Tone {
        self.metadata().tone
    }

    /// Returns true if the state appears on the given track.
    pub fn belongs_to(&self, track: Track) -> bool {
        self.metadata().tracks.contains(&track)
    }

    /// Parses a caller-supplied prior state, treating anything unknown as absent.
    pub fn parse_prior(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl StateMachine for LifecycleState {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use LifecycleState::*;
        match self {
            Requested => vec![Assigned, UnderReview, Submitted, Completed, Closed],
            Posted => vec![Open, Claimed, UnderReview, Submitted, Completed, Closed],
            Open => vec![Claimed, UnderReview, Submitted, Completed, Closed],
            Claimed => vec![UnderReview, Submitted, Completed, Closed],
            Assigned => vec![UnderReview, Submitted, Completed, Closed],
            // A returned draft sends the case back to review.
            UnderReview => vec![Submitted, Completed, Closed],
            Submitted => vec![UnderReview, Completed, Closed],
            Completed | Closed => vec![],
        }
    }
}

impl FromStr for LifecycleState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        STATE_TABLE
            .iter()
            .find(|row| row.id == s)
            .map(|row| row.state)
            .ok_or_else(|| {
                ValidationError::invalid_format("lifecycle_state", format!("unknown state '{}'", s))
            })
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
