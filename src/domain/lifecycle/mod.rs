//! Lifecycle Module - Case lifecycle resolution.
//!
//! Derives one authoritative lifecycle state from a case's conflicting
//! persisted signals, then projects it into progress, SLA risk, the next
//! action and a dashboard bucket.
//!
//! # Components
//!
//! - `StatusMapper` - Raw status column to a candidate state
//! - `AuthorityResolver` - Audit log > terminal status > opinion > status column
//! - `RegressionGuard` - Terminal states never regress
//! - `ProgressCalculator` - Step sequence per track
//! - `SlaEvaluator` - Deadline risk with configurable pause handling
//! - `NextActionResolver` - Ordered next-step rules
//! - `LifecycleResolver` - Runs the pipeline and buckets the result
//!
//! # Design Philosophy
//!
//! Everything here is pure and synchronous. Snapshots come in, summaries go
//! out; nothing is cached or persisted.

mod aggregator;
mod authority;
mod health;
mod next_action;
mod progress;
mod regression_guard;
mod sla;
mod snapshot;
mod stage_metrics;
mod state;
mod status_mapper;
mod summary;

pub use aggregator::LifecycleResolver;
pub use authority::{AuthorityDecision, AuthorityResolver, AuthoritySource};
pub use health::CaseHealth;
pub use next_action::{ActionPriority, ActorType, NextActionKind, NextActionResolver, NextStep};
pub use progress::{Progress, ProgressCalculator, ProgressStep, PRIVATE_STEPS, PUBLIC_STEPS};
pub use regression_guard::RegressionGuard;
pub use sla::{SlaEvaluator, SlaInfo, SlaPauseMode, SlaStatus, AT_RISK_WINDOW_HOURS};
pub use snapshot::{
    AuditEvent, CaseSnapshot, LawyerRef, OpinionVersion, Priority, PublicStatus, RawStatus,
    SlaPause, Visibility,
};
pub use stage_metrics::{StageDuration, StageMetrics};
pub use state::{LifecycleState, StateMetadata, Tone, Track, CLIENT_REVIEW_LABEL};
pub use status_mapper::StatusMapper;
pub use summary::{DashboardBucket, LifecycleSummary};
