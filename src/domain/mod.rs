//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine trait)
//! - `lifecycle` - Case lifecycle resolution (authority, progress, SLA, next action)

pub mod foundation;
pub mod lifecycle;
