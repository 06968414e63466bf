//! Case Lifecycle - lifecycle resolution for legal marketplace cases
//!
//! Turns the overlapping signals persisted for a case (status column, audit
//! log, opinion versions, SLA fields) into one authoritative lifecycle state
//! with progress, SLA risk, the next action and a dashboard bucket.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
