//! Application layer - Queries and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Lifecycle resolution is read-only, so there are no command handlers.

pub mod handlers;

pub use handlers::{
    CaseLifecycleDetail, GetCaseLifecycleHandler, GetCaseLifecycleQuery, GetCaseLifecycleResult,
    ListClientCasesHandler, ListClientCasesQuery, ListClientCasesResult,
};
