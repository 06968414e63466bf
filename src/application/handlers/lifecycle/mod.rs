//! Lifecycle query handlers.
//!
//! Read-only handlers that load snapshots and resolve them on the fly.

mod get_case_lifecycle;
mod list_client_cases;

pub use get_case_lifecycle::{
    CaseLifecycleDetail, GetCaseLifecycleHandler, GetCaseLifecycleQuery, GetCaseLifecycleResult,
};
pub use list_client_cases::{ListClientCasesHandler, ListClientCasesQuery, ListClientCasesResult};
