//! Application handlers.
//!
//! Query handlers that orchestrate domain operations.

pub mod lifecycle;

pub use lifecycle::{
    CaseLifecycleDetail, GetCaseLifecycleHandler, GetCaseLifecycleQuery, GetCaseLifecycleResult,
    ListClientCasesHandler, ListClientCasesQuery, ListClientCasesResult,
};
