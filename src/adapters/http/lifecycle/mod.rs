//! Lifecycle HTTP adapter module.
//!
//! Provides REST API endpoints for case lifecycle summaries.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::ErrorResponse;
pub use handlers::{LifecycleApiError, LifecycleAppState};
pub use routes::lifecycle_routes;
