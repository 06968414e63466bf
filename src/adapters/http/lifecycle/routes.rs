//! HTTP routes for lifecycle endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    get_lifecycle_summary, health, list_client_lifecycle_summaries, resolve_snapshots,
    LifecycleAppState,
};

/// Creates the lifecycle router with all routes.
pub fn lifecycle_routes(state: LifecycleAppState) -> Router {
    Router::new()
        // GET /api/requests/:id/lifecycle-summary
        .route("/api/requests/:id/lifecycle-summary", get(get_lifecycle_summary))
        // GET /api/client/cases/lifecycle-summary
        .route(
            "/api/client/cases/lifecycle-summary",
            get(list_client_lifecycle_summaries),
        )
        // POST /api/lifecycle/resolve
        .route("/api/lifecycle/resolve", post(resolve_snapshots))
        .route("/health", get(health))
        .with_state(state)
}
