//! HTTP handlers for lifecycle endpoints.
//!
//! These handlers connect Axum routes to application layer query handlers.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::{
    GetCaseLifecycleHandler, GetCaseLifecycleQuery, ListClientCasesHandler, ListClientCasesQuery,
};
use crate::domain::foundation::{CaseId, Timestamp, UserId};
use crate::domain::lifecycle::{LifecycleResolver, LifecycleState};
use crate::ports::{CaseSnapshotReader, SnapshotReadError};

use super::dto::{
    BucketCounts, CaseLifecycleDetail, ClientCasesResponse, ErrorResponse, LifecycleSummaryParams,
    ResolveBatchRequest, ResolveBatchResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Error Type
// ════════════════════════════════════════════════════════════════════════════════

/// Lifecycle API error that implements IntoResponse.
#[derive(Debug)]
pub enum LifecycleApiError {
    BadRequest(String),
    InvalidCaseId(String),
    NotFound(String),
    Unauthorized(String),
    Internal(String),
}

impl IntoResponse for LifecycleApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            LifecycleApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
            LifecycleApiError::InvalidCaseId(raw) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::bad_request("Invalid case ID format")
                    .with_details(serde_json::json!({ "caseId": raw })),
            ),
            LifecycleApiError::NotFound(id) => {
                (StatusCode::NOT_FOUND, ErrorResponse::not_found("Case", &id))
            }
            LifecycleApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, ErrorResponse::unauthorized(msg))
            }
            LifecycleApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::internal(msg))
            }
        };
        (status, Json(error)).into_response()
    }
}

impl From<SnapshotReadError> for LifecycleApiError {
    fn from(error: SnapshotReadError) -> Self {
        match error {
            SnapshotReadError::NotFound(id) => LifecycleApiError::NotFound(id.to_string()),
            SnapshotReadError::InvalidData(msg) => LifecycleApiError::BadRequest(msg),
            SnapshotReadError::Database(msg) => {
                tracing::error!("Snapshot read failed: {}", msg);
                LifecycleApiError::Internal("Failed to load case data".to_string())
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing lifecycle dependencies.
#[derive(Clone)]
pub struct LifecycleAppState {
    pub snapshot_reader: Arc<dyn CaseSnapshotReader>,
    pub resolver: LifecycleResolver,
}

impl LifecycleAppState {
    pub fn new(snapshot_reader: Arc<dyn CaseSnapshotReader>, resolver: LifecycleResolver) -> Self {
        Self {
            snapshot_reader,
            resolver,
        }
    }

    pub fn get_case_lifecycle_handler(&self) -> GetCaseLifecycleHandler {
        GetCaseLifecycleHandler::new(self.snapshot_reader.clone(), self.resolver)
    }

    pub fn list_client_cases_handler(&self) -> ListClientCasesHandler {
        ListClientCasesHandler::new(self.snapshot_reader.clone(), self.resolver)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// User Context
// ════════════════════════════════════════════════════════════════════════════════

/// Authenticated user context extracted from request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        LifecycleApiError::Unauthorized("Authentication is required".to_string()).into_response()
    }
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| UserId::new(s).ok())
            .ok_or(AuthenticationRequired)?;

        Ok(AuthenticatedUser { user_id })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/requests/:id/lifecycle-summary
///
/// Resolves one case, with health and optional stage metrics.
pub async fn get_lifecycle_summary(
    State(state): State<LifecycleAppState>,
    Path(case_id_str): Path<String>,
    Query(params): Query<LifecycleSummaryParams>,
) -> Result<Json<CaseLifecycleDetail>, LifecycleApiError> {
    let case_id: CaseId = case_id_str
        .parse()
        .map_err(|_| LifecycleApiError::InvalidCaseId(case_id_str.clone()))?;

    let query = GetCaseLifecycleQuery {
        case_id,
        prior_state: params.prior_state.as_deref().and_then(LifecycleState::parse_prior),
        include_metrics: params.include_metrics,
        now: Timestamp::now(),
    };

    let handler = state.get_case_lifecycle_handler();
    let detail = handler.handle(query).await?;

    Ok(Json(detail))
}

/// GET /api/client/cases/lifecycle-summary
///
/// Resolves every case of the calling client, most urgent first.
pub async fn list_client_lifecycle_summaries(
    State(state): State<LifecycleAppState>,
    user: AuthenticatedUser,
) -> Result<Json<ClientCasesResponse>, LifecycleApiError> {
    let now = Timestamp::now();
    let query = ListClientCasesQuery {
        client_id: user.user_id,
        now,
    };

    let handler = state.list_client_cases_handler();
    let cases = handler.handle(query).await?;

    Ok(Json(ClientCasesResponse {
        counts: BucketCounts::tally(&cases),
        cases,
        evaluated_at: now,
    }))
}

/// POST /api/lifecycle/resolve
///
/// Resolves caller-supplied snapshots without touching the store.
pub async fn resolve_snapshots(
    State(state): State<LifecycleAppState>,
    Json(request): Json<ResolveBatchRequest>,
) -> Json<ResolveBatchResponse> {
    let now = request.now.unwrap_or_else(Timestamp::now);
    let summaries = state.resolver.resolve_batch(&request.snapshots, now);

    Json(ResolveBatchResponse {
        summaries,
        evaluated_at: now,
    })
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}
