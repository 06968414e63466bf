//! case-lifecycle - HTTP entry point.
//!
//! Loads configuration, connects the snapshot store and serves the
//! lifecycle endpoints.

use std::sync::Arc;

use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use case_lifecycle::adapters::http::{lifecycle_routes, LifecycleAppState};
use case_lifecycle::adapters::{InMemoryCaseSnapshotReader, PostgresCaseSnapshotReader};
use case_lifecycle::config::{AppConfig, ServerConfig};
use case_lifecycle::ports::CaseSnapshotReader;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let snapshot_reader: Arc<dyn CaseSnapshotReader> = match &config.database {
        Some(database) => {
            let pool = PgPoolOptions::new()
                .min_connections(database.min_connections)
                .max_connections(database.max_connections)
                .acquire_timeout(database.acquire_timeout())
                .idle_timeout(database.idle_timeout())
                .connect(&database.url)
                .await
                .map_err(|e| {
                    tracing::error!("Database connection failed: {e}");
                    e
                })?;
            Arc::new(PostgresCaseSnapshotReader::new(pool))
        }
        None => {
            tracing::warn!("No database configured, serving an empty in-memory case store");
            Arc::new(InMemoryCaseSnapshotReader::new())
        }
    };

    let state = LifecycleAppState::new(snapshot_reader, config.lifecycle.resolver());
    tracing::info!(
        sla_pause_mode = ?config.lifecycle.sla_pause_mode,
        "Lifecycle resolver configured"
    );

    let app = lifecycle_routes(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    tracing::info!("Case lifecycle API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}
