use axum::{
    Router,
    extract::{DefaultBodyLimit, Request},
    http::StatusCode,
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::api;
use crate::config::AppConfig;
use crate::persistence;

/// Build the full application router: API routes plus CORS, tracing,
/// body-limit and timeout layers.
pub fn build_router(state: AppState) -> Router {
    // Timeout is always layered so the router type stays the same; disabling
    // it just makes the deadline effectively unreachable.
    let timeout_duration = if state.config.resilience.timeout_disabled {
        Duration::from_secs(365 * 24 * 60 * 60)
    } else {
        Duration::from_secs(state.config.resilience.request_timeout_secs)
    };

    api::router()
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(axum::middleware::from_fn(
            move |req: Request, next: Next| async move {
                match tokio::time::timeout(timeout_duration, next.run(req)).await {
                    Ok(res) => res,
                    Err(_) => (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response(),
                }
            },
        ))
        .layer(TraceLayer::new_for_http())
        // All origins, methods and headers.
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let store = persistence::connect(&config.persistence).await?;
    info!(
        name: "persistence.connected",
        provider = %config.persistence.provider,
        "Run store ready"
    );

    let state = AppState {
        store,
        config: Arc::clone(&config),
    };
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
