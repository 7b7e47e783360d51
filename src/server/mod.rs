//! HTTP API for the terminal portfolio
//!
//! Exposes shell sessions, cached GitHub stats and citation segmentation
//! as JSON endpoints for a web front end.

pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use state::AppState;

/// How often closed rate-limit windows and idle sessions are dropped
const PURGE_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Build the API router over `state`
pub fn router(state: Arc<AppState>, cors_enabled: bool) -> Router {
    let mut app = Router::new()
        .route("/api/health", get(routes::health::health_check))
        // Sessions
        .route("/api/sessions", post(routes::sessions::create_session))
        .route(
            "/api/sessions/:id",
            get(routes::sessions::get_session).delete(routes::sessions::delete_session),
        )
        .route("/api/sessions/:id/commands", post(routes::sessions::run_command))
        .route("/api/sessions/:id/mode", put(routes::sessions::set_session_mode))
        .route("/api/sessions/:id/complete", get(routes::sessions::complete_input))
        // Collaborators
        .route("/api/github-stats", get(routes::github::github_stats))
        .route("/api/citations/segment", post(routes::citations::segment))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Start the HTTP server and run until it fails
pub async fn start_server(config: Config) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(&config)?);

    let purge_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PURGE_INTERVAL);
        loop {
            interval.tick().await;
            let purged = purge_state.rate_limiter.purge_expired().await;
            if purged > 0 {
                tracing::debug!(purged, "purged rate limit windows");
            }
            let idle = purge_state.purge_idle_sessions().await;
            if idle > 0 {
                tracing::info!(idle, "dropped idle sessions");
            }
        }
    });

    let app = router(state, config.server.cors_enabled);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, "termfolio server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
