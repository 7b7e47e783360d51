//! Cached GitHub statistics for the site owner

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use super::ApiError;
use crate::server::state::AppState;
use crate::server::types::ErrorResponse;
use crate::services::GitHubStats;

/// GET /api/github-stats
pub async fn github_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GitHubStats>, ApiError> {
    let user = &state.env.profile.github;
    state
        .env
        .services
        .github
        .stats(user)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::warn!(user = %user, error = %e, "github stats lookup failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::new(
                    "Failed to fetch GitHub stats",
                    "UPSTREAM_FAILED",
                )),
            )
        })
}
