//! Session management and command endpoints

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::{session_not_found, ApiError};
use crate::server::rate_limit::client_key;
use crate::server::state::AppState;
use crate::server::types::{
    CommandRequest, CommandResponse, CompleteQuery, CompleteResponse, CreateSessionRequest,
    ErrorResponse, ModeResponse, SessionResponse, SetModeRequest,
};
use crate::shell::{complete, suggest, DispatchOutcome, Output};

/// Count the request against the caller's window; `Err` is the 429 to send back
async fn check_rate_limit(
    state: &AppState,
    headers: &HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> Result<HeaderMap, Response> {
    let key = client_key(headers, connect_info.map(|ConnectInfo(addr)| addr));
    let limit = state.rate_limiter.check(&key).await;
    let limit_headers = limit.headers();

    if limit.allowed {
        return Ok(limit_headers);
    }

    let body = ErrorResponse::new(
        format!(
            "Rate limit exceeded. Please try again in {} seconds.",
            limit.retry_after_secs()
        ),
        "RATE_LIMITED",
    );
    Err((StatusCode::TOO_MANY_REQUESTS, limit_headers, Json(body)).into_response())
}

/// POST /api/sessions - Create a new session
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    request: Option<Json<CreateSessionRequest>>,
) -> Response {
    let limit_headers = match check_rate_limit(&state, &headers, connect_info).await {
        Ok(limit_headers) => limit_headers,
        Err(response) => return response,
    };

    let request = request.map(|Json(r)| r).unwrap_or_default();
    let (id, handle) = state
        .create_session(request.mode.unwrap_or_default())
        .await;

    let session = handle.session.lock().await;
    let body = SessionResponse {
        id,
        mode: session.mode(),
        created_at: handle.created_at.to_rfc3339(),
        history: session.history().entries().to_vec(),
    };
    (StatusCode::CREATED, limit_headers, Json(body)).into_response()
}

/// GET /api/sessions/:id - Get session details and history
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let handle = state
        .session(&session_id)
        .await
        .ok_or_else(|| session_not_found(&session_id))?;

    let session = handle.session.lock().await;
    Ok(Json(SessionResponse {
        id: session_id,
        mode: session.mode(),
        created_at: handle.created_at.to_rfc3339(),
        history: session.history().entries().to_vec(),
    }))
}

/// DELETE /api/sessions/:id - Delete a session
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.remove_session(&session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(&session_id))
    }
}

/// POST /api/sessions/:id/commands - Dispatch one line
pub async fn run_command(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    Json(request): Json<CommandRequest>,
) -> Response {
    let limit_headers = match check_rate_limit(&state, &headers, connect_info).await {
        Ok(limit_headers) => limit_headers,
        Err(response) => return response,
    };

    let Some(handle) = state.session(&session_id).await else {
        return (limit_headers, session_not_found(&session_id)).into_response();
    };

    let mut session = handle.session.lock().await;
    let outcome = session.dispatch(&request.command).await;

    let restarted = matches!(
        &outcome,
        DispatchOutcome::Appended { entry } if entry.output == Output::Restart
    );
    if restarted {
        session.restart();
    }

    let body = CommandResponse {
        outcome,
        mode: session.mode(),
        restarted,
    };
    (limit_headers, Json(body)).into_response()
}

/// PUT /api/sessions/:id/mode - Set the mode, or toggle it when none is given
pub async fn set_session_mode(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    request: Option<Json<SetModeRequest>>,
) -> Result<Json<ModeResponse>, ApiError> {
    let handle = state
        .session(&session_id)
        .await
        .ok_or_else(|| session_not_found(&session_id))?;

    let mut session = handle.session.lock().await;
    match request.and_then(|Json(r)| r.mode) {
        Some(mode) => session.set_mode(mode),
        None => {
            session.toggle_mode();
        }
    }

    Ok(Json(ModeResponse {
        mode: session.mode(),
    }))
}

/// GET /api/sessions/:id/complete?input= - Tab completion and ghost text
pub async fn complete_input(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Query(query): Query<CompleteQuery>,
) -> Result<Json<CompleteResponse>, ApiError> {
    if state.session(&session_id).await.is_none() {
        return Err(session_not_found(&session_id));
    }

    Ok(Json(CompleteResponse {
        completion: complete(&state.registry, &query.input),
        suggestion: suggest(&state.registry, &query.input),
    }))
}
