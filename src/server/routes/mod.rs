//! API route handlers

pub mod citations;
pub mod github;
pub mod health;
pub mod sessions;

use axum::{http::StatusCode, Json};

use super::types::ErrorResponse;

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn session_not_found(id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(
            format!("Session not found: {}", id),
            "SESSION_NOT_FOUND",
        )),
    )
}
