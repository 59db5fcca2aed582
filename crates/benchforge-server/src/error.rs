//! HTTP-edge error composition (spec.md §7). Unlike the teacher, which
//! narrows every domain error straight down to a bare `StatusCode`, this
//! keeps a richer enum because spec.md mandates specific plain-text
//! response bodies, not just status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("missing form fields, invalid author, or missing cookie")]
    BadRequest(&'static str),
    #[error("code does not comply with the rules")]
    RejectedCode,
    #[error("disallowed compiler flags")]
    RejectedFlags,
    #[error("submission not found")]
    NotFound,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::BadRequest(msg) => (StatusCode::NOT_FOUND, msg.to_string()),
            AppError::RejectedCode => (StatusCode::NOT_FOUND, "Code does not comply with the rules!".to_string()),
            AppError::RejectedFlags => (StatusCode::NOT_FOUND, "Disallowed compiler flags.".to_string()),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Submission not found.".to_string()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden.".to_string()),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error.".to_string())
            }
        };
        (status, [("content-type", "text/plain")], body).into_response()
    }
}

impl From<benchforge_core::StoreError> for AppError {
    fn from(err: benchforge_core::StoreError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<benchforge_core::RunnerError> for AppError {
    fn from(err: benchforge_core::RunnerError) -> Self {
        AppError::Internal(err.to_string())
    }
}
