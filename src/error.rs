// src/error.rs
use std::time::Duration;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::message::ChatResponse;

/// Failures talking to an upstream HTTP service (translation or generation).
///
/// None of these ever reach a client: callers degrade to pass-through or
/// fall through the reply cascade.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned {status}: {detail}")]
    Api {
        status: reqwest::StatusCode,
        detail: String,
    },

    #[error("upstream returned no text")]
    EmptyOutput,

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// Faults that escape the chat pipeline.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal error: {0}")]
    Internal(String),
}

// Always a 200 with `success: false`; the failure lives in the body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self, "chat request failed");
        (StatusCode::OK, Json(ChatResponse::failure())).into_response()
    }
}
