//! Response mapping for ledger operations.
//!
//! # Responsibilities
//! - Map gateway results to HTTP responses
//! - Render every failure as a 500 whose JSON body is the message string
//! - Turn extractor rejections into `MalformedRequest`
//!
//! # Design Decisions
//! - One status for all failures; the message carries the distinction
//! - Error kind is logged, the message is returned verbatim

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::error::GatewayError;

/// Errors returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body or path could not be extracted.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("request timed out after {0} seconds")]
    Timeout(u64),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::MalformedRequest(_) => "malformed_request",
            ApiError::Gateway(e) => e.kind(),
            ApiError::Timeout(_) => "timeout",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::MalformedRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(kind = self.kind(), error = %self, "Request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self.to_string())).into_response()
    }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;
