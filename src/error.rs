use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed caller input: bad record cap, unknown include key,
    /// unparseable request body. Raised before any network activity.
    #[error("Invalid input: {0}")]
    ValidationError(String),

    /// Network/auth/rate-limit failure from the upstream API. Aborts the
    /// in-flight walk; accumulated partial pages are discarded.
    #[error("Upstream request failed: {0}")]
    TransportError(String),

    /// A fetched record does not match the expected shape. Never skipped:
    /// a silently dropped audit-trail entry is worse than a loud failure.
    #[error("Upstream record failed validation: {0}")]
    DecodeError(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: u16,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::ValidationError(msg) => {
                tracing::warn!(error = %msg, "Validation error");
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::TransportError(msg) => {
                tracing::error!(error = %msg, "Transport error");
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::DecodeError(msg) => {
                tracing::error!(error = %msg, "Decode error");
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            code: status.as_u16(),
        });

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::TransportError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
