use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::storage::StoreError;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    RateLimited,
    /// A stored template document exists but does not parse.
    InvalidJson,
    /// Anything that went wrong while generating a game. Carries the raw
    /// message of the underlying failure.
    Generation(String),
    Internal(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(m) | Self::NotFound(m) | Self::Generation(m) | Self::Internal(m) => {
                write!(f, "{m}")
            },
            Self::RateLimited => write!(f, "Too many requests"),
            Self::InvalidJson => write!(f, "Invalid JSON format"),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => Self::NotFound("not found".to_string()),
            StoreError::InvalidJson(_) => Self::InvalidJson,
            StoreError::Io(e) => Self::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            Self::Generation(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": message,
                    "message": "Failed to generate game with template",
                })),
            )
                .into_response(),
            other => {
                let status = match other {
                    Self::BadRequest(_) => StatusCode::BAD_REQUEST,
                    Self::NotFound(_) => StatusCode::NOT_FOUND,
                    Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, Json(serde_json::json!({ "error": message }))).into_response()
            },
        }
    }
}
