//! Error types for the HTTP layer.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// API error type. Every variant renders as `{"error": "..."}`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body could not be read as a run payload.
    #[error("{message}")]
    InvalidPayload { status: StatusCode, message: String },

    /// Timestamp field on a create payload that does not parse.
    #[error("`{field}` is not a recognised timestamp: {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },

    /// Malformed path or query parameter.
    #[error("{0}")]
    BadRequest(String),

    /// Storage failed; details are logged, not returned.
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPayload { status, .. } => *status,
            Self::InvalidTimestamp { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidPayload {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Storage(e) => {
                tracing::error!(name: "storage.failed", error = ?e, "Storage operation failed");
                "internal storage error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_taxonomy() {
        let timestamp = AppError::InvalidTimestamp {
            field: "created_at",
            value: "soon".into(),
        };
        assert_eq!(timestamp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(timestamp.to_string().contains("created_at"));

        assert_eq!(
            AppError::BadRequest("agent_id".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(anyhow::anyhow!("disk full")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn storage_details_are_not_leaked() {
        let response = AppError::from(anyhow::anyhow!("password=hunter2")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "error": "internal storage error" }));
        assert!(!body.to_string().contains("hunter2"));
    }

    #[tokio::test]
    async fn client_errors_carry_their_message() {
        let response = AppError::BadRequest("bad agent id".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "error": "bad agent id" }));
    }
}
