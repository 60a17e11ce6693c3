use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use postapp_shared::{PostId, ValidationError};
use postapp_store::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    #[error("Post already exists: {0}")]
    PostExists(PostId),

    #[error("Invalid post: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::PostNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ServerError::PostExists(_) => (StatusCode::CONFLICT, self.to_string()),
            ServerError::Validation(_) | ServerError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ServerError::Store(e) => {
                tracing::error!(error = %e, "Storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}
