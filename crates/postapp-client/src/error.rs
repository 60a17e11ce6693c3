use postapp_shared::{PostId, ValidationError};
use postapp_store::StoreError;
use thiserror::Error;

/// A call to the remote data service did not complete successfully.
///
/// Network, server and decoding failures are distinct variants for logging,
/// but the posts repository treats them all as one transport failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server responded {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Status {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            Self::Network(e.to_string())
        }
    }
}

/// Errors reported by [`PostsRepository`](crate::PostsRepository).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PostsError {
    #[error("Transport failure: {0}")]
    Transport(#[from] ServiceError),

    #[error("Post not found: {0}")]
    NotFound(PostId),
}

/// Errors surfaced to the presentation layer.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid post: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Posts(#[from] PostsError),

    #[error("Remote service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Local storage error: {0}")]
    Store(#[from] StoreError),
}
