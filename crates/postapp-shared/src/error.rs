use thiserror::Error;

/// Caller-provided post content failed a pre-flight check.
///
/// These are raised by the presentation layer before anything reaches
/// the posts repository.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Subtitle cannot be empty")]
    EmptySubtitle,

    #[error("Post body cannot be empty")]
    EmptyBody,

    #[error("{field} is too long: {actual} characters (max {max})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

/// The persisted reading goal blob could not be decoded or encoded.
#[derive(Error, Debug)]
pub enum GoalStateError {
    #[error("Malformed reading goal data: {0}")]
    Malformed(#[from] serde_json::Error),
}
