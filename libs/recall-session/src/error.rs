//! Error types for the session layer.

use thiserror::Error;

use crate::store::StoreError;

/// Result type alias using SessionError.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors a session can surface to its caller.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Nothing eligible to review. Callers present an empty state;
    /// this is a condition, not a failure.
    #[error("nothing to review")]
    NothingToReview,

    #[error(transparent)]
    Store(#[from] StoreError),
}
