//! Review error types.

use thiserror::Error;

/// Result type for review operations.
pub type ReviewResult<T> = Result<T, ReviewError>;

/// Errors raised while reconciling records.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Storage error: {0}")]
    Storage(#[from] editfx_storage::StorageError),

    #[error("Operator I/O failed: {0}")]
    Port(#[from] std::io::Error),

    #[error("Dataset has no identity column")]
    NoIdColumn,
}
