//! Errors raised while moving session state in and out of a storage medium.
//!
//! None of these reach callers of [`StateStore`](crate::StateStore): they are
//! logged and the store falls back to its in-memory copy.

use crate::storage::StorageError;

/// Error type for persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The storage medium failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
