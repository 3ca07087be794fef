//! Error types for campus-social storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
///
/// `NotFound` is a normal outcome of `update` on a missing record; every
/// other variant is an infrastructure fault.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// The store could not be reached or refused the call.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("not found: {path}")]
    NotFound {
        /// Path of the missing record.
        path: String,
    },

    /// The path is not a valid document or collection path.
    #[error("invalid path: {0}")]
    InvalidPath(String),
}
