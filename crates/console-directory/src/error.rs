//! Error types for directory operations

use thiserror::Error;
use uuid::Uuid;

/// Directory error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// No user with this ID
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    /// Resource name is not in the catalog
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Another account already uses this email
    #[error("Email already registered: {0}")]
    EmailTaken(String),

    /// A user's `created_by` edge pointed at the user itself
    #[error("User {0} cannot be its own creator")]
    SelfReference(Uuid),

    /// A field failed validation
    #[error("Invalid {field}: {reason}")]
    InvalidField {
        /// Field name
        field: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// Backend failure (connection, transaction, serialization)
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

impl DirectoryError {
    /// Check if the error means the referenced entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DirectoryError::UserNotFound(_) | DirectoryError::ResourceNotFound(_)
        )
    }
}
