//! Error types for access control operations
//!
//! This module defines every error the authorization engine and the account
//! lifecycle can return, together with the mapping callers use to turn them
//! into user-visible outcomes.

use console_directory::DirectoryError;
use thiserror::Error;

/// Access control error types.
///
/// `Forbidden` and `ResourceUnknown` are kept apart for logging, but render
/// the same [`public_message`](AuthError::public_message) and status code so
/// that a refused caller cannot probe which resources exist.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Entity does not exist (user, resource)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Email is already registered
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Password did not match
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Authorization was refused
    #[error("Forbidden: missing permission: {requirement}")]
    Forbidden {
        /// The permission or resource action that was missing
        requirement: String,
    },

    /// Resource named in a check is not in the catalog
    #[error("Unknown resource: {resource}")]
    ResourceUnknown {
        /// The refused requirement, as shown to the caller
        requirement: String,
        /// The resource name that was looked up
        resource: String,
    },

    /// Account exists but has not been approved yet
    #[error("Account is pending approval")]
    PendingApproval,

    /// Account is deactivated
    #[error("Account is locked")]
    AccountLocked,

    /// Session token has expired
    #[error("Token has expired")]
    TokenExpired,

    /// Session token is malformed or has a bad signature
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Input failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal error (store failure, hashing failure)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for access control operations.
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Refusal for a missing permission or resource action.
    pub fn forbidden(requirement: impl ToString) -> Self {
        AuthError::Forbidden {
            requirement: requirement.to_string(),
        }
    }

    /// Check if this error should be logged at error level.
    ///
    /// Refusals and bad credentials are expected and are not server errors.
    pub fn is_server_error(&self) -> bool {
        matches!(self, AuthError::Internal(_) | AuthError::ConfigError(_))
    }

    /// Check if this error is an authorization refusal.
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            AuthError::Forbidden { .. } | AuthError::ResourceUnknown { .. }
        )
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::NotFound(_) => 404,
            AuthError::Conflict(_) => 409,
            AuthError::Validation(_) => 400,

            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::InvalidToken(_) => 401,

            AuthError::Forbidden { .. }
            | AuthError::ResourceUnknown { .. }
            | AuthError::PendingApproval
            | AuthError::AccountLocked => 403,

            AuthError::ConfigError(_) | AuthError::Internal(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NotFound(_) => "NOT_FOUND",
            AuthError::Conflict(_) => "CONFLICT",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::Forbidden { .. } | AuthError::ResourceUnknown { .. } => "FORBIDDEN",
            AuthError::PendingApproval => "PENDING_APPROVAL",
            AuthError::AccountLocked => "ACCOUNT_LOCKED",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::InvalidToken(_) => "INVALID_TOKEN",
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::ConfigError(_) => "CONFIG_ERROR",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get the message safe to show to the caller.
    pub fn public_message(&self) -> String {
        match self {
            AuthError::Forbidden { requirement } | AuthError::ResourceUnknown { requirement, .. } => {
                format!("missing permission: {}", requirement)
            }
            AuthError::ConfigError(_) | AuthError::Internal(_) => "Internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<DirectoryError> for AuthError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::UserNotFound(id) => AuthError::NotFound(format!("user {}", id)),
            DirectoryError::ResourceNotFound(name) => AuthError::NotFound(format!("resource {}", name)),
            DirectoryError::EmailTaken(email) => {
                AuthError::Conflict(format!("email already registered: {}", email))
            }
            DirectoryError::SelfReference(_) | DirectoryError::InvalidField { .. } => {
                AuthError::Validation(err.to_string())
            }
            DirectoryError::Storage(msg) => AuthError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_refusals_share_public_shape() {
        let forbidden = AuthError::forbidden("orders:delete");
        let unknown = AuthError::ResourceUnknown {
            requirement: "orders:delete".to_string(),
            resource: "orders".to_string(),
        };

        assert_eq!(forbidden.status_code(), unknown.status_code());
        assert_eq!(forbidden.error_code(), unknown.error_code());
        assert_eq!(forbidden.public_message(), unknown.public_message());
        assert_eq!(forbidden.public_message(), "missing permission: orders:delete");
        assert_ne!(forbidden, unknown);
        assert!(forbidden.is_refusal() && unknown.is_refusal());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::NotFound("user".into()).status_code(), 404);
        assert_eq!(AuthError::Conflict("x".into()).status_code(), 409);
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::TokenExpired.status_code(), 401);
        assert_eq!(AuthError::PendingApproval.status_code(), 403);
        assert_eq!(AuthError::Internal("db".into()).status_code(), 500);
    }

    #[test]
    fn test_server_errors_hidden() {
        let err = AuthError::Internal("connection refused".into());
        assert!(err.is_server_error());
        assert_eq!(err.public_message(), "Internal error");
        assert!(!AuthError::InvalidCredentials.is_server_error());
    }

    #[test]
    fn test_from_directory_error() {
        let id = Uuid::now_v7();
        assert!(matches!(
            AuthError::from(DirectoryError::UserNotFound(id)),
            AuthError::NotFound(_)
        ));
        assert!(matches!(
            AuthError::from(DirectoryError::EmailTaken("a@x.com".into())),
            AuthError::Conflict(_)
        ));
        assert!(matches!(
            AuthError::from(DirectoryError::SelfReference(id)),
            AuthError::Validation(_)
        ));
        assert!(matches!(
            AuthError::from(DirectoryError::Storage("io".into())),
            AuthError::Internal(_)
        ));
    }
}
