//! Session token claims
//!
//! The claims carried by a console session token. The subject is the user ID;
//! role and approval are re-read from the directory on every request, so the
//! role here is informational only.

use chrono::{DateTime, Utc};
use console_directory::User;
use console_rbac::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default token issuer.
pub const DEFAULT_ISSUER: &str = "console-access";

/// Claims of a console session token.
///
/// # Example
///
/// ```rust,no_run
/// use console_auth::claims::SessionClaims;
/// use console_directory::User;
///
/// let user = User::pending("Alice", "alice@example.com", "digest");
/// let claims = SessionClaims::for_user(&user, "console-access", chrono::Duration::minutes(30));
/// assert_eq!(claims.user_id(), Some(user.id));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    // Standard JWT claims (RFC 7519)
    /// Subject (user ID)
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// JWT ID
    pub jti: String,

    // Console claims
    /// User email
    pub email: String,

    /// Role at issue time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl SessionClaims {
    /// Create claims for a user.
    ///
    /// # Arguments
    ///
    /// * `user` - The authenticated user
    /// * `issuer` - Token issuer
    /// * `duration` - Token validity duration
    pub fn for_user(user: &User, issuer: impl Into<String>, duration: chrono::Duration) -> Self {
        let now = Utc::now();
        let exp = now + duration;

        Self {
            sub: user.id.to_string(),
            iss: issuer.into(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            jti: Uuid::now_v7().to_string(),
            email: user.email.clone(),
            role: user.role,
        }
    }

    /// Get the user ID as UUID.
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }

    /// Check if the token is expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Get expiration as DateTime.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_default()
    }
}
