//! Configuration
//!
//! Settings for session tokens and initial provisioning, loaded from the
//! environment.

use crate::bootstrap::BootstrapConfig;
use crate::error::{AuthError, AuthResult};
use crate::jwt::{JwtAlgorithm, JwtConfig, DEFAULT_SESSION_MINUTES};
use chrono::Duration;

/// Access control configuration.
#[derive(Debug, Clone)]
pub struct AccessConfig {
    /// Session token settings
    pub jwt: JwtConfig,

    /// Bootstrap account and resource catalog
    pub bootstrap: BootstrapConfig,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::new(String::new()),
            bootstrap: BootstrapConfig::default(),
        }
    }
}

impl AccessConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `JWT_SECRET`: HMAC secret for session tokens (required)
    /// - `JWT_ALGORITHM`: HS256, HS384 or HS512 (default: HS256)
    /// - `JWT_ISSUER`: Token issuer (default: console-access)
    /// - `SESSION_MINUTES`: Session lifetime in minutes (default: 30)
    /// - `SUPERADMIN_NAME`: Bootstrap account name (default: Superadmin)
    /// - `SUPERADMIN_EMAIL`: Bootstrap account email (required)
    /// - `SUPERADMIN_PASSWORD`: Bootstrap account password (required)
    ///
    /// Missing required values are reported by [`validate`](Self::validate).
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            jwt: JwtConfig {
                secret: std::env::var("JWT_SECRET").unwrap_or(default.jwt.secret),
                algorithm: std::env::var("JWT_ALGORITHM")
                    .ok()
                    .and_then(|s| JwtAlgorithm::parse(&s))
                    .unwrap_or(default.jwt.algorithm),
                issuer: std::env::var("JWT_ISSUER").unwrap_or(default.jwt.issuer),
                session_duration: std::env::var("SESSION_MINUTES")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .map(Duration::minutes)
                    .unwrap_or(default.jwt.session_duration),
            },
            bootstrap: BootstrapConfig {
                name: std::env::var("SUPERADMIN_NAME").unwrap_or(default.bootstrap.name),
                email: std::env::var("SUPERADMIN_EMAIL").unwrap_or(default.bootstrap.email),
                password: std::env::var("SUPERADMIN_PASSWORD").unwrap_or(default.bootstrap.password),
                resources: default.bootstrap.resources,
            },
        }
    }

    /// Check that every required value is present.
    pub fn validate(&self) -> AuthResult<()> {
        if self.jwt.secret.is_empty() {
            return Err(AuthError::ConfigError("JWT_SECRET is required".to_string()));
        }
        if self.jwt.session_duration <= Duration::zero() {
            return Err(AuthError::ConfigError(format!(
                "SESSION_MINUTES must be positive (default {})",
                DEFAULT_SESSION_MINUTES
            )));
        }
        self.bootstrap.validate()
    }
}
