//! # Console Access
//!
//! This crate provides the authorization engine and the account lifecycle of
//! the admin console.
//!
//! ## Overview
//!
//! The console-auth crate handles:
//! - **Authorization**: one [`Authorizer::authorize`] entry point combining
//!   role, global permissions and per-resource CRUD flags
//! - **Lifecycle**: signup, approval, denial, login and request authentication
//! - **Bootstrap**: idempotent catalog seeding and superadmin provisioning
//! - **Capabilities**: Argon2 credential hashing and JWT session tokens
//! - **Ownership**: creator-only modification checks for record handlers
//!
//! ## Decision order
//!
//! ```text
//! Superadmin?                      → Allow (nothing else is consulted)
//! role unset / unapproved / inactive → Deny
//! global permission name           → Allow iff held
//! resource + CRUD action           → resource must exist, Allow iff flag set
//! otherwise                        → Deny("missing permission: {action}")
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use console_auth::{bootstrap, AccessConfig, AccountLifecycle, Argon2Hasher, JwtService};
//! use console_directory::{Approval, MemoryDirectory};
//! use console_notify::TracingNotifier;
//! use console_rbac::{Action, ResourceFlags, ResourceName, Role};
//! use std::sync::Arc;
//!
//! async fn example() -> console_auth::AuthResult<()> {
//!     let config = AccessConfig::from_env();
//!     config.validate()?;
//!
//!     let store = Arc::new(MemoryDirectory::new());
//!     let report = bootstrap(&*store, &Argon2Hasher, &config.bootstrap).await?;
//!
//!     let lifecycle = AccountLifecycle::new(
//!         store,
//!         Arc::new(JwtService::new(config.jwt)?),
//!         Arc::new(TracingNotifier),
//!     );
//!
//!     let alice = lifecycle.signup("Alice", "alice@example.com", "pw").await?;
//!     let approval = Approval::new(Role::User).with_resource(
//!         ResourceName::new("dashboard").unwrap(),
//!         ResourceFlags::from_actions([Action::Read]),
//!     );
//!     lifecycle.approve(report.superadmin_id, alice.id, approval).await?;
//!
//!     lifecycle
//!         .authorizer()
//!         .require(alice.id, Some("dashboard"), "read")
//!         .await
//! }
//! ```
//!
//! ## Errors
//!
//! A refused check states which permission was missing. Unknown resources are
//! reported to callers exactly like missing grants; see [`AuthError`].

pub mod bootstrap;
pub mod claims;
pub mod config;
pub mod engine;
pub mod error;
pub mod jwt;
pub mod lifecycle;
pub mod ownership;
pub mod password;

// Re-export main types for convenience
pub use bootstrap::{bootstrap, BootstrapConfig, BootstrapReport};
pub use claims::SessionClaims;
pub use config::AccessConfig;
pub use engine::{decide, Authorizer, Decision};
pub use error::{AuthError, AuthResult};
pub use jwt::{IssuedToken, JwtAlgorithm, JwtConfig, JwtService, TokenService};
pub use lifecycle::{AccountLifecycle, Landing, LoginOutcome, Session};
pub use ownership::{ensure_owner, Owned};
pub use password::{Argon2Hasher, CredentialHasher};
