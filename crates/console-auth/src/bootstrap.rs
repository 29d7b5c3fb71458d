//! Initial provisioning
//!
//! Seeds the resource catalog and ensures the superadmin bootstrap account
//! exists. Safe to run on every start.

use crate::error::{AuthError, AuthResult};
use crate::password::CredentialHasher;
use console_directory::{DirectoryStore, User};
use console_rbac::ResourceCatalog;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Settings for initial provisioning.
#[derive(Clone)]
pub struct BootstrapConfig {
    /// Superadmin display name
    pub name: String,

    /// Superadmin email
    pub email: String,

    /// Superadmin initial password
    pub password: String,

    /// Resources to seed
    pub resources: ResourceCatalog,
}

impl std::fmt::Debug for BootstrapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapConfig")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("resources", &self.resources)
            .finish()
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            name: "Superadmin".to_string(),
            email: String::new(),
            password: String::new(),
            resources: ResourceCatalog::with_defaults(),
        }
    }
}

impl BootstrapConfig {
    /// Create a configuration for the given account with the default resources.
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    /// Check that the account fields are present.
    pub fn validate(&self) -> AuthResult<()> {
        if self.email.trim().is_empty() {
            return Err(AuthError::ConfigError("SUPERADMIN_EMAIL is required".to_string()));
        }
        if self.password.is_empty() {
            return Err(AuthError::ConfigError("SUPERADMIN_PASSWORD is required".to_string()));
        }
        Ok(())
    }
}

/// What a bootstrap run did.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BootstrapReport {
    /// The superadmin bootstrap account
    pub superadmin_id: Uuid,

    /// Whether the account was created by this run
    pub created: bool,

    /// Resources added to the catalog by this run
    pub resources_seeded: usize,
}

/// Seed the catalog and ensure the superadmin bootstrap account.
///
/// The account is looked up by email and created only if absent, so running
/// this twice leaves exactly one account and one entry per resource.
///
/// # Errors
///
/// [`AuthError::ConfigError`] if the settings are incomplete, or if the email
/// belongs to an account that is not a superadmin.
pub async fn bootstrap(
    store: &dyn DirectoryStore,
    hasher: &dyn CredentialHasher,
    config: &BootstrapConfig,
) -> AuthResult<BootstrapReport> {
    config.validate()?;

    let before = store.list_resources().await?.len();
    for name in config.resources.iter() {
        store.seed_resource(name).await?;
    }
    let resources_seeded = store.list_resources().await?.len() - before;

    if let Some(existing) = store.find_user_by_email(&config.email).await? {
        if !existing.is_superadmin() {
            return Err(AuthError::ConfigError(format!(
                "bootstrap email {} belongs to a non-superadmin account",
                existing.email
            )));
        }
        tracing::debug!(user_id = %existing.id, resources_seeded, "Bootstrap account already present");
        return Ok(BootstrapReport {
            superadmin_id: existing.id,
            created: false,
            resources_seeded,
        });
    }

    let digest = hasher.hash(&config.password)?;
    let user = store
        .create_user(User::superadmin(config.name.trim(), &config.email, digest))
        .await?;

    tracing::info!(user_id = %user.id, email = %user.email, resources_seeded, "Superadmin bootstrap account created");

    Ok(BootstrapReport {
        superadmin_id: user.id,
        created: true,
        resources_seeded,
    })
}
