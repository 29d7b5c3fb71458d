//! User domain models
//!
//! This module provides the user record held by the directory, the filter used
//! to list users, and the typed profile update command.

use chrono::{DateTime, Utc};
use console_rbac::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DirectoryError, DirectoryResult};

/// Normalize an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// An account in the console.
///
/// A freshly signed-up user has no role and is not approved. Approval sets the
/// role and both permission layers at once; denial deletes the record, so a
/// live user never has `denied == true`.
///
/// # Examples
///
/// ```
/// use console_directory::User;
///
/// let user = User::pending("Alice", "Alice@Example.com", "digest");
/// assert_eq!(user.email, "alice@example.com");
/// assert!(user.is_pending());
/// assert!(user.role.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Unique user ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Login email (normalized, unique)
    pub email: String,

    /// Password digest produced by the credential hasher
    #[serde(skip_serializing, default)]
    pub credential_digest: String,

    /// Assigned role; `None` until approved
    pub role: Option<Role>,

    /// Whether an administrator approved the account
    pub approved: bool,

    /// Whether the account was denied
    pub denied: bool,

    /// Whether the account may sign in
    pub active: bool,

    /// The user who created this account, if any
    pub created_by: Option<Uuid>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last modified
    pub updated_at: DateTime<Utc>,

    /// When the account was last approved
    pub approved_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a pending signup.
    ///
    /// The user is created with:
    /// - A newly generated UUID v7 ID
    /// - No role, not approved, active
    /// - The email normalized to lower case
    pub fn pending(
        name: impl Into<String>,
        email: impl AsRef<str>,
        credential_digest: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            email: normalize_email(email.as_ref()),
            credential_digest: credential_digest.into(),
            role: None,
            approved: false,
            denied: false,
            active: true,
            created_by: None,
            created_at: now,
            updated_at: now,
            approved_at: None,
        }
    }

    /// Creates an approved superadmin account, used for bootstrap provisioning.
    pub fn superadmin(
        name: impl Into<String>,
        email: impl AsRef<str>,
        credential_digest: impl Into<String>,
    ) -> Self {
        let mut user = Self::pending(name, email, credential_digest);
        user.role = Some(Role::Superadmin);
        user.approved = true;
        user.approved_at = Some(user.created_at);
        user
    }

    /// Record who created this account.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::SelfReference`] if `creator_id` is this user's ID.
    pub fn with_creator(mut self, creator_id: Uuid) -> DirectoryResult<Self> {
        if creator_id == self.id {
            return Err(DirectoryError::SelfReference(self.id));
        }
        self.created_by = Some(creator_id);
        Ok(self)
    }

    /// Check the record-level invariants a store enforces on write.
    pub fn validate(&self) -> DirectoryResult<()> {
        if self.created_by == Some(self.id) {
            return Err(DirectoryError::SelfReference(self.id));
        }
        if self.name.trim().is_empty() {
            return Err(DirectoryError::InvalidField {
                field: "name",
                reason: "must not be blank".to_string(),
            });
        }
        if !self.email.contains('@') {
            return Err(DirectoryError::InvalidField {
                field: "email",
                reason: format!("'{}' is not an email address", self.email),
            });
        }
        Ok(())
    }

    /// Check if this user holds the superadmin role.
    pub fn is_superadmin(&self) -> bool {
        self.role.is_some_and(|role| role.bypasses_checks())
    }

    /// Check if the account still awaits approval.
    pub fn is_pending(&self) -> bool {
        !self.approved
    }
}

/// Filter for listing users.
///
/// Unset fields match everything.
///
/// # Examples
///
/// ```
/// use console_directory::{User, UserFilter};
/// use console_rbac::Role;
///
/// let pending = User::pending("Bob", "bob@example.com", "digest");
/// assert!(UserFilter::pending().matches(&pending));
/// assert!(!UserFilter::all().with_role(Role::Admin).matches(&pending));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Only users holding this role
    pub role: Option<Role>,

    /// Only users with this approval status
    pub approved: Option<bool>,
}

impl UserFilter {
    /// Match every user.
    pub fn all() -> Self {
        Self::default()
    }

    /// Match users awaiting approval.
    pub fn pending() -> Self {
        Self {
            role: None,
            approved: Some(false),
        }
    }

    /// Restrict to a role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Check whether a user passes the filter.
    pub fn matches(&self, user: &User) -> bool {
        if let Some(role) = self.role {
            if user.role != Some(role) {
                return false;
            }
        }
        if let Some(approved) = self.approved {
            if user.approved != approved {
                return false;
            }
        }
        true
    }
}

/// Typed self-service profile edit.
///
/// This is the complete list of fields a user may change about themselves;
/// role, approval, and activity are only changed by the lifecycle controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ProfileUpdate {
    /// Change the display name.
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    /// Check if the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }

    /// Apply the update to a user record, validating each field.
    pub fn apply(&self, user: &mut User) -> DirectoryResult<()> {
        if let Some(ref name) = self.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(DirectoryError::InvalidField {
                    field: "name",
                    reason: "must not be blank".to_string(),
                });
            }
            user.name = name.to_string();
        }
        user.updated_at = Utc::now();
        Ok(())
    }
}
