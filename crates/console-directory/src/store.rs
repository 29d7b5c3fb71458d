//! Directory store abstraction
//!
//! One trait covers the three shared stores (users, global permissions,
//! resource grants) because the approval and denial transitions must commit
//! across all three atomically.

use async_trait::async_trait;
use console_rbac::{GlobalPermission, ResourceName};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::error::DirectoryResult;
use crate::grants::{AccessSnapshot, Approval, Removal, Resource, ResourceGrant};
use crate::user::{ProfileUpdate, User, UserFilter};

/// Persistence for users and their permission state.
///
/// Implementations must make [`apply_approval`](DirectoryStore::apply_approval)
/// and [`delete_user`](DirectoryStore::delete_user) atomic per user, and must
/// build [`access_snapshot`](DirectoryStore::access_snapshot) from a single
/// consistent read.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Insert a new user.
    ///
    /// Fails with `EmailTaken` if the email is registered, `SelfReference` or
    /// `InvalidField` if the record is malformed, and `UserNotFound` if
    /// `created_by` names a user that does not exist.
    async fn create_user(&self, user: User) -> DirectoryResult<User>;

    /// Get a user by ID.
    async fn get_user(&self, id: Uuid) -> DirectoryResult<Option<User>>;

    /// Get a user by email (compared after normalization).
    async fn find_user_by_email(&self, email: &str) -> DirectoryResult<Option<User>>;

    /// List users passing a filter, oldest first.
    async fn list_users(&self, filter: &UserFilter) -> DirectoryResult<Vec<User>>;

    /// Apply a typed profile update.
    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> DirectoryResult<User>;

    /// Delete a user together with every global permission edge and resource
    /// grant it holds. `created_by` edges pointing at it are cleared.
    async fn delete_user(&self, id: Uuid) -> DirectoryResult<Removal>;

    /// Add a resource to the catalog, or return the existing record with the
    /// same normalized name.
    async fn seed_resource(&self, name: &ResourceName) -> DirectoryResult<Resource>;

    /// List the catalog, one entry per name, ordered by name.
    async fn list_resources(&self) -> DirectoryResult<Vec<Resource>>;

    /// Look up a resource by name.
    async fn find_resource(&self, name: &ResourceName) -> DirectoryResult<Option<Resource>>;

    /// Global permissions held by a user; empty for unknown users.
    async fn global_permissions(&self, user_id: Uuid) -> DirectoryResult<BTreeSet<GlobalPermission>>;

    /// Resource grants held by a user, ordered by resource name; empty for unknown users.
    async fn resource_grants(&self, user_id: Uuid) -> DirectoryResult<Vec<ResourceGrant>>;

    /// Set role and approval flags, then replace the user's global permissions
    /// and resource grants with exactly those in `approval`, as one unit.
    ///
    /// Fails with `UserNotFound` or `ResourceNotFound` before anything is written.
    async fn apply_approval(&self, user_id: Uuid, approval: &Approval) -> DirectoryResult<User>;

    /// Read the user, its global permissions, and its grant on `resource` in
    /// one consistent view. Returns `None` if the user does not exist.
    async fn access_snapshot(
        &self,
        user_id: Uuid,
        resource: Option<&ResourceName>,
    ) -> DirectoryResult<Option<AccessSnapshot>>;
}
