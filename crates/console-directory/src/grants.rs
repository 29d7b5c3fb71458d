//! Resource records, permission grants, and the approval change set
//!
//! A [`ResourceGrant`] is a record, not an edge: at most one exists per
//! (user, resource) pair and it carries all four CRUD flags. An [`Approval`]
//! is the full replacement set of grants written by one approval transition.

use chrono::{DateTime, Utc};
use console_rbac::{GlobalPermission, ResourceFlags, ResourceName, Role};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use crate::user::User;

/// A resource area known to the directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    /// Unique resource ID
    pub id: Uuid,

    /// Normalized, unique name
    pub name: ResourceName,

    /// When the resource was seeded
    pub created_at: DateTime<Utc>,
}

impl Resource {
    /// Creates a new resource record.
    pub fn new(name: ResourceName) -> Self {
        Self {
            id: Uuid::now_v7(),
            name,
            created_at: Utc::now(),
        }
    }
}

/// CRUD flags held by one user on one resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceGrant {
    /// Unique grant ID
    pub id: Uuid,

    /// Grantee
    pub user_id: Uuid,

    /// Resource ID
    pub resource_id: Uuid,

    /// Resource name, denormalized for display
    pub resource: ResourceName,

    /// The granted actions
    pub flags: ResourceFlags,

    /// When the grant was written
    pub granted_at: DateTime<Utc>,
}

impl ResourceGrant {
    /// Creates a grant row.
    pub fn new(user_id: Uuid, resource: &Resource, flags: ResourceFlags) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            resource_id: resource.id,
            resource: resource.name.clone(),
            flags,
            granted_at: Utc::now(),
        }
    }
}

/// Everything one approval writes for its target.
///
/// Applying an approval replaces the target's global permissions and resource
/// grants with exactly these; it never merges with what was there before.
///
/// # Examples
///
/// ```
/// use console_directory::Approval;
/// use console_rbac::{Action, GlobalPermission, ResourceFlags, ResourceName, Role};
///
/// let approval = Approval::new(Role::Admin)
///     .with_permission(GlobalPermission::Read)
///     .with_resource(
///         ResourceName::new("orders").unwrap(),
///         ResourceFlags::from_actions([Action::Create, Action::Read]),
///     )
///     .with_resource(ResourceName::new("refunds").unwrap(), ResourceFlags::none());
///
/// // Rows with no flag set are not persisted.
/// assert_eq!(approval.effective_resources().count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    /// Role to assign
    pub role: Role,

    /// Exact set of global permissions after approval
    #[serde(default)]
    pub global_permissions: BTreeSet<GlobalPermission>,

    /// Requested flags per resource
    #[serde(default)]
    pub resources: BTreeMap<ResourceName, ResourceFlags>,
}

impl Approval {
    /// Start an approval with no permissions.
    pub fn new(role: Role) -> Self {
        Self {
            role,
            global_permissions: BTreeSet::new(),
            resources: BTreeMap::new(),
        }
    }

    /// Add a global permission.
    pub fn with_permission(mut self, permission: GlobalPermission) -> Self {
        self.global_permissions.insert(permission);
        self
    }

    /// Add several global permissions.
    pub fn with_permissions<I>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = GlobalPermission>,
    {
        self.global_permissions.extend(permissions);
        self
    }

    /// Set the flags for a resource, replacing earlier flags for the same name.
    pub fn with_resource(mut self, resource: ResourceName, flags: ResourceFlags) -> Self {
        self.resources.insert(resource, flags);
        self
    }

    /// Resources that will actually get a grant row (at least one flag set).
    pub fn effective_resources(&self) -> impl Iterator<Item = (&ResourceName, &ResourceFlags)> {
        self.resources.iter().filter(|(_, flags)| !flags.is_empty())
    }
}

/// What a single read saw about the requested resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceView {
    /// The caller did not ask about a resource.
    NotRequested,

    /// The name is not in the catalog.
    Unknown(ResourceName),

    /// The resource exists; `grant` is the user's flags on it, if any row exists.
    Known {
        /// The resource record
        resource: Resource,
        /// The user's grant, or `None` when no row exists
        grant: Option<ResourceFlags>,
    },
}

/// A consistent image of everything one authorization decision reads.
///
/// Stores produce it under a single read so that a concurrent approval is
/// observed either entirely or not at all.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessSnapshot {
    /// The user being authorized
    pub user: User,

    /// The user's global permissions
    pub global_permissions: BTreeSet<GlobalPermission>,

    /// The requested resource and the user's grant on it
    pub resource: ResourceView,
}

/// Outcome of deleting a user with cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    /// The deleted record
    pub user: User,

    /// Number of global permission edges removed
    pub global_permissions_removed: usize,

    /// Number of resource grant rows removed
    pub resource_grants_removed: usize,
}
