//! # Permissions
//!
//! The two permission axes below the role tier:
//! - **Global permissions**: named capabilities held regardless of resource
//! - **Resource flags**: a CRUD record per (user, resource) pair
//!
//! A [`Requirement`] names what a protected operation needs from one of the two.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::actions::Action;
use crate::resources::ResourceName;

/// Named capability held by a user independent of any resource.
///
/// The set is closed; the name is the identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GlobalPermission {
    /// View console data.
    Read,
    /// Create console data.
    Write,
    /// Modify or remove console data.
    Edit,
    /// Approve and deny pending accounts.
    AssignRoles,
}

impl GlobalPermission {
    /// Get the permission name.
    pub fn as_str(&self) -> &'static str {
        match self {
            GlobalPermission::Read => "read",
            GlobalPermission::Write => "write",
            GlobalPermission::Edit => "edit",
            GlobalPermission::AssignRoles => "assign_roles",
        }
    }

    /// Parse a permission name (case-insensitive).
    ///
    /// # Example
    ///
    /// ```
    /// use console_rbac::GlobalPermission;
    ///
    /// assert_eq!(GlobalPermission::parse("assign_roles"), Some(GlobalPermission::AssignRoles));
    /// assert_eq!(GlobalPermission::parse("delete"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "read" => Some(GlobalPermission::Read),
            "write" => Some(GlobalPermission::Write),
            "edit" => Some(GlobalPermission::Edit),
            "assign_roles" => Some(GlobalPermission::AssignRoles),
            _ => None,
        }
    }

    /// Get all permissions, in seeding order.
    pub fn all() -> [GlobalPermission; 4] {
        [
            GlobalPermission::Read,
            GlobalPermission::Write,
            GlobalPermission::Edit,
            GlobalPermission::AssignRoles,
        ]
    }

    /// Parse a list of names into a set, rejecting the first unknown name.
    ///
    /// # Returns
    ///
    /// `Ok(set)` on success, `Err(name)` with the first name that is not a
    /// global permission
    pub fn parse_set<I, S>(names: I) -> Result<BTreeSet<Self>, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| Self::parse(name.as_ref()).ok_or_else(|| name.as_ref().to_string()))
            .collect()
    }
}

impl std::fmt::Display for GlobalPermission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CRUD flags held by one user on one resource.
///
/// A record with every flag false is equivalent to holding no record, and
/// stores never persist one.
///
/// # Example
///
/// ```
/// use console_rbac::{Action, ResourceFlags};
///
/// let flags = ResourceFlags::from_actions([Action::Create, Action::Read]);
/// assert!(flags.allows(Action::Read));
/// assert!(!flags.allows(Action::Delete));
/// ```
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ResourceFlags {
    /// May create records.
    #[serde(default)]
    pub create: bool,
    /// May view records.
    #[serde(default)]
    pub read: bool,
    /// May modify records.
    #[serde(default)]
    pub update: bool,
    /// May remove records.
    #[serde(default)]
    pub delete: bool,
}

impl ResourceFlags {
    /// No flags set.
    pub fn none() -> Self {
        Self::default()
    }

    /// Every flag set.
    pub fn all() -> Self {
        Self {
            create: true,
            read: true,
            update: true,
            delete: true,
        }
    }

    /// Build flags with exactly the given actions set.
    pub fn from_actions<I>(actions: I) -> Self
    where
        I: IntoIterator<Item = Action>,
    {
        let mut flags = Self::none();
        for action in actions {
            flags.set(action, true);
        }
        flags
    }

    /// Check the flag corresponding to an action.
    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Create => self.create,
            Action::Read => self.read,
            Action::Update => self.update,
            Action::Delete => self.delete,
        }
    }

    /// Set or clear the flag corresponding to an action.
    pub fn set(&mut self, action: Action, value: bool) {
        match action {
            Action::Create => self.create = value,
            Action::Read => self.read = value,
            Action::Update => self.update = value,
            Action::Delete => self.delete = value,
        }
    }

    /// Check if no flag is set.
    pub fn is_empty(&self) -> bool {
        !(self.create || self.read || self.update || self.delete)
    }

    /// Get the actions this record allows.
    pub fn actions(&self) -> Vec<Action> {
        Action::all()
            .into_iter()
            .filter(|action| self.allows(*action))
            .collect()
    }
}

/// What a protected operation asks of the caller.
///
/// The global and resource namespaces are independent: holding the global
/// `read` permission says nothing about `read` on any particular resource.
///
/// # Example
///
/// ```
/// use console_rbac::{Action, GlobalPermission, Requirement};
///
/// let req = Requirement::parse(None, "assign_roles").unwrap();
/// assert_eq!(req, Requirement::Global(GlobalPermission::AssignRoles));
/// assert_eq!(req.to_string(), "assign_roles");
///
/// let req = Requirement::parse(Some("Announcements"), "update").unwrap();
/// assert_eq!(req.to_string(), "announcements:update");
/// assert_eq!(req.action(), Some(Action::Update));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// A named global permission.
    Global(GlobalPermission),

    /// A CRUD action on a named resource.
    Resource {
        /// The resource area.
        resource: ResourceName,
        /// The action on it.
        action: Action,
    },
}

impl Requirement {
    /// Requirement for a global permission.
    pub fn global(permission: GlobalPermission) -> Self {
        Requirement::Global(permission)
    }

    /// Requirement for an action on a resource.
    pub fn resource(resource: ResourceName, action: Action) -> Self {
        Requirement::Resource { resource, action }
    }

    /// Interpret an (optional resource, action name) pair.
    ///
    /// - a resource and a CRUD action name → [`Requirement::Resource`]
    /// - otherwise a global permission name → [`Requirement::Global`]
    /// - anything else → `None`
    pub fn parse(resource: Option<&str>, action: &str) -> Option<Self> {
        if let Some(resource) = resource {
            if let Some(action) = Action::parse(action) {
                return ResourceName::new(resource).map(|resource| Requirement::Resource { resource, action });
            }
        }
        GlobalPermission::parse(action).map(Requirement::Global)
    }

    /// Get the resource this requirement is scoped to, if any.
    pub fn resource_name(&self) -> Option<&ResourceName> {
        match self {
            Requirement::Resource { resource, .. } => Some(resource),
            Requirement::Global(_) => None,
        }
    }

    /// Get the CRUD action, for resource-scoped requirements.
    pub fn action(&self) -> Option<Action> {
        match self {
            Requirement::Resource { action, .. } => Some(*action),
            Requirement::Global(_) => None,
        }
    }
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Requirement::Global(permission) => f.write_str(permission.as_str()),
            Requirement::Resource { resource, action } => write!(f, "{}:{}", resource, action),
        }
    }
}
