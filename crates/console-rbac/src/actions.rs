//! # Actions
//!
//! The four resource-scoped operations tracked by the permission matrix.

use serde::{Deserialize, Serialize};

/// Actions that can be performed on a resource.
///
/// Each action maps onto exactly one boolean flag of a
/// [`ResourceFlags`](crate::permissions::ResourceFlags) record:
/// - **Create** → `create`
/// - **Read** → `read`
/// - **Update** → `update`
/// - **Delete** → `delete`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Create new records in the resource area.
    Create,

    /// View records in the resource area.
    Read,

    /// Modify existing records.
    Update,

    /// Remove records.
    Delete,
}

impl Action {
    /// Get the string representation of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    /// Parse an action from its name.
    ///
    /// Parsing is strict and case-insensitive. Unlike HTTP verbs or UI labels,
    /// no aliases are accepted: `"write"` and `"edit"` are global permission
    /// names, not resource actions.
    ///
    /// # Example
    ///
    /// ```
    /// use console_rbac::actions::Action;
    ///
    /// assert_eq!(Action::parse("read"), Some(Action::Read));
    /// assert_eq!(Action::parse("DELETE"), Some(Action::Delete));
    /// assert_eq!(Action::parse("write"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "create" => Some(Action::Create),
            "read" => Some(Action::Read),
            "update" => Some(Action::Update),
            "delete" => Some(Action::Delete),
            _ => None,
        }
    }

    /// Get all actions.
    pub fn all() -> [Action; 4] {
        [Action::Create, Action::Read, Action::Update, Action::Delete]
    }

    /// Check if this action leaves data untouched.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Action::Read)
    }

    /// Check if this action modifies an existing record.
    ///
    /// These are the actions where callers layer the creator-only ownership
    /// check on top of an allowed decision.
    pub fn modifies_existing(&self) -> bool {
        matches!(self, Action::Update | Action::Delete)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
