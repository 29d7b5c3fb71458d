//! Console roles
//!
//! The coarse identity tier a user acts under. An account that has signed up
//! but not been approved carries no role at all, which callers express as
//! `Option<Role>::None`.

use serde::{Deserialize, Serialize};

/// Role assigned to an approved account.
///
/// The hierarchy is: User < Admin < Superadmin
///
/// - **User**: end-user dashboard, gated by the permission layers
/// - **Admin**: admin dashboard, gated by the permission layers
/// - **Superadmin**: bypasses every permission check
///
/// # Examples
///
/// ```
/// use console_rbac::Role;
///
/// assert!(Role::Superadmin.bypasses_checks());
/// assert!(!Role::Admin.bypasses_checks());
/// assert!(Role::Admin > Role::User);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular end user
    User = 0,

    /// Administrator
    Admin = 1,

    /// Unrestricted operator
    Superadmin = 2,
}

impl Role {
    /// Check if this role short-circuits authorization to allow.
    pub fn bypasses_checks(&self) -> bool {
        *self == Role::Superadmin
    }

    /// Get the string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Superadmin => "superadmin",
        }
    }

    /// Parse a role from its name (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use console_rbac::Role;
    ///
    /// assert_eq!(Role::parse("Admin"), Some(Role::Admin));
    /// assert_eq!(Role::parse("owner"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            "superadmin" | "super_admin" => Some(Role::Superadmin),
            _ => None,
        }
    }

    /// Get all roles, lowest first.
    pub fn all() -> [Role; 3] {
        [Role::User, Role::Admin, Role::Superadmin]
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_hierarchy() {
        assert!(Role::User < Role::Admin);
        assert!(Role::Admin < Role::Superadmin);
    }

    #[test]
    fn test_only_superadmin_bypasses() {
        assert!(Role::Superadmin.bypasses_checks());
        assert!(!Role::Admin.bypasses_checks());
        assert!(!Role::User.bypasses_checks());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("superadmin"), Some(Role::Superadmin));
        assert_eq!(Role::parse("super_admin"), Some(Role::Superadmin));
        assert_eq!(Role::parse("none"), None);
    }

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::Superadmin).unwrap();
        assert_eq!(json, "\"superadmin\"");

        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }
}
