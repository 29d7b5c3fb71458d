//! # Console RBAC Catalog
//!
//! This crate holds the static vocabulary of the admin console's access
//! control: the roles users act under, the closed set of global permission
//! names, the CRUD actions, and the administrator-defined resource areas.
//!
//! ## Overview
//!
//! Three axes decide whether a user may do something:
//! - **Role**: `Superadmin` bypasses every other check
//! - **Global permissions**: named capabilities (`read`, `write`, `edit`, `assign_roles`)
//! - **Resource flags**: per (user, resource) create/read/update/delete booleans
//!
//! ```text
//! Requirement = GlobalPermission
//!             | Resource + Action
//!
//! Examples:
//!   "assign_roles"              - approve or deny accounts
//!   "announcements:update"      - edit announcements
//! ```
//!
//! The two permission namespaces are independent: global `read` does not
//! grant `read` on any resource.
//!
//! ## Usage
//!
//! ```rust
//! use console_rbac::{Action, GlobalPermission, Requirement, ResourceCatalog, ResourceFlags};
//!
//! let catalog = ResourceCatalog::with_defaults();
//! assert!(catalog.contains("dashboard"));
//!
//! let flags = ResourceFlags::from_actions([Action::Read]);
//! assert!(flags.allows(Action::Read));
//!
//! let req = Requirement::parse(Some("dashboard"), "read").unwrap();
//! assert_eq!(req.action(), Some(Action::Read));
//!
//! let req = Requirement::parse(None, "assign_roles").unwrap();
//! assert_eq!(req, Requirement::Global(GlobalPermission::AssignRoles));
//! ```

pub mod actions;
pub mod permissions;
pub mod resources;
pub mod roles;

// Re-export main types for convenience
pub use actions::Action;
pub use permissions::{GlobalPermission, Requirement, ResourceFlags};
pub use resources::{ResourceCatalog, ResourceName, DEFAULT_RESOURCES};
pub use roles::Role;
