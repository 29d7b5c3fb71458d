//! # Console Directory
//!
//! This crate holds the shared, mutable access state of the admin console:
//! who the users are, which global permissions they hold, and which CRUD
//! flags they hold on each resource.
//!
//! ## Overview
//!
//! The console-directory crate handles:
//! - **Users**: identity, role, approval status, and the `created_by` ownership edge
//! - **Global Permission Store**: user → named permission edges
//! - **Resource Permission Matrix**: one CRUD flag record per (user, resource)
//! - **Resource catalog records**: deduplicated by normalized name
//!
//! ## Architecture
//!
//! ```text
//! User ──created_by──→ User (nullable, never itself)
//!   ├─ GlobalPermission edges   (replaced wholesale on approval)
//!   └─ ResourceGrant rows ──→ Resource
//!                               (one per pair, replaced wholesale on approval)
//! ```
//!
//! All three stores sit behind the single [`DirectoryStore`] trait so that an
//! approval or a denial commits across them atomically, and so that an
//! authorization check reads them through one consistent [`AccessSnapshot`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use console_directory::{Approval, DirectoryStore, MemoryDirectory, User};
//! use console_rbac::{Action, GlobalPermission, ResourceFlags, ResourceName, Role};
//!
//! async fn example() {
//!     let dir = MemoryDirectory::new();
//!     let orders = ResourceName::new("orders").unwrap();
//!     dir.seed_resource(&orders).await.unwrap();
//!
//!     let user = dir
//!         .create_user(User::pending("Alice", "alice@example.com", "digest"))
//!         .await
//!         .unwrap();
//!
//!     let approval = Approval::new(Role::Admin)
//!         .with_permission(GlobalPermission::Read)
//!         .with_resource(orders, ResourceFlags::from_actions([Action::Create, Action::Read]));
//!     dir.apply_approval(user.id, &approval).await.unwrap();
//! }
//! ```

pub mod error;
pub mod grants;
#[cfg(feature = "memory")]
pub mod memory;
pub mod store;
pub mod user;

// Re-export main types for convenience
pub use error::{DirectoryError, DirectoryResult};
pub use grants::{AccessSnapshot, Approval, Removal, Resource, ResourceGrant, ResourceView};
#[cfg(feature = "memory")]
pub use memory::{DirectoryStats, MemoryDirectory};
pub use store::DirectoryStore;
pub use user::{normalize_email, ProfileUpdate, User, UserFilter};
