//! Creator-only modification
//!
//! Record types with an owner implement [`Owned`]. Handlers call
//! [`ensure_owner`] after the engine has allowed an update or delete, so that
//! a user may only modify records they created.

use crate::error::{AuthError, AuthResult};
use console_directory::User;
use uuid::Uuid;

/// A record with a creator.
pub trait Owned {
    /// The user who created the record, if known.
    fn created_by(&self) -> Option<Uuid>;
}

impl Owned for User {
    fn created_by(&self) -> Option<Uuid> {
        self.created_by
    }
}

/// Check that `user` created `record`.
///
/// Superadmins are not exempt: the engine already let them through, and this
/// check is about the record instance, not the permission.
///
/// # Errors
///
/// [`AuthError::Forbidden`] if the record has another creator or none.
pub fn ensure_owner<R: Owned + ?Sized>(record: &R, user: &User) -> AuthResult<()> {
    if record.created_by() == Some(user.id) {
        Ok(())
    } else {
        tracing::debug!(user_id = %user.id, "Ownership check failed");
        Err(AuthError::forbidden("owner"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Listing {
        created_by: Option<Uuid>,
    }

    impl Owned for Listing {
        fn created_by(&self) -> Option<Uuid> {
            self.created_by
        }
    }

    #[test]
    fn test_owner_passes() {
        let user = User::pending("Alice", "alice@x.com", "digest");
        let listing = Listing {
            created_by: Some(user.id),
        };
        assert!(ensure_owner(&listing, &user).is_ok());
    }

    #[test]
    fn test_other_creator_refused() {
        let user = User::pending("Alice", "alice@x.com", "digest");
        let listing = Listing {
            created_by: Some(Uuid::now_v7()),
        };
        assert_eq!(ensure_owner(&listing, &user), Err(AuthError::forbidden("owner")));

        let orphan = Listing { created_by: None };
        assert!(ensure_owner(&orphan, &user).is_err());
    }

    #[test]
    fn test_user_records_are_owned_by_creator() {
        let admin = User::pending("Admin", "admin@x.com", "digest");
        let created = User::pending("Bob", "bob@x.com", "digest")
            .with_creator(admin.id)
            .unwrap();
        assert!(ensure_owner(&created, &admin).is_ok());
        assert!(ensure_owner(&created, &created).is_err());
    }
}
