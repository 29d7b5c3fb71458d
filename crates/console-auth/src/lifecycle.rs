//! Account lifecycle
//!
//! Moves accounts through signup, pending approval, approval and denial:
//!
//! ```text
//! Unregistered ──signup──→ Pending(role = None, approved = false)
//!                              ├──approve──→ Approved(role, permissions, grants)
//!                              │                └──approve──→ Approved (grants replaced)
//!                              └──deny─────→ Removed (hard delete, terminal)
//! ```
//!
//! Approve and deny are serialized per target user on top of the store's
//! atomic commit. Notifications are best-effort: a failed delivery is logged
//! and never fails the transition that produced it.

use crate::engine::Authorizer;
use crate::error::{AuthError, AuthResult};
use crate::jwt::TokenService;
use crate::password::{Argon2Hasher, CredentialHasher};
use chrono::{DateTime, Utc};
use console_directory::{Approval, DirectoryStore, ProfileUpdate, Removal, User, UserFilter};
use console_notify::{AccountEvent, Notifier};
use console_rbac::{GlobalPermission, Requirement, Role};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Where a freshly logged-in user is sent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Landing {
    /// Superadmin dashboard
    SuperadminDashboard,
    /// Admin dashboard
    AdminDashboard,
    /// End-user dashboard
    UserDashboard,
}

impl Landing {
    /// Get the landing page for a role.
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Superadmin => Landing::SuperadminDashboard,
            Role::Admin => Landing::AdminDashboard,
            Role::User => Landing::UserDashboard,
        }
    }

    /// Get the path of the landing page.
    pub fn path(&self) -> &'static str {
        match self {
            Landing::SuperadminDashboard => "/superadmin/dashboard",
            Landing::AdminDashboard => "/admin/dashboard",
            Landing::UserDashboard => "/user/dashboard",
        }
    }
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// The logged-in user
    pub user: User,

    /// Session token
    pub token: String,

    /// When the token expires
    pub expires_at: DateTime<Utc>,

    /// Role-dependent landing page
    pub landing: Landing,
}

/// Outcome of a login attempt that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// The account awaits approval. No token is issued.
    PendingApproval,

    /// Credentials are valid and the account is approved.
    Authenticated(Session),
}

impl LoginOutcome {
    /// Get the session, if one was issued.
    pub fn session(&self) -> Option<&Session> {
        match self {
            LoginOutcome::PendingApproval => None,
            LoginOutcome::Authenticated(session) => Some(session),
        }
    }
}

/// Per-user transition locks.
///
/// An entry lives while a transition holds or waits on it and is pruned when
/// the last [`TransitionGuard`] drops, including when the owning future is
/// cancelled mid-transition.
#[derive(Default)]
struct UserLocks {
    locks: std::sync::Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl UserLocks {
    async fn acquire(&self, user_id: Uuid) -> TransitionGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(user_id).or_default())
        };
        TransitionGuard {
            locks: self,
            user_id,
            guard: Some(lock.lock_owned().await),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// Exclusive hold on one user's transitions.
struct TransitionGuard<'a> {
    locks: &'a UserLocks,
    user_id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for TransitionGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        let mut locks = self.locks.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(&self.user_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.user_id);
        }
    }
}

/// Account lifecycle controller.
///
/// The only component that mutates users, global permissions and resource
/// grants. Collaborators (store, hasher, token service, notifier) are passed
/// in as handles.
///
/// # Example
///
/// ```rust,no_run
/// use console_auth::{AccountLifecycle, JwtService};
/// use console_directory::MemoryDirectory;
/// use console_notify::TracingNotifier;
/// use std::sync::Arc;
///
/// async fn example() {
///     let lifecycle = AccountLifecycle::new(
///         Arc::new(MemoryDirectory::new()),
///         Arc::new(JwtService::with_secret("secret").unwrap()),
///         Arc::new(TracingNotifier),
///     );
///     let user = lifecycle.signup("Alice", "alice@example.com", "pw").await.unwrap();
///     assert!(user.is_pending());
/// }
/// ```
pub struct AccountLifecycle {
    store: Arc<dyn DirectoryStore>,
    authorizer: Authorizer,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenService>,
    notifier: Arc<dyn Notifier>,
    locks: UserLocks,
}

impl std::fmt::Debug for AccountLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountLifecycle").finish_non_exhaustive()
    }
}

impl AccountLifecycle {
    /// Create a controller using Argon2 for credentials.
    pub fn new(
        store: Arc<dyn DirectoryStore>,
        tokens: Arc<dyn TokenService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            authorizer: Authorizer::new(Arc::clone(&store)),
            store,
            hasher: Arc::new(Argon2Hasher),
            tokens,
            notifier,
            locks: UserLocks::default(),
        }
    }

    /// Replace the credential hasher.
    pub fn with_hasher(mut self, hasher: Arc<dyn CredentialHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    /// Get the authorization engine reading the same store.
    pub fn authorizer(&self) -> &Authorizer {
        &self.authorizer
    }

    /// Register a new account awaiting approval.
    ///
    /// Every superadmin is notified of the signup.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Conflict`] if the email is already registered
    /// - [`AuthError::Validation`] if the name, email or password is empty or malformed
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> AuthResult<User> {
        if password.is_empty() {
            return Err(AuthError::Validation("password must not be empty".to_string()));
        }
        if let Some(existing) = self.store.find_user_by_email(email).await? {
            return Err(AuthError::Conflict(format!(
                "email already registered: {}",
                existing.email
            )));
        }

        let digest = self.hasher.hash(password)?;
        let user = self
            .store
            .create_user(User::pending(name.trim(), email, digest))
            .await?;

        tracing::info!(user_id = %user.id, email = %user.email, "User signed up, pending approval");

        let event = AccountEvent::SignupPending {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        };
        self.notify_superadmins(&event).await;

        Ok(user)
    }

    /// Approve an account, replacing its role, global permissions and
    /// resource grants with exactly those in `approval`.
    ///
    /// Approving again with different grants overwrites the previous ones.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Forbidden`] if the actor lacks `assign_roles`, grants the
    ///   superadmin role without being one, targets a superadmin without being
    ///   one, or targets itself
    /// - [`AuthError::NotFound`] if the target or a named resource does not exist
    pub async fn approve(&self, actor_id: Uuid, target_id: Uuid, approval: Approval) -> AuthResult<User> {
        let actor = self.require_role_manager(actor_id).await?;
        if actor_id == target_id {
            return Err(AuthError::forbidden("assign_roles:self"));
        }
        if approval.role == Role::Superadmin && !actor.is_superadmin() {
            return Err(AuthError::forbidden("assign_roles:superadmin"));
        }

        let user = {
            let _guard = self.locks.acquire(target_id).await;
            self.apply_approval(&actor, target_id, &approval).await?
        };

        tracing::info!(
            actor_id = %actor_id,
            user_id = %user.id,
            role = %approval.role,
            global_permissions = approval.global_permissions.len(),
            resource_grants = approval.effective_resources().count(),
            "User approved"
        );

        let event = AccountEvent::Approved {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: approval.role,
        };
        self.deliver(&event, &user.email).await;

        Ok(user)
    }

    async fn apply_approval(&self, actor: &User, target_id: Uuid, approval: &Approval) -> AuthResult<User> {
        let target = self.load_user(target_id).await?;
        if target.is_superadmin() && !actor.is_superadmin() {
            return Err(AuthError::forbidden("assign_roles:superadmin"));
        }
        Ok(self.store.apply_approval(target_id, approval).await?)
    }

    /// Reject an account. The user and every permission it holds are deleted.
    ///
    /// # Errors
    ///
    /// - [`AuthError::Forbidden`] if the actor lacks `assign_roles`, targets
    ///   itself, or targets a superadmin
    /// - [`AuthError::NotFound`] if the target does not exist
    pub async fn deny(&self, actor_id: Uuid, target_id: Uuid) -> AuthResult<Removal> {
        self.require_role_manager(actor_id).await?;
        if actor_id == target_id {
            return Err(AuthError::forbidden("assign_roles:self"));
        }

        let removal = {
            let _guard = self.locks.acquire(target_id).await;
            self.remove(target_id).await?
        };

        tracing::info!(
            actor_id = %actor_id,
            user_id = %target_id,
            global_permissions_removed = removal.global_permissions_removed,
            resource_grants_removed = removal.resource_grants_removed,
            "User denied and removed"
        );

        Ok(removal)
    }

    async fn remove(&self, target_id: Uuid) -> AuthResult<Removal> {
        let target = self.load_user(target_id).await?;
        if target.is_superadmin() {
            return Err(AuthError::forbidden("assign_roles:superadmin"));
        }
        Ok(self.store.delete_user(target_id).await?)
    }

    /// Log in with email and password.
    ///
    /// # Returns
    ///
    /// [`LoginOutcome::PendingApproval`] for any account awaiting approval,
    /// before the password is checked, otherwise a session with a role-dependent landing page.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NotFound`] if no account has this email
    /// - [`AuthError::InvalidCredentials`] if the account is approved and the
    ///   password does not match
    /// - [`AuthError::AccountLocked`] if the account is deactivated
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<LoginOutcome> {
        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| AuthError::NotFound("user".to_string()))?;

        let role = match user.role {
            Some(role) if user.approved => role,
            _ => {
                tracing::debug!(user_id = %user.id, "Login deferred: pending approval");
                return Ok(LoginOutcome::PendingApproval);
            }
        };

        if !self.hasher.verify(password, &user.credential_digest)? {
            tracing::debug!(user_id = %user.id, "Login rejected: bad password");
            return Err(AuthError::InvalidCredentials);
        }
        if !user.active {
            return Err(AuthError::AccountLocked);
        }

        let issued = self.tokens.issue(&user)?;
        tracing::info!(user_id = %user.id, role = %role, "User logged in");

        Ok(LoginOutcome::Authenticated(Session {
            user,
            token: issued.token,
            expires_at: issued.expires_at,
            landing: Landing::for_role(role),
        }))
    }

    /// Resolve a session token to the current user.
    ///
    /// The user is re-read from the store, so a denial or deactivation takes
    /// effect before the token expires.
    pub async fn authenticate(&self, token: &str) -> AuthResult<User> {
        let claims = self.tokens.verify(token)?;
        let user_id = claims
            .user_id()
            .ok_or_else(|| AuthError::InvalidToken("subject is not a user ID".to_string()))?;

        let user = self.load_user(user_id).await?;
        if !user.approved || user.role.is_none() {
            return Err(AuthError::PendingApproval);
        }
        if !user.active {
            return Err(AuthError::AccountLocked);
        }
        Ok(user)
    }

    /// List accounts awaiting approval, oldest first.
    pub async fn pending_users(&self, actor_id: Uuid) -> AuthResult<Vec<User>> {
        self.require_role_manager(actor_id).await?;
        Ok(self.store.list_users(&UserFilter::pending()).await?)
    }

    /// Apply a self-service profile edit.
    pub async fn update_profile(&self, actor_id: Uuid, update: &ProfileUpdate) -> AuthResult<User> {
        let user = self.store.update_profile(actor_id, update).await?;
        tracing::debug!(user_id = %actor_id, "Profile updated");
        Ok(user)
    }

    async fn load_user(&self, user_id: Uuid) -> AuthResult<User> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or_else(|| AuthError::NotFound(format!("user {}", user_id)))
    }

    async fn require_role_manager(&self, actor_id: Uuid) -> AuthResult<User> {
        self.authorizer
            .require_requirement(actor_id, &Requirement::global(GlobalPermission::AssignRoles))
            .await?;
        self.load_user(actor_id).await
    }

    async fn notify_superadmins(&self, event: &AccountEvent) {
        let superadmins = match self
            .store
            .list_users(&UserFilter::all().with_role(Role::Superadmin))
            .await
        {
            Ok(users) => users,
            Err(e) => {
                tracing::warn!(error = %e, topic = %event.topic(), "Failed to list notification recipients");
                return;
            }
        };

        for admin in superadmins {
            self.deliver(event, &admin.email).await;
        }
    }

    async fn deliver(&self, event: &AccountEvent, recipient: &str) {
        if let Err(e) = self.notifier.notify(event.notification_for(recipient)).await {
            tracing::warn!(
                error = %e,
                topic = %event.topic(),
                user_id = %event.user_id(),
                recipient = %recipient,
                "Failed to deliver notification"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::JwtService;
    use console_directory::MemoryDirectory;
    use console_notify::MemoryNotifier;
    use console_rbac::{Action, ResourceFlags, ResourceName};

    struct PlainHasher;

    impl CredentialHasher for PlainHasher {
        fn hash(&self, password: &str) -> AuthResult<String> {
            Ok(format!("plain:{}", password))
        }

        fn verify(&self, password: &str, digest: &str) -> AuthResult<bool> {
            Ok(digest == format!("plain:{}", password))
        }
    }

    struct Fixture {
        store: Arc<MemoryDirectory>,
        notifier: MemoryNotifier,
        lifecycle: AccountLifecycle,
        root: User,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryDirectory::new());
        store
            .seed_resource(&ResourceName::new("dashboard").unwrap())
            .await
            .unwrap();
        let root = store
            .create_user(User::superadmin("Root", "root@x.com", "plain:root"))
            .await
            .unwrap();
        let notifier = MemoryNotifier::new();
        let lifecycle = AccountLifecycle::new(
            store.clone(),
            Arc::new(JwtService::with_secret("test-secret").unwrap()),
            Arc::new(notifier.clone()),
        )
        .with_hasher(Arc::new(PlainHasher));

        Fixture {
            store,
            notifier,
            lifecycle,
            root,
        }
    }

    fn dashboard_reader() -> Approval {
        Approval::new(Role::User).with_resource(
            ResourceName::new("dashboard").unwrap(),
            ResourceFlags::from_actions([Action::Read]),
        )
    }

    #[test]
    fn test_landing_paths() {
        assert_eq!(Landing::for_role(Role::Superadmin).path(), "/superadmin/dashboard");
        assert_eq!(Landing::for_role(Role::Admin).path(), "/admin/dashboard");
        assert_eq!(Landing::for_role(Role::User).path(), "/user/dashboard");
    }

    #[tokio::test]
    async fn test_signup_notifies_superadmins() {
        let fx = fixture().await;
        let user = fx.lifecycle.signup("Alice", "alice@x.com", "pw").await.unwrap();

        assert!(user.is_pending());
        assert_eq!(user.role, None);

        let sent = fx.notifier.sent_to("root@x.com").await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "New User Signup Notification");
        assert!(sent[0].body.contains("alice@x.com"));
    }

    #[tokio::test]
    async fn test_signup_conflict() {
        let fx = fixture().await;
        fx.lifecycle.signup("Alice", "alice@x.com", "pw").await.unwrap();
        let err = fx
            .lifecycle
            .signup("Other", "ALICE@x.com", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_signup_survives_notification_failure() {
        let fx = fixture().await;
        fx.notifier.set_failing(true);

        let user = fx.lifecycle.signup("Alice", "alice@x.com", "pw").await.unwrap();
        assert!(fx.store.get_user(user.id).await.unwrap().is_some());
        assert_eq!(fx.notifier.stats().await.failed, 1);
    }

    #[tokio::test]
    async fn test_signup_rejects_empty_password() {
        let fx = fixture().await;
        let err = fx.lifecycle.signup("Alice", "alice@x.com", "").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn test_approve_requires_assign_roles() {
        let fx = fixture().await;
        let alice = fx.lifecycle.signup("Alice", "alice@x.com", "pw").await.unwrap();
        let bob = fx.lifecycle.signup("Bob", "bob@x.com", "pw").await.unwrap();
        fx.lifecycle
            .approve(fx.root.id, alice.id, dashboard_reader())
            .await
            .unwrap();

        let err = fx
            .lifecycle
            .approve(alice.id, bob.id, dashboard_reader())
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::forbidden("assign_roles"));
    }

    #[tokio::test]
    async fn test_admin_with_assign_roles_can_approve_but_not_promote() {
        let fx = fixture().await;
        let admin = fx.lifecycle.signup("Admin", "admin@x.com", "pw").await.unwrap();
        let bob = fx.lifecycle.signup("Bob", "bob@x.com", "pw").await.unwrap();
        fx.lifecycle
            .approve(
                fx.root.id,
                admin.id,
                Approval::new(Role::Admin).with_permission(GlobalPermission::AssignRoles),
            )
            .await
            .unwrap();

        let err = fx
            .lifecycle
            .approve(admin.id, bob.id, Approval::new(Role::Superadmin))
            .await
            .unwrap_err();
        assert_eq!(err, AuthError::forbidden("assign_roles:superadmin"));

        let approved = fx
            .lifecycle
            .approve(admin.id, bob.id, dashboard_reader())
            .await
            .unwrap();
        assert_eq!(approved.role, Some(Role::User));

        let err = fx
            .lifecycle
            .approve(admin.id, fx.root.id, dashboard_reader())
            .await
            .unwrap_err();
        assert!(err.is_refusal());
    }

    #[tokio::test]
    async fn test_approve_notifies_target() {
        let fx = fixture().await;
        let alice = fx.lifecycle.signup("Alice", "alice@x.com", "pw").await.unwrap();
        fx.lifecycle
            .approve(fx.root.id, alice.id, dashboard_reader())
            .await
            .unwrap();

        let sent = fx.notifier.sent_to("alice@x.com").await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Your account has been approved");
    }

    #[tokio::test]
    async fn test_approve_missing_target() {
        let fx = fixture().await;
        let err = fx
            .lifecycle
            .approve(fx.root.id, Uuid::now_v7(), dashboard_reader())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_deny_guards() {
        let fx = fixture().await;
        let err = fx.lifecycle.deny(fx.root.id, fx.root.id).await.unwrap_err();
        assert!(err.is_refusal());

        let err = fx.lifecycle.deny(fx.root.id, Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_login_paths() {
        let fx = fixture().await;
        let alice = fx.lifecycle.signup("Alice", "alice@x.com", "pw").await.unwrap();

        assert!(matches!(
            fx.lifecycle.login("nobody@x.com", "pw").await,
            Err(AuthError::NotFound(_))
        ));
        assert_eq!(
            fx.lifecycle.login("alice@x.com", "pw").await.unwrap(),
            LoginOutcome::PendingApproval
        );

        fx.lifecycle
            .approve(fx.root.id, alice.id, dashboard_reader())
            .await
            .unwrap();
        assert_eq!(
            fx.lifecycle.login("alice@x.com", "wrong").await,
            Err(AuthError::InvalidCredentials)
        );
        let outcome = fx.lifecycle.login("Alice@X.com", "pw").await.unwrap();
        let session = outcome.session().unwrap();
        assert_eq!(session.landing, Landing::UserDashboard);
        assert_eq!(session.user.id, alice.id);

        let root = fx.lifecycle.login("root@x.com", "root").await.unwrap();
        assert_eq!(root.session().unwrap().landing, Landing::SuperadminDashboard);
    }

    #[tokio::test]
    async fn test_pending_login_ignores_password() {
        let fx = fixture().await;
        fx.lifecycle.signup("Alice", "alice@x.com", "pw").await.unwrap();

        assert_eq!(
            fx.lifecycle.login("alice@x.com", "WRONG").await,
            Ok(LoginOutcome::PendingApproval)
        );
    }

    #[tokio::test]
    async fn test_approve_survives_notification_failure() {
        let fx = fixture().await;
        let alice = fx.lifecycle.signup("Alice", "alice@x.com", "pw").await.unwrap();
        fx.notifier.set_failing(true);

        let approved = fx
            .lifecycle
            .approve(fx.root.id, alice.id, dashboard_reader())
            .await
            .unwrap();
        assert_eq!(approved.role, Some(Role::User));

        let stored = fx.store.get_user(alice.id).await.unwrap().unwrap();
        assert!(stored.approved);
        assert_eq!(stored.role, Some(Role::User));
        assert!(fx
            .lifecycle
            .authorizer()
            .authorize(alice.id, Some("dashboard"), "read")
            .await
            .unwrap()
            .is_allowed());
        assert_eq!(fx.notifier.stats().await.failed, 1);
    }

    #[tokio::test]
    async fn test_user_locks_pruned_on_drop() {
        let locks = UserLocks::default();
        let id = Uuid::now_v7();

        let held = locks.acquire(id).await;
        assert_eq!(locks.len(), 1);

        // A waiter cancelled while the lock is held leaves no entry behind.
        let waiter = tokio::time::timeout(std::time::Duration::from_millis(10), locks.acquire(id)).await;
        assert!(waiter.is_err());
        assert_eq!(locks.len(), 1);

        drop(held);
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_transition_releases_lock() {
        let fx = fixture().await;
        let alice = fx.lifecycle.signup("Alice", "alice@x.com", "pw").await.unwrap();

        let held = fx.lifecycle.locks.acquire(alice.id).await;
        let pending = tokio::time::timeout(
            std::time::Duration::from_millis(10),
            fx.lifecycle.approve(fx.root.id, alice.id, dashboard_reader()),
        )
        .await;
        assert!(pending.is_err());
        drop(held);
        assert_eq!(fx.lifecycle.locks.len(), 0);

        fx.lifecycle
            .approve(fx.root.id, alice.id, dashboard_reader())
            .await
            .unwrap();
        assert_eq!(fx.lifecycle.locks.len(), 0);
    }

    #[tokio::test]
    async fn test_authenticate() {
        let fx = fixture().await;
        let alice = fx.lifecycle.signup("Alice", "alice@x.com", "pw").await.unwrap();
        fx.lifecycle
            .approve(fx.root.id, alice.id, dashboard_reader())
            .await
            .unwrap();

        let outcome = fx.lifecycle.login("alice@x.com", "pw").await.unwrap();
        let token = outcome.session().unwrap().token.clone();
        assert_eq!(fx.lifecycle.authenticate(&token).await.unwrap().id, alice.id);

        fx.lifecycle.deny(fx.root.id, alice.id).await.unwrap();
        assert!(matches!(
            fx.lifecycle.authenticate(&token).await,
            Err(AuthError::NotFound(_))
        ));
        assert!(matches!(
            fx.lifecycle.authenticate("garbage").await,
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[tokio::test]
    async fn test_pending_users() {
        let fx = fixture().await;
        let alice = fx.lifecycle.signup("Alice", "alice@x.com", "pw").await.unwrap();
        let bob = fx.lifecycle.signup("Bob", "bob@x.com", "pw").await.unwrap();
        fx.lifecycle
            .approve(fx.root.id, bob.id, dashboard_reader())
            .await
            .unwrap();

        let pending = fx.lifecycle.pending_users(fx.root.id).await.unwrap();
        assert_eq!(pending.iter().map(|u| u.id).collect::<Vec<_>>(), vec![alice.id]);

        assert!(fx.lifecycle.pending_users(bob.id).await.unwrap_err().is_refusal());
    }

    #[tokio::test]
    async fn test_update_profile() {
        let fx = fixture().await;
        let alice = fx.lifecycle.signup("Alice", "alice@x.com", "pw").await.unwrap();
        let updated = fx
            .lifecycle
            .update_profile(alice.id, &ProfileUpdate::name("Alice Liddell"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Alice Liddell");

        let err = fx
            .lifecycle
            .update_profile(alice.id, &ProfileUpdate::name("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }
}
