//! In-memory directory store
//!
//! All state lives behind one [`RwLock`]. Every mutation validates its input
//! first and then writes under a single write guard, so readers always see
//! either the state before a transition or the state after it.

use async_trait::async_trait;
use chrono::Utc;
use console_rbac::{GlobalPermission, ResourceName};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{DirectoryError, DirectoryResult};
use crate::grants::{AccessSnapshot, Approval, Removal, Resource, ResourceGrant, ResourceView};
use crate::store::DirectoryStore;
use crate::user::{normalize_email, ProfileUpdate, User, UserFilter};

/// Row counts held by a [`MemoryDirectory`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryStats {
    /// Users of any status
    pub users: usize,
    /// Users awaiting approval
    pub pending_users: usize,
    /// Catalog entries
    pub resources: usize,
    /// (user, permission) edges
    pub global_permission_edges: usize,
    /// (user, resource) grant rows
    pub resource_grants: usize,
}

#[derive(Debug, Default)]
struct DirectoryState {
    users: HashMap<Uuid, User>,
    emails: HashMap<String, Uuid>,
    resources: BTreeMap<ResourceName, Resource>,
    global_permissions: HashMap<Uuid, BTreeSet<GlobalPermission>>,
    resource_grants: HashMap<Uuid, BTreeMap<ResourceName, ResourceGrant>>,
}

/// In-memory directory store.
///
/// Suitable for single-process deployments and tests. Cloning shares the
/// underlying state.
#[derive(Clone, Default)]
pub struct MemoryDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

impl std::fmt::Debug for MemoryDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDirectory").finish_non_exhaustive()
    }
}

impl MemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get row counts.
    pub async fn stats(&self) -> DirectoryStats {
        let state = self.state.read().await;
        DirectoryStats {
            users: state.users.len(),
            pending_users: state.users.values().filter(|u| u.is_pending()).count(),
            resources: state.resources.len(),
            global_permission_edges: state.global_permissions.values().map(BTreeSet::len).sum(),
            resource_grants: state.resource_grants.values().map(BTreeMap::len).sum(),
        }
    }
}

#[async_trait]
impl DirectoryStore for MemoryDirectory {
    async fn create_user(&self, mut user: User) -> DirectoryResult<User> {
        user.email = normalize_email(&user.email);
        user.validate()?;

        let mut state = self.state.write().await;
        if state.emails.contains_key(&user.email) {
            return Err(DirectoryError::EmailTaken(user.email));
        }
        if let Some(creator) = user.created_by {
            if !state.users.contains_key(&creator) {
                return Err(DirectoryError::UserNotFound(creator));
            }
        }

        state.emails.insert(user.email.clone(), user.id);
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> DirectoryResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> DirectoryResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state
            .emails
            .get(&normalize_email(email))
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn list_users(&self, filter: &UserFilter) -> DirectoryResult<Vec<User>> {
        let state = self.state.read().await;
        let mut users: Vec<User> = state
            .users
            .values()
            .filter(|user| filter.matches(user))
            .cloned()
            .collect();
        // UUID v7 IDs are monotonic within the process
        users.sort_by_key(|user| (user.created_at, user.id));
        Ok(users)
    }

    async fn update_profile(&self, id: Uuid, update: &ProfileUpdate) -> DirectoryResult<User> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(&id)
            .ok_or(DirectoryError::UserNotFound(id))?;

        let mut updated = user.clone();
        update.apply(&mut updated)?;
        *user = updated.clone();
        Ok(updated)
    }

    async fn delete_user(&self, id: Uuid) -> DirectoryResult<Removal> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .remove(&id)
            .ok_or(DirectoryError::UserNotFound(id))?;

        state.emails.remove(&user.email);
        let global_permissions_removed = state
            .global_permissions
            .remove(&id)
            .map_or(0, |perms| perms.len());
        let resource_grants_removed = state
            .resource_grants
            .remove(&id)
            .map_or(0, |grants| grants.len());

        for other in state.users.values_mut() {
            if other.created_by == Some(id) {
                other.created_by = None;
            }
        }

        tracing::debug!(
            user_id = %id,
            global_permissions_removed,
            resource_grants_removed,
            "Deleted user with cascade"
        );

        Ok(Removal {
            user,
            global_permissions_removed,
            resource_grants_removed,
        })
    }

    async fn seed_resource(&self, name: &ResourceName) -> DirectoryResult<Resource> {
        let mut state = self.state.write().await;
        let resource = state
            .resources
            .entry(name.clone())
            .or_insert_with(|| Resource::new(name.clone()));
        Ok(resource.clone())
    }

    async fn list_resources(&self) -> DirectoryResult<Vec<Resource>> {
        Ok(self.state.read().await.resources.values().cloned().collect())
    }

    async fn find_resource(&self, name: &ResourceName) -> DirectoryResult<Option<Resource>> {
        Ok(self.state.read().await.resources.get(name).cloned())
    }

    async fn global_permissions(&self, user_id: Uuid) -> DirectoryResult<BTreeSet<GlobalPermission>> {
        Ok(self
            .state
            .read()
            .await
            .global_permissions
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn resource_grants(&self, user_id: Uuid) -> DirectoryResult<Vec<ResourceGrant>> {
        Ok(self
            .state
            .read()
            .await
            .resource_grants
            .get(&user_id)
            .map(|grants| grants.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn apply_approval(&self, user_id: Uuid, approval: &Approval) -> DirectoryResult<User> {
        let mut state = self.state.write().await;

        if !state.users.contains_key(&user_id) {
            return Err(DirectoryError::UserNotFound(user_id));
        }

        // Resolve every resource before touching anything.
        let mut grants = BTreeMap::new();
        for (name, flags) in approval.effective_resources() {
            let resource = state
                .resources
                .get(name)
                .ok_or_else(|| DirectoryError::ResourceNotFound(name.to_string()))?;
            grants.insert(name.clone(), ResourceGrant::new(user_id, resource, *flags));
        }
        for name in approval.resources.keys() {
            if !state.resources.contains_key(name) {
                return Err(DirectoryError::ResourceNotFound(name.to_string()));
            }
        }

        let now = Utc::now();
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or(DirectoryError::UserNotFound(user_id))?;
        user.role = Some(approval.role);
        user.approved = true;
        user.denied = false;
        user.active = true;
        user.approved_at = Some(now);
        user.updated_at = now;
        let user = user.clone();

        let grant_count = grants.len();
        if approval.global_permissions.is_empty() {
            state.global_permissions.remove(&user_id);
        } else {
            state
                .global_permissions
                .insert(user_id, approval.global_permissions.clone());
        }
        if grants.is_empty() {
            state.resource_grants.remove(&user_id);
        } else {
            state.resource_grants.insert(user_id, grants);
        }

        tracing::debug!(
            user_id = %user_id,
            role = %approval.role,
            global_permissions = approval.global_permissions.len(),
            resource_grants = grant_count,
            "Applied approval"
        );

        Ok(user)
    }

    async fn access_snapshot(
        &self,
        user_id: Uuid,
        resource: Option<&ResourceName>,
    ) -> DirectoryResult<Option<AccessSnapshot>> {
        let state = self.state.read().await;
        let Some(user) = state.users.get(&user_id) else {
            return Ok(None);
        };

        let resource = match resource {
            None => ResourceView::NotRequested,
            Some(name) => match state.resources.get(name) {
                None => ResourceView::Unknown(name.clone()),
                Some(record) => ResourceView::Known {
                    resource: record.clone(),
                    grant: state
                        .resource_grants
                        .get(&user_id)
                        .and_then(|grants| grants.get(name))
                        .map(|grant| grant.flags),
                },
            },
        };

        Ok(Some(AccessSnapshot {
            user: user.clone(),
            global_permissions: state
                .global_permissions
                .get(&user_id)
                .cloned()
                .unwrap_or_default(),
            resource,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_rbac::{Action, ResourceFlags, Role};

    fn name(s: &str) -> ResourceName {
        ResourceName::new(s).unwrap()
    }

    async fn seeded() -> MemoryDirectory {
        let dir = MemoryDirectory::new();
        for resource in ["dashboard", "orders"] {
            dir.seed_resource(&name(resource)).await.unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn test_create_and_lookup_user() {
        let dir = MemoryDirectory::new();
        let user = dir
            .create_user(User::pending("Alice", "alice@x.com", "digest"))
            .await
            .unwrap();

        assert_eq!(dir.get_user(user.id).await.unwrap(), Some(user.clone()));
        assert_eq!(
            dir.find_user_by_email("ALICE@x.com ").await.unwrap().map(|u| u.id),
            Some(user.id)
        );
        assert!(dir.find_user_by_email("bob@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let dir = MemoryDirectory::new();
        dir.create_user(User::pending("Alice", "alice@x.com", "d1"))
            .await
            .unwrap();

        let err = dir
            .create_user(User::pending("Impostor", "Alice@X.com", "d2"))
            .await
            .unwrap_err();
        assert_eq!(err, DirectoryError::EmailTaken("alice@x.com".to_string()));
        assert_eq!(dir.stats().await.users, 1);
    }

    #[tokio::test]
    async fn test_creator_must_exist() {
        let dir = MemoryDirectory::new();
        let ghost = Uuid::now_v7();
        let user = User::pending("Alice", "alice@x.com", "d")
            .with_creator(ghost)
            .unwrap();

        assert_eq!(
            dir.create_user(user).await.unwrap_err(),
            DirectoryError::UserNotFound(ghost)
        );
    }

    #[tokio::test]
    async fn test_seed_resource_deduplicates() {
        let dir = MemoryDirectory::new();
        let first = dir.seed_resource(&name("Dashboard")).await.unwrap();
        let second = dir.seed_resource(&name("dashboard")).await.unwrap();

        assert_eq!(first.id, second.id);
        let resources = dir.list_resources().await.unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].name.as_str(), "dashboard");
    }

    #[tokio::test]
    async fn test_apply_approval_replaces_grants() {
        let dir = seeded().await;
        let user = dir
            .create_user(User::pending("Alice", "alice@x.com", "d"))
            .await
            .unwrap();

        let first = Approval::new(Role::Admin)
            .with_permissions([GlobalPermission::Read, GlobalPermission::Write])
            .with_resource(name("orders"), ResourceFlags::all())
            .with_resource(name("dashboard"), ResourceFlags::from_actions([Action::Read]));
        dir.apply_approval(user.id, &first).await.unwrap();

        let second = Approval::new(Role::User)
            .with_permission(GlobalPermission::Read)
            .with_resource(name("dashboard"), ResourceFlags::from_actions([Action::Update]));
        let approved = dir.apply_approval(user.id, &second).await.unwrap();

        assert_eq!(approved.role, Some(Role::User));
        assert!(approved.approved);
        assert_eq!(
            dir.global_permissions(user.id).await.unwrap(),
            BTreeSet::from([GlobalPermission::Read])
        );
        let grants = dir.resource_grants(user.id).await.unwrap();
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].resource.as_str(), "dashboard");
        assert_eq!(grants[0].flags, ResourceFlags::from_actions([Action::Update]));
    }

    #[tokio::test]
    async fn test_apply_approval_skips_empty_rows() {
        let dir = seeded().await;
        let user = dir
            .create_user(User::pending("Alice", "alice@x.com", "d"))
            .await
            .unwrap();

        let approval = Approval::new(Role::User).with_resource(name("orders"), ResourceFlags::none());
        dir.apply_approval(user.id, &approval).await.unwrap();

        assert!(dir.resource_grants(user.id).await.unwrap().is_empty());
        let snapshot = dir
            .access_snapshot(user.id, Some(&name("orders")))
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(snapshot.resource, ResourceView::Known { grant: None, .. }));
    }

    #[tokio::test]
    async fn test_apply_approval_unknown_resource_leaves_state_intact() {
        let dir = seeded().await;
        let user = dir
            .create_user(User::pending("Alice", "alice@x.com", "d"))
            .await
            .unwrap();
        let before = Approval::new(Role::User)
            .with_permission(GlobalPermission::Read)
            .with_resource(name("dashboard"), ResourceFlags::from_actions([Action::Read]));
        dir.apply_approval(user.id, &before).await.unwrap();

        let bad = Approval::new(Role::Admin)
            .with_permission(GlobalPermission::Edit)
            .with_resource(name("orders"), ResourceFlags::all())
            .with_resource(name("nowhere"), ResourceFlags::all());
        let err = dir.apply_approval(user.id, &bad).await.unwrap_err();
        assert_eq!(err, DirectoryError::ResourceNotFound("nowhere".to_string()));

        let user = dir.get_user(user.id).await.unwrap().unwrap();
        assert_eq!(user.role, Some(Role::User));
        assert_eq!(
            dir.global_permissions(user.id).await.unwrap(),
            BTreeSet::from([GlobalPermission::Read])
        );
        let grants = dir.resource_grants(user.id).await.unwrap();
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].resource.as_str(), "dashboard");
    }

    #[tokio::test]
    async fn test_apply_approval_missing_user() {
        let dir = seeded().await;
        let id = Uuid::now_v7();
        assert_eq!(
            dir.apply_approval(id, &Approval::new(Role::User)).await.unwrap_err(),
            DirectoryError::UserNotFound(id)
        );
    }

    #[tokio::test]
    async fn test_delete_user_cascades() {
        let dir = seeded().await;
        let creator = dir
            .create_user(User::pending("Ann", "ann@x.com", "d"))
            .await
            .unwrap();
        let child = dir
            .create_user(
                User::pending("Kid", "kid@x.com", "d")
                    .with_creator(creator.id)
                    .unwrap(),
            )
            .await
            .unwrap();
        let approval = Approval::new(Role::Admin)
            .with_permissions([GlobalPermission::Read, GlobalPermission::AssignRoles])
            .with_resource(name("orders"), ResourceFlags::all());
        dir.apply_approval(creator.id, &approval).await.unwrap();

        let removal = dir.delete_user(creator.id).await.unwrap();
        assert_eq!(removal.global_permissions_removed, 2);
        assert_eq!(removal.resource_grants_removed, 1);

        assert!(dir.get_user(creator.id).await.unwrap().is_none());
        assert!(dir.find_user_by_email("ann@x.com").await.unwrap().is_none());
        assert!(dir.global_permissions(creator.id).await.unwrap().is_empty());
        assert!(dir.resource_grants(creator.id).await.unwrap().is_empty());
        assert_eq!(dir.get_user(child.id).await.unwrap().unwrap().created_by, None);

        let stats = dir.stats().await;
        assert_eq!(stats.global_permission_edges, 0);
        assert_eq!(stats.resource_grants, 0);

        // The email is free again.
        dir.create_user(User::pending("Ann", "ann@x.com", "d"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let dir = MemoryDirectory::new();
        let id = Uuid::now_v7();
        assert_eq!(dir.delete_user(id).await.unwrap_err(), DirectoryError::UserNotFound(id));
    }

    #[tokio::test]
    async fn test_access_snapshot_views() {
        let dir = seeded().await;
        let user = dir
            .create_user(User::pending("Alice", "alice@x.com", "d"))
            .await
            .unwrap();
        let approval = Approval::new(Role::User)
            .with_resource(name("dashboard"), ResourceFlags::from_actions([Action::Read]));
        dir.apply_approval(user.id, &approval).await.unwrap();

        let snap = dir.access_snapshot(user.id, None).await.unwrap().unwrap();
        assert_eq!(snap.resource, ResourceView::NotRequested);

        let snap = dir
            .access_snapshot(user.id, Some(&name("ghost")))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(snap.resource, ResourceView::Unknown(name("ghost")));

        let snap = dir
            .access_snapshot(user.id, Some(&name("dashboard")))
            .await
            .unwrap()
            .unwrap();
        match snap.resource {
            ResourceView::Known { resource, grant } => {
                assert_eq!(resource.name.as_str(), "dashboard");
                assert_eq!(grant, Some(ResourceFlags::from_actions([Action::Read])));
            }
            other => panic!("unexpected view: {:?}", other),
        }

        assert!(dir
            .access_snapshot(Uuid::now_v7(), None)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_users_filters_and_orders() {
        let dir = seeded().await;
        let a = dir
            .create_user(User::pending("A", "a@x.com", "d"))
            .await
            .unwrap();
        let b = dir
            .create_user(User::pending("B", "b@x.com", "d"))
            .await
            .unwrap();
        dir.apply_approval(b.id, &Approval::new(Role::Admin))
            .await
            .unwrap();

        let pending = dir.list_users(&UserFilter::pending()).await.unwrap();
        assert_eq!(pending.iter().map(|u| u.id).collect::<Vec<_>>(), vec![a.id]);

        let admins = dir
            .list_users(&UserFilter::all().with_role(Role::Admin))
            .await
            .unwrap();
        assert_eq!(admins.iter().map(|u| u.id).collect::<Vec<_>>(), vec![b.id]);

        let all = dir.list_users(&UserFilter::all()).await.unwrap();
        assert_eq!(all.iter().map(|u| u.id).collect::<Vec<_>>(), vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn test_update_profile() {
        let dir = MemoryDirectory::new();
        let user = dir
            .create_user(User::pending("Alice", "alice@x.com", "d"))
            .await
            .unwrap();

        let updated = dir
            .update_profile(user.id, &ProfileUpdate::name("Alice L."))
            .await
            .unwrap();
        assert_eq!(updated.name, "Alice L.");

        let err = dir
            .update_profile(user.id, &ProfileUpdate::name(""))
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::InvalidField { .. }));
        assert_eq!(dir.get_user(user.id).await.unwrap().unwrap().name, "Alice L.");
    }
}
