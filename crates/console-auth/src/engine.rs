//! Authorization decision engine
//!
//! Every protected operation asks one question: may this user perform this
//! action, optionally on this resource? The answer combines three axes in a
//! fixed order, first match wins:
//!
//! 1. Superadmin role: allow, before anything else is parsed or looked up.
//! 2. Unassigned role, unapproved, or inactive account: deny.
//! 3. A global permission name: allow iff the user holds it.
//! 4. A CRUD action on a resource: the resource must be in the catalog, and
//!    the user's grant row on it must carry the matching flag.
//! 5. Anything else: deny.
//!
//! With a resource present, a CRUD action name is always read as a resource
//! action. Holding the global `read` permission never implies `read` on a
//! resource, and resource flags never imply a global permission.

use crate::error::{AuthError, AuthResult};
use console_directory::{AccessSnapshot, DirectoryStore, ResourceView};
use console_rbac::Requirement;
use std::sync::Arc;
use uuid::Uuid;

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// The action is permitted.
    Allow,

    /// The action is refused; the reason names what was missing.
    Deny(String),
}

impl Decision {
    fn missing(label: &str) -> Self {
        Decision::Deny(format!("missing permission: {}", label))
    }

    /// Check if the decision is [`Decision::Allow`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Get the refusal reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Decision::Allow => None,
            Decision::Deny(reason) => Some(reason),
        }
    }
}

/// Label used in refusals: the requirement when it parsed, else the raw action.
fn requirement_label(requirement: Option<&Requirement>, action: &str) -> String {
    requirement
        .map(ToString::to_string)
        .unwrap_or_else(|| action.to_string())
}

/// Decide a single check against a consistent snapshot.
///
/// Pure: reads only the snapshot. Fails with [`AuthError::ResourceUnknown`]
/// when a non-superadmin asks about a resource outside the catalog.
///
/// # Arguments
///
/// * `snapshot` - The user, its global permissions and its grant on the resource
/// * `requirement` - The parsed requirement, `None` if the action was not recognized
/// * `action` - The raw action name, used in refusal reasons
pub fn decide(
    snapshot: &AccessSnapshot,
    requirement: Option<&Requirement>,
    action: &str,
) -> AuthResult<Decision> {
    let user = &snapshot.user;
    let label = requirement_label(requirement, action);

    match user.role {
        Some(role) if role.bypasses_checks() => return Ok(Decision::Allow),
        Some(_) if user.approved && user.active => {}
        _ => return Ok(Decision::missing(&label)),
    }

    let Some(requirement) = requirement else {
        return Ok(Decision::missing(&label));
    };

    match requirement {
        Requirement::Global(permission) => {
            if snapshot.global_permissions.contains(permission) {
                Ok(Decision::Allow)
            } else {
                Ok(Decision::missing(&label))
            }
        }
        Requirement::Resource { action, .. } => match &snapshot.resource {
            ResourceView::Unknown(name) => Err(AuthError::ResourceUnknown {
                requirement: label,
                resource: name.to_string(),
            }),
            ResourceView::Known {
                grant: Some(flags), ..
            } if flags.allows(*action) => Ok(Decision::Allow),
            ResourceView::Known { .. } => Ok(Decision::missing(&label)),
            ResourceView::NotRequested => Err(AuthError::Internal(format!(
                "snapshot for {} was taken without its resource",
                label
            ))),
        },
    }
}

/// Authorization engine over a directory store.
///
/// Read-only: it never mutates the store, so any number of checks may run
/// concurrently with each other and with lifecycle transitions.
#[derive(Clone)]
pub struct Authorizer {
    store: Arc<dyn DirectoryStore>,
}

impl std::fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorizer").finish_non_exhaustive()
    }
}

impl Authorizer {
    /// Create an engine reading from `store`.
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self { store }
    }

    /// Decide whether a user may perform `action`, optionally on `resource`.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The acting user
    /// * `resource` - Resource name for resource-scoped checks
    /// * `action` - A CRUD action name or a global permission name
    ///
    /// # Returns
    ///
    /// `Allow` or `Deny(reason)`. Missing grants are a `Deny`, never an error.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NotFound`] if the user does not exist
    /// - [`AuthError::ResourceUnknown`] if the resource is not in the catalog
    ///   and the user is not a superadmin
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use console_auth::Authorizer;
    /// use console_directory::MemoryDirectory;
    /// use std::sync::Arc;
    /// use uuid::Uuid;
    ///
    /// async fn example(user_id: Uuid) {
    ///     let engine = Authorizer::new(Arc::new(MemoryDirectory::new()));
    ///     let decision = engine.authorize(user_id, Some("announcements"), "update").await;
    /// }
    /// ```
    pub async fn authorize(
        &self,
        user_id: Uuid,
        resource: Option<&str>,
        action: &str,
    ) -> AuthResult<Decision> {
        let requirement = Requirement::parse(resource, action);
        self.evaluate(user_id, requirement.as_ref(), action).await
    }

    /// Decide a typed requirement.
    pub async fn check(&self, user_id: Uuid, requirement: &Requirement) -> AuthResult<Decision> {
        let label = requirement.to_string();
        self.evaluate(user_id, Some(requirement), &label).await
    }

    /// Like [`authorize`](Self::authorize), but a `Deny` becomes
    /// [`AuthError::Forbidden`].
    pub async fn require(&self, user_id: Uuid, resource: Option<&str>, action: &str) -> AuthResult<()> {
        let requirement = Requirement::parse(resource, action);
        let decision = self.evaluate(user_id, requirement.as_ref(), action).await?;
        Self::enforce(decision, requirement.as_ref(), action)
    }

    /// Like [`check`](Self::check), but a `Deny` becomes [`AuthError::Forbidden`].
    pub async fn require_requirement(&self, user_id: Uuid, requirement: &Requirement) -> AuthResult<()> {
        let decision = self.check(user_id, requirement).await?;
        Self::enforce(decision, Some(requirement), "")
    }

    fn enforce(decision: Decision, requirement: Option<&Requirement>, action: &str) -> AuthResult<()> {
        match decision {
            Decision::Allow => Ok(()),
            Decision::Deny(_) => Err(AuthError::forbidden(requirement_label(requirement, action))),
        }
    }

    async fn evaluate(
        &self,
        user_id: Uuid,
        requirement: Option<&Requirement>,
        action: &str,
    ) -> AuthResult<Decision> {
        let resource = requirement.and_then(Requirement::resource_name);
        let snapshot = self
            .store
            .access_snapshot(user_id, resource)
            .await?
            .ok_or_else(|| AuthError::NotFound(format!("user {}", user_id)))?;

        let result = decide(&snapshot, requirement, action);

        match &result {
            Ok(decision) => tracing::debug!(
                user_id = %user_id,
                role = ?snapshot.user.role,
                action = %action,
                resource = ?resource.map(|r| r.as_str()),
                allowed = decision.is_allowed(),
                "Authorization decided"
            ),
            Err(e) => tracing::debug!(
                user_id = %user_id,
                action = %action,
                error = %e,
                "Authorization refused"
            ),
        }

        result
    }
}
