//! Account events and the notifications rendered from them

use chrono::{DateTime, Utc};
use console_rbac::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A message addressed to one recipient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    /// Unique notification ID
    pub id: Uuid,

    /// Recipient email address
    pub recipient: String,

    /// Subject line
    pub subject: String,

    /// Plain-text body
    pub body: String,

    /// When the notification was rendered
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Create a notification.
    pub fn new(
        recipient: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
            created_at: Utc::now(),
        }
    }
}

/// Account lifecycle events that produce notifications.
///
/// # Example
///
/// ```
/// use console_notify::AccountEvent;
/// use uuid::Uuid;
///
/// let event = AccountEvent::SignupPending {
///     user_id: Uuid::now_v7(),
///     name: "Alice".to_string(),
///     email: "alice@example.com".to_string(),
/// };
/// assert_eq!(event.topic(), "account.signup.pending");
///
/// let note = event.notification_for("root@example.com");
/// assert_eq!(note.subject, "New User Signup Notification");
/// assert!(note.body.contains("alice@example.com"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccountEvent {
    /// A new account is waiting for approval.
    SignupPending {
        /// The new user
        user_id: Uuid,
        /// Display name
        name: String,
        /// Signup email
        email: String,
    },

    /// An account was approved.
    Approved {
        /// The approved user
        user_id: Uuid,
        /// Display name
        name: String,
        /// Account email
        email: String,
        /// The role granted
        role: Role,
    },
}

impl AccountEvent {
    /// Get the event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            AccountEvent::SignupPending { .. } => "signup.pending",
            AccountEvent::Approved { .. } => "approved",
        }
    }

    /// Get the topic, structured as `account.{event_type}`.
    pub fn topic(&self) -> String {
        format!("account.{}", self.event_type())
    }

    /// Get the user the event is about.
    pub fn user_id(&self) -> Uuid {
        match self {
            AccountEvent::SignupPending { user_id, .. } | AccountEvent::Approved { user_id, .. } => *user_id,
        }
    }

    /// Render the event as a notification to `recipient`.
    pub fn notification_for(&self, recipient: impl Into<String>) -> Notification {
        match self {
            AccountEvent::SignupPending { name, email, .. } => Notification::new(
                recipient,
                "New User Signup Notification",
                format!(
                    "Hello Superadmin,\n\
                     \n\
                     A new user has signed up: {name} <{email}>.\n\
                     Please log in to review the account and assign a role.\n\
                     \n\
                     Regards,\n\
                     Console Access\n"
                ),
            ),
            AccountEvent::Approved { name, role, .. } => Notification::new(
                recipient,
                "Your account has been approved",
                format!(
                    "Hello {name},\n\
                     \n\
                     Your account has been approved with the {role} role.\n\
                     You can now log in.\n\
                     \n\
                     Regards,\n\
                     Console Access\n"
                ),
            ),
        }
    }
}
