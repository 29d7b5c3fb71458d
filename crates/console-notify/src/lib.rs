//! # Console Notifications
//!
//! Delivery of account lifecycle notifications for the admin console.
//!
//! ## Overview
//!
//! - **Events**: [`AccountEvent`] describes what happened to an account
//! - **Rendering**: each event renders to a plain-text [`Notification`]
//! - **Sinks**: the [`Notifier`] trait, with in-memory, log-only, and SMTP
//!   implementations
//!
//! Delivery failures never roll back the state change that produced them.
//! Callers log the error and continue.
//!
//! ## Features
//!
//! - `smtp`: [`SmtpNotifier`] using lettre
//!
//! ## Usage
//!
//! ```rust,no_run
//! use console_notify::{AccountEvent, MemoryNotifier, Notifier};
//! use uuid::Uuid;
//!
//! async fn example() {
//!     let notifier = MemoryNotifier::new();
//!     let event = AccountEvent::SignupPending {
//!         user_id: Uuid::now_v7(),
//!         name: "Alice".to_string(),
//!         email: "alice@example.com".to_string(),
//!     };
//!
//!     if let Err(e) = notifier.notify(event.notification_for("root@example.com")).await {
//!         tracing::warn!(error = %e, "Failed to deliver notification");
//!     }
//! }
//! ```

pub mod notifier;
#[cfg(feature = "smtp")]
pub mod smtp;
pub mod types;

pub use notifier::{MemoryNotifier, Notifier, NotifierStats, NotifyError, NotifyResult, TracingNotifier};
#[cfg(feature = "smtp")]
pub use smtp::{SmtpConfig, SmtpNotifier};
pub use types::{AccountEvent, Notification};
