//! Notification sinks
//!
//! This module provides the notifier abstraction and the in-process
//! implementations. Delivery is fire-and-forget from the caller's point of
//! view: callers log a failed delivery and move on.

use crate::types::Notification;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Notifier error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Recipient address could not be parsed
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    /// Message could not be built
    #[error("Failed to build message: {0}")]
    MessageError(String),

    /// Transport failed to deliver
    #[error("Delivery failed: {0}")]
    DeliveryError(String),

    /// Sink is misconfigured
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for notifier operations.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Sink that delivers notifications to their recipients.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one notification.
    async fn notify(&self, notification: Notification) -> NotifyResult<()>;
}

/// Delivery statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifierStats {
    /// Notifications accepted
    pub delivered: u64,
    /// Notifications rejected
    pub failed: u64,
}

/// In-memory notifier that keeps every delivered notification in an outbox.
///
/// Suitable for tests and for deployments that drain the outbox themselves.
/// A notifier built with [`MemoryNotifier::failing`] rejects every delivery,
/// which exercises the callers' swallow-and-log path.
#[derive(Clone, Default)]
pub struct MemoryNotifier {
    outbox: Arc<RwLock<Vec<Notification>>>,
    stats: Arc<RwLock<NotifierStats>>,
    fail: Arc<AtomicBool>,
}

impl std::fmt::Debug for MemoryNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryNotifier")
            .field("fail", &self.fail.load(Ordering::Relaxed))
            .finish()
    }
}

impl MemoryNotifier {
    /// Create a notifier that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a notifier that rejects everything.
    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.set_failing(true);
        notifier
    }

    /// Toggle failure mode.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::Relaxed);
    }

    /// Get a copy of the outbox, oldest first.
    pub async fn sent(&self) -> Vec<Notification> {
        self.outbox.read().await.clone()
    }

    /// Get the notifications addressed to one recipient.
    pub async fn sent_to(&self, recipient: &str) -> Vec<Notification> {
        self.outbox
            .read()
            .await
            .iter()
            .filter(|n| n.recipient.eq_ignore_ascii_case(recipient))
            .cloned()
            .collect()
    }

    /// Empty the outbox and return its contents.
    pub async fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.outbox.write().await)
    }

    /// Get delivery statistics.
    pub async fn stats(&self) -> NotifierStats {
        self.stats.read().await.clone()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn notify(&self, notification: Notification) -> NotifyResult<()> {
        if self.fail.load(Ordering::Relaxed) {
            self.stats.write().await.failed += 1;
            return Err(NotifyError::DeliveryError(format!(
                "outbox rejected notification to {}",
                notification.recipient
            )));
        }

        self.outbox.write().await.push(notification);
        self.stats.write().await.delivered += 1;
        Ok(())
    }
}

/// Notifier that only records deliveries in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, notification: Notification) -> NotifyResult<()> {
        tracing::info!(
            notification_id = %notification.id,
            recipient = %notification.recipient,
            subject = %notification.subject,
            "Notification recorded"
        );
        Ok(())
    }
}
