//! SMTP delivery
//!
//! Sends notifications as plain-text mail over an authenticated STARTTLS
//! relay.

use crate::notifier::{Notifier, NotifyError, NotifyResult};
use crate::types::Notification;
use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Default relay host.
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Default relay port (submission with STARTTLS).
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// SMTP relay settings.
#[derive(Clone)]
pub struct SmtpConfig {
    /// Relay host
    pub host: String,

    /// Relay port
    pub port: u16,

    /// Login name, also used as the sender address
    pub username: String,

    /// Login password
    pub password: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl SmtpConfig {
    /// Load settings from the environment.
    ///
    /// Reads `EMAIL_HOST` and `EMAIL_PORT` (with defaults) and the required
    /// `EMAIL_USER` and `EMAIL_PASS`.
    pub fn from_env() -> NotifyResult<Self> {
        let host = std::env::var("EMAIL_HOST").unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_string());
        let port = match std::env::var("EMAIL_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| NotifyError::ConfigError(format!("EMAIL_PORT is not a port: {raw}")))?,
            Err(_) => DEFAULT_SMTP_PORT,
        };
        let username = std::env::var("EMAIL_USER")
            .map_err(|_| NotifyError::ConfigError("EMAIL_USER is required".to_string()))?;
        let password = std::env::var("EMAIL_PASS")
            .map_err(|_| NotifyError::ConfigError("EMAIL_PASS is required".to_string()))?;

        Ok(Self {
            host,
            port,
            username,
            password,
        })
    }
}

/// Notifier that delivers through an SMTP relay.
#[derive(Clone)]
pub struct SmtpNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: Mailbox,
}

impl std::fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpNotifier")
            .field("from_address", &self.from_address.to_string())
            .finish()
    }
}

impl SmtpNotifier {
    /// Build a notifier from relay settings.
    pub fn new(config: &SmtpConfig) -> NotifyResult<Self> {
        let from_address: Mailbox = config.username.parse().map_err(|e| {
            NotifyError::ConfigError(format!("EMAIL_USER is not a valid address: {e}"))
        })?;

        let creds = Credentials::new(config.username.clone(), config.password.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| NotifyError::ConfigError(format!("Failed to create SMTP transport: {e}")))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self {
            mailer,
            from_address,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, notification: Notification) -> NotifyResult<()> {
        let to_mailbox: Mailbox = notification
            .recipient
            .parse()
            .map_err(|_| NotifyError::InvalidRecipient(notification.recipient.clone()))?;

        let email = Message::builder()
            .from(self.from_address.clone())
            .to(to_mailbox)
            .subject(notification.subject.as_str())
            .body(notification.body.clone())
            .map_err(|e| NotifyError::MessageError(e.to_string()))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| NotifyError::DeliveryError(e.to_string()))?;

        tracing::debug!(
            notification_id = %notification.id,
            recipient = %notification.recipient,
            "Notification sent via SMTP"
        );
        Ok(())
    }
}
