//! Outbound notifications.
//!
//! The reminder job only needs `send(to, subject, body)`; the transport behind
//! it is chosen at startup from the mail configuration.

pub mod log;
pub mod smtp;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use configs::MailConfig;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("invalid email address: {0}")]
    InvalidAddress(String),
    #[error("mail transport error: {0}")]
    Transport(String),
    #[error("mail transport timed out after {0:?}")]
    Timeout(Duration),
}

/// Best-effort delivery of a plain-text message.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// `send` bounded by `limit`; an elapsed timer is reported as `NotifyError::Timeout`.
pub async fn send_with_timeout(
    sender: &dyn NotificationSender,
    limit: Duration,
    to: &str,
    subject: &str,
    body: &str,
) -> Result<(), NotifyError> {
    match tokio::time::timeout(limit, sender.send(to, subject, body)).await {
        Ok(res) => res,
        Err(_) => Err(NotifyError::Timeout(limit)),
    }
}

/// SMTP when a host is configured, otherwise a sender that only logs.
pub fn sender_from_config(cfg: &MailConfig) -> Result<Arc<dyn NotificationSender>, NotifyError> {
    if cfg.smtp_enabled() {
        let sender = smtp::SmtpSender::new(cfg)?;
        info!(event = "mail_transport", transport = "smtp", port = cfg.smtp_port, "smtp sender configured");
        Ok(Arc::new(sender))
    } else {
        info!(event = "mail_transport", transport = "log", "no smtp host configured; notifications are logged only");
        Ok(Arc::new(log::LogSender))
    }
}

/// Recording sender for tests and doc examples.
pub mod mock {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SentMessage {
        pub to: String,
        pub subject: String,
        pub body: String,
    }

    /// Records every successful send. Addresses in `failing` are rejected
    /// with a transport error; `delay` makes every send sleep first.
    #[derive(Default)]
    pub struct RecordingSender {
        sent: Mutex<Vec<SentMessage>>,
        failing: HashSet<String>,
        delay: Option<Duration>,
    }

    impl RecordingSender {
        pub fn failing_for<I, S>(addresses: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self { failing: addresses.into_iter().map(Into::into).collect(), ..Default::default() }
        }

        pub fn with_delay(delay: Duration) -> Self {
            Self { delay: Some(delay), ..Default::default() }
        }

        pub fn sent(&self) -> Vec<SentMessage> {
            self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }
    }

    #[async_trait]
    impl NotificationSender for RecordingSender {
        async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
            if let Some(d) = self.delay {
                tokio::time::sleep(d).await;
            }
            if self.failing.contains(to) {
                return Err(NotifyError::Transport(format!("rejected recipient {to}")));
            }
            self.sent.lock().unwrap_or_else(|e| e.into_inner()).push(SentMessage {
                to: to.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            });
            Ok(())
        }
    }
}
