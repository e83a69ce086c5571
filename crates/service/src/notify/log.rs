use async_trait::async_trait;
use tracing::info;

use super::{NotificationSender, NotifyError};

/// Used when no SMTP host is configured: the message is logged and counted
/// as delivered.
pub struct LogSender;

#[async_trait]
impl NotificationSender for LogSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        info!(event = "mail_logged", %to, %subject, body_len = body.len(), "mail transport disabled; message not delivered");
        Ok(())
    }
}
