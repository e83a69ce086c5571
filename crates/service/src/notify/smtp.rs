//! SMTP delivery via lettre.

use async_trait::async_trait;
use configs::MailConfig;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

use super::{NotificationSender, NotifyError};

pub struct SmtpSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpSender {
    /// Build a STARTTLS relay from configuration. No connection is opened here.
    pub fn new(cfg: &MailConfig) -> Result<Self, NotifyError> {
        let from: Mailbox = cfg
            .from_address
            .parse()
            .map_err(|_| NotifyError::InvalidAddress(cfg.from_address.clone()))?;
        let host = cfg.smtp_host.as_deref().unwrap_or_default();

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| NotifyError::Transport(e.to_string()))?
            .port(cfg.smtp_port);
        if let (Some(user), Some(pass)) = (&cfg.smtp_username, &cfg.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self { mailer: builder.build(), from })
    }
}

#[async_trait]
impl NotificationSender for SmtpSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError> {
        let recipient: Mailbox = to
            .parse()
            .map_err(|_| NotifyError::InvalidAddress(to.to_string()))?;
        let email = Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        info!(event = "mail_sent", %to, %subject, "email sent");
        Ok(())
    }
}
