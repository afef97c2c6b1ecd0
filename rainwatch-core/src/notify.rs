//! Email delivery of the finished report.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use thiserror::Error;
use tracing::info;

use crate::config::{MailCredentials, MailSettings};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("invalid email address '{address}': {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("failed to build email: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP delivery failed: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Sends the report to the configured recipients over implicit TLS.
#[derive(Debug, Clone)]
pub struct Notifier {
    settings: MailSettings,
    credentials: MailCredentials,
}

impl Notifier {
    pub fn new(settings: MailSettings, credentials: MailCredentials) -> Self {
        Self { settings, credentials }
    }

    pub fn build_message(&self, body: &str) -> Result<Message, NotifyError> {
        let mut builder = Message::builder()
            .from(parse_mailbox(&self.credentials.address)?)
            .subject(self.settings.subject.as_str())
            .header(ContentType::TEXT_PLAIN);

        for recipient in &self.settings.recipients {
            builder = builder.to(parse_mailbox(recipient)?);
        }

        Ok(builder.body(body.to_string())?)
    }

    /// Deliver `body`. The SMTP session only lives for the duration of this call.
    pub async fn send(&self, body: &str) -> Result<(), NotifyError> {
        let message = self.build_message(body)?;

        let credentials =
            Credentials::new(self.credentials.address.clone(), self.credentials.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.settings.host)?
            .port(self.settings.port)
            .credentials(credentials)
            .build();

        mailer.send(message).await?;

        info!(
            host = %self.settings.host,
            recipients = self.settings.recipients.len(),
            "Sent weather report"
        );

        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address.parse::<Mailbox>().map_err(|source| NotifyError::InvalidAddress {
        address: address.to_string(),
        source,
    })
}
