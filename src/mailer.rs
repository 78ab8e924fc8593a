//! SMTP delivery of the rendered digest.

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, instrument};

use crate::error::DeliveryError;

/// Sender account, recipient and relay.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub sender: String,
    pub app_password: String,
    pub recipient: String,
    pub smtp_server: String,
    pub smtp_port: u16,
}

impl MailConfig {
    /// Sender address, app password and recipient are all set.
    pub fn has_credentials(&self) -> bool {
        [&self.sender, &self.app_password, &self.recipient]
            .iter()
            .all(|value| !value.trim().is_empty())
    }
}

/// Build the HTML message for `cfg.recipient`.
pub fn build_message(cfg: &MailConfig, subject: &str, html: &str) -> Result<Message, DeliveryError> {
    let from: Mailbox = cfg.sender.trim().parse()?;
    let to: Mailbox = cfg.recipient.trim().parse()?;
    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(html.to_string())?;
    Ok(message)
}

/// Deliver one HTML email over STARTTLS with login credentials.
///
/// Missing credentials fail before any connection is attempted.
#[instrument(level = "info", skip(cfg, html), fields(recipient = %cfg.recipient, server = %cfg.smtp_server))]
pub async fn send(cfg: &MailConfig, subject: &str, html: &str) -> Result<(), DeliveryError> {
    if !cfg.has_credentials() {
        return Err(DeliveryError::MissingCredentials);
    }
    let message = build_message(cfg, subject, html)?;

    let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.smtp_server)?
        .port(cfg.smtp_port)
        .credentials(Credentials::new(
            cfg.sender.trim().to_string(),
            cfg.app_password.clone(),
        ))
        .build();
    transport.send(message).await?;
    info!("Digest email sent");
    Ok(())
}
