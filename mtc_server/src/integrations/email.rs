//! SMTP delivery of "MAX seat available" notifications.
//!
//! Messages are submitted to the configured relay over STARTTLS with the configured credentials, one recipient per
//! message. The subject and HTML body are rendered from the templates in [`super::templates`], in French like the
//! booking site they point to.
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport,
    AsyncTransport,
    Message,
    Tokio1Executor,
};
use log::*;
use mtc_engine::{db_types::Alert, ticket_types::Ticket, NotificationError, Notifier};
use thiserror::Error;

use super::templates::NotificationTemplates;
use crate::config::SmtpConfig;

#[derive(Debug, Clone, Error)]
pub enum EmailError {
    #[error("Could not configure the SMTP transport. {0}")]
    TransportError(String),
    #[error("Invalid sender address '{0}'. {1}")]
    InvalidSender(String, String),
    #[error("Could not compile the email templates. {0}")]
    TemplateError(String),
}

#[derive(Clone)]
pub struct EmailNotifier {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
    templates: NotificationTemplates,
}

impl EmailNotifier {
    pub fn new(config: &SmtpConfig) -> Result<Self, EmailError> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| EmailError::InvalidSender(config.from.clone(), e.to_string()))?;
        let templates = NotificationTemplates::new().map_err(|e| EmailError::TemplateError(e.to_string()))?;
        let credentials = Credentials::new(config.user.clone(), config.password.reveal().clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)
            .map_err(|e| EmailError::TransportError(e.to_string()))?
            .credentials(credentials)
            .port(config.port)
            .build();
        info!("📧️ Notifications will be sent from {from} via {}:{}", config.server, config.port);
        Ok(Self { from, transport, templates })
    }

    pub fn message_for(&self, alert: &Alert, ticket: &Ticket) -> Result<Message, NotificationError> {
        let to = alert
            .email
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::InvalidMessage(format!("Invalid recipient '{}'. {e}", alert.email)))?;
        let subject =
            self.templates.subject(ticket).map_err(|e| NotificationError::InvalidMessage(format!("Subject: {e}")))?;
        let body =
            self.templates.html_body(ticket).map_err(|e| NotificationError::InvalidMessage(format!("Body: {e}")))?;
        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body)
            .map_err(|e| NotificationError::InvalidMessage(e.to_string()))
    }
}

impl Notifier for EmailNotifier {
    async fn notify(&self, alert: &Alert, ticket: &Ticket) -> Result<(), NotificationError> {
        let message = self.message_for(alert, ticket)?;
        trace!("📧️ Sending notification for alert {} to {}", alert.id, alert.email);
        self.transport.send(message).await.map_err(|e| NotificationError::DeliveryFailed(e.to_string()))?;
        debug!("📧️ Email sent to {} about {ticket}", alert.email);
        Ok(())
    }
}
