use thiserror::Error;

use crate::{db_types::Alert, ticket_types::Ticket};

#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("The notification could not be built. {0}")]
    InvalidMessage(String),
    #[error("The notification could not be delivered. {0}")]
    DeliveryFailed(String),
}

/// Delivers "a MAX seat is available" messages to alert owners.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    async fn notify(&self, alert: &Alert, ticket: &Ticket) -> Result<(), NotificationError>;
}
