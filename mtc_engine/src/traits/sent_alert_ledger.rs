use chrono::{DateTime, Utc};

use crate::{
    db_types::{AlertId, TicketKey},
    traits::StoreError,
};

/// Append-only record of the notifications that have been sent.
///
/// There is at most one entry per (alert id, ticket key). Entries are never updated or removed.
#[allow(async_fn_in_trait)]
pub trait SentAlertLedger {
    async fn has_been_sent(&self, alert_id: &AlertId, ticket: &TicketKey) -> Result<bool, StoreError>;

    /// Records that a notification was sent. Returns `false` if the pair had already been recorded, in which case
    /// nothing is written.
    async fn record_sent(
        &self,
        alert_id: &AlertId,
        ticket: &TicketKey,
        sent_at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;
}
