use thiserror::Error;

use crate::ticket_types::{Ticket, TicketQuery};

/// Upstream transport or protocol failure. The fetch is abandoned as a whole.
#[derive(Debug, Clone, Error)]
#[error("Could not fetch tickets. {0}")]
pub struct FetchError(pub String);

#[allow(async_fn_in_trait)]
pub trait TicketSource {
    /// Fetches every ticket for the route and date in `query`. The result may contain duplicates.
    async fn fetch_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>, FetchError>;
}
