//! # Collaborator contracts
//!
//! The matching engine and the polling loop only talk to the outside world through these traits:
//!
//! * [`AlertManagement`] stores user alerts. Alerts are created, listed and deleted, never updated.
//! * [`SentAlertLedger`] remembers which (alert, ticket) pairs have already been notified. It is the deduplication
//!   boundary of the whole system.
//! * [`TicketSource`] fetches fresh tickets for a route and date from upstream.
//! * [`Notifier`] delivers a notification to the owner of an alert.
//!
//! [`crate::SqliteDatabase`] implements the first two. The other two are implemented by the tgvmax client (see
//! [`crate::ticket_types`]) and by the server's email integration.
mod alert_management;
mod notifier;
mod sent_alert_ledger;
mod ticket_source;

pub use alert_management::{AlertManagement, StoreError};
pub use notifier::{NotificationError, Notifier};
pub use sent_alert_ledger::SentAlertLedger;
pub use ticket_source::{FetchError, TicketSource};
