//! MAX Ticket Checker engine
//!
//! This library holds the provider-agnostic core of the MAX ticket checker: users register alerts for a route and a
//! travel date, and a polling loop repeatedly fetches fresh tickets and emails the owner of every alert that a newly
//! available MAX seat satisfies. Each (alert, ticket) pair is notified at most once.
//!
//! The library is divided into these sections:
//! 1. Storage ([`mod@traits`], [`SqliteDatabase`]). Alerts and the ledger of sent notifications live behind the
//!    [`AlertManagement`] and [`SentAlertLedger`] traits. SQLite is the only supported backend.
//! 2. The public registration API ([`AlertApi`]). The HTTP server only ever talks to the store through this type.
//! 3. The checker ([`mod@checker`]). [`TicketChecker`] runs one polling cycle; [`run_checker`] drives cycles until
//!    it is told to stop. Matching rules live in [`checker::matcher`].
//!
//! Tickets come from any [`TicketSource`]. The tgvmax open-data client implements it in [`mod@ticket_types`].
#[cfg(feature = "sqlite")]
mod sqlite;

mod mtc_api;

pub mod checker;
pub mod db_types;
pub mod ticket_types;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use checker::{
    matcher::{evaluate, is_match, MatchReport},
    scheduler::{run_checker, CheckerHandle, CheckerSignals},
    CycleReport,
    TicketChecker,
};
pub use mtc_api::{AlertApi, AlertApiError};
#[cfg(feature = "sqlite")]
pub use sqlite::{db, SqliteDatabase};
pub use traits::{
    AlertManagement,
    FetchError,
    NotificationError,
    Notifier,
    SentAlertLedger,
    StoreError,
    TicketSource,
};
