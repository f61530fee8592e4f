//! Client for the SNCF "tgvmax" open-data dataset.
//!
//! The dataset lists, per train and per day, whether seats are still available at the MAX fare. Records are queried
//! with an ODSQL `where` expression (see [`WhereClause`]) and returned in pages ordered by travel date.
//! [`TgvMaxApi::fetch_all`] walks every page using the last record's date as the cursor.
mod api;
mod config;
mod data_objects;
mod error;
mod where_clause;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use api::{paginate, TgvMaxApi};
pub use config::TgvMaxConfig;
pub use data_objects::{RecordsPage, TgvMaxRecord, MAX_UNAVAILABLE};
pub use error::TgvMaxApiError;
pub use where_clause::WhereClause;
