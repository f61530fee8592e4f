//! SQLite backend for the alert store and the sent-alert ledger.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
