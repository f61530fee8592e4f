//! # MAX ticket checker server
//! This crate hosts the HTTP API and the background ticket worker. It is responsible for:
//! * Registering, listing and cancelling alerts on behalf of users.
//! * Periodically fetching fresh tickets from the tgvmax open-data feed and emailing the owners of matching alerts.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `POST /start-checking/`: Registers an alert and triggers an immediate check.
//! * `GET /alerts/?email=`: Lists the alerts registered by an email address.
//! * `DELETE /alerts/?email=&alert_id=`: Cancels an alert.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;
pub mod ticket_worker;

#[cfg(test)]
mod endpoint_tests;
