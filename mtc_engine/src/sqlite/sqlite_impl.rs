//! `SqliteDatabase` is the concrete alert store and sent-alert ledger.
//!
//! It implements [`AlertManagement`] and [`SentAlertLedger`]. All calls go through the same pool, so a write is
//! visible to every subsequent read in the process.
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;
use sqlx::{migrate::MigrateError, SqlitePool};

use super::db::{alerts, new_pool, sent_alerts};
use crate::{
    db_types::{Alert, AlertId, NewAlert, SentAlert, TicketKey},
    traits::{AlertManagement, SentAlertLedger, StoreError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SqliteDatabase ({})", self.url)
    }
}

impl AlertManagement for SqliteDatabase {
    async fn insert_alert(&self, alert: NewAlert) -> Result<Alert, StoreError> {
        let mut conn = self.pool.acquire().await?;
        alerts::insert_alert(alert, &mut conn).await
    }

    async fn fetch_alert(&self, id: &AlertId) -> Result<Option<Alert>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        alerts::fetch_alert(id, &mut conn).await
    }

    async fn fetch_alerts_for_email(&self, email: &str) -> Result<Vec<Alert>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        alerts::fetch_alerts_for_email(email, &mut conn).await
    }

    async fn fetch_all_alerts(&self) -> Result<Vec<Alert>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        alerts::fetch_all_alerts(&mut conn).await
    }

    async fn delete_alert(&self, id: &AlertId) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        alerts::delete_alert(id, &mut conn).await
    }
}

impl SentAlertLedger for SqliteDatabase {
    async fn has_been_sent(&self, alert_id: &AlertId, ticket: &TicketKey) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        sent_alerts::sent_alert_exists(alert_id, ticket, &mut conn).await
    }

    async fn record_sent(
        &self,
        alert_id: &AlertId,
        ticket: &TicketKey,
        sent_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let inserted = sent_alerts::idempotent_insert(alert_id, ticket, sent_at, &mut conn).await?;
        if !inserted {
            warn!("🗃️ Alert {alert_id} was already recorded as sent for {ticket}");
        }
        Ok(inserted)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Brings the schema up to date. Safe to call on every start-up.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    /// The ledger entries for a single alert, oldest first.
    pub async fn sent_alerts_for(&self, alert_id: &AlertId) -> Result<Vec<SentAlert>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        sent_alerts::fetch_sent_alerts(alert_id, &mut conn).await
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub async fn close(&mut self) -> Result<(), StoreError> {
        self.pool.close().await;
        Ok(())
    }
}
