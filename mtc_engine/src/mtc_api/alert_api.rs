//! Registration, listing and cancellation of alerts on behalf of their owners.
use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Alert, AlertId, NewAlert},
    mtc_api::AlertApiError,
    traits::AlertManagement,
};

/// `AlertApi` is the only way the outside world modifies the alert store. Ownership is checked on every
/// cancellation: an alert can only be deleted by quoting the email address it was registered with.
pub struct AlertApi<B> {
    db: B,
}

impl<B: Debug> Debug for AlertApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AlertApi ({:?})", self.db)
    }
}

impl<B> AlertApi<B>
where B: AlertManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut B {
        &mut self.db
    }

    /// Stores a new alert. Route codes are trimmed and upper-cased, and the email address is trimmed, before saving.
    pub async fn register(&self, alert: NewAlert) -> Result<Alert, AlertApiError> {
        let alert = normalize(alert)?;
        let alert = self.db.insert_alert(alert).await?;
        info!("🗃️ New alert registered: {alert}");
        Ok(alert)
    }

    /// All alerts registered by `email`, oldest first.
    pub async fn alerts_for_email(&self, email: &str) -> Result<Vec<Alert>, AlertApiError> {
        let alerts = self.db.fetch_alerts_for_email(email.trim()).await?;
        trace!("🗃️ {} alerts found for {email}", alerts.len());
        Ok(alerts)
    }

    /// Deletes the alert, provided it belongs to `email`.
    ///
    /// A missing alert and an alert owned by someone else both produce [`AlertApiError::NotFound`], and leave the
    /// store untouched.
    pub async fn cancel_alert(&self, email: &str, id: &AlertId) -> Result<Alert, AlertApiError> {
        let alert = self
            .db
            .fetch_alert(id)
            .await?
            .filter(|a| a.email.eq_ignore_ascii_case(email.trim()))
            .ok_or_else(|| AlertApiError::NotFound(id.to_string()))?;
        if !self.db.delete_alert(id).await? {
            // Deleted between the fetch and now
            return Err(AlertApiError::NotFound(id.to_string()));
        }
        info!("🗃️ Alert {id} cancelled by its owner");
        Ok(alert)
    }
}

fn normalize(mut alert: NewAlert) -> Result<NewAlert, AlertApiError> {
    alert.email = alert.email.trim().to_string();
    alert.origin_iata = alert.origin_iata.trim().to_uppercase();
    alert.destination_iata = alert.destination_iata.trim().to_uppercase();
    alert.train_no = alert.train_no.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
    if alert.email.is_empty() {
        return Err(AlertApiError::InvalidAlert("An email address is required".into()));
    }
    if alert.origin_iata.is_empty() || alert.destination_iata.is_empty() {
        return Err(AlertApiError::InvalidAlert("Both origin and destination station codes are required".into()));
    }
    Ok(alert)
}
