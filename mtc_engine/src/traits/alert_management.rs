use thiserror::Error;

use crate::db_types::{Alert, AlertId, NewAlert};

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Stored data could not be read: {0}")]
    DataIntegrityError(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::DatabaseError(e.to_string())
    }
}

/// The `AlertManagement` trait defines behaviour for storing the alert criteria registered by users.
///
/// Implementations must not cache: an alert inserted here has to be returned by the very next call to
/// [`fetch_all_alerts`](AlertManagement::fetch_all_alerts).
#[allow(async_fn_in_trait)]
pub trait AlertManagement {
    /// Stores a new alert under a freshly generated id and returns the stored alert.
    async fn insert_alert(&self, alert: NewAlert) -> Result<Alert, StoreError>;

    async fn fetch_alert(&self, id: &AlertId) -> Result<Option<Alert>, StoreError>;

    /// All alerts owned by `email`, oldest first. Returns an empty vector if there are none.
    async fn fetch_alerts_for_email(&self, email: &str) -> Result<Vec<Alert>, StoreError>;

    async fn fetch_all_alerts(&self) -> Result<Vec<Alert>, StoreError>;

    /// Deletes the alert. Returns `false` if no alert with that id existed.
    async fn delete_alert(&self, id: &AlertId) -> Result<bool, StoreError>;
}
