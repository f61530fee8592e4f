use mockall::mock;
use mtc_engine::{
    db_types::{Alert, AlertId, NewAlert},
    AlertManagement,
    StoreError,
};

mock! {
    pub AlertManager {}
    impl AlertManagement for AlertManager {
        async fn insert_alert(&self, alert: NewAlert) -> Result<Alert, StoreError>;
        async fn fetch_alert(&self, id: &AlertId) -> Result<Option<Alert>, StoreError>;
        async fn fetch_alerts_for_email(&self, email: &str) -> Result<Vec<Alert>, StoreError>;
        async fn fetch_all_alerts(&self) -> Result<Vec<Alert>, StoreError>;
        async fn delete_alert(&self, id: &AlertId) -> Result<bool, StoreError>;
    }
}
