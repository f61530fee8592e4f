use chrono::Utc;
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Alert, AlertId, NewAlert},
    traits::StoreError,
};

/// Inserts a new alert. The id is generated here, once per alert.
pub async fn insert_alert(alert: NewAlert, conn: &mut SqliteConnection) -> Result<Alert, StoreError> {
    let id = AlertId::random();
    let (start, end) = match alert.window {
        Some(w) => (Some(w.start()), Some(w.end())),
        None => (None, None),
    };
    let alert: Alert = sqlx::query_as(
        r#"
            INSERT INTO alerts (
                id,
                email,
                origin_iata,
                destination_iata,
                travel_date,
                train_no,
                departure_start,
                departure_end,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *;
        "#,
    )
    .bind(id)
    .bind(alert.email)
    .bind(alert.origin_iata)
    .bind(alert.destination_iata)
    .bind(alert.travel_date)
    .bind(alert.train_no)
    .bind(start)
    .bind(end)
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Alert {alert} inserted for {}", alert.email);
    Ok(alert)
}

pub async fn fetch_alert(id: &AlertId, conn: &mut SqliteConnection) -> Result<Option<Alert>, StoreError> {
    let alert = sqlx::query_as("SELECT * FROM alerts WHERE id = $1").bind(id.as_str()).fetch_optional(conn).await?;
    Ok(alert)
}

/// Returns the alerts owned by `email`, in order of creation.
pub async fn fetch_alerts_for_email(email: &str, conn: &mut SqliteConnection) -> Result<Vec<Alert>, StoreError> {
    let alerts = sqlx::query_as("SELECT * FROM alerts WHERE email = $1 COLLATE NOCASE ORDER BY created_at, id")
        .bind(email)
        .fetch_all(conn)
        .await?;
    Ok(alerts)
}

pub async fn fetch_all_alerts(conn: &mut SqliteConnection) -> Result<Vec<Alert>, StoreError> {
    let alerts = sqlx::query_as("SELECT * FROM alerts ORDER BY created_at, id").fetch_all(conn).await?;
    Ok(alerts)
}

/// Deletes the alert with the given id. Returns `false` if there was no such alert.
pub async fn delete_alert(id: &AlertId, conn: &mut SqliteConnection) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM alerts WHERE id = $1").bind(id.as_str()).execute(conn).await?;
    let deleted = result.rows_affected() > 0;
    if deleted {
        debug!("🗃️ Alert {id} deleted");
    }
    Ok(deleted)
}
