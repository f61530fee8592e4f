use chrono::{DateTime, Utc};
use log::trace;
use sqlx::SqliteConnection;

use crate::{
    db_types::{AlertId, SentAlert, TicketKey},
    traits::StoreError,
};

pub async fn sent_alert_exists(
    alert_id: &AlertId,
    ticket: &TicketKey,
    conn: &mut SqliteConnection,
) -> Result<bool, StoreError> {
    let count: i64 = sqlx::query_scalar(
        r#"
            SELECT COUNT(*) FROM sent_alerts
            WHERE alert_id = $1 AND train_no = $2 AND travel_date = $3 AND departure_time = $4
        "#,
    )
    .bind(alert_id.as_str())
    .bind(ticket.train_no.as_str())
    .bind(ticket.travel_date)
    .bind(ticket.departure_time)
    .fetch_one(conn)
    .await?;
    Ok(count > 0)
}

/// Inserts a ledger entry, doing nothing if the (alert, ticket) pair is already present.
/// Returns `true` if a new row was written.
pub async fn idempotent_insert(
    alert_id: &AlertId,
    ticket: &TicketKey,
    sent_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<bool, StoreError> {
    let result = sqlx::query(
        r#"
            INSERT INTO sent_alerts (alert_id, train_no, travel_date, departure_time, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (alert_id, train_no, travel_date, departure_time) DO NOTHING
        "#,
    )
    .bind(alert_id.as_str())
    .bind(ticket.train_no.as_str())
    .bind(ticket.travel_date)
    .bind(ticket.departure_time)
    .bind(sent_at)
    .execute(conn)
    .await?;
    let inserted = result.rows_affected() > 0;
    trace!("🗃️ Sent alert {alert_id} / {ticket} recorded: {inserted}");
    Ok(inserted)
}

pub async fn fetch_sent_alerts(alert_id: &AlertId, conn: &mut SqliteConnection) -> Result<Vec<SentAlert>, StoreError> {
    let sent = sqlx::query_as("SELECT * FROM sent_alerts WHERE alert_id = $1 ORDER BY id")
        .bind(alert_id.as_str())
        .fetch_all(conn)
        .await?;
    Ok(sent)
}
