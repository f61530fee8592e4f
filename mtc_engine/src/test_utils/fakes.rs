//! In-memory stand-ins for the collaborator traits.
use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
        Mutex,
    },
};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::{
    db_types::{Alert, AlertId, NewAlert, TicketKey},
    ticket_types::{Ticket, TicketQuery},
    traits::{
        AlertManagement,
        FetchError,
        NotificationError,
        Notifier,
        SentAlertLedger,
        StoreError,
        TicketSource,
    },
};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("Invalid date")
}

pub fn time(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").expect("Invalid time")
}

/// An available ticket with a two hour journey.
pub fn ticket(origin: &str, destination: &str, day: &str, train_no: &str, departure: &str) -> Ticket {
    let departure_time = time(departure);
    Ticket {
        origin_iata: origin.to_string(),
        destination_iata: destination.to_string(),
        origin_name: None,
        destination_name: None,
        train_no: train_no.to_string(),
        travel_date: date(day),
        departure_time,
        arrival_time: departure_time + chrono::Duration::hours(2),
        max_available: true,
    }
}

pub fn alert(email: &str, origin: &str, destination: &str, day: &str) -> Alert {
    Alert {
        id: AlertId::random(),
        email: email.to_string(),
        origin_iata: origin.to_string(),
        destination_iata: destination.to_string(),
        travel_date: date(day),
        train_no: None,
        departure_start: None,
        departure_end: None,
        created_at: Utc::now(),
    }
}

/// Alert store and ledger in one, like the SQLite backend.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    alerts: Arc<Mutex<Vec<Alert>>>,
    sent: Arc<Mutex<HashSet<(AlertId, TicketKey)>>>,
    broken_ledger: Arc<AtomicBool>,
}

impl MemoryDatabase {
    pub fn with_alerts(alerts: Vec<Alert>) -> Self {
        let db = Self::default();
        *db.alerts.lock().unwrap() = alerts;
        db
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn was_sent(&self, alert_id: &AlertId, ticket: &TicketKey) -> bool {
        self.sent.lock().unwrap().contains(&(alert_id.clone(), ticket.clone()))
    }

    /// Makes every ledger call fail until switched back.
    pub fn break_ledger(&self, broken: bool) {
        self.broken_ledger.store(broken, Ordering::SeqCst);
    }

    fn check_ledger(&self) -> Result<(), StoreError> {
        if self.broken_ledger.load(Ordering::SeqCst) {
            return Err(StoreError::DatabaseError("ledger is unavailable".into()));
        }
        Ok(())
    }
}

impl AlertManagement for MemoryDatabase {
    async fn insert_alert(&self, alert: NewAlert) -> Result<Alert, StoreError> {
        let (departure_start, departure_end) = match alert.window {
            Some(w) => (Some(w.start()), Some(w.end())),
            None => (None, None),
        };
        let stored = Alert {
            id: AlertId::random(),
            email: alert.email,
            origin_iata: alert.origin_iata,
            destination_iata: alert.destination_iata,
            travel_date: alert.travel_date,
            train_no: alert.train_no,
            departure_start,
            departure_end,
            created_at: Utc::now(),
        };
        self.alerts.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn fetch_alert(&self, id: &AlertId) -> Result<Option<Alert>, StoreError> {
        Ok(self.alerts.lock().unwrap().iter().find(|a| &a.id == id).cloned())
    }

    async fn fetch_alerts_for_email(&self, email: &str) -> Result<Vec<Alert>, StoreError> {
        Ok(self.alerts.lock().unwrap().iter().filter(|a| a.email.eq_ignore_ascii_case(email)).cloned().collect())
    }

    async fn fetch_all_alerts(&self) -> Result<Vec<Alert>, StoreError> {
        Ok(self.alerts.lock().unwrap().clone())
    }

    async fn delete_alert(&self, id: &AlertId) -> Result<bool, StoreError> {
        let mut alerts = self.alerts.lock().unwrap();
        let before = alerts.len();
        alerts.retain(|a| &a.id != id);
        Ok(alerts.len() < before)
    }
}

impl SentAlertLedger for MemoryDatabase {
    async fn has_been_sent(&self, alert_id: &AlertId, ticket: &TicketKey) -> Result<bool, StoreError> {
        self.check_ledger()?;
        Ok(self.was_sent(alert_id, ticket))
    }

    async fn record_sent(&self, alert_id: &AlertId, ticket: &TicketKey, _: DateTime<Utc>) -> Result<bool, StoreError> {
        self.check_ledger()?;
        Ok(self.sent.lock().unwrap().insert((alert_id.clone(), ticket.clone())))
    }
}

/// Serves canned tickets per query. Queries without canned tickets return an empty list.
#[derive(Clone, Default)]
pub struct FakeTicketSource {
    tickets: Arc<Mutex<HashMap<TicketQuery, Vec<Ticket>>>>,
    failing: Arc<Mutex<HashSet<TicketQuery>>>,
    calls: Arc<AtomicUsize>,
}

impl FakeTicketSource {
    pub fn add_ticket(&self, ticket: Ticket) {
        let query = TicketQuery::new(ticket.origin_iata.clone(), ticket.destination_iata.clone(), ticket.travel_date);
        self.tickets.lock().unwrap().entry(query).or_default().push(ticket);
    }

    pub fn fail_for(&self, query: TicketQuery) {
        self.failing.lock().unwrap().insert(query);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TicketSource for FakeTicketSource {
    async fn fetch_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.lock().unwrap().contains(query) {
            return Err(FetchError(format!("503 for {query}")));
        }
        Ok(self.tickets.lock().unwrap().get(query).cloned().unwrap_or_default())
    }
}

/// Remembers every notification it is asked to send. Can be told to fail.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(String, TicketKey)>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingNotifier {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// (recipient, ticket) pairs, in the order they were sent.
    pub fn sent(&self) -> Vec<(String, TicketKey)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Notifier for RecordingNotifier {
    async fn notify(&self, alert: &Alert, ticket: &Ticket) -> Result<(), NotificationError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(NotificationError::DeliveryFailed("mail relay refused the message".into()));
        }
        self.sent.lock().unwrap().push((alert.email.clone(), ticket.key()));
        Ok(())
    }
}
