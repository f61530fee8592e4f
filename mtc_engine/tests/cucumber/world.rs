use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use cucumber::World;
use log::*;
use mtc_engine::{
    db_types::{Alert, AlertId, TicketKey},
    ticket_types::{Ticket, TicketQuery},
    AlertApi,
    CycleReport,
    FetchError,
    NotificationError,
    Notifier,
    SqliteDatabase,
    TicketChecker,
    TicketSource,
};

use crate::support::prepare_env::{prepare_test_env, random_db_path};

#[derive(Default, Debug, World)]
pub struct CheckerWorld {
    pub system: Option<CheckerSystem>,
    pub last_cycle: Option<CycleReport>,
    pub last_error: Option<String>,
}

impl CheckerWorld {
    pub fn system(&self) -> &CheckerSystem {
        self.system.as_ref().expect("Checker system not initialised")
    }
}

/// A real SQLite store wired to a scripted ticket feed and an outbox in place of SMTP.
pub struct CheckerSystem {
    pub db_path: String,
    pub api: AlertApi<SqliteDatabase>,
    pub checker: TicketChecker<SqliteDatabase, ScriptedFeed, Outbox>,
    pub feed: ScriptedFeed,
    pub outbox: Outbox,
    /// Alert ids by the nickname used in the feature file
    pub alerts: HashMap<String, AlertId>,
}

impl std::fmt::Debug for CheckerSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CheckerSystem ({})", self.db_path)
    }
}

impl CheckerSystem {
    pub async fn new() -> Self {
        let url = random_db_path();
        let db = prepare_test_env(&url).await;
        debug!("Created database: {url}");
        let feed = ScriptedFeed::default();
        let outbox = Outbox::default();
        let checker = TicketChecker::new(db.clone(), feed.clone(), outbox.clone());
        let api = AlertApi::new(db);
        Self { db_path: url, api, checker, feed, outbox, alerts: HashMap::new() }
    }

    pub fn alert_id(&self, name: &str) -> &AlertId {
        self.alerts.get(name).unwrap_or_else(|| panic!("No alert called {name}"))
    }
}

#[derive(Clone, Default)]
pub struct ScriptedFeed {
    tickets: Arc<Mutex<Vec<Ticket>>>,
    down: Arc<Mutex<bool>>,
}

impl ScriptedFeed {
    pub fn publish(&self, ticket: Ticket) {
        self.tickets.lock().unwrap().push(ticket);
    }

    pub fn set_down(&self, down: bool) {
        *self.down.lock().unwrap() = down;
    }
}

impl TicketSource for ScriptedFeed {
    async fn fetch_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>, FetchError> {
        if *self.down.lock().unwrap() {
            return Err(FetchError("503 Service Unavailable".into()));
        }
        let tickets = self.tickets.lock().unwrap();
        Ok(tickets
            .iter()
            .filter(|t| {
                t.origin_iata == query.origin_iata &&
                    t.destination_iata == query.destination_iata &&
                    t.travel_date == query.travel_date
            })
            .cloned()
            .collect())
    }
}

#[derive(Clone, Default)]
pub struct Outbox {
    messages: Arc<Mutex<Vec<(Alert, TicketKey)>>>,
    refusing: Arc<Mutex<bool>>,
}

impl Outbox {
    pub fn messages(&self) -> Vec<(Alert, TicketKey)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn set_refusing(&self, refusing: bool) {
        *self.refusing.lock().unwrap() = refusing;
    }
}

impl Notifier for Outbox {
    async fn notify(&self, alert: &Alert, ticket: &Ticket) -> Result<(), NotificationError> {
        if *self.refusing.lock().unwrap() {
            return Err(NotificationError::DeliveryFailed("relay refused the message".into()));
        }
        self.messages.lock().unwrap().push((alert.clone(), ticket.key()));
        Ok(())
    }
}
