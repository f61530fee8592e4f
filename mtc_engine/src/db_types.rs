use std::fmt::Display;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;
use uuid::Uuid;

//--------------------------------------        AlertId        ---------------------------------------------------------
/// Opaque alert identifier. A fresh one is generated for every alert when it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct AlertId(pub String);

impl AlertId {
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for AlertId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<S: Into<String>> From<S> for AlertId {
    fn from(value: S) -> Self {
        Self(value.into())
    }
}

//--------------------------------------    DepartureWindow    ---------------------------------------------------------
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("The departure window is empty: {start} is later than {end}")]
pub struct InvalidWindowError {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// An inclusive range of same-day departure times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepartureWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl DepartureWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, InvalidWindowError> {
        if start > end {
            return Err(InvalidWindowError { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Both ends are included.
    pub fn contains(&self, departure: NaiveTime) -> bool {
        self.start <= departure && departure <= self.end
    }
}

impl Display for DepartureWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

//--------------------------------------       NewAlert        ---------------------------------------------------------
/// Alert criteria as submitted by a user, before an id has been assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAlert {
    pub email: String,
    pub origin_iata: String,
    pub destination_iata: String,
    pub travel_date: NaiveDate,
    pub train_no: Option<String>,
    pub window: Option<DepartureWindow>,
}

impl NewAlert {
    pub fn new<S: Into<String>>(email: S, origin_iata: S, destination_iata: S, travel_date: NaiveDate) -> Self {
        Self {
            email: email.into(),
            origin_iata: origin_iata.into(),
            destination_iata: destination_iata.into(),
            travel_date,
            train_no: None,
            window: None,
        }
    }

    pub fn with_train_no<S: Into<String>>(mut self, train_no: S) -> Self {
        self.train_no = Some(train_no.into());
        self
    }

    pub fn with_window(mut self, window: DepartureWindow) -> Self {
        self.window = Some(window);
        self
    }
}

//--------------------------------------         Alert         ---------------------------------------------------------
/// A stored alert. Alerts are never modified after creation; they can only be deleted.
///
/// The JSON representation keeps the field names used by the public HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "alert_id")]
    pub id: AlertId,
    pub email: String,
    #[serde(rename = "origine_iata")]
    pub origin_iata: String,
    pub destination_iata: String,
    #[serde(rename = "date")]
    pub travel_date: NaiveDate,
    pub train_no: Option<String>,
    #[serde(rename = "heure_depart_debut", default, with = "clock_time_opt")]
    pub departure_start: Option<NaiveTime>,
    #[serde(rename = "heure_depart_fin", default, with = "clock_time_opt")]
    pub departure_end: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    /// The departure window, if the alert has one. Rows with only one bound have no window.
    ///
    /// Inverted bounds are an error rather than "no window", so callers can refuse to match on them.
    pub fn window(&self) -> Result<Option<DepartureWindow>, InvalidWindowError> {
        match (self.departure_start, self.departure_end) {
            (Some(start), Some(end)) => DepartureWindow::new(start, end).map(Some),
            _ => Ok(None),
        }
    }
}

impl Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}→{} on {}", self.id, self.origin_iata, self.destination_iata, self.travel_date)?;
        if let Some(train_no) = &self.train_no {
            write!(f, " train {train_no}")?;
        }
        if let Ok(Some(window)) = self.window() {
            write!(f, " departing {window}")?;
        }
        Ok(())
    }
}

/// Serializes optional times as `HH:MM`, the format users submit them in.
mod clock_time_opt {
    use chrono::NaiveTime;
    use mtc_common::parse_clock_time;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => s.serialize_str(&t.format("%H:%M").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let value = Option::<String>::deserialize(d)?;
        value.map(|s| parse_clock_time(&s).map_err(D::Error::custom)).transpose()
    }
}

//--------------------------------------       TicketKey       ---------------------------------------------------------
/// Identifies a ticket occurrence for deduplication purposes.
///
/// The upstream source does not publish a stable ticket id, so the train number, travel date and departure time stand
/// in for one. Two distinct offers that share all three are indistinguishable to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicketKey {
    pub train_no: String,
    pub travel_date: NaiveDate,
    pub departure_time: NaiveTime,
}

impl Display for TicketKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "train {} on {} at {}", self.train_no, self.travel_date, self.departure_time.format("%H:%M"))
    }
}

//--------------------------------------       SentAlert       ---------------------------------------------------------
/// Ledger entry recording that the owner of `alert_id` has been notified about a ticket.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct SentAlert {
    pub id: i64,
    pub alert_id: AlertId,
    pub train_no: String,
    pub travel_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub created_at: DateTime<Utc>,
}

impl SentAlert {
    pub fn ticket_key(&self) -> TicketKey {
        TicketKey {
            train_no: self.train_no.clone(),
            travel_date: self.travel_date,
            departure_time: self.departure_time,
        }
    }
}
