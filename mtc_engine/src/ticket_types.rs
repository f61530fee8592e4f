//! Tickets as seen by the matcher, and the glue between the tgvmax client and the [`TicketSource`] trait.
use std::fmt::Display;

use chrono::{NaiveDate, NaiveTime};
use log::*;
use mtc_common::{parse_clock_time, parse_travel_date, DateTimeFormatError};
use serde::{Deserialize, Serialize};
use tgvmax_tools::{TgvMaxApi, TgvMaxRecord, WhereClause};

use crate::{
    db_types::{Alert, TicketKey},
    traits::{FetchError, TicketSource},
};

/// A train on a given day, with its MAX availability. Tickets are never stored; they are re-fetched every cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub origin_iata: String,
    pub destination_iata: String,
    pub origin_name: Option<String>,
    pub destination_name: Option<String>,
    pub train_no: String,
    pub travel_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
    pub max_available: bool,
}

impl Ticket {
    pub fn key(&self) -> TicketKey {
        TicketKey {
            train_no: self.train_no.clone(),
            travel_date: self.travel_date,
            departure_time: self.departure_time,
        }
    }

    /// Human-readable origin, falling back to the station code.
    pub fn origin(&self) -> &str {
        self.origin_name.as_deref().unwrap_or(self.origin_iata.as_str())
    }

    /// Human-readable destination, falling back to the station code.
    pub fn destination(&self) -> &str {
        self.destination_name.as_deref().unwrap_or(self.destination_iata.as_str())
    }
}

impl Display for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "train {} {}→{} on {} at {}",
            self.train_no,
            self.origin_iata,
            self.destination_iata,
            self.travel_date,
            self.departure_time.format("%H:%M")
        )
    }
}

impl TryFrom<TgvMaxRecord> for Ticket {
    type Error = DateTimeFormatError;

    fn try_from(record: TgvMaxRecord) -> Result<Self, Self::Error> {
        let max_available = record.has_max_seats();
        Ok(Self {
            travel_date: parse_travel_date(&record.date)?,
            departure_time: parse_clock_time(&record.heure_depart)?,
            arrival_time: parse_clock_time(&record.heure_arrivee)?,
            origin_iata: record.origine_iata,
            destination_iata: record.destination_iata,
            origin_name: record.origine,
            destination_name: record.destination,
            train_no: record.train_no,
            max_available,
        })
    }
}

/// The upstream filter for one (origin, destination, date) combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TicketQuery {
    pub origin_iata: String,
    pub destination_iata: String,
    pub travel_date: NaiveDate,
}

impl TicketQuery {
    pub fn new<S: Into<String>>(origin_iata: S, destination_iata: S, travel_date: NaiveDate) -> Self {
        Self { origin_iata: origin_iata.into(), destination_iata: destination_iata.into(), travel_date }
    }

    pub fn for_alert(alert: &Alert) -> Self {
        Self::new(alert.origin_iata.to_uppercase(), alert.destination_iata.to_uppercase(), alert.travel_date)
    }

    pub fn where_clause(&self) -> WhereClause {
        WhereClause::route(self.origin_iata.as_str(), self.destination_iata.as_str()).on_date(self.travel_date)
    }
}

impl Display for TicketQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}→{} on {}", self.origin_iata, self.destination_iata, self.travel_date)
    }
}

/// Converts raw records, dropping (and logging) any that cannot be parsed.
pub fn tickets_from_records(records: Vec<TgvMaxRecord>) -> Vec<Ticket> {
    records
        .into_iter()
        .filter_map(|record| {
            let train_no = record.train_no.clone();
            Ticket::try_from(record)
                .map_err(|e| warn!("🚄️ Skipping unreadable record for train {train_no}. {e}"))
                .ok()
        })
        .collect()
}

impl TicketSource for TgvMaxApi {
    async fn fetch_tickets(&self, query: &TicketQuery) -> Result<Vec<Ticket>, FetchError> {
        let records = self.fetch_all(&query.where_clause()).await.map_err(|e| FetchError(e.to_string()))?;
        Ok(tickets_from_records(records))
    }
}
