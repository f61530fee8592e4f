//! Decides which alerts a batch of tickets satisfies, and notifies each alert owner at most once per ticket.
use std::{collections::HashSet, fmt::Display, ops::AddAssign};

use chrono::Utc;
use log::*;

use crate::{
    db_types::Alert,
    ticket_types::Ticket,
    traits::{Notifier, SentAlertLedger},
};

/// Tally of one evaluation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchReport {
    pub tickets_seen: usize,
    pub unavailable: usize,
    pub duplicates: usize,
    pub matches: usize,
    pub already_sent: usize,
    pub notifications_sent: usize,
    pub failures: usize,
}

impl AddAssign for MatchReport {
    fn add_assign(&mut self, rhs: Self) {
        self.tickets_seen += rhs.tickets_seen;
        self.unavailable += rhs.unavailable;
        self.duplicates += rhs.duplicates;
        self.matches += rhs.matches;
        self.already_sent += rhs.already_sent;
        self.notifications_sent += rhs.notifications_sent;
        self.failures += rhs.failures;
    }
}

impl Display for MatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} tickets ({} without MAX seats, {} repeated), {} matches, {} already notified, {} sent, {} failed",
            self.tickets_seen,
            self.unavailable,
            self.duplicates,
            self.matches,
            self.already_sent,
            self.notifications_sent,
            self.failures
        )
    }
}

/// Returns true if `ticket` satisfies every criterion of `alert`.
///
/// A ticket without MAX availability never matches. Station codes are compared case-insensitively. The train number
/// and the departure window are only checked when the alert sets them; window bounds are inclusive. An alert whose
/// stored window is inverted matches nothing.
pub fn is_match(alert: &Alert, ticket: &Ticket) -> bool {
    if !ticket.max_available {
        return false;
    }
    let same_trip = alert.origin_iata.eq_ignore_ascii_case(&ticket.origin_iata) &&
        alert.destination_iata.eq_ignore_ascii_case(&ticket.destination_iata) &&
        alert.travel_date == ticket.travel_date;
    if !same_trip {
        return false;
    }
    if let Some(train_no) = &alert.train_no {
        if train_no.trim() != ticket.train_no.trim() {
            return false;
        }
    }
    match alert.window() {
        Ok(Some(window)) => window.contains(ticket.departure_time),
        Ok(None) => true,
        Err(e) => {
            warn!("🔔️ Alert {} has an unusable departure window and will not match anything. {e}", alert.id);
            false
        },
    }
}

/// Evaluates `tickets` against `alerts` and sends a notification for every match that the ledger has not seen.
///
/// Tickets with the same key are only evaluated once per call. A ledger entry is written only after the notifier
/// reports success, so a failed send is retried on the next pass. Errors are logged and counted, and never stop the
/// pass.
pub async fn evaluate<L, N>(tickets: &[Ticket], alerts: &[Alert], ledger: &L, notifier: &N) -> MatchReport
where
    L: SentAlertLedger,
    N: Notifier,
{
    let mut report = MatchReport::default();
    let mut seen = HashSet::with_capacity(tickets.len());
    for ticket in tickets {
        report.tickets_seen += 1;
        if !ticket.max_available {
            report.unavailable += 1;
            continue;
        }
        let key = ticket.key();
        if !seen.insert(key.clone()) {
            report.duplicates += 1;
            continue;
        }
        for alert in alerts.iter().filter(|a| is_match(a, ticket)) {
            report.matches += 1;
            match ledger.has_been_sent(&alert.id, &key).await {
                Ok(true) => {
                    trace!("🔔️ Alert {} has already been notified about {key}", alert.id);
                    report.already_sent += 1;
                    continue;
                },
                Ok(false) => {},
                Err(e) => {
                    error!("🔔️ Could not check whether alert {} was notified about {key}. Skipping. {e}", alert.id);
                    report.failures += 1;
                    continue;
                },
            }
            if let Err(e) = notifier.notify(alert, ticket).await {
                warn!("🔔️ Notification for alert {} about {key} failed. It will be retried next cycle. {e}", alert.id);
                report.failures += 1;
                continue;
            }
            report.notifications_sent += 1;
            info!("🔔️ {} notified about {ticket} (alert {})", alert.email, alert.id);
            match ledger.record_sent(&alert.id, &key, Utc::now()).await {
                Ok(_) => {},
                Err(e) => {
                    error!("🔔️ Notification for alert {} about {key} was sent but could not be recorded. {e}", alert.id);
                    report.failures += 1;
                },
            }
        }
    }
    report
}
