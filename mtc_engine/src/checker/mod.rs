//! The ticket checker.
//!
//! A [`TicketChecker`] runs one polling cycle at a time: it loads every alert, groups them by route and travel date
//! so that each upstream query is made once, fetches the tickets for each group and hands them to
//! [`matcher::evaluate`]. [`scheduler::run_checker`] repeats cycles until it is told to stop.
pub mod matcher;
pub mod scheduler;

use std::{collections::BTreeMap, fmt::Display};

use log::*;

use crate::{
    checker::matcher::{evaluate, MatchReport},
    db_types::Alert,
    ticket_types::TicketQuery,
    traits::{AlertManagement, Notifier, SentAlertLedger, TicketSource},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub alerts: usize,
    pub groups: usize,
    pub failed_groups: usize,
    pub alerts_unavailable: bool,
    pub matching: MatchReport,
}

impl Display for CycleReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.alerts_unavailable {
            return write!(f, "alerts could not be loaded");
        }
        write!(
            f,
            "{} alerts in {} groups ({} failed to fetch): {}",
            self.alerts, self.groups, self.failed_groups, self.matching
        )
    }
}

pub struct TicketChecker<B, S, N> {
    db: B,
    source: S,
    notifier: N,
}

impl<B, S, N> TicketChecker<B, S, N>
where
    B: AlertManagement + SentAlertLedger,
    S: TicketSource,
    N: Notifier,
{
    pub fn new(db: B, source: S, notifier: N) -> Self {
        Self { db, source, notifier }
    }

    /// Runs a single check over every stored alert.
    ///
    /// Failures are logged and reported, never returned: a group whose tickets cannot be fetched is skipped and the
    /// remaining groups are still checked.
    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();
        let alerts = match self.db.fetch_all_alerts().await {
            Ok(alerts) => alerts,
            Err(e) => {
                error!("🕰️ Could not load alerts. Skipping this cycle. {e}");
                report.alerts_unavailable = true;
                return report;
            },
        };
        report.alerts = alerts.len();
        let groups = group_alerts(alerts);
        report.groups = groups.len();
        for (query, alerts) in groups {
            debug!("🕰️ Checking {} alerts for {query}", alerts.len());
            let tickets = match self.source.fetch_tickets(&query).await {
                Ok(tickets) => tickets,
                Err(e) => {
                    warn!("🕰️ Skipping {query}. {e}");
                    report.failed_groups += 1;
                    continue;
                },
            };
            report.matching += evaluate(&tickets, &alerts, &self.db, &self.notifier).await;
        }
        report
    }
}

/// Groups alerts that need the same upstream query. Codes are upper-cased so that case variants share a query.
pub fn group_alerts(alerts: Vec<Alert>) -> BTreeMap<TicketQuery, Vec<Alert>> {
    let mut groups: BTreeMap<TicketQuery, Vec<Alert>> = BTreeMap::new();
    for alert in alerts {
        groups.entry(TicketQuery::for_alert(&alert)).or_default().push(alert);
    }
    groups
}
