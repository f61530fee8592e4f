//! The polling loop.
//!
//! [`run_checker`] runs a cycle, waits for the polling interval and starts again. Cycles never overlap. The wait is
//! cut short by a "check now" request or by shutdown; a cycle in progress always runs to completion.
use std::{sync::Arc, time::Duration};

use log::*;
use tokio::sync::{watch, Notify};

use crate::{
    checker::TicketChecker,
    traits::{AlertManagement, Notifier, SentAlertLedger, TicketSource},
};

/// Controls a running checker. Cheap to clone; every clone controls the same loop.
#[derive(Debug, Clone)]
pub struct CheckerHandle {
    shutdown: Arc<watch::Sender<bool>>,
    check_now: Arc<Notify>,
}

/// The receiving half of a [`CheckerHandle`], consumed by [`run_checker`].
#[derive(Debug)]
pub struct CheckerSignals {
    shutdown: watch::Receiver<bool>,
    check_now: Arc<Notify>,
}

impl CheckerHandle {
    pub fn channel() -> (Self, CheckerSignals) {
        let (tx, rx) = watch::channel(false);
        let check_now = Arc::new(Notify::new());
        let handle = Self { shutdown: Arc::new(tx), check_now: Arc::clone(&check_now) };
        (handle, CheckerSignals { shutdown: rx, check_now })
    }

    /// Asks the checker to start a cycle without waiting for the rest of the interval. If a cycle is running, the
    /// next one starts as soon as it finishes. Repeated requests before then collapse into one.
    pub fn check_now(&self) {
        self.check_now.notify_one();
    }

    /// Stops the checker once the current cycle (if any) completes.
    pub fn shutdown(&self) {
        // Fails only if the loop has already exited
        let _ = self.shutdown.send(true);
    }
}

impl CheckerSignals {
    fn is_shutdown(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Resolves once an immediate check has been requested.
    pub async fn check_now_requested(&self) {
        self.check_now.notified().await
    }
}

/// Runs checker cycles every `interval` until shutdown is signalled, and returns the number of cycles that ran.
pub async fn run_checker<B, S, N>(
    checker: TicketChecker<B, S, N>,
    interval: Duration,
    mut signals: CheckerSignals,
) -> usize
where
    B: AlertManagement + SentAlertLedger,
    S: TicketSource,
    N: Notifier,
{
    info!("🕰️ Ticket checker started. Checking every {}s", interval.as_secs_f32());
    let mut cycles = 0usize;
    while !signals.is_shutdown() {
        let report = checker.run_cycle().await;
        cycles += 1;
        info!("🕰️ Cycle {cycles} complete. {report}");
        tokio::select! {
            biased;
            changed = signals.shutdown.changed() => {
                if changed.is_err() {
                    info!("🕰️ Checker handle dropped.");
                    break;
                }
            },
            _ = signals.check_now.notified() => {
                debug!("🕰️ Immediate check requested");
            },
            _ = tokio::time::sleep(interval) => {},
        }
    }
    info!("🕰️ Ticket checker stopped after {cycles} cycles");
    cycles
}
