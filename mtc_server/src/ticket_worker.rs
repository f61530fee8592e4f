use std::time::Duration;

use log::*;
use mtc_engine::{
    run_checker,
    AlertManagement,
    CheckerHandle,
    Notifier,
    SentAlertLedger,
    TicketChecker,
    TicketSource,
};
use tokio::task::JoinHandle;

/// Starts the ticket checker on the current actix system. Must be called from within a running system.
///
/// The returned [`CheckerHandle`] requests immediate checks and stops the worker. Once stopped, the `JoinHandle`
/// resolves to the number of cycles that ran.
pub fn start_ticket_worker<B, S, N>(
    db: B,
    source: S,
    notifier: N,
    interval: Duration,
) -> (CheckerHandle, JoinHandle<usize>)
where
    B: AlertManagement + SentAlertLedger + 'static,
    S: TicketSource + 'static,
    N: Notifier + 'static,
{
    let (handle, signals) = CheckerHandle::channel();
    let checker = TicketChecker::new(db, source, notifier);
    info!("🕰️ Starting ticket worker. Checking every {}s", interval.as_secs());
    let task = actix_web::rt::spawn(run_checker(checker, interval, signals));
    (handle, task)
}

/// Signals the worker to stop and waits for the cycle in progress, if any, to finish.
pub async fn stop_ticket_worker(handle: CheckerHandle, task: JoinHandle<usize>) {
    handle.shutdown();
    match task.await {
        Ok(cycles) => info!("🕰️ Ticket worker stopped after {cycles} cycles"),
        Err(e) => error!("🕰️ Ticket worker did not shut down cleanly. {e}"),
    }
}
