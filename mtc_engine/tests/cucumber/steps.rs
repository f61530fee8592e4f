use chrono::{NaiveDate, NaiveTime};
use cucumber::{given, then, when};
use mtc_engine::{
    db_types::{DepartureWindow, NewAlert},
    ticket_types::Ticket,
    AlertApiError,
};

use crate::cucumber::{world::CheckerSystem, CheckerWorld};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("Invalid date in feature file")
}

fn time(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").expect("Invalid time in feature file")
}

fn ticket(train_no: &str, origin: &str, destination: &str, day: &str, departure: &str, available: bool) -> Ticket {
    let departure_time = time(departure);
    Ticket {
        origin_iata: origin.to_string(),
        destination_iata: destination.to_string(),
        origin_name: None,
        destination_name: None,
        train_no: train_no.to_string(),
        travel_date: date(day),
        departure_time,
        arrival_time: departure_time + chrono::Duration::minutes(116),
        max_available: available,
    }
}

#[given("a fresh install")]
async fn fresh_install(world: &mut CheckerWorld) {
    world.system = Some(CheckerSystem::new().await);
}

async fn register(world: &mut CheckerWorld, name: String, alert: NewAlert) {
    let system = world.system.as_mut().expect("Checker system not initialised");
    let alert = system.api.register(alert).await.expect("Error registering alert");
    system.alerts.insert(name, alert.id);
}

#[given(expr = "{word} has an alert {word} for {word} to {word} on {word}")]
async fn alert_without_window(
    world: &mut CheckerWorld,
    email: String,
    name: String,
    origin: String,
    destination: String,
    day: String,
) {
    register(world, name, NewAlert::new(email, origin, destination, date(&day))).await;
}

#[given(expr = "{word} has an alert {word} for {word} to {word} on {word} departing between {word} and {word}")]
async fn alert_with_window(
    world: &mut CheckerWorld,
    email: String,
    name: String,
    origin: String,
    destination: String,
    day: String,
    start: String,
    end: String,
) {
    let window = DepartureWindow::new(time(&start), time(&end)).expect("Invalid window in feature file");
    register(world, name, NewAlert::new(email, origin, destination, date(&day)).with_window(window)).await;
}

#[given(expr = "{word} has an alert {word} for train {word} from {word} to {word} on {word}")]
async fn alert_for_train(
    world: &mut CheckerWorld,
    email: String,
    name: String,
    train_no: String,
    origin: String,
    destination: String,
    day: String,
) {
    let alert = NewAlert::new(email, origin, destination, date(&day)).with_train_no(train_no);
    register(world, name, alert).await;
}

#[given(expr = "train {word} from {word} to {word} on {word} at {word} has MAX seats")]
async fn available_ticket(
    world: &mut CheckerWorld,
    train_no: String,
    origin: String,
    destination: String,
    day: String,
    departure: String,
) {
    world.system().feed.publish(ticket(&train_no, &origin, &destination, &day, &departure, true));
}

#[given(expr = "train {word} from {word} to {word} on {word} at {word} has no MAX seats")]
async fn unavailable_ticket(
    world: &mut CheckerWorld,
    train_no: String,
    origin: String,
    destination: String,
    day: String,
    departure: String,
) {
    world.system().feed.publish(ticket(&train_no, &origin, &destination, &day, &departure, false));
}

#[given("the ticket feed is down")]
async fn feed_down(world: &mut CheckerWorld) {
    world.system().feed.set_down(true);
}

#[given("the ticket feed is back up")]
async fn feed_up(world: &mut CheckerWorld) {
    world.system().feed.set_down(false);
}

#[given("the mail relay refuses messages")]
async fn relay_down(world: &mut CheckerWorld) {
    world.system().outbox.set_refusing(true);
}

#[given("the mail relay accepts messages")]
async fn relay_up(world: &mut CheckerWorld) {
    world.system().outbox.set_refusing(false);
}

#[when("the checker runs")]
async fn run_cycle(world: &mut CheckerWorld) {
    let report = world.system().checker.run_cycle().await;
    world.last_cycle = Some(report);
}

#[when(expr = "{word} cancels alert {word}")]
async fn cancel(world: &mut CheckerWorld, email: String, name: String) {
    let system = world.system();
    let id = system.alert_id(&name).clone();
    world.last_error = system.api.cancel_alert(&email, &id).await.err().map(|e| e.to_string());
}

#[when(expr = "{word} cancels an alert that does not exist")]
async fn cancel_missing(world: &mut CheckerWorld, email: String) {
    let result = world.system().api.cancel_alert(&email, &"no-such-alert".into()).await;
    assert!(matches!(result, Err(AlertApiError::NotFound(_))), "Expected NotFound, got {result:?}");
    world.last_error = result.err().map(|e| e.to_string());
}

#[then(expr = "{int} notification(s) has/have been sent")]
async fn notifications_sent(world: &mut CheckerWorld, count: usize) {
    let messages = world.system().outbox.messages();
    assert_eq!(messages.len(), count, "Outbox: {messages:?}");
}

#[then(expr = "{word} was notified about train {word}")]
async fn notified_about(world: &mut CheckerWorld, email: String, train_no: String) {
    let messages = world.system().outbox.messages();
    assert!(
        messages.iter().any(|(alert, key)| alert.email == email && key.train_no == train_no),
        "{email} was not notified about train {train_no}. Outbox: {messages:?}"
    );
}

#[then(expr = "alert {word} has {int} sent record(s)")]
async fn sent_records(world: &mut CheckerWorld, name: String, count: usize) {
    let system = world.system();
    let sent = system.api.db().sent_alerts_for(system.alert_id(&name)).await.expect("Error fetching ledger");
    assert_eq!(sent.len(), count);
}

#[then(expr = "{word} has {int} alert(s)")]
async fn alert_count(world: &mut CheckerWorld, email: String, count: usize) {
    let alerts = world.system().api.alerts_for_email(&email).await.expect("Error fetching alerts");
    assert_eq!(alerts.len(), count);
}

#[then("the cancellation is refused")]
async fn cancellation_refused(world: &mut CheckerWorld) {
    let err = world.last_error.as_ref().expect("The cancellation succeeded");
    assert!(err.starts_with("No alert with id"), "Unexpected error: {err}");
}

#[then(expr = "{int} ticket group(s) failed to fetch")]
async fn failed_groups(world: &mut CheckerWorld, count: usize) {
    let report = world.last_cycle.expect("The checker has not run");
    assert_eq!(report.failed_groups, count);
}
