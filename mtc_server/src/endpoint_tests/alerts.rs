use std::time::Duration;

use actix_web::{http::StatusCode, test::TestRequest};
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use mtc_engine::{
    db_types::{Alert, AlertId},
    CheckerHandle,
    StoreError,
};
use serde_json::{json, Value};

use super::{helpers::send_request, mocks::MockAlertManager};

fn stored_alert(id: &str, email: &str) -> Alert {
    Alert {
        id: AlertId::from(id),
        email: email.to_string(),
        origin_iata: "FRPLY".into(),
        destination_iata: "FRLYS".into(),
        travel_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        train_no: None,
        departure_start: Some(NaiveTime::from_hms_opt(6, 0, 0).unwrap()),
        departure_end: Some(NaiveTime::from_hms_opt(9, 0, 0).unwrap()),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
}

fn new_alert_body() -> Value {
    json!({
        "origine_iata": "FRPLY",
        "destination_iata": "FRLYS",
        "date": "2024-06-01",
        "email": "alice@example.com",
        "heure_depart_debut": "06:00",
        "heure_depart_fin": "09:00"
    })
}

#[actix_web::test]
async fn health_check() {
    let (handle, _signals) = CheckerHandle::channel();
    let (status, body) = send_request(TestRequest::get().uri("/health"), MockAlertManager::new(), handle).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "👍️\n");
}

#[actix_web::test]
async fn register_alert() {
    let _ = env_logger::try_init().ok();
    let mut db = MockAlertManager::new();
    db.expect_insert_alert()
        .withf(|a| {
            a.email == "alice@example.com" &&
                a.origin_iata == "FRPLY" &&
                a.window.map(|w| w.to_string()) == Some("06:00-09:00".to_string())
        })
        .times(1)
        .returning(|_| Ok(stored_alert("a1", "alice@example.com")));
    let (handle, _signals) = CheckerHandle::channel();
    let req = TestRequest::post().uri("/start-checking/").set_json(new_alert_body());
    let (status, body) = send_request(req, db, handle).await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["alert_id"], "a1");
    assert_eq!(body["message"], "Checking started, alert_id: a1");
}

#[actix_web::test]
async fn registration_triggers_a_check() {
    let mut db = MockAlertManager::new();
    db.expect_insert_alert().returning(|_| Ok(stored_alert("a1", "alice@example.com")));
    let (handle, signals) = CheckerHandle::channel();
    let req = TestRequest::post().uri("/start-checking/").set_json(new_alert_body());
    let (status, _) = send_request(req, db, handle.clone()).await;
    assert_eq!(status, StatusCode::OK);
    // The nudge is stored until the checker picks it up
    let nudged = tokio::time::timeout(Duration::from_millis(100), signals.check_now_requested()).await;
    assert!(nudged.is_ok(), "no check was requested");
}

#[actix_web::test]
async fn invalid_registrations_are_rejected() {
    let mut body = new_alert_body();
    body["heure_depart_debut"] = json!("10:00");
    let (handle, _signals) = CheckerHandle::channel();
    let mut db = MockAlertManager::new();
    db.expect_insert_alert().never();
    let req = TestRequest::post().uri("/start-checking/").set_json(body);
    let (status, body) = send_request(req, db, handle).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with(r#"{"error":"Invalid alert. "#), "{body}");

    let mut body = new_alert_body();
    body["heure_depart_debut"] = json!("10:00");
    body["heure_depart_fin"] = json!("09:00");
    let (handle, _signals) = CheckerHandle::channel();
    let mut db = MockAlertManager::new();
    db.expect_insert_alert().never();
    let req = TestRequest::post().uri("/start-checking/").set_json(body);
    let (status, body) = send_request(req, db, handle).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with(r#"{"error":"Invalid alert. The departure window is empty"#), "{body}");

    let (handle, _signals) = CheckerHandle::channel();
    let req = TestRequest::post().uri("/start-checking/").set_json(json!({ "email": "alice@example.com" }));
    let (status, body) = send_request(req, MockAlertManager::new(), handle).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    // Missing fields are a malformed body, not an invalid alert
    assert!(body.starts_with(r#"{"error":"Could not read request body: "#), "{body}");
}

#[actix_web::test]
async fn store_failure_is_a_server_error() {
    let mut db = MockAlertManager::new();
    db.expect_insert_alert().returning(|_| Err(StoreError::DatabaseError("disk I/O error".into())));
    let (handle, _signals) = CheckerHandle::channel();
    let req = TestRequest::post().uri("/start-checking/").set_json(new_alert_body());
    let (status, body) = send_request(req, db, handle).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("disk I/O error"));
}

#[actix_web::test]
async fn list_alerts() {
    let mut db = MockAlertManager::new();
    db.expect_fetch_alerts_for_email()
        .withf(|email| email.to_string() == "alice@example.com")
        .returning(|_| Ok(vec![stored_alert("a1", "alice@example.com"), stored_alert("a2", "alice@example.com")]));
    let (handle, _signals) = CheckerHandle::channel();
    let req = TestRequest::get().uri("/alerts/?email=alice@example.com");
    let (status, body) = send_request(req, db, handle).await;
    assert_eq!(status, StatusCode::OK);
    let alerts: Vec<Value> = serde_json::from_str(&body).unwrap();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0]["alert_id"], "a1");
    assert_eq!(alerts[0]["origine_iata"], "FRPLY");
    assert_eq!(alerts[0]["date"], "2024-06-01");
    assert_eq!(alerts[0]["heure_depart_debut"], "06:00");
}

#[actix_web::test]
async fn list_alerts_none_found() {
    let mut db = MockAlertManager::new();
    db.expect_fetch_alerts_for_email().returning(|_| Ok(vec![]));
    let (handle, _signals) = CheckerHandle::channel();
    let req = TestRequest::get().uri("/alerts/?email=bob@example.com");
    let (status, body) = send_request(req, db, handle).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. No alerts found for bob@example.com"}"#);
}

#[actix_web::test]
async fn list_alerts_requires_email() {
    let (handle, _signals) = CheckerHandle::channel();
    let (status, body) = send_request(TestRequest::get().uri("/alerts/"), MockAlertManager::new(), handle).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.starts_with(r#"{"error":"Could not read request query: "#), "{body}");
}

#[actix_web::test]
async fn delete_alert() {
    let mut db = MockAlertManager::new();
    db.expect_fetch_alert()
        .withf(|id| id.as_str() == "a1")
        .returning(|_| Ok(Some(stored_alert("a1", "alice@example.com"))));
    db.expect_delete_alert().withf(|id| id.as_str() == "a1").times(1).returning(|_| Ok(true));
    let (handle, _signals) = CheckerHandle::channel();
    let req = TestRequest::delete().uri("/alerts/?email=alice@example.com&alert_id=a1");
    let (status, body) = send_request(req, db, handle).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"success":true,"message":"Alert a1 deleted"}"#);
}

#[actix_web::test]
async fn delete_someone_elses_alert() {
    let mut db = MockAlertManager::new();
    db.expect_fetch_alert().returning(|_| Ok(Some(stored_alert("a1", "alice@example.com"))));
    db.expect_delete_alert().never();
    let (handle, _signals) = CheckerHandle::channel();
    let req = TestRequest::delete().uri("/alerts/?email=mallory@example.com&alert_id=a1");
    let (status, _) = send_request(req, db, handle).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn delete_unknown_alert() {
    let mut db = MockAlertManager::new();
    db.expect_fetch_alert().returning(|_| Ok(None));
    db.expect_delete_alert().never();
    let (handle, _signals) = CheckerHandle::channel();
    let req = TestRequest::delete().uri("/alerts/?email=alice@example.com&alert_id=nope");
    let (status, body) = send_request(req, db, handle).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, r#"{"error":"The data was not found. No alert with id nope exists for this email address"}"#);
}
