use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web, App};
use log::debug;
use mtc_engine::{AlertApi, CheckerHandle};

use super::mocks::MockAlertManager;
use crate::{
    routes::{health, AlertsForEmailRoute, DeleteAlertRoute, StartCheckingRoute},
    server::{json_config, query_config},
};

/// Sends `req` to an app backed by `db`, and returns the status and body of the response.
pub async fn send_request(req: TestRequest, db: MockAlertManager, checker: CheckerHandle) -> (StatusCode, String) {
    let app = App::new()
        .app_data(web::Data::new(AlertApi::new(db)))
        .app_data(web::Data::new(checker))
        .app_data(json_config())
        .app_data(query_config())
        .service(health)
        .service(StartCheckingRoute::<MockAlertManager>::new())
        .service(AlertsForEmailRoute::<MockAlertManager>::new())
        .service(DeleteAlertRoute::<MockAlertManager>::new());
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}
