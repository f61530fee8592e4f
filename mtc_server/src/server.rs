use std::time::Duration;

use actix_web::{
    dev::Server,
    error::{JsonPayloadError, QueryPayloadError},
    http::KeepAlive,
    middleware::Logger,
    web,
    App,
    HttpRequest,
    HttpServer,
};
use log::*;
use mtc_engine::{AlertApi, CheckerHandle, SqliteDatabase};
use tgvmax_tools::TgvMaxApi;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::email::EmailNotifier,
    routes::{health, AlertsForEmailRoute, DeleteAlertRoute, StartCheckingRoute},
    ticket_worker::{start_ticket_worker, stop_ticket_worker},
};

/// Opens the database, starts the ticket worker and serves the HTTP API until the server is stopped (e.g. by Ctrl-C).
///
/// The worker is stopped once the HTTP server has exited.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(format!("Database migration failed. {e}")))?;
    let source = TgvMaxApi::new(config.tgvmax.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let notifier = EmailNotifier::new(&config.smtp).map_err(|e| ServerError::ConfigurationError(e.to_string()))?;
    let (checker, worker) = start_ticket_worker(db.clone(), source, notifier, config.check_interval);
    let srv = create_server_instance(config, db, checker.clone())?;
    let result = srv.await.map_err(|e| ServerError::Unspecified(e.to_string()));
    info!("🚀️ HTTP server has stopped. Waiting for the ticket worker.");
    stop_ticket_worker(checker, worker).await;
    result
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    checker: CheckerHandle,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let alerts_api = AlertApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %r").log_target("mtc::access_log"))
            .app_data(web::Data::new(alerts_api))
            .app_data(web::Data::new(checker.clone()))
            .app_data(json_config())
            .app_data(query_config())
            .service(health)
            .service(StartCheckingRoute::<SqliteDatabase>::new())
            .service(AlertsForEmailRoute::<SqliteDatabase>::new())
            .service(DeleteAlertRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Malformed bodies are reported as JSON errors, like every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|e: JsonPayloadError, _: &HttpRequest| {
        ServerError::InvalidRequestBody(e.to_string()).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|e: QueryPayloadError, _: &HttpRequest| {
        ServerError::InvalidRequestQuery(e.to_string()).into()
    })
}
