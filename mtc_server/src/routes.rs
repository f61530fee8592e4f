//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Every store call made here is asynchronous, so handlers never block
//! a worker while waiting on the database.
use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use mtc_engine::{db_types::NewAlert, AlertApi, AlertManagement, CheckerHandle};

use crate::{
    data_objects::{AlertCreated, DeleteAlertQuery, EmailQuery, JsonResponse, NewAlertRequest},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Alerts  ----------------------------------------------------
route!(start_checking => Post "/start-checking/" impl AlertManagement);
/// Registers a new alert and asks the ticket checker to run straight away.
///
/// ## Body
/// * `origine_iata`, `destination_iata` - station codes, e.g. `FRPLY`.
/// * `date` - the travel date, `YYYY-MM-DD`.
/// * `email` - where notifications are sent. Also identifies the owner of the alert.
/// * `train_no` - optional. Only this train will be reported.
/// * `heure_depart_debut`, `heure_depart_fin` - optional, `HH:MM`. Both or neither must be given. Only trains
///   departing within this window (inclusive) will be reported.
///
/// ## Returns
/// `{"message": "...", "alert_id": "..."}`. Keep the alert id: it is needed to cancel the alert.
pub async fn start_checking<B: AlertManagement>(
    body: web::Json<NewAlertRequest>,
    api: web::Data<AlertApi<B>>,
    checker: web::Data<CheckerHandle>,
) -> Result<HttpResponse, ServerError> {
    let alert = NewAlert::try_from(body.into_inner()).map_err(|e| {
        debug!("💻️ Rejected alert registration. {e}");
        e
    })?;
    let alert = api.register(alert).await?;
    info!("💻️ Alert {} registered for {}", alert.id, alert.email);
    checker.check_now();
    let result = AlertCreated { message: format!("Checking started, alert_id: {}", alert.id), alert_id: alert.id };
    Ok(HttpResponse::Ok().json(result))
}

route!(alerts_for_email => Get "/alerts/" impl AlertManagement);
/// Lists the alerts registered for `email`. Returns 404 if there are none.
pub async fn alerts_for_email<B: AlertManagement>(
    query: web::Query<EmailQuery>,
    api: web::Data<AlertApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let EmailQuery { email } = query.into_inner();
    trace!("💻️ Fetching alerts for {email}");
    let alerts = api.alerts_for_email(&email).await?;
    if alerts.is_empty() {
        return Err(ServerError::NoRecordFound(format!("No alerts found for {email}")));
    }
    Ok(HttpResponse::Ok().json(alerts))
}

route!(delete_alert => Delete "/alerts/" impl AlertManagement);
/// Cancels an alert. The email address must be the one the alert was registered with, otherwise the response is a
/// 404 and nothing is deleted.
pub async fn delete_alert<B: AlertManagement>(
    query: web::Query<DeleteAlertQuery>,
    api: web::Data<AlertApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let DeleteAlertQuery { email, alert_id } = query.into_inner();
    info!("💻️ Cancel alert request for {alert_id} from {email}");
    let alert = api.cancel_alert(&email, &alert_id).await.map_err(|e| {
        debug!("💻️ Could not cancel alert. {e}");
        e
    })?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Alert {} deleted", alert.id))))
}
