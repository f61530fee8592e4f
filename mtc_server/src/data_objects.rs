use std::fmt::Display;

use lettre::Address;
use mtc_common::{parse_clock_time, parse_travel_date};
use mtc_engine::db_types::{AlertId, DepartureWindow, NewAlert};
use serde::{Deserialize, Serialize};

use crate::errors::ServerError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }
}

/// Body of `POST /start-checking/`. Any `alert_id` sent by the client is ignored; ids are assigned on storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAlertRequest {
    pub origine_iata: String,
    pub destination_iata: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub email: String,
    #[serde(default)]
    pub train_no: Option<String>,
    /// `HH:MM`
    #[serde(default)]
    pub heure_depart_debut: Option<String>,
    /// `HH:MM`
    #[serde(default)]
    pub heure_depart_fin: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl TryFrom<NewAlertRequest> for NewAlert {
    type Error = ServerError;

    fn try_from(req: NewAlertRequest) -> Result<Self, Self::Error> {
        let email = req.email.trim();
        email
            .parse::<Address>()
            .map_err(|e| ServerError::InvalidAlert(format!("'{email}' is not a valid email address. {e}")))?;
        if req.origine_iata.trim().is_empty() || req.destination_iata.trim().is_empty() {
            return Err(ServerError::InvalidAlert("origine_iata and destination_iata are required".into()));
        }
        let travel_date = parse_travel_date(req.date.trim()).map_err(|e| ServerError::InvalidAlert(e.to_string()))?;
        let window = match (non_blank(req.heure_depart_debut), non_blank(req.heure_depart_fin)) {
            (None, None) => None,
            (Some(start), Some(end)) => {
                let start = parse_clock_time(&start).map_err(|e| ServerError::InvalidAlert(e.to_string()))?;
                let end = parse_clock_time(&end).map_err(|e| ServerError::InvalidAlert(e.to_string()))?;
                Some(DepartureWindow::new(start, end).map_err(|e| ServerError::InvalidAlert(e.to_string()))?)
            },
            _ => {
                return Err(ServerError::InvalidAlert(
                    "heure_depart_debut and heure_depart_fin must be given together".into(),
                ))
            },
        };
        let mut alert = NewAlert::new(email, req.origine_iata.trim(), req.destination_iata.trim(), travel_date);
        if let Some(train_no) = non_blank(req.train_no) {
            alert = alert.with_train_no(train_no);
        }
        if let Some(window) = window {
            alert = alert.with_window(window);
        }
        Ok(alert)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertCreated {
    pub message: String,
    pub alert_id: AlertId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAlertQuery {
    pub email: String,
    pub alert_id: AlertId,
}
