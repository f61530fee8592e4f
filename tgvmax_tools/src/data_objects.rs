use log::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Value of `od_happy_card` when no MAX seat is left on the train.
pub const MAX_UNAVAILABLE: &str = "NON";

/// A single page of results from the records endpoint.
///
/// Results are kept as raw JSON so that one malformed record cannot spoil the rest of the page. Use
/// [`RecordsPage::into_records`] to get the readable ones.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RecordsPage {
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub results: Vec<Value>,
}

impl RecordsPage {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// The `date` of the last result on the page, readable or not. This is the pagination cursor.
    pub fn last_date(&self) -> Option<String> {
        self.results.iter().rev().find_map(|r| r.get("date").and_then(Value::as_str)).map(String::from)
    }

    /// Converts each result on its own, dropping (and logging) those that do not fit [`TgvMaxRecord`].
    pub fn into_records(self) -> Vec<TgvMaxRecord> {
        self.results
            .into_iter()
            .filter_map(|raw| {
                serde_json::from_value::<TgvMaxRecord>(raw.clone())
                    .map_err(|e| warn!("🚄️ Skipping malformed record {raw}. {e}"))
                    .ok()
            })
            .collect()
    }
}

impl From<Vec<TgvMaxRecord>> for RecordsPage {
    fn from(records: Vec<TgvMaxRecord>) -> Self {
        let results = records.iter().filter_map(|r| serde_json::to_value(r).ok()).collect::<Vec<_>>();
        Self { total_count: Some(results.len() as u64), results }
    }
}

/// One train on one day, exactly as published. Field names follow the dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TgvMaxRecord {
    pub date: String,
    pub train_no: String,
    pub origine_iata: String,
    pub destination_iata: String,
    #[serde(default)]
    pub origine: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    pub heure_depart: String,
    pub heure_arrivee: String,
    #[serde(default)]
    pub od_happy_card: Option<String>,
}

impl TgvMaxRecord {
    /// `true` unless the record explicitly says that no MAX seat is left.
    pub fn has_max_seats(&self) -> bool {
        match &self.od_happy_card {
            Some(flag) => !flag.trim().eq_ignore_ascii_case(MAX_UNAVAILABLE),
            None => true,
        }
    }
}
